use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};
use typed_builder::TypedBuilder;

use super::{
    draw_text, text_style, DrawError, Figure, FONT, LABEL_FONT_SIZE,
    TEXT_FONT_SIZE,
};
use crate::histogram::Histogram;

/// A histogram drawn as a step line
#[derive(Clone, Debug, TypedBuilder)]
pub struct StepHistogram<'a> {
    hist: &'a Histogram,
    #[builder(setter(into))]
    x_label: String,
    #[builder(default = "Counts".to_owned(), setter(into))]
    y_label: String,
    /// Fixed range of the y axis
    #[builder(default, setter(strip_option))]
    ylim: Option<(f64, f64)>,
    #[builder(default)]
    log_y: bool,
    /// Text above the top left corner
    #[builder(default, setter(strip_option, into))]
    corner_text: Option<String>,
}

/// Corner points of the step line
///
/// Counts are raised to at least `floor`, so that empty bins remain
/// visible on a logarithmic axis.
pub fn step_points(hist: &Histogram, floor: f64) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(2 * hist.counts().len() + 2);
    for (lower, upper, count) in hist.bins() {
        let y = (count as f64).max(floor);
        if points.is_empty() {
            points.push((lower, floor));
        }
        points.push((lower, y));
        points.push((upper, y));
    }
    if let Some(&(x, _)) = points.last() {
        points.push((x, floor));
    }
    points
}

impl<'a> StepHistogram<'a> {
    fn y_range(&self) -> (f64, f64) {
        if let Some(ylim) = self.ylim {
            return ylim;
        }
        let max = self.hist.counts().iter().copied().max().unwrap_or_default();
        let max = (max as f64).max(1.);
        if self.log_y {
            (0.1, 10. * max)
        } else {
            (0., 1.1 * max)
        }
    }
}

impl<'a> Figure for StepHistogram<'a> {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawError<DB>> {
        let edges = self.hist.edges();
        let x_range = edges[0]..edges[edges.len() - 1];
        let (ymin, ymax) = self.y_range();
        let mut builder = ChartBuilder::on(root);
        builder
            .margin(30)
            .margin_top(50)
            .x_label_area_size(60)
            .y_label_area_size(80);
        let floor = if self.log_y { ymin } else { 0. };
        let points = step_points(self.hist, floor);
        let line = BLUE.stroke_width(2);
        let corner = (edges[0], ymax);
        let style = text_style(LABEL_FONT_SIZE, HPos::Left, VPos::Bottom);
        if self.log_y {
            let mut chart =
                builder.build_cartesian_2d(x_range, (ymin..ymax).log_scale())?;
            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc(self.x_label.as_str())
                .y_desc(self.y_label.as_str())
                .y_label_formatter(&|v| format!("{v:.0e}"))
                .label_style((FONT, TEXT_FONT_SIZE))
                .axis_desc_style((FONT, LABEL_FONT_SIZE))
                .draw()?;
            chart.draw_series(LineSeries::new(points, line))?;
            if let Some(text) = &self.corner_text {
                draw_text(root, &chart, text, corner, &style)?;
            }
        } else {
            let mut chart = builder.build_cartesian_2d(x_range, ymin..ymax)?;
            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc(self.x_label.as_str())
                .y_desc(self.y_label.as_str())
                .label_style((FONT, TEXT_FONT_SIZE))
                .axis_desc_style((FONT, LABEL_FONT_SIZE))
                .draw()?;
            chart.draw_series(LineSeries::new(points, line))?;
            if let Some(text) = &self.corner_text {
                draw_text(root, &chart, text, corner, &style)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps() {
        let hist =
            Histogram::with_values(vec![0., 1., 2.], [0.5, 1.5, 1.2]).unwrap();
        assert_eq!(
            step_points(&hist, 0.),
            [(0., 0.), (0., 1.), (1., 1.), (1., 2.), (2., 2.), (2., 0.)]
        );

        let empty = Histogram::new(vec![0., 1.]).unwrap();
        assert_eq!(
            step_points(&empty, 0.1),
            [(0., 0.1), (0., 0.1), (1., 0.1), (1., 0.1)]
        );
    }

    #[test]
    fn default_range() {
        let hist = Histogram::with_values(vec![0., 1.], [0.5; 10]).unwrap();
        let fig = StepHistogram::builder()
            .hist(&hist)
            .x_label("x")
            .log_y(true)
            .build();
        assert_eq!(fig.y_range(), (0.1, 100.));
        let fig = StepHistogram::builder()
            .hist(&hist)
            .x_label("x")
            .ylim((0.1, 1e5))
            .build();
        assert_eq!(fig.y_range(), (0.1, 1e5));
    }
}
