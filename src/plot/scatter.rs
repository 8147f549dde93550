use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};
use typed_builder::TypedBuilder;

use super::{
    draw_text, text_style, DrawError, Figure, FONT, LABEL_FONT_SIZE,
    TEXT_FONT_SIZE,
};

const MARKER_SIZE: i32 = 6;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Marker {
    #[default]
    Cross,
    Circle,
}

/// Points drawn with the same marker and colour
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterSeries {
    /// Legend entry, if any
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
    pub marker: Marker,
    pub colour: RGBColor,
}

impl ScatterSeries {
    pub fn new(points: Vec<(f64, f64)>, marker: Marker, colour: RGBColor) -> Self {
        Self {
            label: None,
            points,
            marker,
            colour,
        }
    }

    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Text centred at a position in data coordinates
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub pos: (f64, f64),
    pub text: String,
}

/// The `i`th colour of the default palette
pub fn palette_colour(i: usize) -> RGBColor {
    let (r, g, b) = Palette99::COLORS[i % Palette99::COLORS.len()];
    RGBColor(r, g, b)
}

/// Scatter plot of one or more series
#[derive(Clone, Debug, TypedBuilder)]
pub struct Scatter {
    series: Vec<ScatterSeries>,
    #[builder(setter(into))]
    x_label: String,
    #[builder(setter(into))]
    y_label: String,
    xlim: (f64, f64),
    ylim: (f64, f64),
    #[builder(default)]
    annotations: Vec<Annotation>,
    /// Text above the top left corner
    #[builder(default, setter(strip_option, into))]
    corner_text: Option<String>,
}

impl Figure for Scatter {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawError<DB>> {
        let mut chart = ChartBuilder::on(root)
            .margin(30)
            .margin_top(50)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d(
                self.xlim.0..self.xlim.1,
                self.ylim.0..self.ylim.1,
            )?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .label_style((FONT, TEXT_FONT_SIZE))
            .axis_desc_style((FONT, LABEL_FONT_SIZE))
            .draw()?;

        for series in &self.series {
            let style = series.colour.stroke_width(2);
            let points = series.points.iter().copied();
            let label = series.label.as_deref();
            match series.marker {
                Marker::Cross => {
                    let anno = chart.draw_series(
                        points.map(|p| Cross::new(p, MARKER_SIZE, style)),
                    )?;
                    if let Some(label) = label {
                        anno.label(label)
                            .legend(move |c| Cross::new(c, MARKER_SIZE, style));
                    }
                }
                Marker::Circle => {
                    let anno = chart.draw_series(
                        points.map(|p| Circle::new(p, MARKER_SIZE, style.filled())),
                    )?;
                    if let Some(label) = label {
                        anno.label(label).legend(move |c| {
                            Circle::new(c, MARKER_SIZE, style.filled())
                        });
                    }
                }
            }
        }

        let style = text_style(TEXT_FONT_SIZE, HPos::Center, VPos::Center);
        chart.draw_series(self.annotations.iter().map(|a| {
            Text::new(a.text.clone(), a.pos, style.clone())
        }))?;

        if self.series.iter().any(|s| s.label.is_some()) {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font((FONT, TEXT_FONT_SIZE))
                .draw()?;
        }

        if let Some(text) = &self.corner_text {
            let style = text_style(LABEL_FONT_SIZE, HPos::Left, VPos::Bottom);
            draw_text(root, &chart, text, (self.xlim.0, self.ylim.1), &style)?;
        }
        Ok(())
    }
}
