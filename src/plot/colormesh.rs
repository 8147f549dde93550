use std::f64::consts::PI;

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};
use typed_builder::TypedBuilder;

use super::{
    colour, draw_text, text_style, ColourNorm, DrawError, Figure, FONT,
    LABEL_FONT_SIZE, TEXT_FONT_SIZE,
};
use crate::{
    image::{eta_edges, phi_edges, Image, ETA_RANGE, PHI_RANGE},
    jet::Jet,
};

const COLOURBAR_WIDTH: u32 = 200;
const COLOURBAR_STEPS: usize = 200;
const MARKER_SIZE: i32 = 8;
/// Vertical offset of the pt annotation above a jet
const PT_LABEL_OFFSET: f64 = 0.5;
const CIRCLE_DASHES: usize = 24;

/// Jets drawn on top of an image
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JetOverlay {
    /// Jets matched to generator-level jets
    pub matched: Vec<Jet>,
    pub unmatched: Vec<Jet>,
    /// Radius of the circles drawn around each jet
    pub radius: f64,
}

/// Texts in the corners of the plot area
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CornerTexts {
    pub top_left: Option<String>,
    pub top_right: Option<String>,
    pub bottom_right: Option<String>,
}

/// A pseudorapidity-azimuth image drawn as a colour mesh
#[derive(Clone, Debug, TypedBuilder)]
pub struct ColourMesh<'a> {
    image: &'a Image,
    norm: ColourNorm,
    #[builder(setter(into))]
    colourbar_label: String,
    #[builder(default, setter(into))]
    title: Option<String>,
    #[builder(default)]
    corner_texts: CornerTexts,
    #[builder(default, setter(strip_option))]
    jets: Option<JetOverlay>,
}

/// Coloured cells `((η0, φ0), (η1, φ1), t)` of an image
///
/// Cells are spanned by consecutive points of [eta_edges] and
/// [phi_edges], so the last η row and φ column are not part of any
/// cell. Pixels masked by the normalisation are skipped.
pub fn mesh_cells(
    image: &Image,
    norm: &ColourNorm,
) -> Vec<((f64, f64), (f64, f64), f64)> {
    let eta = eta_edges(image.n_eta());
    let phi = phi_edges(image.n_phi());
    let mut cells = Vec::new();
    for (ieta, eta) in eta.windows(2).enumerate() {
        for (iphi, phi) in phi.windows(2).enumerate() {
            if let Some(t) = norm.normalise(image[(ieta, iphi)]) {
                cells.push(((eta[0], phi[0]), (eta[1], phi[1]), t));
            }
        }
    }
    cells
}

/// Dashes approximating a circle
pub(crate) fn dashed_circle(
    centre: (f64, f64),
    radius: f64,
    ndashes: usize,
) -> Vec<Vec<(f64, f64)>> {
    const POINTS_PER_DASH: usize = 4;
    let nsegments = 2 * ndashes;
    (0..ndashes)
        .map(|i| {
            let start = 2. * PI * (2 * i) as f64 / nsegments as f64;
            let len = 2. * PI / nsegments as f64;
            (0..=POINTS_PER_DASH)
                .map(|k| {
                    let angle = start + len * k as f64 / POINTS_PER_DASH as f64;
                    (
                        centre.0 + radius * angle.cos(),
                        centre.1 + radius * angle.sin(),
                    )
                })
                .collect()
        })
        .collect()
}

impl<'a> ColourMesh<'a> {
    fn draw_jets<'b, DB: DrawingBackend + 'b>(
        &self,
        chart: &mut ChartContext<'b, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        jets: &JetOverlay,
    ) -> Result<(), DrawError<DB>> {
        let circles = [(&jets.matched, BLACK), (&jets.unmatched, RED)];
        for (group, line_colour) in circles {
            let style = line_colour.stroke_width(2);
            for jet in group {
                let centre = (jet.eta, jet.phi);
                chart.draw_series(
                    dashed_circle(centre, jets.radius, CIRCLE_DASHES)
                        .into_iter()
                        .map(|dash| PathElement::new(dash, style)),
                )?;
            }
        }
        let matched_style = BLACK.stroke_width(2);
        chart
            .draw_series(
                jets.matched
                    .iter()
                    .map(|j| Cross::new((j.eta, j.phi), MARKER_SIZE, matched_style)),
            )?
            .label("GEN-matched jets")
            .legend(move |(x, y)| Cross::new((x, y), MARKER_SIZE, matched_style));
        let unmatched_style = RED.stroke_width(2);
        chart
            .draw_series(
                jets.unmatched
                    .iter()
                    .map(|j| Cross::new((j.eta, j.phi), MARKER_SIZE, unmatched_style)),
            )?
            .label("Unmatched jets")
            .legend(move |(x, y)| Cross::new((x, y), MARKER_SIZE, unmatched_style));

        let label_style = text_style(TEXT_FONT_SIZE, HPos::Center, VPos::Center);
        chart.draw_series(jets.matched.iter().map(|j| {
            Text::new(
                format!("pT = {:.2} GeV", j.pt),
                (j.eta, j.phi + PT_LABEL_OFFSET),
                label_style.clone(),
            )
        }))?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((FONT, TEXT_FONT_SIZE))
            .draw()
    }

    fn draw_colourbar<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawError<DB>> {
        let steps = self.norm.steps(COLOURBAR_STEPS);
        let mut builder = ChartBuilder::on(area);
        builder
            .margin_top(50)
            .margin_bottom(60)
            .margin_left(10)
            .margin_right(90)
            .set_label_area_size(LabelAreaPosition::Right, 70);
        let (vmin, vmax) = self.norm.range();
        match self.norm {
            ColourNorm::Log { .. } => {
                let mut chart =
                    builder.build_cartesian_2d(0f64..1f64, (vmin..vmax).log_scale())?;
                chart
                    .configure_mesh()
                    .disable_mesh()
                    .disable_x_axis()
                    .y_desc(self.colourbar_label.as_str())
                    .y_label_formatter(&|v| format!("{v:.0e}"))
                    .label_style((FONT, TEXT_FONT_SIZE))
                    .axis_desc_style((FONT, LABEL_FONT_SIZE))
                    .draw()?;
                chart.draw_series(steps.into_iter().map(|(v0, v1, c)| {
                    Rectangle::new([(0., v0), (1., v1)], c.filled())
                }))?;
            }
            ColourNorm::Linear { .. } => {
                // constant images still need an axis of finite length
                let (vmin, vmax) = if vmax > vmin {
                    (vmin, vmax)
                } else {
                    (vmin - 0.5, vmax + 0.5)
                };
                let mut chart = builder.build_cartesian_2d(0f64..1f64, vmin..vmax)?;
                chart
                    .configure_mesh()
                    .disable_mesh()
                    .disable_x_axis()
                    .y_desc(self.colourbar_label.as_str())
                    .y_label_formatter(&|v| format!("{v:.2}"))
                    .label_style((FONT, TEXT_FONT_SIZE))
                    .axis_desc_style((FONT, LABEL_FONT_SIZE))
                    .draw()?;
                chart.draw_series(steps.into_iter().map(|(v0, v1, c)| {
                    Rectangle::new([(0., v0), (1., v1)], c.filled())
                }))?;
            }
        }
        Ok(())
    }
}

impl<'a> Figure for ColourMesh<'a> {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawError<DB>> {
        let (width, _) = root.dim_in_pixel();
        let (main, bar) =
            root.split_horizontally(width.saturating_sub(COLOURBAR_WIDTH));

        let mut builder = ChartBuilder::on(&main);
        builder
            .margin(20)
            .margin_top(50)
            .x_label_area_size(60)
            .y_label_area_size(70);
        if let Some(title) = &self.title {
            builder.caption(title, (FONT, LABEL_FONT_SIZE + 6));
        }
        let mut chart = builder.build_cartesian_2d(
            ETA_RANGE.0..ETA_RANGE.1,
            PHI_RANGE.0..PHI_RANGE.1,
        )?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("PF Candidate η")
            .y_desc("PF Candidate φ")
            .label_style((FONT, TEXT_FONT_SIZE))
            .axis_desc_style((FONT, LABEL_FONT_SIZE))
            .draw()?;

        chart.draw_series(
            mesh_cells(self.image, &self.norm)
                .into_iter()
                .map(|(c0, c1, t)| Rectangle::new([c0, c1], colour(t).filled())),
        )?;

        if let Some(jets) = &self.jets {
            self.draw_jets(&mut chart, jets)?;
        }

        let texts = [
            (&self.corner_texts.top_left, (ETA_RANGE.0, PHI_RANGE.1), HPos::Left, VPos::Bottom),
            (&self.corner_texts.top_right, (ETA_RANGE.1, PHI_RANGE.1), HPos::Right, VPos::Bottom),
            (&self.corner_texts.bottom_right, (ETA_RANGE.1 - 0.1, PHI_RANGE.0 + 0.1), HPos::Right, VPos::Bottom),
        ];
        for (text, pos, h_pos, v_pos) in texts {
            if let Some(text) = text {
                let style = text_style(LABEL_FONT_SIZE, h_pos, v_pos);
                draw_text(&main, &chart, text, pos, &style)?;
            }
        }

        self.draw_colourbar(&bar)
    }
}
