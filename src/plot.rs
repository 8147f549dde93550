mod colormesh;
mod colour;
mod histogram;
mod scatter;

pub use colormesh::{ColourMesh, CornerTexts, JetOverlay};
pub use colour::{colour, ColourNorm};
pub use histogram::StepHistogram;
pub use scatter::{palette_colour, Annotation, Marker, Scatter, ScatterSeries};

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use log::debug;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// Size of all figures in pixels
pub const FIGURE_SIZE: (u32, u32) = (1024, 768);

const FONT: &str = "sans-serif";
const LABEL_FONT_SIZE: u32 = 22;
const TEXT_FONT_SIZE: u32 = 18;

/// Error type of drawing on a backend
pub type DrawError<DB> = DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>;

/// Something that can be drawn
pub trait Figure {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawError<DB>>;
}

/// Output file format
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    Eq,
    PartialEq,
    ValueEnum,
    Deserialize,
    Serialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum PlotFormat {
    #[default]
    Svg,
    Png,
}

impl PlotFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            PlotFormat::Svg => "svg",
            PlotFormat::Png => "png",
        }
    }
}

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Failed to draw {path:?}: {msg}")]
    Drawing { path: PathBuf, msg: String },
}

/// `path` with the extension of the format appended
pub fn with_extension<P: AsRef<Path>>(path: P, format: PlotFormat) -> PathBuf {
    let mut path: OsString = path.as_ref().into();
    path.push(".");
    path.push(format.extension());
    path.into()
}

/// Draw a figure into a file
///
/// The extension of the output file is determined by the format and
/// appended to `path`. Returns the path of the written file.
pub fn save<F: Figure, P: AsRef<Path>>(
    figure: &F,
    path: P,
    format: PlotFormat,
) -> Result<PathBuf, PlotError> {
    let path = with_extension(path, format);
    debug!("Drawing {path:?}");
    let res = match format {
        PlotFormat::Svg => {
            render(figure, SVGBackend::new(&path, FIGURE_SIZE).into_drawing_area())
        }
        PlotFormat::Png => render(
            figure,
            BitMapBackend::new(&path, FIGURE_SIZE).into_drawing_area(),
        ),
    };
    match res {
        Ok(()) => Ok(path),
        Err(msg) => Err(PlotError::Drawing { path, msg }),
    }
}

fn render<F: Figure, DB: DrawingBackend>(
    figure: &F,
    root: DrawingArea<DB, Shift>,
) -> Result<(), String> {
    root.fill(&WHITE).map_err(|err| err.to_string())?;
    figure.draw(&root).map_err(|err| err.to_string())?;
    root.present().map_err(|err| err.to_string())
}

fn text_style(size: u32, h_pos: HPos, v_pos: VPos) -> TextStyle<'static> {
    (FONT, size)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(h_pos, v_pos))
}

/// Draw text at a position in chart coordinates
fn draw_text<DB, X, Y>(
    root: &DrawingArea<DB, Shift>,
    chart: &ChartContext<'_, DB, Cartesian2d<X, Y>>,
    text: &str,
    pos: (X::ValueType, Y::ValueType),
    style: &TextStyle,
) -> Result<(), DrawError<DB>>
where
    DB: DrawingBackend,
    X: Ranged,
    Y: Ranged,
{
    root.draw_text(text, style, chart.backend_coord(&pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions() {
        assert_eq!(
            with_extension("output/tag/ievent_0_all", PlotFormat::Svg),
            Path::new("output/tag/ievent_0_all.svg")
        );
        assert_eq!(
            with_extension("ratio_v1.2", PlotFormat::Png),
            Path::new("ratio_v1.2.png")
        );
        assert_eq!(PlotFormat::default().to_string(), "svg");
    }
}
