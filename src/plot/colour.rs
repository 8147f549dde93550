use itertools::{Itertools, MinMaxResult};
use plotters::prelude::*;

/// Colour for a normalised value in `[0, 1]`
pub fn colour(t: f64) -> RGBColor {
    ViridisRGB.get_color(t.clamp(0., 1.))
}

/// Map from data values to `[0, 1]`
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ColourNorm {
    /// Logarithmic scale, non-positive values are masked
    Log { vmin: f64, vmax: f64 },
    Linear { vmin: f64, vmax: f64 },
}

impl ColourNorm {
    /// Linear scale over the range of all finite values
    pub fn linear_over<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a f64>,
    {
        let finite = values.into_iter().copied().filter(|v| v.is_finite());
        match finite.minmax_by(|a, b| a.total_cmp(b)) {
            MinMaxResult::NoElements => Self::Linear { vmin: 0., vmax: 1. },
            MinMaxResult::OneElement(v) => Self::Linear { vmin: v, vmax: v },
            MinMaxResult::MinMax(vmin, vmax) => Self::Linear { vmin, vmax },
        }
    }

    pub fn range(&self) -> (f64, f64) {
        match *self {
            ColourNorm::Log { vmin, vmax } => (vmin, vmax),
            ColourNorm::Linear { vmin, vmax } => (vmin, vmax),
        }
    }

    /// Position of the value on the colour scale
    ///
    /// Values outside the range are clipped. Returns `None` for values
    /// that should not be drawn.
    pub fn normalise(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let t = match *self {
            ColourNorm::Log { vmin, vmax } => {
                if value <= 0. {
                    return None;
                }
                (value.ln() - vmin.ln()) / (vmax.ln() - vmin.ln())
            }
            ColourNorm::Linear { vmin, vmax } => {
                if vmax == vmin {
                    0.5
                } else {
                    (value - vmin) / (vmax - vmin)
                }
            }
        };
        Some(t.clamp(0., 1.))
    }

    /// The value at position `t` on the colour scale
    pub fn value_at(&self, t: f64) -> f64 {
        match *self {
            ColourNorm::Log { vmin, vmax } => vmin * (vmax / vmin).powf(t),
            ColourNorm::Linear { vmin, vmax } => vmin + t * (vmax - vmin),
        }
    }

    /// `n` consecutive value intervals covering the scale with their
    /// colours
    pub(crate) fn steps(&self, n: usize) -> Vec<(f64, f64, RGBColor)> {
        (0..n)
            .map(|i| {
                let t0 = i as f64 / n as f64;
                let t1 = (i + 1) as f64 / n as f64;
                let mid = (t0 + t1) / 2.;
                (self.value_at(t0), self.value_at(t1), colour(mid))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_norm() {
        let norm = ColourNorm::Log {
            vmin: 0.1,
            vmax: 1e3,
        };
        assert_eq!(norm.normalise(0.), None);
        assert_eq!(norm.normalise(-1.), None);
        assert_eq!(norm.normalise(f64::NAN), None);
        assert_eq!(norm.normalise(0.1), Some(0.));
        assert_eq!(norm.normalise(1e-3), Some(0.));
        assert_eq!(norm.normalise(1e5), Some(1.));
        let t = norm.normalise(10.).unwrap();
        assert!((t - 0.5).abs() < 1e-12);
        assert!((norm.value_at(0.5) - 10.).abs() < 1e-9);
    }

    #[test]
    fn linear_over_finite() {
        let values = [f64::NAN, 0.5, f64::INFINITY, 2., 1.];
        let norm = ColourNorm::linear_over(&values);
        assert_eq!(norm, ColourNorm::Linear { vmin: 0.5, vmax: 2. });
        assert_eq!(norm.normalise(f64::INFINITY), None);
        assert_eq!(norm.normalise(2.), Some(1.));

        let norm = ColourNorm::linear_over(&[f64::NAN]);
        assert_eq!(norm.range(), (0., 1.));

        let flat = ColourNorm::linear_over(&[1., 1.]);
        assert_eq!(flat.normalise(1.), Some(0.5));
    }

    #[test]
    fn colour_steps() {
        let norm = ColourNorm::Linear { vmin: 0., vmax: 4. };
        let steps = norm.steps(4);
        assert_eq!(steps.len(), 4);
        assert_eq!((steps[0].0, steps[0].1), (0., 1.));
        assert_eq!(steps[3].1, 4.);
        assert_eq!(colour(-1.), colour(0.));
    }
}
