use std::f64::consts::PI;
use std::ops::{Index, IndexMut};

use thiserror::Error;

use crate::histogram::linspace;

/// Pseudorapidity range covered by event images
pub const ETA_RANGE: (f64, f64) = (-5., 5.);
/// Azimuth range covered by event images
pub const PHI_RANGE: (f64, f64) = (-PI, PI);

/// A 2D (η, φ) grid of pixel values
///
/// Values are stored row-major with φ as the fast index, i.e. pixel
/// `(ieta, iphi)` is at position `ieta * n_phi + iphi`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Image {
    n_eta: usize,
    n_phi: usize,
    data: Vec<f64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("Cannot reshape {len} pixels into a {n_eta}x{n_phi} image")]
    Length {
        len: usize,
        n_eta: usize,
        n_phi: usize,
    },
    #[error("Image shapes differ: {0:?} vs {1:?}")]
    Mismatch((usize, usize), (usize, usize)),
}

impl Image {
    /// An image with all pixels set to zero
    pub fn zeros(n_eta: usize, n_phi: usize) -> Self {
        Self {
            n_eta,
            n_phi,
            data: vec![0.; n_eta * n_phi],
        }
    }

    /// Reshape flat pixels into an image with the given dimensions
    pub fn reshape(
        pixels: Vec<f64>,
        n_eta: usize,
        n_phi: usize,
    ) -> Result<Self, ShapeError> {
        if pixels.len() != n_eta * n_phi {
            return Err(ShapeError::Length {
                len: pixels.len(),
                n_eta,
                n_phi,
            });
        }
        Ok(Self {
            n_eta,
            n_phi,
            data: pixels,
        })
    }

    /// Build an image from rows of constant η
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ShapeError> {
        let n_eta = rows.len();
        let n_phi = rows.first().map(|r| r.len()).unwrap_or_default();
        let data: Vec<_> = rows.into_iter().flatten().collect();
        Self::reshape(data, n_eta, n_phi)
    }

    /// Number of (η, φ) bins
    pub fn shape(&self) -> (usize, usize) {
        (self.n_eta, self.n_phi)
    }

    pub fn n_eta(&self) -> usize {
        self.n_eta
    }

    pub fn n_phi(&self) -> usize {
        self.n_phi
    }

    pub fn get(&self, ieta: usize, iphi: usize) -> Option<f64> {
        if ieta < self.n_eta && iphi < self.n_phi {
            Some(self[(ieta, iphi)])
        } else {
            None
        }
    }

    /// Iterate over rows of constant η
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks panics on zero size
        self.data.chunks(self.n_phi.max(1)).take(self.n_eta)
    }

    /// The pixel values, φ varying fastest
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn flatten(self) -> Vec<f64> {
        self.data
    }

    /// Pixel-wise ratio `self / denominator`
    ///
    /// Division by zero follows IEEE semantics and yields infinities or
    /// NaN.
    pub fn ratio(&self, denominator: &Image) -> Result<Image, ShapeError> {
        self.check_shape(denominator)?;
        let data = self
            .data
            .iter()
            .zip(&denominator.data)
            .map(|(n, d)| n / d)
            .collect();
        Ok(Self {
            n_eta: self.n_eta,
            n_phi: self.n_phi,
            data,
        })
    }

    /// Add another image of the same shape pixel by pixel
    pub fn try_add_assign(&mut self, rhs: &Image) -> Result<(), ShapeError> {
        self.check_shape(rhs)?;
        for (p, q) in self.data.iter_mut().zip(&rhs.data) {
            *p += q;
        }
        Ok(())
    }

    /// Multiply all pixels by a constant
    pub fn scale(&mut self, factor: f64) {
        for p in &mut self.data {
            *p *= factor;
        }
    }

    /// Sum of all pixel values
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    fn check_shape(&self, other: &Image) -> Result<(), ShapeError> {
        if self.shape() != other.shape() {
            Err(ShapeError::Mismatch(self.shape(), other.shape()))
        } else {
            Ok(())
        }
    }
}

impl Index<(usize, usize)> for Image {
    type Output = f64;

    fn index(&self, (ieta, iphi): (usize, usize)) -> &Self::Output {
        assert!(iphi < self.n_phi);
        &self.data[ieta * self.n_phi + iphi]
    }
}

impl IndexMut<(usize, usize)> for Image {
    fn index_mut(&mut self, (ieta, iphi): (usize, usize)) -> &mut Self::Output {
        assert!(iphi < self.n_phi);
        &mut self.data[ieta * self.n_phi + iphi]
    }
}

/// Edges along η for an image with `n_eta` bins
///
/// NOTE: these are `n_eta` points, not `n_eta + 1`, so only the first
/// `n_eta - 1` rows of an image fall between two edges.
pub fn eta_edges(n_eta: usize) -> Vec<f64> {
    linspace(ETA_RANGE.0, ETA_RANGE.1, n_eta)
}

/// Edges along φ for an image with `n_phi` bins
///
/// Like [eta_edges], this yields one edge less than needed.
pub fn phi_edges(n_phi: usize) -> Vec<f64> {
    linspace(PHI_RANGE.0, PHI_RANGE.1, n_phi)
}
