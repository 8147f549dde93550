use serde::{Deserialize, Serialize};

use crate::traits::EtaPhi;

/// A reconstructed or generator-level jet
#[derive(Deserialize, Serialize, Copy, Clone, Debug, Default, PartialEq)]
pub struct Jet {
    /// Transverse momentum in GeV
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub mass: f64,
    /// Jet energy correction factor, `raw_pt = (1 - raw_factor) * pt`
    #[serde(default)]
    pub raw_factor: f64,
}

impl Jet {
    pub fn new(pt: f64, eta: f64, phi: f64, mass: f64) -> Self {
        Self {
            pt,
            eta,
            phi,
            mass,
            raw_factor: 0.,
        }
    }

    pub fn with_raw_factor(mut self, raw_factor: f64) -> Self {
        self.raw_factor = raw_factor;
        self
    }

    /// Transverse momentum before jet energy corrections
    pub fn raw_pt(&self) -> f64 {
        self.pt * (1. - self.raw_factor)
    }
}

impl EtaPhi for Jet {
    fn eta(&self) -> f64 {
        self.eta
    }

    fn phi(&self) -> f64 {
        self.phi
    }
}

/// Whether the jets are sorted by descending transverse momentum
pub fn is_pt_ordered(jets: &[Jet]) -> bool {
    jets.windows(2).all(|w| w[0].pt >= w[1].pt)
}

/// Sort jets by descending transverse momentum
pub fn sort_by_pt(jets: &mut [Jet]) {
    jets.sort_by(|a, b| b.pt.total_cmp(&a.pt))
}

/// A particle-flow candidate
#[derive(Deserialize, Serialize, Copy, Clone, Debug, Default, PartialEq)]
pub struct PfCandidate {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub energy: f64,
    pub px: f64,
    pub py: f64,
}

impl EtaPhi for PfCandidate {
    fn eta(&self) -> f64 {
        self.eta
    }

    fn phi(&self) -> f64 {
        self.phi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_pt() {
        let jet = Jet::new(100., 0., 0., 10.).with_raw_factor(0.2);
        assert!((jet.raw_pt() - 80.).abs() < 1e-12);
        assert_eq!(Jet::new(50., 1., 1., 0.).raw_pt(), 50.);
    }

    #[test]
    fn ordering() {
        let mut jets = vec![
            Jet::new(30., 0., 0., 0.),
            Jet::new(90., 0., 0., 0.),
            Jet::new(45., 0., 0., 0.),
        ];
        assert!(!is_pt_ordered(&jets));
        sort_by_pt(&mut jets);
        assert!(is_pt_ordered(&jets));
        let pts: Vec<_> = jets.iter().map(|j| j.pt).collect();
        assert_eq!(pts, [90., 45., 30.]);
        assert!(is_pt_ordered(&[]));
    }
}
