use std::f64::consts::PI;

use crate::traits::EtaPhi;

/// A metric in the (pseudorapidity, azimuth) plane
pub trait Distance {
    fn distance<A: EtaPhi, B: EtaPhi>(&self, a: &A, b: &B) -> f64;
}

/// The angular distance ΔR = √(Δη² + Δφ²)
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct DeltaR;

impl Distance for DeltaR {
    fn distance<A: EtaPhi, B: EtaPhi>(&self, a: &A, b: &B) -> f64 {
        delta_r(a, b)
    }
}

/// Absolute azimuthal difference, folded into [0, π]
pub fn delta_phi(phi1: f64, phi2: f64) -> f64 {
    let dphi = (phi1 - phi2).abs();
    if dphi > PI {
        2. * PI - dphi
    } else {
        dphi
    }
}

/// Absolute pseudorapidity difference
pub fn delta_eta<A: EtaPhi, B: EtaPhi>(a: &A, b: &B) -> f64 {
    (a.eta() - b.eta()).abs()
}

/// Angular distance between two objects
pub fn delta_r<A: EtaPhi, B: EtaPhi>(a: &A, b: &B) -> f64 {
    let deta = delta_eta(a, b);
    let dphi = delta_phi(a.phi(), b.phi());
    deta.hypot(dphi)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn phi_wraps_the_short_way() {
        let dphi = delta_phi(3.0, -3.0);
        assert!((dphi - (2. * PI - 6.)).abs() < EPS);
        assert!((delta_phi(-3.0, 3.0) - dphi).abs() < EPS);
        assert!((delta_phi(1.0, -1.0) - 2.0).abs() < EPS);
        assert_eq!(delta_phi(0.5, 0.5), 0.);
    }

    #[test]
    fn dr() {
        let a = (0.0, 3.0);
        let b = (0.0, -3.0);
        assert!((delta_r(&a, &b) - (2. * PI - 6.)).abs() < EPS);

        let a = (1.0, 0.0);
        let b = (-2.0, 4.0 - 2. * PI);
        let expected = 3.0f64.hypot(4.0 - 2. * PI);
        assert!((DeltaR.distance(&a, &b) - expected).abs() < EPS);

        let a = (0.3, 0.0);
        let b = (0.0, 0.4);
        assert!((delta_r(&a, &b) - 0.5).abs() < EPS);
    }
}
