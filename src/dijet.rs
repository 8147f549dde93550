use crate::{
    distance::delta_phi,
    jet::Jet,
    selection::leading_pair,
};

/// Observables of the two leading jets
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Dijet {
    /// Leading jet pseudorapidity
    pub eta0: f64,
    /// Trailing jet pseudorapidity
    pub eta1: f64,
    /// Absolute pseudorapidity difference
    pub detajj: f64,
    /// Azimuthal separation in `[0, π]`
    pub dphijj: f64,
    /// Leading jet transverse momentum
    pub pt0: f64,
}

impl Dijet {
    /// Observables of the two hardest jets, if there are at least two
    pub fn new(jets: &[Jet]) -> Option<Self> {
        let (leading, trailing) = leading_pair(jets)?;
        Some(Self {
            eta0: leading.eta,
            eta1: trailing.eta,
            detajj: (leading.eta - trailing.eta).abs(),
            dphijj: delta_phi(leading.phi, trailing.phi),
            pt0: leading.pt,
        })
    }
}

/// Dijet observables for all events with at least two jets
pub fn dijets<'a, I>(events: I) -> Vec<Dijet>
where
    I: IntoIterator<Item = &'a [Jet]>,
{
    events.into_iter().filter_map(Dijet::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn observables() {
        let jets = [
            Jet::new(150., 3., 3., 10.),
            Jet::new(90., -1., -3., 10.),
            Jet::new(30., 0., 0., 10.),
        ];
        let dijet = Dijet::new(&jets).unwrap();
        assert_eq!(dijet.eta0, 3.);
        assert_eq!(dijet.eta1, -1.);
        assert_eq!(dijet.detajj, 4.);
        assert!((dijet.dphijj - (2. * PI - 6.)).abs() < 1e-12);
        assert_eq!(dijet.pt0, 150.);
    }

    #[test]
    fn too_few_jets() {
        let one = [Jet::new(150., 3., 3., 10.)];
        assert_eq!(Dijet::new(&one), None);
        let events: Vec<&[Jet]> = vec![&[], &one, &[one[0], one[0]]];
        assert_eq!(dijets(events).len(), 1);
    }
}
