use crate::{
    jet::{Jet, PfCandidate},
    matching::Matcher,
};

/// Comparison of a jet with its particle-flow constituents
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PtCheck {
    pub jet: Jet,
    /// Transverse momentum before corrections
    pub raw_pt: f64,
    /// Magnitude of the summed transverse momenta of the constituents
    pub pf_pt: f64,
    /// Candidates assigned to the jet
    pub constituents: Vec<PfCandidate>,
}

impl PtCheck {
    /// Relative difference `(raw_pt - pf_pt) / raw_pt` in percent
    pub fn diff_percent(&self) -> f64 {
        (self.raw_pt - self.pf_pt) / self.raw_pt * 100.
    }
}

/// `hypot(Σ px, Σ py)` of the given candidates
pub fn summed_pt<'a, I>(cands: I) -> f64
where
    I: IntoIterator<Item = &'a PfCandidate>,
{
    let (px, py) = cands
        .into_iter()
        .fold((0., 0.), |(px, py), c| (px + c.px, py + c.py));
    px.hypot(py)
}

/// Candidates with non-zero transverse momentum
pub fn nonzero_candidates(cands: &[PfCandidate]) -> Vec<PfCandidate> {
    cands.iter().filter(|c| c.pt != 0.).copied().collect()
}

/// Compare each jet with the candidates closest to it
///
/// Each candidate is assigned to the nearest jet within the matching
/// cone, candidates outside all cones are ignored.
pub fn check_jets(
    jets: &[Jet],
    cands: &[PfCandidate],
    matcher: &Matcher,
) -> Vec<PtCheck> {
    let assignment = matcher.argmatch(cands, jets);
    jets.iter()
        .enumerate()
        .map(|(i, jet)| {
            let constituents: Vec<_> = cands
                .iter()
                .zip(&assignment)
                .filter(|(_, idx)| **idx == Some(i))
                .map(|(c, _)| *c)
                .collect();
            PtCheck {
                jet: *jet,
                raw_pt: jet.raw_pt(),
                pf_pt: summed_pt(&constituents),
                constituents,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(eta: f64, phi: f64, px: f64, py: f64) -> PfCandidate {
        PfCandidate {
            pt: px.hypot(py),
            eta,
            phi,
            energy: px.hypot(py),
            px,
            py,
        }
    }

    #[test]
    fn pt_sum() {
        let cands = [cand(0., 0., 3., 0.), cand(0., 0., 0., 4.)];
        assert_eq!(summed_pt(&cands), 5.);
        assert_eq!(summed_pt(&[] as &[PfCandidate]), 0.);
    }

    #[test]
    fn per_jet() {
        let jets = [
            Jet::new(10., 0., 0., 1.).with_raw_factor(0.5),
            Jet::new(20., 2., 2., 1.),
        ];
        let cands = [
            cand(0.1, 0., 3., 0.),
            cand(-0.1, 0., 0., 4.),
            cand(2., 2.1, 1., 1.),
            // outside both cones
            cand(-3., -2., 5., 5.),
        ];
        let checks = check_jets(&jets, &cands, &Matcher::default());
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].raw_pt, 5.);
        assert_eq!(checks[0].pf_pt, 5.);
        assert_eq!(checks[0].constituents.len(), 2);
        assert_eq!(checks[0].diff_percent(), 0.);
        assert_eq!(checks[1].constituents, [cands[2]]);
        assert!((checks[1].pf_pt - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn zero_pt_filtered() {
        let cands = [cand(0., 0., 0., 0.), cand(0., 0., 1., 0.)];
        assert_eq!(nonzero_candidates(&cands).len(), 1);
    }
}
