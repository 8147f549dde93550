use crate::{
    distance::{DeltaR, Distance},
    traits::EtaPhi,
};

/// Default cone radius for jet matching
pub const DEFAULT_DELTA_R_CUT: f64 = 0.4;

/// Match objects to reference objects within a cone
///
/// An object is matched if the distance to the nearest reference
/// object is strictly smaller than the cone radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matcher<D = DeltaR> {
    distance: D,
    cut: f64,
}

impl Default for Matcher<DeltaR> {
    fn default() -> Self {
        Self::new(DEFAULT_DELTA_R_CUT)
    }
}

impl Matcher<DeltaR> {
    /// Matcher using ΔR with the given cone radius
    pub fn new(cut: f64) -> Self {
        Self {
            distance: DeltaR,
            cut,
        }
    }
}

impl<D: Distance> Matcher<D> {
    /// Matcher using a custom distance
    pub fn with_distance(distance: D, cut: f64) -> Self {
        Self { distance, cut }
    }

    pub fn cut(&self) -> f64 {
        self.cut
    }

    /// Index and distance of the reference object nearest to `p`
    pub fn nearest<P, R>(&self, p: &P, refs: &[R]) -> Option<(usize, f64)>
    where
        P: EtaPhi,
        R: EtaPhi,
    {
        refs.iter()
            .map(|r| self.distance.distance(p, r))
            .enumerate()
            .min_by(|(_, d1), (_, d2)| d1.total_cmp(d2))
    }

    pub fn is_matched<P, R>(&self, p: &P, refs: &[R]) -> bool
    where
        P: EtaPhi,
        R: EtaPhi,
    {
        matches!(self.nearest(p, refs), Some((_, d)) if d < self.cut)
    }

    /// One entry per object, `true` if it is matched
    pub fn match_mask<P, R>(&self, objects: &[P], refs: &[R]) -> Vec<bool>
    where
        P: EtaPhi,
        R: EtaPhi,
    {
        objects.iter().map(|p| self.is_matched(p, refs)).collect()
    }

    /// The objects with a reference object inside the cone
    pub fn matched_subset<P, R>(&self, objects: &[P], refs: &[R]) -> Vec<P>
    where
        P: EtaPhi + Clone,
        R: EtaPhi,
    {
        self.partition(objects, refs).0
    }

    /// The objects without a reference object inside the cone
    pub fn unmatched_subset<P, R>(&self, objects: &[P], refs: &[R]) -> Vec<P>
    where
        P: EtaPhi + Clone,
        R: EtaPhi,
    {
        self.partition(objects, refs).1
    }

    /// Split into matched and unmatched objects, preserving order
    pub fn partition<P, R>(&self, objects: &[P], refs: &[R]) -> (Vec<P>, Vec<P>)
    where
        P: EtaPhi + Clone,
        R: EtaPhi,
    {
        let (matched, unmatched): (Vec<_>, Vec<_>) = objects
            .iter()
            .cloned()
            .partition(|p| self.is_matched(p, refs));
        (matched, unmatched)
    }

    /// For each object the index of the nearest reference object
    /// inside the cone
    pub fn argmatch<P, R>(&self, objects: &[P], refs: &[R]) -> Vec<Option<usize>>
    where
        P: EtaPhi,
        R: EtaPhi,
    {
        objects
            .iter()
            .map(|p| match self.nearest(p, refs) {
                Some((idx, d)) if d < self.cut => Some(idx),
                _ => None,
            })
            .collect()
    }
}

/// Jets matched to generator-level jets within `cut`
pub fn matched_subset<P, R>(jets: &[P], gen_jets: &[R], cut: f64) -> Vec<P>
where
    P: EtaPhi + Clone,
    R: EtaPhi,
{
    Matcher::new(cut).matched_subset(jets, gen_jets)
}

/// Jets without generator-level jet within `cut`
pub fn unmatched_subset<P, R>(jets: &[P], gen_jets: &[R], cut: f64) -> Vec<P>
where
    P: EtaPhi + Clone,
    R: EtaPhi,
{
    Matcher::new(cut).unmatched_subset(jets, gen_jets)
}
