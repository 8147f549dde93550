use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    event::Event,
    jet::{is_pt_ordered, Jet},
};

/// Kinematic cuts on the two leading jets selecting VBF-like events
///
/// The input is expected to already satisfy the dijet Δη and Δφ
/// requirements, so only the transverse momenta are checked here.
#[derive(Deserialize, Serialize, Copy, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct VbfSelection {
    /// Minimum leading jet transverse momentum (exclusive)
    pub leading_pt_min: f64,
    /// Minimum trailing jet transverse momentum (exclusive)
    pub trailing_pt_min: f64,
}

impl Default for VbfSelection {
    fn default() -> Self {
        Self {
            leading_pt_min: 80.,
            trailing_pt_min: 40.,
        }
    }
}

impl VbfSelection {
    /// Whether an event with the given jets passes the cuts
    ///
    /// Jets should be ordered by descending transverse momentum. If
    /// they are not, the two hardest jets are used regardless of their
    /// position. Events with fewer than two jets never pass.
    pub fn passes(&self, jets: &[Jet]) -> bool {
        let Some((leading, trailing)) = leading_pair(jets) else {
            return false;
        };
        leading.pt > self.leading_pt_min && trailing.pt > self.trailing_pt_min
    }

    /// One entry per event, `true` if the event passes
    pub fn mask(&self, events: &[Event]) -> Vec<bool> {
        events.iter().map(|ev| self.passes(&ev.jets)).collect()
    }

    /// Keep only the events passing the cuts
    pub fn select(&self, events: Vec<Event>) -> Vec<Event> {
        let mask = self.mask(&events);
        apply_mask(events, &mask)
    }
}

/// The leading and trailing jet, if there are at least two jets
pub fn leading_pair(jets: &[Jet]) -> Option<(&Jet, &Jet)> {
    if jets.len() < 2 {
        return None;
    }
    if is_pt_ordered(jets) {
        return Some((&jets[0], &jets[1]));
    }
    debug!("Jets are not ordered by transverse momentum");
    let mut leading = &jets[0];
    let mut trailing = &jets[1];
    if trailing.pt > leading.pt {
        std::mem::swap(&mut leading, &mut trailing);
    }
    for jet in &jets[2..] {
        if jet.pt > leading.pt {
            trailing = leading;
            leading = jet;
        } else if jet.pt > trailing.pt {
            trailing = jet;
        }
    }
    Some((leading, trailing))
}

/// Keep the items for which the mask is `true`
///
/// Items beyond the length of the mask are dropped.
pub fn apply_mask<T>(items: Vec<T>, mask: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(mask)
        .filter_map(|(item, &keep)| keep.then_some(item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jets(pts: &[f64]) -> Vec<Jet> {
        pts.iter().map(|&pt| Jet::new(pt, 0., 0., 0.)).collect()
    }

    fn event(pts: &[f64]) -> Event {
        Event {
            jets: jets(pts),
            ..Default::default()
        }
    }

    #[test]
    fn thresholds_are_strict() {
        let sel = VbfSelection::default();
        assert!(sel.passes(&jets(&[81., 41.])));
        assert!(!sel.passes(&jets(&[80., 41.])));
        assert!(!sel.passes(&jets(&[81., 40.])));
        assert!(sel.passes(&jets(&[200., 41., 10.])));
    }

    #[test]
    fn too_few_jets() {
        let sel = VbfSelection::default();
        assert!(!sel.passes(&[]));
        assert!(!sel.passes(&jets(&[500.])));
    }

    #[test]
    fn unordered_jets() {
        let jets = jets(&[30., 90., 45.]);
        let (leading, trailing) = leading_pair(&jets).unwrap();
        assert_eq!(leading.pt, 90.);
        assert_eq!(trailing.pt, 45.);
        assert!(VbfSelection::default().passes(&jets));
    }

    #[test]
    fn mask() {
        let events = vec![
            event(&[81., 41.]),
            event(&[100.]),
            event(&[80., 41.]),
            event(&[]),
            event(&[120., 60., 30.]),
        ];
        let sel = VbfSelection::default();
        assert_eq!(sel.mask(&events), [true, false, false, false, true]);
        let selected = sel.select(events);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].jets[0].pt, 81.);
        assert_eq!(selected[1].jets[0].pt, 120.);
    }

    #[test]
    fn masking() {
        let kept = apply_mask(vec!['a', 'b', 'c', 'd'], &[true, false, false, true]);
        assert_eq!(kept, ['a', 'd']);
    }
}
