//! Removal of nested re-detections.
//!
//! The same droplet is often found by several bands: an outer-boundary
//! detection from a wide band and a smaller, nested one from a narrower band.
//! Sections are ordered largest-scale first, so each candidate is only compared
//! against candidates in later sections, and a same-or-smaller circle lying
//! inside a larger one (with 10% radius slack) is dropped.
//!
//! Removal happens in place during the sweep, so a removed candidate never
//! removes anything itself.

use dropsize_core::{CandidateSet, Circle};
use log::debug;

/// Default radius slack used for containment.
pub const DEFAULT_CONTAINMENT_SLACK: f64 = 1.1;

/// Outcome of resolving one image's candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Surviving circles, empty slots dropped, sections re-derived.
    pub survivors: CandidateSet,
    /// Slot indices (in the input set) removed as nested detections.
    pub removed: Vec<usize>,
}

impl Resolution {
    /// Surviving circles in concatenation order.
    #[must_use]
    pub fn circles(&self) -> Vec<Circle> {
        self.survivors.circles().map(|(_, circle)| circle).collect()
    }
}

/// Resolves geometric redundancy between bands.
#[derive(Debug, Clone, Copy)]
pub struct OverlapResolver {
    slack: f64,
}

impl Default for OverlapResolver {
    fn default() -> Self {
        Self {
            slack: DEFAULT_CONTAINMENT_SLACK,
        }
    }
}

impl OverlapResolver {
    /// Creates a resolver with the default 10% slack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the containment slack multiplier.
    #[must_use]
    pub fn with_slack(mut self, slack: f64) -> Self {
        self.slack = slack;
        self
    }

    /// Containment slack multiplier.
    #[must_use]
    pub fn slack(&self) -> f64 {
        self.slack
    }

    /// Empties every slot judged a nested re-detection and returns the removed
    /// indices in removal order. Section boundaries are left untouched.
    pub fn sweep(&self, candidates: &mut CandidateSet) -> Vec<usize> {
        let sections = candidates.sections().clone();
        let total = candidates.len();
        let slots = candidates.slots_mut();
        let mut removed = Vec::new();

        for i in 0..total {
            let Some(outer) = slots[i] else {
                continue;
            };
            let Some(owner) = sections.owner_section(i) else {
                break;
            };
            let first_later = sections.ends()[owner];
            if first_later >= total {
                // Everything left lives in the last section.
                break;
            }

            for (j, slot) in slots.iter_mut().enumerate().skip(first_later) {
                let Some(inner) = *slot else {
                    continue;
                };
                if j == i || inner.r > outer.r {
                    continue;
                }
                if outer.contains(&inner, self.slack) {
                    *slot = None;
                    removed.push(j);
                }
            }
        }

        removed
    }

    /// Sweeps a copy of `candidates` and compacts the survivors.
    #[must_use]
    pub fn resolve(&self, candidates: &CandidateSet) -> Resolution {
        let mut working = candidates.clone();
        let removed = self.sweep(&mut working);
        let survivors = working.compact();
        debug!(
            "overlap: {} candidates, {} removed, {} surviving",
            candidates.occupied(),
            removed.len(),
            survivors.len()
        );
        Resolution { survivors, removed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(slots: Vec<Option<(i32, i32, i32)>>, lengths: &[usize]) -> CandidateSet {
        CandidateSet::from_parts(
            slots.into_iter().map(|s| s.map(Circle::from)).collect(),
            lengths,
        )
    }

    #[test]
    fn test_nested_circle_removed() {
        let candidates = set(
            vec![Some((100, 100, 40)), Some((102, 98, 20)), Some((300, 300, 20))],
            &[1, 2],
        );
        let resolution = OverlapResolver::new().resolve(&candidates);
        assert_eq!(resolution.removed, vec![1]);
        assert_eq!(
            resolution.circles(),
            vec![Circle::new(100, 100, 40), Circle::new(300, 300, 20)]
        );
        assert_eq!(resolution.survivors.sections().ends(), &[1, 2]);
    }

    #[test]
    fn test_same_section_never_compared() {
        let candidates = set(vec![Some((100, 100, 40)), Some((100, 100, 10))], &[2]);
        let resolution = OverlapResolver::new().resolve(&candidates);
        assert!(resolution.removed.is_empty());
    }

    #[test]
    fn test_larger_later_circle_not_removed() {
        let candidates = set(vec![Some((100, 100, 20)), Some((100, 100, 25))], &[1, 1]);
        let resolution = OverlapResolver::new().resolve(&candidates);
        assert!(resolution.removed.is_empty());
    }

    #[test]
    fn test_boundary_is_strict() {
        // 10 + 12 == 1.1 * 20
        let candidates = set(vec![Some((50, 50, 20)), Some((60, 50, 12))], &[1, 1]);
        let resolution = OverlapResolver::new().resolve(&candidates);
        assert!(resolution.removed.is_empty());
    }

    #[test]
    fn test_sentinels_are_inert() {
        let candidates = set(vec![None, Some((5, 5, 3)), None, None], &[1, 1, 1, 1]);
        let resolution = OverlapResolver::new().resolve(&candidates);
        assert!(resolution.removed.is_empty());
        assert_eq!(resolution.circles(), vec![Circle::new(5, 5, 3)]);
    }

    #[test]
    fn test_multiple_nested_removed() {
        let candidates = set(
            vec![
                Some((100, 100, 50)),
                Some((80, 100, 15)),
                Some((120, 100, 15)),
                Some((100, 125, 12)),
            ],
            &[1, 3],
        );
        let resolution = OverlapResolver::new().resolve(&candidates);
        assert_eq!(resolution.removed, vec![1, 2, 3]);
        assert_eq!(resolution.circles(), vec![Circle::new(100, 100, 50)]);
    }

    #[test]
    fn test_removed_circle_does_not_remove() {
        // A contains B, B contains C, A does not contain C.
        let candidates = set(
            vec![Some((0, 0, 100)), Some((49, 0, 60)), Some((104, 0, 8))],
            &[1, 1, 1],
        );
        let resolution = OverlapResolver::new().resolve(&candidates);
        assert_eq!(resolution.removed, vec![1]);
        assert_eq!(
            resolution.circles(),
            vec![Circle::new(0, 0, 100), Circle::new(104, 0, 8)]
        );
    }

    #[test]
    fn test_idempotent_on_output() {
        let candidates = set(
            vec![
                Some((100, 100, 50)),
                Some((400, 400, 45)),
                Some((100, 110, 30)),
                Some((250, 250, 28)),
                None,
                Some((250, 252, 12)),
                Some((405, 398, 10)),
            ],
            &[2, 2, 1, 2],
        );
        let resolver = OverlapResolver::new();
        let first = resolver.resolve(&candidates);
        let second = resolver.resolve(&first.survivors);
        assert!(second.removed.is_empty());
        assert_eq!(first.circles(), second.circles());
    }
}
