//! Per-image candidate set: band contributions concatenated in band order.

use crate::circle::Circle;
use crate::section::SectionBoundaries;

/// A candidate slot. `None` marks "no detection" for a band or a removed
/// candidate.
pub type Slot = Option<Circle>;

/// Concatenated detector output for one image plus its section boundaries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    slots: Vec<Slot>,
    sections: SectionBoundaries,
}

impl CandidateSet {
    /// Creates an empty set expecting `bands` contributions.
    #[must_use]
    pub fn with_bands(bands: usize) -> Self {
        Self {
            slots: Vec::new(),
            sections: SectionBoundaries::with_capacity(bands),
        }
    }

    /// Builds a set directly from slots and per-section lengths.
    ///
    /// # Panics
    /// Panics if the section lengths do not add up to the slot count.
    #[must_use]
    pub fn from_parts(slots: Vec<Slot>, section_lengths: &[usize]) -> Self {
        let sections = SectionBoundaries::from_lengths(section_lengths.iter().copied());
        assert_eq!(
            sections.total(),
            slots.len(),
            "section lengths must cover every slot"
        );
        Self { slots, sections }
    }

    /// Appends one band's detections.
    ///
    /// An empty detection list contributes a single empty slot so every band
    /// owns at least one position. `(0, 0, 0)` circles are stored as empty slots.
    pub fn push_band<I: IntoIterator<Item = Circle>>(&mut self, detections: I) {
        let before = self.slots.len();
        self.slots.extend(
            detections
                .into_iter()
                .map(|circle| (!circle.is_null()).then_some(circle)),
        );
        if self.slots.len() == before {
            self.slots.push(None);
        }
        self.sections.push_section(self.slots.len() - before);
    }

    /// Appends a band that produced nothing.
    pub fn push_miss(&mut self) {
        self.push_band(std::iter::empty());
    }

    /// Number of slots, empty ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if there are no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in concatenation order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Mutable access to the slots. Section boundaries are unaffected.
    pub fn slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots
    }

    /// Section boundaries, one per band.
    #[must_use]
    pub fn sections(&self) -> &SectionBoundaries {
        &self.sections
    }

    /// Occupied slots with their indices.
    pub fn circles(&self) -> impl Iterator<Item = (usize, Circle)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|circle| (index, circle)))
    }

    /// Occupied slots of one section.
    pub fn section_circles(&self, section: usize) -> impl Iterator<Item = Circle> + '_ {
        self.slots[self.sections.range(section)].iter().flatten().copied()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Drops empty slots, keeping order, and rebuilds the boundaries from the
    /// surviving count of each section.
    #[must_use]
    pub fn compact(&self) -> Self {
        let mut compacted = Self::with_bands(self.sections.len());
        for section in 0..self.sections.len() {
            let before = compacted.slots.len();
            compacted.slots.extend(self.section_circles(section).map(Some));
            compacted
                .sections
                .push_section(compacted.slots.len() - before);
        }
        compacted
    }
}
