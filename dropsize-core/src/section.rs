//! Section bookkeeping for concatenated per-band candidates.
//!
//! A candidate set is the concatenation of one contribution per band. The
//! boundaries store the cumulative slot count at the end of each band, so
//! section `k` covers `[end(k-1), end(k))`.

/// Cumulative end offsets of each band's contribution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionBoundaries {
    ends: Vec<usize>,
}

impl SectionBoundaries {
    /// Creates boundaries with capacity for `bands` sections.
    #[must_use]
    pub fn with_capacity(bands: usize) -> Self {
        Self {
            ends: Vec::with_capacity(bands),
        }
    }

    /// Builds boundaries from per-section lengths.
    #[must_use]
    pub fn from_lengths<I: IntoIterator<Item = usize>>(lengths: I) -> Self {
        let mut boundaries = Self::default();
        for len in lengths {
            boundaries.push_section(len);
        }
        boundaries
    }

    /// Appends a section holding `len` slots.
    pub fn push_section(&mut self, len: usize) {
        let start = self.total();
        self.ends.push(start + len);
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    /// Returns true if no section was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Total number of slots across all sections.
    #[must_use]
    pub fn total(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    /// Cumulative end offsets, one per section.
    #[must_use]
    pub fn ends(&self) -> &[usize] {
        &self.ends
    }

    /// Half-open slot range of `section`.
    ///
    /// # Panics
    /// Panics if `section` is out of range.
    #[must_use]
    pub fn range(&self, section: usize) -> std::ops::Range<usize> {
        let start = if section == 0 {
            0
        } else {
            self.ends[section - 1]
        };
        start..self.ends[section]
    }

    /// Number of slots in `section`.
    ///
    /// # Panics
    /// Panics if `section` is out of range.
    #[must_use]
    pub fn section_len(&self, section: usize) -> usize {
        self.range(section).len()
    }

    /// Index of the section owning slot `index`: the first section whose end
    /// is strictly greater than `index`. `None` past the last slot.
    #[must_use]
    pub fn owner_section(&self, index: usize) -> Option<usize> {
        let section = self.ends.partition_point(|&end| end <= index);
        (section < self.ends.len()).then_some(section)
    }
}
