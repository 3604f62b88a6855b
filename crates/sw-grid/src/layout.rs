//! Stable state indexing for the integrator.
//!
//! Maps (area, local generator) pairs to positions in the flat state vector
//! `[δ_0 .. δ_{G-1}, ω_0 .. ω_{G-1}]`, areas laid out in order.

use std::ops::Range;

use crate::error::{GridError, GridResult};

/// Cumulative-offset table over per-area generator counts.
///
/// `offsets[i]` is the first global generator index of area `i` and
/// `offsets[ns]` is the total generator count `G`. Areas with zero
/// generators get empty ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateLayout {
    counts: Vec<usize>,
    offsets: Vec<usize>,
}

impl StateLayout {
    /// Build the offset table from per-area generator counts.
    pub fn from_counts(counts: &[usize]) -> Self {
        let mut offsets = Vec::with_capacity(counts.len() + 1);
        let mut acc = 0;
        offsets.push(acc);
        for &n in counts {
            acc += n;
            offsets.push(acc);
        }
        Self {
            counts: counts.to_vec(),
            offsets,
        }
    }

    /// Number of areas (`ns`).
    pub fn area_count(&self) -> usize {
        self.counts.len()
    }

    /// Generators in `area` (`n_i`).
    pub fn generator_count(&self, area: usize) -> usize {
        self.counts[area]
    }

    pub fn generator_counts(&self) -> &[usize] {
        &self.counts
    }

    /// Total generator count `G`.
    pub fn total_generators(&self) -> usize {
        self.offsets[self.counts.len()]
    }

    /// Length of the flat state vector, `2G`.
    pub fn state_len(&self) -> usize {
        2 * self.total_generators()
    }

    /// Cumulative offsets `cum_n[0..=ns]`.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Angle block of `area`: `[cum_n[i], cum_n[i+1])`.
    pub fn angle_range(&self, area: usize) -> Range<usize> {
        self.offsets[area]..self.offsets[area + 1]
    }

    /// Frequency block of `area`: the angle block shifted by `G`.
    pub fn frequency_range(&self, area: usize) -> Range<usize> {
        let g = self.total_generators();
        self.offsets[area] + g..self.offsets[area + 1] + g
    }

    /// Global angle index of local generator `local` (0-based) in `area`.
    pub fn angle_index(&self, area: usize, local: usize) -> usize {
        debug_assert!(local < self.counts[area]);
        self.offsets[area] + local
    }

    /// Global frequency index of local generator `local` (0-based) in `area`.
    pub fn frequency_index(&self, area: usize, local: usize) -> usize {
        self.angle_index(area, local) + self.total_generators()
    }

    /// Angle index of the first generator of `area`, if it has any.
    pub fn first_index(&self, area: usize) -> Option<usize> {
        (self.counts[area] > 0).then(|| self.offsets[area])
    }

    /// Angle index of the middle generator (`n_i / 2`) of `area`.
    ///
    /// For a single-generator area this is the first generator.
    pub fn middle_index(&self, area: usize) -> Option<usize> {
        let n = self.counts[area];
        (n > 0).then(|| self.offsets[area] + n / 2)
    }

    /// Previous and next generators on the closed ring of `area`.
    ///
    /// A single generator is its own neighbour on both sides. `None` when
    /// `local` is not a generator of `area` (always the case for empty areas).
    pub fn ring_neighbors(&self, area: usize, local: usize) -> Option<(usize, usize)> {
        let n = self.counts[area];
        if local >= n {
            return None;
        }
        let base = self.offsets[area];
        let idx = base + local;
        let prev = if local == 0 { base + n - 1 } else { idx - 1 };
        let next = if local + 1 == n { base } else { idx + 1 };
        Some((prev, next))
    }

    /// Map a global angle index back to `(area, local)`.
    pub fn locate(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.total_generators() {
            return None;
        }
        // offsets is non-decreasing; find the last area starting at or before index
        let area = self.offsets[1..].partition_point(|&end| end <= index);
        Some((area, index - self.offsets[area]))
    }

    /// Re-derive the offsets from the counts and compare.
    pub fn check_consistency(&self) -> GridResult<()> {
        if self.offsets.len() != self.counts.len() + 1 {
            return Err(GridError::OffsetMismatch {
                area: self.counts.len(),
                expected: self.counts.len() + 1,
                actual: self.offsets.len(),
            });
        }
        let mut expected = 0;
        for (area, &n) in self.counts.iter().enumerate() {
            if self.offsets[area] != expected {
                return Err(GridError::OffsetMismatch {
                    area,
                    expected,
                    actual: self.offsets[area],
                });
            }
            expected += n;
        }
        let last = self.counts.len();
        if self.offsets[last] != expected {
            return Err(GridError::OffsetMismatch {
                area: last,
                expected,
                actual: self.offsets[last],
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_basic() {
        let layout = StateLayout::from_counts(&[2, 3, 1]);
        assert_eq!(layout.offsets(), &[0, 2, 5, 6]);
        assert_eq!(layout.total_generators(), 6);
        assert_eq!(layout.state_len(), 12);
        assert_eq!(layout.angle_range(1), 2..5);
        assert_eq!(layout.frequency_range(1), 8..11);
        assert_eq!(layout.frequency_index(2, 0), 11);
    }

    #[test]
    fn ring_wraps_within_area() {
        let layout = StateLayout::from_counts(&[2, 3]);
        assert_eq!(layout.ring_neighbors(1, 0), Some((4, 3)));
        assert_eq!(layout.ring_neighbors(1, 1), Some((2, 4)));
        assert_eq!(layout.ring_neighbors(1, 2), Some((3, 2)));
        assert_eq!(layout.ring_neighbors(1, 3), None);
    }

    #[test]
    fn single_generator_ring_is_itself() {
        let layout = StateLayout::from_counts(&[3, 1]);
        assert_eq!(layout.ring_neighbors(1, 0), Some((3, 3)));
        assert_eq!(layout.middle_index(1), Some(3));
        assert_eq!(layout.first_index(1), Some(3));
    }

    #[test]
    fn middle_index_uses_floor_division() {
        let layout = StateLayout::from_counts(&[4, 5]);
        assert_eq!(layout.middle_index(0), Some(2));
        assert_eq!(layout.middle_index(1), Some(4 + 2));
    }

    #[test]
    fn empty_area_has_empty_ranges() {
        let layout = StateLayout::from_counts(&[2, 0, 1]);
        assert!(layout.angle_range(1).is_empty());
        assert!(layout.frequency_range(1).is_empty());
        assert_eq!(layout.first_index(1), None);
        assert_eq!(layout.middle_index(1), None);
        assert_eq!(layout.ring_neighbors(1, 0), None);
        assert_eq!(layout.locate(2), Some((2, 0)));
        assert!(layout.check_consistency().is_ok());
    }

    #[test]
    fn locate_round_trip() {
        let layout = StateLayout::from_counts(&[2, 3, 1]);
        for area in 0..layout.area_count() {
            for local in 0..layout.generator_count(area) {
                let idx = layout.angle_index(area, local);
                assert_eq!(layout.locate(idx), Some((area, local)));
            }
        }
        assert_eq!(layout.locate(6), None);
    }

    #[test]
    fn tampered_offsets_detected() {
        let mut layout = StateLayout::from_counts(&[2, 3]);
        layout.offsets[1] = 3;
        assert_eq!(
            layout.check_consistency(),
            Err(GridError::OffsetMismatch {
                area: 1,
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn no_areas() {
        let layout = StateLayout::from_counts(&[]);
        assert_eq!(layout.total_generators(), 0);
        assert_eq!(layout.locate(0), None);
        assert!(layout.check_consistency().is_ok());
    }
}
