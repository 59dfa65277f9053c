//! Region partitioning
//!
//! Splits the page body into columns, and each column independently into
//! rows. Every (column, row) pair becomes a [`Slot`].

use crate::config::LayoutConfig;
use crate::geometry::{BBox, Span};
use rand::Rng;

/// A rectangular region reserved for one sequence of packed blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Region in page coordinates
    pub bounds: BBox,
    /// Column index, left to right
    pub column: usize,
    /// Row index within the column, top to bottom
    pub row: usize,
}

/// Cut points along one axis from `start` to `end`
///
/// The first cut is `start`, the last is `end`, and the sequence is strictly
/// increasing. Each step is drawn uniformly from `step`; the final step is
/// clamped to `end`. When `end - start` is smaller than the minimum step the
/// result is the single interval `[start, end]`.
pub fn cuts_between<R: Rng + ?Sized>(rng: &mut R, start: u32, end: u32, step: Span) -> Vec<u32> {
    let step = step.normalized();
    let mut cuts = vec![start];
    if end <= start {
        return cuts;
    }
    if end - start < step.min || step.max == 0 {
        cuts.push(end);
        return cuts;
    }

    let step = Span::new(step.min.max(1), step.max);
    let mut last = start;
    while last < end {
        last = last.saturating_add(step.sample(rng)).min(end);
        cuts.push(last);
    }
    cuts
}

/// Row cut points for an extent with an outer margin on both ends
///
/// Starts at `margin` and ends at `extent - margin`.
pub fn cut_points<R: Rng + ?Sized>(rng: &mut R, extent: u32, margin: u32, step: Span) -> Vec<u32> {
    cuts_between(rng, margin, extent.saturating_sub(margin), step)
}

/// Horizontal ranges `(x1, x2)` of `n` equal columns separated by `gap`
///
/// Any remainder from the integer division is left unused on the right.
pub fn column_ranges(area: BBox, n: u32, gap: u32) -> Vec<(u32, u32)> {
    let n = n.max(1);
    let gaps = (n - 1).saturating_mul(gap);
    let width = area.w.saturating_sub(gaps) / n;
    (0..n)
        .map(|i| {
            let x1 = area.x + i * (width + gap);
            (x1, x1 + width)
        })
        .collect()
}

/// Partitions a page into slots for the packed strategy
pub struct Partitioner<'a> {
    config: &'a LayoutConfig,
}

impl<'a> Partitioner<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Draw a column count and partition each column into rows
    ///
    /// Slots are ordered column by column, top to bottom.
    pub fn partition<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Slot> {
        let cols = Span::new(self.config.columns.min, self.config.columns.max).sample(rng);
        self.partition_columns(rng, cols)
    }

    /// Partition into exactly `columns` columns
    pub fn partition_columns<R: Rng + ?Sized>(&self, rng: &mut R, columns: u32) -> Vec<Slot> {
        let body = self.config.body_area();
        let mut slots = Vec::new();

        for (column, (x1, x2)) in column_ranges(body, columns, self.config.columns.gap)
            .into_iter()
            .enumerate()
        {
            if x2 <= x1 {
                continue;
            }
            let cuts = cuts_between(rng, body.y, body.bottom(), self.config.rows.span());
            for (row, pair) in cuts.windows(2).enumerate() {
                slots.push(Slot {
                    bounds: BBox::new(x1, pair[0], x2 - x1, pair[1] - pair[0]),
                    column,
                    row,
                });
            }
        }

        log::debug!("partitioned page into {} columns, {} slots", columns, slots.len());
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_cut_points_monotonic_and_clamped() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let cuts = cut_points(&mut rng, 1600, 50, Span::new(300, 500));
            assert_eq!(cuts[0], 50);
            assert_eq!(*cuts.last().unwrap(), 1550);
            assert!(cuts.windows(2).all(|w| w[0] < w[1]));
            assert!(cuts.iter().all(|&c| c <= 1550));
        }
    }

    #[test]
    fn test_cut_points_steps_within_range_except_last() {
        let mut rng = StdRng::seed_from_u64(2);
        let cuts = cut_points(&mut rng, 1600, 50, Span::new(300, 500));
        let steps: Vec<u32> = cuts.windows(2).map(|w| w[1] - w[0]).collect();
        for step in &steps[..steps.len() - 1] {
            assert!((300..=500).contains(step));
        }
        assert!(*steps.last().unwrap() <= 500);
    }

    #[test]
    fn test_cut_points_small_extent_yields_one_slot() {
        let mut rng = StdRng::seed_from_u64(3);
        let cuts = cut_points(&mut rng, 300, 50, Span::new(300, 500));
        assert_eq!(cuts, vec![50, 250]);
    }

    #[test]
    fn test_cut_points_fixed_step() {
        let mut rng = StdRng::seed_from_u64(4);
        let cuts = cut_points(&mut rng, 1000, 0, Span::new(250, 250));
        assert_eq!(cuts, vec![0, 250, 500, 750, 1000]);
    }

    #[test]
    fn test_column_ranges_equal_slices() {
        let area = BBox::new(50, 50, 1100, 1500);
        assert_eq!(column_ranges(area, 1, 20), vec![(50, 1150)]);
        assert_eq!(column_ranges(area, 2, 20), vec![(50, 590), (610, 1150)]);

        let three = column_ranges(area, 3, 10);
        let widths: Vec<u32> = three.iter().map(|(a, b)| b - a).collect();
        assert!(widths.iter().all(|&w| w == widths[0]));
        assert!(three.windows(2).all(|w| w[1].0 - w[0].1 == 10));
        assert!(three.last().unwrap().1 <= 1150);
    }

    #[test]
    fn test_partition_slots_tile_body() {
        let config = LayoutConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let slots = Partitioner::new(&config).partition_columns(&mut rng, 2);

        let body = config.body_area();
        assert!(slots.iter().all(|s| body.contains(&s.bounds)));
        for column in 0..2 {
            let col: Vec<&Slot> = slots.iter().filter(|s| s.column == column).collect();
            assert_eq!(col.first().unwrap().bounds.y, body.y);
            assert_eq!(col.last().unwrap().bounds.bottom(), body.bottom());
            for pair in col.windows(2) {
                assert_eq!(pair[0].bounds.bottom(), pair[1].bounds.y);
                assert_eq!(pair[0].row + 1, pair[1].row);
            }
        }
    }

    #[test]
    fn test_partition_column_count_in_range() {
        let config = LayoutConfig::default();
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..20 {
            let slots = Partitioner::new(&config).partition(&mut rng);
            let cols = slots.iter().map(|s| s.column).max().unwrap() + 1;
            assert!((1..=2).contains(&cols));
        }
    }
}
