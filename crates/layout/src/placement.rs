//! Placement resolution
//!
//! Two strategies share the [`Placer`] interface:
//! - [`PackedCursor`] packs blocks left to right inside one slot
//! - [`FreePlacer`] scatters blocks over an area with overlap checks
//!
//! Both are stateful and order-dependent: every successful placement
//! constrains the blocks that follow.

use crate::config::OffsetPolicy;
use crate::geometry::{BBox, Size, Span};
use rand::Rng;

/// Outcome of resolving one block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Block placed at this box
    Placed(BBox),
    /// Packed cursor would run past the slot's right edge
    Overflow,
    /// Free search ran out of attempts
    Exhausted { attempts: u32 },
    /// Block cannot fit the area at any position
    TooLarge,
}

impl Placement {
    pub fn placed(&self) -> Option<BBox> {
        match self {
            Placement::Placed(b) => Some(*b),
            _ => None,
        }
    }
}

/// Common interface of the placement strategies
pub trait Placer {
    /// Resolve a position for a block of the given size
    fn place(&mut self, rng: &mut dyn rand::RngCore, size: Size) -> Placement;

    /// Boxes placed so far, in placement order
    fn placed(&self) -> &[BBox];
}

/// Left-to-right packing inside a slot
#[derive(Debug, Clone)]
pub struct PackedCursor {
    slot: BBox,
    cursor: u32,
    offset: OffsetPolicy,
    jitter: u32,
    gap: Span,
    placed: Vec<BBox>,
}

impl PackedCursor {
    /// Start a cursor at the slot's left edge
    pub fn new(slot: BBox, offset: OffsetPolicy, jitter: u32, gap: Span) -> Self {
        Self {
            slot,
            cursor: slot.x,
            offset,
            jitter,
            gap: gap.normalized(),
            placed: Vec::new(),
        }
    }

    /// Current horizontal cursor
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Width still available to the right of the cursor
    pub fn remaining(&self) -> u32 {
        self.slot.right().saturating_sub(self.cursor)
    }
}

impl Placer for PackedCursor {
    fn place(&mut self, rng: &mut dyn rand::RngCore, size: Size) -> Placement {
        if size.is_empty() || size.height > self.slot.h {
            return Placement::TooLarge;
        }
        if size.width > self.remaining() {
            return Placement::Overflow;
        }

        let slack_x = self.remaining() - size.width;
        let slack_y = self.slot.h - size.height;
        let (dx, dy) = match self.offset {
            OffsetPolicy::Fixed => (0, 0),
            OffsetPolicy::Jittered => (
                rng.gen_range(0..=self.jitter.min(slack_x)),
                rng.gen_range(0..=slack_y),
            ),
        };

        let bbox = BBox::at(self.cursor + dx, self.slot.y + dy, size);
        // A one-pixel gutter keeps neighbours from sharing an edge
        let gap = self.gap.sample(rng).max(1);
        self.cursor = bbox.right().saturating_add(gap);
        self.placed.push(bbox);
        Placement::Placed(bbox)
    }

    fn placed(&self) -> &[BBox] {
        &self.placed
    }
}

/// Randomised overlap-checked search over an area
#[derive(Debug, Clone)]
pub struct FreePlacer {
    area: BBox,
    max_attempts: u32,
    occupied: Vec<BBox>,
    placed: Vec<BBox>,
}

impl FreePlacer {
    pub fn new(area: BBox, max_attempts: u32) -> Self {
        Self {
            area,
            max_attempts: max_attempts.max(1),
            occupied: Vec::new(),
            placed: Vec::new(),
        }
    }

    /// Seed the search with boxes that are already taken
    pub fn with_occupied(mut self, occupied: Vec<BBox>) -> Self {
        self.occupied = occupied;
        self
    }

    /// Every box a new block must avoid
    pub fn occupied(&self) -> &[BBox] {
        &self.occupied
    }

    fn collides(&self, candidate: &BBox) -> bool {
        self.occupied.iter().any(|b| b.intersects(candidate))
    }
}

impl Placer for FreePlacer {
    fn place(&mut self, rng: &mut dyn rand::RngCore, size: Size) -> Placement {
        if size.is_empty() || !size.fits_in(self.area.size()) {
            return Placement::TooLarge;
        }

        let max_x = self.area.right() - size.width;
        let max_y = self.area.bottom() - size.height;
        for _ in 0..self.max_attempts {
            let x = rng.gen_range(self.area.x..=max_x);
            let y = rng.gen_range(self.area.y..=max_y);
            let candidate = BBox::at(x, y, size);
            if !self.collides(&candidate) {
                self.occupied.push(candidate);
                self.placed.push(candidate);
                return Placement::Placed(candidate);
            }
        }

        Placement::Exhausted {
            attempts: self.max_attempts,
        }
    }

    fn placed(&self) -> &[BBox] {
        &self.placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_packed_fixed_positions() {
        let slot = BBox::new(50, 100, 1000, 300);
        let mut cursor = PackedCursor::new(slot, OffsetPolicy::Fixed, 0, Span::new(10, 10));
        let mut rng = StdRng::seed_from_u64(1);

        let a = cursor.place(&mut rng, Size::new(200, 150));
        let b = cursor.place(&mut rng, Size::new(300, 300));
        assert_eq!(a, Placement::Placed(BBox::new(50, 100, 200, 150)));
        assert_eq!(b, Placement::Placed(BBox::new(260, 100, 300, 300)));
        assert_eq!(cursor.cursor(), 570);
    }

    #[test]
    fn test_packed_overflow_rejects_without_advancing() {
        let slot = BBox::new(0, 0, 500, 200);
        let mut cursor = PackedCursor::new(slot, OffsetPolicy::Fixed, 0, Span::new(0, 0));
        let mut rng = StdRng::seed_from_u64(2);

        assert!(cursor.place(&mut rng, Size::new(300, 100)).placed().is_some());
        let before = cursor.cursor();
        assert_eq!(cursor.place(&mut rng, Size::new(300, 100)), Placement::Overflow);
        assert_eq!(cursor.cursor(), before);
        assert_eq!(cursor.placed().len(), 1);
    }

    #[test]
    fn test_packed_zero_gap_still_disjoint() {
        let slot = BBox::new(0, 0, 1000, 200);
        let mut cursor = PackedCursor::new(slot, OffsetPolicy::Fixed, 0, Span::new(0, 0));
        let mut rng = StdRng::seed_from_u64(3);

        while cursor.place(&mut rng, Size::new(100, 100)).placed().is_some() {}
        let boxes = cursor.placed();
        for (i, a) in boxes.iter().enumerate() {
            for b in &boxes[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_packed_jittered_stays_in_slot() {
        let slot = BBox::new(50, 50, 700, 400);
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..50 {
            let mut cursor = PackedCursor::new(slot, OffsetPolicy::Jittered, 15, Span::new(10, 30));
            loop {
                let size = Size::new(rng.gen_range(50..=300), rng.gen_range(50..=400));
                match cursor.place(&mut rng, size) {
                    Placement::Placed(b) => assert!(slot.contains(&b)),
                    _ => break,
                }
            }
        }
    }

    #[test]
    fn test_packed_too_tall() {
        let slot = BBox::new(0, 0, 500, 100);
        let mut cursor = PackedCursor::new(slot, OffsetPolicy::Fixed, 0, Span::new(0, 0));
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(cursor.place(&mut rng, Size::new(10, 101)), Placement::TooLarge);
    }

    #[test]
    fn test_free_places_disjoint_boxes() {
        let area = BBox::new(50, 50, 1100, 1500);
        let mut placer = FreePlacer::new(area, 100);
        let mut rng = StdRng::seed_from_u64(6);

        for _ in 0..10 {
            if let Placement::Placed(b) = placer.place(&mut rng, Size::new(200, 200)) {
                assert!(area.contains(&b));
            }
        }
        let boxes = placer.placed();
        assert!(!boxes.is_empty());
        for (i, a) in boxes.iter().enumerate() {
            for b in &boxes[i + 1..] {
                assert!(!a.intersects(b));
            }
        }
    }

    #[test]
    fn test_free_exhausts_on_crowded_area() {
        // Everything but a 10x10 hole in the corner is taken
        let area = BBox::new(0, 0, 1000, 1000);
        let occupied = vec![
            BBox::new(0, 10, 1000, 990),
            BBox::new(10, 0, 990, 10),
            BBox::new(0, 0, 1, 1),
        ];
        let mut placer = FreePlacer::new(area, 100).with_occupied(occupied);
        let mut rng = StdRng::seed_from_u64(7);

        let result = placer.place(&mut rng, Size::new(50, 50));
        assert_eq!(result, Placement::Exhausted { attempts: 100 });
        assert!(placer.placed().is_empty());
        assert_eq!(placer.occupied().len(), 3);
    }

    #[test]
    fn test_free_too_large() {
        let mut placer = FreePlacer::new(BBox::new(0, 0, 100, 100), 10);
        let mut rng = StdRng::seed_from_u64(8);
        assert_eq!(placer.place(&mut rng, Size::new(101, 10)), Placement::TooLarge);
    }

    #[test]
    fn test_free_exact_fit() {
        let mut placer = FreePlacer::new(BBox::new(5, 5, 100, 100), 1);
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(
            placer.place(&mut rng, Size::new(100, 100)),
            Placement::Placed(BBox::new(5, 5, 100, 100))
        );
    }
}
