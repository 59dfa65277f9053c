//! Page-space geometry

use serde::{Deserialize, Serialize};

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either side is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns true if this size fits inside `other`
    pub fn fits_in(&self, other: Size) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

/// Axis-aligned bounding box `(x, y, w, h)` in page pixels, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl BBox {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Box with the given origin and size
    pub fn at(x: u32, y: u32, size: Size) -> Self {
        Self::new(x, y, size.width, size.height)
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Pixel area, always derived from the current sides
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Overlap test on closed intervals
    ///
    /// Boxes that merely share an edge count as intersecting:
    /// `!(a.x2 < b.x1 || a.x1 > b.x2 || a.y2 < b.y1 || a.y1 > b.y2)`.
    pub fn intersects(&self, other: &BBox) -> bool {
        !(self.right() < other.x
            || self.x > other.right()
            || self.bottom() < other.y
            || self.y > other.bottom())
    }

    /// Returns true if `other` lies entirely inside this box
    pub fn contains(&self, other: &BBox) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// `[x, y, w, h]` as used by annotation records
    pub fn to_array(&self) -> [u32; 4] {
        [self.x, self.y, self.w, self.h]
    }
}

/// Inclusive integer range with a forgiving constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub min: u32,
    pub max: u32,
}

impl Span {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Same span with `min <= max` guaranteed
    pub fn normalized(&self) -> Span {
        if self.min <= self.max {
            *self
        } else {
            Span::new(self.max, self.min)
        }
    }

    /// Clip both ends to `limit`
    pub fn clipped(&self, limit: u32) -> Span {
        let n = self.normalized();
        Span::new(n.min.min(limit), n.max.min(limit))
    }

    /// Draw a uniform value from the span
    pub fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let n = self.normalized();
        rng.gen_range(n.min..=n.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_bbox_edges_and_area() {
        let b = BBox::new(10, 20, 30, 40);
        assert_eq!(b.right(), 40);
        assert_eq!(b.bottom(), 60);
        assert_eq!(b.area(), 1200);
        assert_eq!(b.to_array(), [10, 20, 30, 40]);
    }

    #[test]
    fn test_intersects_overlapping() {
        let a = BBox::new(0, 0, 100, 100);
        let b = BBox::new(50, 50, 100, 100);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_intersects_disjoint() {
        let a = BBox::new(0, 0, 100, 100);
        let b = BBox::new(101, 0, 10, 10);
        let c = BBox::new(0, 150, 10, 10);
        assert!(!a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_intersects_shared_edge() {
        // Closed-interval semantics: touching boxes collide
        let a = BBox::new(0, 0, 100, 100);
        let b = BBox::new(100, 0, 10, 10);
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_contains() {
        let outer = BBox::new(50, 50, 1100, 1500);
        assert!(outer.contains(&BBox::new(50, 50, 1100, 1500)));
        assert!(outer.contains(&BBox::new(60, 60, 10, 10)));
        assert!(!outer.contains(&BBox::new(49, 60, 10, 10)));
        assert!(!outer.contains(&BBox::new(1100, 60, 51, 10)));
    }

    #[test]
    fn test_span_normalized_and_clipped() {
        assert_eq!(Span::new(5, 2).normalized(), Span::new(2, 5));
        assert_eq!(Span::new(100, 300).clipped(150), Span::new(100, 150));
        assert_eq!(Span::new(200, 300).clipped(150), Span::new(150, 150));
    }

    #[test]
    fn test_span_sample_within() {
        let mut rng = StdRng::seed_from_u64(42);
        let span = Span::new(9, 3);
        for _ in 0..100 {
            let v = span.sample(&mut rng);
            assert!((3..=9).contains(&v));
        }
    }

    #[test]
    fn test_size_fits_in() {
        assert!(Size::new(10, 10).fits_in(Size::new(10, 20)));
        assert!(!Size::new(11, 10).fits_in(Size::new(10, 20)));
        assert!(Size::new(0, 5).is_empty());
    }
}
