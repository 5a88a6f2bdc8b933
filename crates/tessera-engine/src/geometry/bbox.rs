use super::GeometryCoordinate;

/// Axis-aligned box in tile-local integer coordinates.
///
/// Edges are inclusive. `x1 <= x2` and `y1 <= y2` are expected but not enforced;
/// an inverted box simply never overlaps anything.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct BBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BBox {
    #[inline]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Smallest box covering all `points`, or `None` for an empty run.
    pub fn from_points(points: &[GeometryCoordinate]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let p = first.widen();
        let mut bbox = BBox::new(p.x, p.y, p.x, p.y);
        for point in rest {
            let p = point.widen();
            bbox.x1 = bbox.x1.min(p.x);
            bbox.y1 = bbox.y1.min(p.y);
            bbox.x2 = bbox.x2.max(p.x);
            bbox.y2 = bbox.y2.max(p.y);
        }
        Some(bbox)
    }

    /// Grows the box by `amount` on every side (saturating).
    #[inline]
    pub fn expanded(self, amount: i32) -> Self {
        BBox::new(
            self.x1.saturating_sub(amount),
            self.y1.saturating_sub(amount),
            self.x2.saturating_add(amount),
            self.y2.saturating_add(amount),
        )
    }

    /// Closed-interval overlap: touching edges count as overlapping.
    #[inline]
    pub fn intersects(self, other: BBox) -> bool {
        self.x1 <= other.x2 && self.y1 <= other.y2 && self.x2 >= other.x1 && self.y2 >= other.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    // ── from_points ───────────────────────────────────────────────────────

    #[test]
    fn from_points_empty_is_none() {
        assert_eq!(BBox::from_points(&[]), None);
    }

    #[test]
    fn from_points_covers_all() {
        let pts = [Point::new(5, 9), Point::new(-3, 12), Point::new(7, -1)];
        assert_eq!(BBox::from_points(&pts), Some(BBox::new(-3, -1, 7, 12)));
    }

    // ── intersects ────────────────────────────────────────────────────────

    #[test]
    fn intersects_touching_edge() {
        // Closed intervals: a shared edge is an overlap.
        assert!(BBox::new(0, 0, 10, 10).intersects(BBox::new(10, 0, 20, 10)));
    }

    #[test]
    fn intersects_disjoint() {
        assert!(!BBox::new(0, 0, 10, 10).intersects(BBox::new(11, 0, 20, 10)));
    }

    #[test]
    fn expanded_saturates() {
        let b = BBox::new(i32::MIN, 0, i32::MAX, 0).expanded(5);
        assert_eq!(b, BBox::new(i32::MIN, -5, i32::MAX, 5));
    }
}
