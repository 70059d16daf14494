//! Axis-aligned bounds for 2D overlap tests

use crate::foundation::math::Vec2;

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2D {
    /// Top-left corner
    pub origin: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Bounds2D {
    /// Create bounds from a top-left corner and a size
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Bottom-right corner
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    /// Center of the rectangle
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Strict AABB test: rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Bounds2D) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.origin.x < b_max.x
            && a_max.x > other.origin.x
            && self.origin.y < b_max.y
            && a_max.y > other.origin.y
    }

    /// Whether `point` lies inside the rectangle (edges included)
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.origin.x && point.x <= max.x && point.y >= self.origin.y && point.y <= max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, side: f32) -> Bounds2D {
        Bounds2D::new(Vec2::new(x, y), Vec2::new(side, side))
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let player = square(100.0, 100.0, 50.0);
        let pickup = square(140.0, 140.0, 20.0);
        assert!(player.overlaps(&pickup));
        assert!(pickup.overlaps(&player));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let player = square(100.0, 100.0, 50.0);
        assert!(!player.overlaps(&square(150.0, 100.0, 20.0)));
        assert!(!player.overlaps(&square(100.0, 80.0, 20.0)));
        assert!(player.overlaps(&square(149.5, 100.0, 20.0)));
    }

    #[test]
    fn test_contains_and_center() {
        let bounds = square(10.0, 10.0, 20.0);
        assert!(bounds.contains(Vec2::new(10.0, 30.0)));
        assert!(!bounds.contains(Vec2::new(31.0, 15.0)));
        assert_eq!(bounds.center(), Vec2::new(20.0, 20.0));
    }
}
