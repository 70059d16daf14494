//! Collectible pickups for the frame simulation

use std::thread;
use std::time::Duration;

use crate::foundation::math::Vec2;

use super::collision::Bounds2D;

/// A stationary (or drifting) pickup worth a fixed number of points
#[derive(Debug, Clone, PartialEq)]
pub struct Collectible {
    /// Footprint used for collision and drawing
    pub bounds: Bounds2D,
    /// Drift in units per second
    pub velocity: Vec2,
    /// Current rotation in degrees
    pub rotation: f32,
    /// Rotation speed in degrees per second
    pub spin_rate: f32,
    /// Points awarded on collection
    pub value: u32,
    /// Collected items are skipped by updates and drawing
    pub collected: bool,
}

impl Collectible {
    /// Default edge length
    pub const DEFAULT_SIZE: f32 = 20.0;
    /// Default point value
    pub const DEFAULT_VALUE: u32 = 10;

    /// Create a default-sized collectible with its top-left corner at `position`
    pub fn new(position: Vec2) -> Self {
        Self::with_size(position, Self::DEFAULT_SIZE, Self::DEFAULT_VALUE)
    }

    /// Create a square collectible of edge `size` worth `value` points
    pub fn with_size(position: Vec2, size: f32, value: u32) -> Self {
        Self {
            bounds: Bounds2D::new(position, Vec2::new(size, size)),
            velocity: Vec2::zeros(),
            rotation: 0.0,
            spin_rate: 0.0,
            value,
            collected: false,
        }
    }

    /// Top-left corner
    pub fn position(&self) -> Vec2 {
        self.bounds.origin
    }

    /// Advance one frame
    ///
    /// `work` is slept first to stand in for per-object processing cost. Collected
    /// items return immediately.
    pub fn update(&mut self, delta_time: f32, work: Duration) {
        if self.collected {
            return;
        }
        if !work.is_zero() {
            thread::sleep(work);
        }
        self.bounds.origin += self.velocity * delta_time;
        self.rotation = (self.rotation + self.spin_rate * delta_time) % 360.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let item = Collectible::new(Vec2::new(5.0, 6.0));
        assert_eq!(item.bounds.size, Vec2::new(20.0, 20.0));
        assert_eq!(item.value, 10);
        assert!(!item.collected);
    }

    #[test]
    fn test_update_moves_uncollected_only() {
        let mut item = Collectible::new(Vec2::new(0.0, 0.0));
        item.velocity = Vec2::new(60.0, -30.0);
        item.spin_rate = 90.0;
        item.update(0.5, Duration::ZERO);
        assert_relative_eq!(item.position().x, 30.0);
        assert_relative_eq!(item.position().y, -15.0);
        assert_relative_eq!(item.rotation, 45.0);

        item.collected = true;
        item.update(0.5, Duration::ZERO);
        assert_relative_eq!(item.position().x, 30.0);
    }
}
