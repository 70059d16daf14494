//! Pseudo-perspective projection
//!
//! Objects shrink with their ground-plane distance from the camera:
//!
//! ```text
//! distance = max(planar_distance(camera, object), min_distance)
//! scale    = focal_scale / (distance + distance_offset)
//! screen.x = center.x + (world.x - camera.x) * scale
//! screen.y = center.y - (world.y - camera.y) * scale * vertical_squash
//! ```
//!
//! There is no view matrix; the camera target does not rotate the view.

use crate::core::config::ProjectionConfig;
use crate::foundation::math::{planar_distance, Vec2, Vec3};

/// A projected point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// Horizontal viewport coordinate
    pub x: f32,
    /// Vertical viewport coordinate (down is positive)
    pub y: f32,
    /// Size multiplier at this depth
    pub scale: f32,
    /// Clamped planar distance to the camera
    pub distance: f32,
}

impl ScreenPoint {
    /// Position as a vector
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Projects scene positions onto a viewport centered at `center`
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveProjector {
    config: ProjectionConfig,
    center: Vec2,
}

impl PerspectiveProjector {
    /// Create a projector for a viewport of `width` x `height`
    pub fn new(config: ProjectionConfig, width: f32, height: f32) -> Self {
        Self {
            config,
            center: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    /// Recenter for a resized viewport
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.center = Vec2::new(width / 2.0, height / 2.0);
    }

    /// Viewport center
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Projection constants
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Size multiplier for a planar distance
    pub fn scale_for_distance(&self, distance: f32) -> f32 {
        let distance = distance.max(self.config.min_distance);
        self.config.focal_scale / (distance + self.config.distance_offset)
    }

    /// Project a scene position as seen from `camera`
    pub fn project(&self, camera: &Vec3, world: &Vec3) -> ScreenPoint {
        let distance = planar_distance(camera, world).max(self.config.min_distance);
        let scale = self.scale_for_distance(distance);
        ScreenPoint {
            x: self.center.x + (world.x - camera.x) * scale,
            y: self.center.y - (world.y - camera.y) * scale * self.config.vertical_squash,
            scale,
            distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn projector() -> PerspectiveProjector {
        PerspectiveProjector::new(ProjectionConfig::default(), 1024.0, 768.0)
    }

    #[test]
    fn test_scale_decreases_with_distance() {
        let projector = projector();
        let mut previous = projector.scale_for_distance(0.0);
        for step in 1..2000 {
            let distance = step as f32 * 0.5;
            let scale = projector.scale_for_distance(distance);
            assert!(scale <= previous, "scale increased at {distance}");
            if distance > 1.0 {
                assert!(scale < previous, "scale flat at {distance}");
            }
            previous = scale;
        }
    }

    #[test]
    fn test_min_distance_clamp() {
        let projector = projector();
        assert_relative_eq!(projector.scale_for_distance(0.0), 500.0 / 101.0);
        assert_relative_eq!(projector.scale_for_distance(0.5), 500.0 / 101.0);
    }

    #[test]
    fn test_project_from_home_camera() {
        let projector = projector();
        let camera = Vec3::new(0.0, 8.0, 20.0);
        let point = projector.project(&camera, &Vec3::zeros());

        let scale = 500.0 / 120.0;
        assert_relative_eq!(point.distance, 20.0);
        assert_relative_eq!(point.scale, scale, epsilon = 1e-5);
        assert_relative_eq!(point.x, 512.0);
        assert_relative_eq!(point.y, 384.0 + 8.0 * scale, epsilon = 1e-4);
    }

    #[test]
    fn test_vertical_squash() {
        let config = ProjectionConfig {
            vertical_squash: 0.5,
            ..ProjectionConfig::default()
        };
        let projector = PerspectiveProjector::new(config, 100.0, 40.0);
        let camera = Vec3::zeros();
        let point = projector.project(&camera, &Vec3::new(0.0, 10.0, 0.0));
        let scale = 500.0 / 101.0;
        assert_relative_eq!(point.y, 20.0 - 10.0 * scale * 0.5, epsilon = 1e-4);
    }
}
