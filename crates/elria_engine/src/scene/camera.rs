//! Free-flying scene camera

use serde::{Serialize, Deserialize};

use crate::core::config::CameraConfig;
use crate::foundation::math::Vec3;

/// Camera translation directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraMove {
    /// Towards -Z
    Forward,
    /// Towards +Z
    Backward,
    /// Towards -X
    Left,
    /// Towards +X
    Right,
    /// Towards +Y
    Up,
    /// Towards -Y
    Down,
}

impl CameraMove {
    /// Unit direction of the move
    pub fn direction(self) -> Vec3 {
        match self {
            Self::Forward => Vec3::new(0.0, 0.0, -1.0),
            Self::Backward => Vec3::new(0.0, 0.0, 1.0),
            Self::Left => Vec3::new(-1.0, 0.0, 0.0),
            Self::Right => Vec3::new(1.0, 0.0, 0.0),
            Self::Up => Vec3::new(0.0, 1.0, 0.0),
            Self::Down => Vec3::new(0.0, -1.0, 0.0),
        }
    }
}

/// Scene camera
///
/// Position and target always move together, so the view direction is fixed
/// until [`Camera::reset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Eye position
    pub position: Vec3,
    /// Look-at point
    pub target: Vec3,
    home_position: Vec3,
    home_target: Vec3,
}

impl Camera {
    /// Create a camera whose home pose is its starting pose
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            home_position: position,
            home_target: target,
        }
    }

    /// Create a camera from configuration
    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(config.home_position, config.home_target)
    }

    /// Translate position and target by `amount` along `movement`
    pub fn step(&mut self, movement: CameraMove, amount: f32) {
        let offset = movement.direction() * amount;
        self.position += offset;
        self.target += offset;
        log::trace!("Camera {:?} -> ({:.1}, {:.1}, {:.1})", movement, self.position.x, self.position.y, self.position.z);
    }

    /// Restore the home pose
    pub fn reset(&mut self) {
        self.position = self.home_position;
        self.target = self.home_target;
    }

    /// Home position
    pub fn home_position(&self) -> Vec3 {
        self.home_position
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_moves_position_and_target() {
        let mut camera = Camera::default();
        camera.step(CameraMove::Forward, 2.0);
        camera.step(CameraMove::Up, 2.0);
        camera.step(CameraMove::Left, 2.0);

        assert_eq!(camera.position, Vec3::new(-2.0, 10.0, 18.0));
        assert_eq!(camera.target, Vec3::new(-2.0, 2.0, -2.0));
        assert_eq!(camera.position - camera.target, Vec3::new(0.0, 8.0, 20.0));
    }

    #[test]
    fn test_reset_restores_home() {
        let mut camera = Camera::default();
        for _ in 0..10 {
            camera.step(CameraMove::Right, 2.0);
            camera.step(CameraMove::Down, 2.0);
        }
        camera.reset();
        assert_eq!(camera.position, Vec3::new(0.0, 8.0, 20.0));
        assert_eq!(camera.target, Vec3::zeros());
    }
}
