//! Math utilities and types
//!
//! Provides the vector and transform types shared by the scene, the projector
//! and every renderer.

use serde::{Serialize, Deserialize};

pub use nalgebra::{Vector2, Vector3};

/// 2D vector type (screen space, top-down gameplay)
pub type Vec2 = Vector2<f32>;

/// 3D vector type (scene space, Y-up)
pub type Vec3 = Vector3<f32>;

/// Position, Euler rotation and scale of a scene object
///
/// Rotation is stored in degrees per axis; the renderers only ever spin
/// objects about Y, so quaternions would buy nothing here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in scene space
    pub position: Vec3,

    /// Rotation in degrees about X, Y and Z
    pub rotation: Vec3,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set a uniform or non-uniform scale (builder style)
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotate about the Y axis, keeping the angle in `[0, 360)`
    pub fn rotate_y(&mut self, degrees: f32) {
        self.rotation.y = utils::wrap_degrees(self.rotation.y + degrees);
    }

    /// Move by a world-space offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Wrap an angle in degrees into `[0, 360)`
    pub fn wrap_degrees(degrees: f32) -> f32 {
        let wrapped = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    }
}

/// Zero-safe operations missing from nalgebra's vector API
pub trait VectorExt: Sized {
    /// Unit vector in the same direction, or zero for a zero-length vector
    fn normalize_or_zero(&self) -> Self;

    /// Divide by a scalar, yielding zero instead of infinities when `scalar == 0`
    fn div_or_zero(&self, scalar: f32) -> Self;

    /// Euclidean distance to another point
    fn distance_to(&self, other: &Self) -> f32;
}

impl VectorExt for Vec2 {
    fn normalize_or_zero(&self) -> Self {
        self.try_normalize(f32::EPSILON).unwrap_or_else(Self::zeros)
    }

    fn div_or_zero(&self, scalar: f32) -> Self {
        if scalar == 0.0 { Self::zeros() } else { self / scalar }
    }

    fn distance_to(&self, other: &Self) -> f32 {
        (self - other).magnitude()
    }
}

impl VectorExt for Vec3 {
    fn normalize_or_zero(&self) -> Self {
        self.try_normalize(f32::EPSILON).unwrap_or_else(Self::zeros)
    }

    fn div_or_zero(&self, scalar: f32) -> Self {
        if scalar == 0.0 { Self::zeros() } else { self / scalar }
    }

    fn distance_to(&self, other: &Self) -> f32 {
        (self - other).magnitude()
    }
}

/// Distance between two points projected onto the ground (X/Z) plane
pub fn planar_distance(a: &Vec3, b: &Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vector_addition_is_associative() {
        let a = Vec3::new(1.5, -2.0, 0.25);
        let b = Vec3::new(-4.0, 8.0, 3.0);
        let c = Vec3::new(0.1, 0.2, -0.3);

        assert_relative_eq!((a + b) + c, a + (b + c), epsilon = 1e-5);
    }

    #[test]
    fn test_scaling_distributes_over_addition() {
        let a = Vec2::new(3.0, -7.0);
        let b = Vec2::new(-1.25, 4.5);
        let k = 2.5_f32;
        let m = -0.75_f32;

        assert_relative_eq!((a + b) * k, a * k + b * k, epsilon = 1e-5);
        assert_relative_eq!(a * (k + m), a * k + a * m, epsilon = 1e-5);
    }

    #[test]
    fn test_zero_safe_operations() {
        assert_eq!(Vec2::zeros().normalize_or_zero(), Vec2::zeros());
        assert_eq!(Vec3::new(1.0, 2.0, 3.0).div_or_zero(0.0), Vec3::zeros());

        let unit = Vec3::new(0.0, 3.0, 4.0).normalize_or_zero();
        assert_relative_eq!(unit.magnitude(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(unit, Vec3::new(0.0, 0.6, 0.8), epsilon = 1e-6);
    }

    #[test]
    fn test_distances() {
        let a = Vec3::new(0.0, 100.0, 0.0);
        let b = Vec3::new(3.0, -50.0, 4.0);

        assert_relative_eq!(planar_distance(&a, &b), 5.0);
        assert!(a.distance_to(&b) > 150.0);
        assert_relative_eq!(Vec2::new(0.0, 0.0).distance_to(&Vec2::new(6.0, 8.0)), 10.0);
    }

    #[test]
    fn test_rotate_y_wraps() {
        let mut transform = Transform::default();
        transform.rotate_y(350.0);
        transform.rotate_y(20.0);
        assert_relative_eq!(transform.rotation.y, 10.0, epsilon = 1e-4);

        transform.rotate_y(-30.0);
        assert_relative_eq!(transform.rotation.y, 340.0, epsilon = 1e-4);
    }

    #[test]
    fn test_utils() {
        assert_relative_eq!(utils::deg_to_rad(180.0), constants::PI);
        assert_relative_eq!(utils::rad_to_deg(constants::TAU), 360.0, epsilon = 1e-4);
        assert_eq!(utils::clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(utils::lerp(0.0, 10.0, 0.25), 2.5);
        assert_eq!(utils::wrap_degrees(720.0), 0.0);
    }
}
