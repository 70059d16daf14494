//! Scene objects

use serde::{Serialize, Deserialize};

use crate::foundation::math::{Transform, Vec3};
use crate::render::Color;

/// What a scene object is
///
/// The kind decides the default color, the HTML icon and the shape the
/// renderers draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// A rotating sphere
    Planet,
    /// A flat square platform
    Platform,
    /// A collectible crystal
    Collectible,
}

impl ObjectKind {
    /// Color used when an object of this kind is created without one
    pub fn default_color(self) -> Color {
        match self {
            Self::Planet => Color::from_rgb8(0x4A, 0x90, 0xE2),
            Self::Platform => Color::from_rgb8(0x8B, 0x45, 0x13),
            Self::Collectible => Color::from_rgb8(0xFF, 0xD7, 0x00),
        }
    }

    /// Icon shown by the HTML view
    pub fn icon(self) -> &'static str {
        match self {
            Self::Planet => "🌍",
            Self::Platform => "🟫",
            Self::Collectible => "💎",
        }
    }

    /// Lowercase name, matching the serialized form
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planet => "planet",
            Self::Platform => "platform",
            Self::Collectible => "collectible",
        }
    }
}

/// A named object in the scene
///
/// Kind and color are fixed when the object is built; only the transform
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    name: String,
    kind: ObjectKind,
    color: Color,
    /// Position, rotation and scale
    pub transform: Transform,
}

impl GameObject {
    /// Create an object with the kind's default color
    pub fn new(name: impl Into<String>, kind: ObjectKind, position: Vec3) -> Self {
        Self::with_color(name, kind, position, kind.default_color())
    }

    /// Create an object with an explicit color
    pub fn with_color(name: impl Into<String>, kind: ObjectKind, position: Vec3, color: Color) -> Self {
        Self {
            name: name.into(),
            kind,
            color,
            transform: Transform::from_position(position),
        }
    }

    /// Object name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Object kind
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Object color
    pub fn color(&self) -> Color {
        self.color
    }

    /// Current position
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Move the object to a new position
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    /// Rotation about Y in degrees
    pub fn rotation_y(&self) -> f32 {
        self.transform.rotation.y
    }

    /// Advance per-frame behavior; planets spin about Y
    pub fn update(&mut self, delta_time: f32, spin_rate: f32) {
        if self.kind == ObjectKind::Planet {
            self.transform.rotate_y(spin_rate * delta_time);
        }
    }
}
