//! RGBA colors

use serde::{Serialize, Deserialize};

use super::RenderError;

/// Linear RGBA color with channels in `[0, 1]`
///
/// Serialized as a `#RRGGBB` hex string; alpha is not part of the serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque red
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Opaque blue
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    /// Opaque yellow
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    /// Opaque purple
    pub const PURPLE: Self = Self::rgb(1.0, 0.0, 1.0);
    /// Opaque orange
    pub const ORANGE: Self = Self::rgb(1.0, 0.5, 0.0);
    /// Opaque gold (`#FFD700`)
    pub const GOLD: Self = Self::rgb(1.0, 215.0 / 255.0, 0.0);

    /// Create an opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color with alpha
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }

    /// Parse `#RRGGBB` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self, RenderError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(RenderError::InvalidColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| RenderError::InvalidColor(hex.to_string()))
        };
        Ok(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Format as uppercase `#RRGGBB`
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    /// 8-bit channels, rounded
    pub fn to_rgb8(&self) -> [u8; 3] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }

    /// CSS `rgb(r,g,b)` with channels truncated after scaling by 255
    pub fn to_css_rgb(&self) -> String {
        let truncate = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
        format!("rgb({},{},{})", truncate(self.r), truncate(self.g), truncate(self.b))
    }

    /// CSS color keyword for the named constants that have one
    pub fn css_name(&self) -> Option<&'static str> {
        const NAMED: [(Color, &str); 8] = [
            (Color::WHITE, "white"),
            (Color::BLACK, "black"),
            (Color::RED, "red"),
            (Color::BLUE, "blue"),
            (Color::YELLOW, "yellow"),
            (Color::GOLD, "gold"),
            (Color::ORANGE, "orange"),
            (Color::PURPLE, "fuchsia"),
        ];
        NAMED
            .iter()
            .find(|(color, _)| color.to_rgb8() == self.to_rgb8())
            .map(|(_, name)| *name)
    }

    /// SVG paint value: a color keyword when one matches, else `#RRGGBB`
    pub fn to_svg_paint(&self) -> String {
        self.css_name().map_or_else(|| self.to_hex(), str::to_string)
    }

    /// Mean of the three channels
    pub fn brightness(&self) -> f32 {
        (self.r + self.g + self.b) / 3.0
    }

    /// Character for this color on the console brightness ramp
    pub fn to_ascii(&self) -> char {
        let brightness = self.brightness();
        if brightness < 0.1 {
            ' '
        } else if brightness < 0.3 {
            '.'
        } else if brightness < 0.5 {
            ':'
        } else if brightness < 0.7 {
            '='
        } else if brightness < 0.9 {
            '#'
        } else {
            '@'
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl TryFrom<String> for Color {
    type Error = RenderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        let color = Color::from_hex("#4A90E2").expect("valid hex");
        assert_eq!(color.to_rgb8(), [0x4A, 0x90, 0xE2]);
        assert_eq!(color.to_hex(), "#4A90E2");
        assert_eq!(Color::from_hex("ffd700").expect("no hash").to_hex(), "#FFD700");

        assert!(matches!(Color::from_hex("#12345"), Err(RenderError::InvalidColor(_))));
        assert!(matches!(Color::from_hex("#GG0000"), Err(RenderError::InvalidColor(_))));
    }

    #[test]
    fn test_css_rgb_truncates() {
        assert_eq!(Color::RED.to_css_rgb(), "rgb(255,0,0)");
        assert_eq!(Color::rgb(0.5, 0.25, 1.0).to_css_rgb(), "rgb(127,63,255)");
    }

    #[test]
    fn test_svg_paint() {
        assert_eq!(Color::BLUE.to_svg_paint(), "blue");
        assert_eq!(Color::GOLD.to_svg_paint(), "gold");
        assert_eq!(Color::from_rgb8(0x4A, 0x90, 0xE2).to_svg_paint(), "#4A90E2");
    }

    #[test]
    fn test_ascii_ramp() {
        assert_eq!(Color::BLACK.to_ascii(), ' ');
        assert_eq!(Color::rgb(0.2, 0.2, 0.2).to_ascii(), '.');
        assert_eq!(Color::rgb(0.4, 0.4, 0.4).to_ascii(), ':');
        assert_eq!(Color::rgb(0.6, 0.6, 0.6).to_ascii(), '=');
        assert_eq!(Color::rgb(0.8, 0.8, 0.8).to_ascii(), '#');
        assert_eq!(Color::WHITE.to_ascii(), '@');
        assert_eq!(Color::RED.to_ascii(), ':');
    }

    #[test]
    fn test_serde_as_hex() {
        let json = serde_json::to_string(&Color::GOLD).expect("serialize");
        assert_eq!(json, "\"#FFD700\"");
        let back: Color = serde_json::from_str("\"#8B4513\"").expect("deserialize");
        assert_eq!(back.to_hex(), "#8B4513");
        assert!(serde_json::from_str::<Color>("\"brown\"").is_err());
    }
}
