//! SVG textures and the texture manager
//!
//! Textures are kept as SVG markup. Backends that understand SVG embed it;
//! the others draw a placeholder of the texture's size.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use crate::foundation::math::Vec2;

use super::{Color, RenderError, RenderResult};

/// Source name recorded for textures built from markup
pub const PROCEDURAL_SOURCE: &str = "procedural";

/// An SVG document used as a texture
#[derive(Debug, Clone, PartialEq)]
pub struct SvgTexture {
    markup: String,
    source: String,
    size: Vec2,
    loaded: bool,
}

impl Default for SvgTexture {
    fn default() -> Self {
        Self {
            markup: String::new(),
            source: String::new(),
            size: Vec2::zeros(),
            loaded: false,
        }
    }
}

impl SvgTexture {
    /// Load a texture from an SVG file
    pub fn from_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let mut texture = Self::default();
        texture.load_from_file(path)?;
        Ok(texture)
    }

    /// Load SVG markup from a file into this texture
    ///
    /// On failure the texture is left unchanged.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        let markup = std::fs::read_to_string(path).map_err(|e| {
            log::error!("Failed to open SVG file {}: {}", path.display(), e);
            RenderError::TextureLoad(format!("{}: {}", path.display(), e))
        })?;

        *self = Self::parse(markup, path.display().to_string());
        log::debug!("Loaded SVG texture {} ({}x{})", self.source, self.size.x, self.size.y);
        Ok(())
    }

    /// Build a texture from SVG markup
    pub fn from_markup(markup: impl Into<String>) -> Self {
        Self::parse(markup.into(), PROCEDURAL_SOURCE.to_string())
    }

    fn parse(markup: String, source: String) -> Self {
        let size = Vec2::new(attribute_value(&markup, "width"), attribute_value(&markup, "height"));
        Self { markup, source, size, loaded: true }
    }

    /// Raw SVG markup
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// File path, or `"procedural"`
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether markup has been loaded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Size taken from the document's `width`/`height` attributes
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Document width
    pub fn width(&self) -> f32 {
        self.size.x
    }

    /// Document height
    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Markup for a filled, stroked rectangle
    pub fn rectangle(width: f32, height: f32, fill: Color, stroke: Color, stroke_width: f32) -> String {
        let mut svg = svg_open(width, height);
        let _ = writeln!(
            svg,
            "  <rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" {}/>",
            paint(fill, stroke, stroke_width)
        );
        svg.push_str("</svg>");
        svg
    }

    /// Markup for a filled, stroked circle
    pub fn circle(radius: f32, fill: Color, stroke: Color, stroke_width: f32) -> String {
        let diameter = radius * 2.0;
        let mut svg = svg_open(diameter, diameter);
        let _ = writeln!(
            svg,
            "  <circle cx=\"{radius}\" cy=\"{radius}\" r=\"{radius}\" {}/>",
            paint(fill, stroke, stroke_width)
        );
        svg.push_str("</svg>");
        svg
    }

    /// Markup for a polygon, translated so its bounding box starts at the origin
    ///
    /// No points yields an empty string.
    pub fn polygon(points: &[Vec2], fill: Color, stroke: Color, stroke_width: f32) -> String {
        let Some(first) = points.first() else {
            return String::new();
        };
        let (mut min, mut max) = (*first, *first);
        for point in points {
            min = min.inf(point);
            max = max.sup(point);
        }
        let size = max - min;

        let coordinates: Vec<String> = points
            .iter()
            .map(|point| format!("{},{}", point.x - min.x, point.y - min.y))
            .collect();

        let mut svg = svg_open(size.x, size.y);
        let _ = writeln!(
            svg,
            "  <polygon points=\"{}\" {}/>",
            coordinates.join(" "),
            paint(fill, stroke, stroke_width)
        );
        svg.push_str("</svg>");
        svg
    }
}

fn svg_open(width: f32, height: f32) -> String {
    format!("<svg width=\"{width}\" height=\"{height}\" xmlns=\"http://www.w3.org/2000/svg\">\n")
}

fn paint(fill: Color, stroke: Color, stroke_width: f32) -> String {
    format!(
        "fill=\"{}\" stroke=\"{}\" stroke-width=\"{stroke_width}\"",
        fill.to_css_rgb(),
        stroke.to_css_rgb()
    )
}

/// Numeric value of the first `name="..."` attribute, ignoring unit suffixes
fn attribute_value(markup: &str, name: &str) -> f32 {
    let needle = format!("{name}=\"");
    let Some(start) = markup.find(&needle).map(|index| index + needle.len()) else {
        return 0.0;
    };
    let Some(length) = markup[start..].find('"') else {
        return 0.0;
    };
    markup[start..start + length]
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%')
        .parse()
        .unwrap_or(0.0)
}

/// Named texture storage
///
/// Owned by whoever needs it; textures are shared out as [`Arc`]s so callers
/// can keep one after it is unloaded from the manager.
#[derive(Debug, Default)]
pub struct TextureManager {
    textures: HashMap<String, Arc<SvgTexture>>,
}

impl TextureManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a texture from file and register it under `name`
    pub fn load(&mut self, name: impl Into<String>, path: impl AsRef<Path>) -> RenderResult<Arc<SvgTexture>> {
        let texture = Arc::new(SvgTexture::from_file(path)?);
        self.textures.insert(name.into(), Arc::clone(&texture));
        Ok(texture)
    }

    /// Register a texture built from markup under `name`
    pub fn create_procedural(&mut self, name: impl Into<String>, markup: impl Into<String>) -> Arc<SvgTexture> {
        let texture = Arc::new(SvgTexture::from_markup(markup));
        self.textures.insert(name.into(), Arc::clone(&texture));
        texture
    }

    /// Look up a texture
    pub fn get(&self, name: &str) -> Option<Arc<SvgTexture>> {
        self.textures.get(name).cloned()
    }

    /// Remove a texture; returns whether it was present
    pub fn unload(&mut self, name: &str) -> bool {
        self.textures.remove(name).is_some()
    }

    /// Remove every texture
    pub fn unload_all(&mut self) {
        self.textures.clear();
    }

    /// Number of registered textures
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether no textures are registered
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
