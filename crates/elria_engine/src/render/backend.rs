//! Backend abstraction trait for the rendering system
//!
//! Every output surface implements [`RenderBackend`]. Coordinates are viewport
//! units: pixels for SVG, character cells for the console.

use crate::foundation::math::Vec2;

use super::{Color, RenderResult, SvgTexture};

/// Viewport size in backend units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    /// Whether an axis-aligned box lies at least partly inside the viewport
    pub fn intersects(&self, min: Vec2, max: Vec2) -> bool {
        max.x >= 0.0 && max.y >= 0.0 && min.x < self.width as f32 && min.y < self.height as f32
    }
}

/// Immediate-mode 2D drawing surface
pub trait RenderBackend {
    /// Current viewport size
    fn viewport(&self) -> Viewport;

    /// Start a new frame filled with `color`
    fn clear(&mut self, color: Color);

    /// Filled axis-aligned rectangle with its top-left corner at `position`
    fn draw_rect(&mut self, position: Vec2, size: Vec2, color: Color);

    /// Filled circle
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Line segment
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color);

    /// Filled polygon; fewer than three points draws nothing
    fn draw_polygon(&mut self, points: &[Vec2], color: Color);

    /// Text with its top-left corner at `position`
    fn draw_text(&mut self, text: &str, position: Vec2, color: Color);

    /// Draw a texture at `position` scaled by `scale`
    ///
    /// Backends that cannot rasterize SVG draw a white placeholder of the
    /// texture's footprint.
    fn draw_texture(&mut self, texture: &SvgTexture, position: Vec2, scale: f32) {
        let size = texture.size() * scale;
        self.draw_rect(position, size, Color::WHITE);
    }

    /// Adapt to a new output size; fixed-size backends ignore this
    fn resize(&mut self, _width: u32, _height: u32) {}

    /// Finish the frame and publish it
    fn present(&mut self) -> RenderResult<()>;
}
