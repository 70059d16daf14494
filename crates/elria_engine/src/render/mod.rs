//! # Rendering System
//!
//! Backend-agnostic drawing for the sandbox scene.
//!
//! ## Architecture
//!
//! - **RenderBackend**: immediate-mode 2D drawing trait (rects, circles, lines, polygons, text)
//! - **PerspectiveProjector**: scale-by-distance projection from scene space to the viewport
//! - **SceneRenderer**: draws a [`Scene`](crate::scene::Scene) through any backend
//! - **Backends**: console character framebuffer and SVG documents
//! - **HtmlExporter**: a self-contained interactive HTML view of a scene
//!
//! All output surfaces share the same projection constants, so a scene looks
//! the same in the terminal, in an SVG file and in the browser.

mod backend;
mod color;
mod console;
mod html;
mod projection;
mod scene_renderer;
mod svg;
pub mod texture;

pub use backend::{RenderBackend, Viewport};
pub use color::Color;
pub use console::ConsoleRenderer;
pub use html::{HtmlExporter, DEFAULT_HTML_FILE};
pub use projection::{PerspectiveProjector, ScreenPoint};
pub use scene_renderer::{SceneRenderer, SceneStyle, RenderStats, ProjectedObject};
pub use svg::SvgRenderer;
pub use texture::{SvgTexture, TextureManager};

use thiserror::Error;

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Writing output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A color string could not be parsed
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A texture could not be loaded
    #[error("Texture load failed: {0}")]
    TextureLoad(String),

    /// Zero-sized or otherwise unusable viewport
    #[error("Invalid viewport: {width}x{height}")]
    InvalidViewport {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// The default browser could not be launched
    #[error("Could not open browser: {0}")]
    Browser(String),
}

/// Escape text for inclusion in XML or HTML
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Score: <10> & \"ok\""), "Score: &lt;10&gt; &amp; &quot;ok&quot;");
        assert_eq!(escape_xml("plain"), "plain");
    }
}
