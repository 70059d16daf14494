//! SVG document backend

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::foundation::math::Vec2;

use super::{escape_xml, Color, RenderBackend, RenderResult, SvgTexture, Viewport};

const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n";

/// Accumulates drawing calls into an SVG document
pub struct SvgRenderer {
    width: u32,
    height: u32,
    body: String,
    target: Option<PathBuf>,
    font_size: f32,
}

impl SvgRenderer {
    /// Create a renderer for a `width` x `height` document
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            body: String::new(),
            target: None,
            font_size: 14.0,
        }
    }

    /// Write the document to `path` on every present (builder style)
    pub fn with_target(mut self, path: impl Into<PathBuf>) -> Self {
        self.target = Some(path.into());
        self
    }

    /// Change the file written on present
    pub fn set_target(&mut self, path: impl Into<PathBuf>) {
        self.target = Some(path.into());
    }

    /// File written on present, if any
    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    /// Resize the document
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Drop everything drawn so far without painting a background
    pub fn reset(&mut self) {
        self.body.clear();
    }

    /// Markup drawn since the last clear
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The complete SVG document
    pub fn document(&self) -> String {
        let mut document = String::with_capacity(self.body.len() + 160);
        document.push_str(XML_HEADER);
        let _ = writeln!(
            document,
            "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">",
            self.width, self.height
        );
        document.push_str(&self.body);
        document.push_str("</svg>\n");
        document
    }

    /// Write the document to `path`
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        std::fs::write(path, self.document())?;
        Ok(())
    }

    fn fill(color: Color) -> String {
        if color.a < 1.0 {
            format!("fill=\"{}\" fill-opacity=\"{}\"", color.to_svg_paint(), color.a)
        } else {
            format!("fill=\"{}\"", color.to_svg_paint())
        }
    }
}

/// Markup of a texture without its XML declaration, ready to nest
fn nested_markup(texture: &SvgTexture) -> &str {
    let markup = texture.markup();
    match markup.find("?>") {
        Some(end) if markup.trim_start().starts_with("<?xml") => markup[end + 2..].trim_start(),
        _ => markup,
    }
}

impl RenderBackend for SvgRenderer {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.body.clear();
        let _ = writeln!(
            self.body,
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" {}/>",
            self.width,
            self.height,
            Self::fill(color)
        );
    }

    fn draw_rect(&mut self, position: Vec2, size: Vec2, color: Color) {
        let _ = writeln!(
            self.body,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" {}/>",
            position.x,
            position.y,
            size.x,
            size.y,
            Self::fill(color)
        );
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let _ = writeln!(
            self.body,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" {}/>",
            center.x,
            center.y,
            radius,
            Self::fill(color)
        );
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        let _ = writeln!(
            self.body,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
            from.x,
            from.y,
            to.x,
            to.y,
            color.to_svg_paint()
        );
    }

    fn draw_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            return;
        }
        let coordinates: Vec<String> = points.iter().map(|p| format!("{},{}", p.x, p.y)).collect();
        let _ = writeln!(
            self.body,
            "<polygon points=\"{}\" {}/>",
            coordinates.join(" "),
            Self::fill(color)
        );
    }

    fn draw_text(&mut self, text: &str, position: Vec2, color: Color) {
        // SVG text is anchored at the baseline
        let _ = writeln!(
            self.body,
            "<text x=\"{}\" y=\"{}\" font-family=\"monospace\" font-size=\"{}\" {}>{}</text>",
            position.x,
            position.y + self.font_size,
            self.font_size,
            Self::fill(color),
            escape_xml(text)
        );
    }

    fn draw_texture(&mut self, texture: &SvgTexture, position: Vec2, scale: f32) {
        let _ = writeln!(
            self.body,
            "<g transform=\"translate({},{}) scale({})\">{}</g>",
            position.x,
            position.y,
            scale,
            nested_markup(texture)
        );
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.set_viewport(width, height);
    }

    fn present(&mut self) -> RenderResult<()> {
        if let Some(target) = &self.target {
            self.save_to_file(target)?;
            log::debug!("Wrote {}", target.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_structure() {
        let mut svg = SvgRenderer::new(800, 400);
        svg.draw_rect(Vec2::new(100.0, 100.0), Vec2::new(50.0, 50.0), Color::BLUE);
        svg.draw_rect(Vec2::new(12.0, 7.0), Vec2::new(20.0, 20.0), Color::GOLD);

        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n\
            <svg width=\"800\" height=\"400\" xmlns=\"http://www.w3.org/2000/svg\">\n\
            <rect x=\"100\" y=\"100\" width=\"50\" height=\"50\" fill=\"blue\"/>\n\
            <rect x=\"12\" y=\"7\" width=\"20\" height=\"20\" fill=\"gold\"/>\n\
            </svg>\n";
        assert_eq!(svg.document(), expected);
    }

    #[test]
    fn test_clear_records_background() {
        let mut svg = SvgRenderer::new(10, 10);
        svg.draw_circle(Vec2::new(1.0, 1.0), 1.0, Color::RED);
        svg.clear(Color::BLACK);
        assert_eq!(svg.body(), "<rect x=\"0\" y=\"0\" width=\"10\" height=\"10\" fill=\"black\"/>\n");
        svg.reset();
        assert!(svg.body().is_empty());
    }

    #[test]
    fn test_text_is_escaped() {
        let mut svg = SvgRenderer::new(100, 20);
        svg.draw_text("A < B & C", Vec2::new(0.0, 0.0), Color::WHITE);
        assert!(svg.body().contains(">A &lt; B &amp; C</text>"));
    }

    #[test]
    fn test_texture_is_nested() {
        let mut svg = SvgRenderer::new(100, 100);
        let texture = SvgTexture::from_markup(format!("{XML_HEADER}<svg width=\"4\" height=\"4\"></svg>"));
        svg.draw_texture(&texture, Vec2::new(5.0, 6.0), 2.0);
        assert_eq!(
            svg.body(),
            "<g transform=\"translate(5,6) scale(2)\"><svg width=\"4\" height=\"4\"></svg></g>\n"
        );
    }

    #[test]
    fn test_present_writes_target() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("frame.svg");
        let mut svg = SvgRenderer::new(20, 20).with_target(&path);
        svg.draw_line(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), Color::WHITE);
        svg.present().expect("present");

        let written = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(written, svg.document());

        let mut untargeted = SvgRenderer::new(20, 20);
        assert!(untargeted.present().is_ok());
    }
}
