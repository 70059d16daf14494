//! Console ASCII backend
//!
//! Rasterizes into a grid of characters chosen by color brightness and writes
//! the grid to any [`Write`] sink on present.

use std::io::{self, Stdout, Write};

use crate::foundation::math::Vec2;

use super::{Color, RenderBackend, RenderResult, Viewport};

const ANSI_CLEAR: &str = "\x1b[2J\x1b[H";

/// Character framebuffer renderer
pub struct ConsoleRenderer<W: Write> {
    columns: usize,
    rows: usize,
    buffer: Vec<Vec<char>>,
    writer: W,
    clear_screen: bool,
}

impl ConsoleRenderer<Stdout> {
    /// Renderer writing to standard output
    pub fn stdout(columns: usize, rows: usize) -> Self {
        Self::new(columns, rows, io::stdout())
    }
}

impl<W: Write> ConsoleRenderer<W> {
    /// Renderer writing to `writer`
    pub fn new(columns: usize, rows: usize, writer: W) -> Self {
        Self {
            columns,
            rows,
            buffer: vec![vec![' '; columns]; rows],
            writer,
            clear_screen: true,
        }
    }

    /// Enable or disable the ANSI clear sequence before each frame
    pub fn with_clear_screen(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    /// Resize the framebuffer; new cells are blank
    pub fn set_viewport(&mut self, columns: usize, rows: usize) {
        self.columns = columns;
        self.rows = rows;
        self.buffer.resize(rows, vec![' '; columns]);
        for row in &mut self.buffer {
            row.resize(columns, ' ');
        }
    }

    /// Character at a cell, if inside the grid
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        self.buffer.get(y).and_then(|row| row.get(x)).copied()
    }

    /// The current frame, one line per row
    pub fn frame(&self) -> String {
        let mut frame = String::with_capacity((self.columns + 1) * self.rows);
        for row in &self.buffer {
            frame.extend(row.iter());
            frame.push('\n');
        }
        frame
    }

    /// The output sink
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Consume the renderer, returning the output sink
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.columns && (y as usize) < self.rows
    }

    fn plot(&mut self, x: i64, y: i64, ch: char) {
        if self.in_bounds(x, y) {
            self.buffer[y as usize][x as usize] = ch;
        }
    }
}

/// Even-odd rule point-in-polygon test
fn contains_point(points: &[Vec2], x: f32, y: f32) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > y) != (b.y > y) && x < (b.x - a.x) * (y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

impl<W: Write> RenderBackend for ConsoleRenderer<W> {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.columns as u32, self.rows as u32)
    }

    fn clear(&mut self, color: Color) {
        let ch = color.to_ascii();
        for row in &mut self.buffer {
            row.fill(ch);
        }
    }

    fn draw_rect(&mut self, position: Vec2, size: Vec2, color: Color) {
        let ch = color.to_ascii();
        let (start_x, start_y) = (position.x as i64, position.y as i64);
        let (end_x, end_y) = ((position.x + size.x) as i64, (position.y + size.y) as i64);

        for y in start_y..end_y {
            for x in start_x..end_x {
                self.plot(x, y, ch);
            }
        }
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let ch = color.to_ascii();
        let (cx, cy) = (center.x as i64, center.y as i64);
        let r = radius as i64;

        for y in (cy - r)..=(cy + r) {
            for x in (cx - r)..=(cx + r) {
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy <= r * r {
                    self.plot(x, y, ch);
                }
            }
        }
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        // Bresenham
        let ch = color.to_ascii();
        let (mut x0, mut y0) = (from.x as i64, from.y as i64);
        let (x1, y1) = (to.x as i64, to.y as i64);
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;

        loop {
            self.plot(x0, y0, ch);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x0 += sx;
            }
            if e2 < dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn draw_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            return;
        }
        let ch = color.to_ascii();
        let (mut min, mut max) = (points[0], points[0]);
        for point in points {
            min = min.inf(point);
            max = max.sup(point);
        }

        let (start_x, start_y) = (min.x.floor().max(0.0) as i64, min.y.floor().max(0.0) as i64);
        let end_x = (max.x.ceil() as i64).min(self.columns as i64);
        let end_y = (max.y.ceil() as i64).min(self.rows as i64);

        for y in start_y..end_y {
            for x in start_x..end_x {
                if contains_point(points, x as f32 + 0.5, y as f32 + 0.5) {
                    self.plot(x, y, ch);
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, position: Vec2, _color: Color) {
        let (x, y) = (position.x as i64, position.y as i64);
        for (offset, ch) in text.chars().enumerate() {
            let column = x + offset as i64;
            if column >= self.columns as i64 {
                break;
            }
            self.plot(column, y, ch);
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.set_viewport(width as usize, height as usize);
    }

    fn present(&mut self) -> RenderResult<()> {
        if self.clear_screen {
            self.writer.write_all(ANSI_CLEAR.as_bytes())?;
        }
        let frame = self.frame();
        self.writer.write_all(frame.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SvgTexture;

    fn renderer(columns: usize, rows: usize) -> ConsoleRenderer<Vec<u8>> {
        ConsoleRenderer::new(columns, rows, Vec::new()).with_clear_screen(false)
    }

    #[test]
    fn test_clear_uses_brightness() {
        let mut console = renderer(4, 2);
        console.clear(Color::WHITE);
        assert_eq!(console.frame(), "@@@@\n@@@@\n");
        console.clear(Color::BLACK);
        assert_eq!(console.frame(), "    \n    \n");
    }

    #[test]
    fn test_rect_is_clipped() {
        let mut console = renderer(5, 3);
        console.draw_rect(Vec2::new(3.0, 1.0), Vec2::new(10.0, 10.0), Color::WHITE);
        assert_eq!(console.frame(), "     \n   @@\n   @@\n");
    }

    #[test]
    fn test_circle_fill() {
        let mut console = renderer(5, 5);
        console.draw_circle(Vec2::new(2.0, 2.0), 1.0, Color::WHITE);
        assert_eq!(console.frame(), "     \n  @  \n @@@ \n  @  \n     \n");
    }

    #[test]
    fn test_bresenham_diagonal() {
        let mut console = renderer(4, 4);
        console.draw_line(Vec2::new(0.0, 0.0), Vec2::new(3.0, 3.0), Color::WHITE);
        for i in 0..4 {
            assert_eq!(console.cell(i, i), Some('@'));
        }
        assert_eq!(console.cell(1, 0), Some(' '));
    }

    #[test]
    fn test_polygon_fill() {
        let mut console = renderer(6, 6);
        let square = [
            Vec2::new(1.0, 1.0),
            Vec2::new(4.0, 1.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(1.0, 4.0),
        ];
        console.draw_polygon(&square, Color::WHITE);
        assert_eq!(console.cell(1, 1), Some('@'));
        assert_eq!(console.cell(3, 3), Some('@'));
        assert_eq!(console.cell(4, 4), Some(' '));
        assert_eq!(console.cell(0, 0), Some(' '));

        console.draw_polygon(&square[..2], Color::BLACK);
        assert_eq!(console.cell(1, 1), Some('@'));
    }

    #[test]
    fn test_text_clipped_at_edge() {
        let mut console = renderer(6, 1);
        console.draw_text("Score: 10", Vec2::new(2.0, 0.0), Color::WHITE);
        assert_eq!(console.frame(), "  Scor\n");
    }

    #[test]
    fn test_texture_placeholder() {
        let mut console = renderer(4, 4);
        let texture = SvgTexture::from_markup("<svg width=\"2\" height=\"1\"></svg>");
        console.draw_texture(&texture, Vec2::new(1.0, 1.0), 1.0);
        assert_eq!(console.frame(), "    \n @@ \n    \n    \n");
    }

    #[test]
    fn test_present_writes_frame() {
        let mut console = ConsoleRenderer::new(2, 1, Vec::new());
        console.clear(Color::WHITE);
        console.present().expect("present");
        let output = String::from_utf8(console.into_writer()).expect("utf8");
        assert_eq!(output, format!("{ANSI_CLEAR}@@\n"));
    }

    #[test]
    fn test_set_viewport_resizes() {
        let mut console = renderer(2, 2);
        console.set_viewport(3, 1);
        assert_eq!(console.viewport(), Viewport::new(3, 1));
        assert_eq!(console.frame(), "   \n");
    }
}
