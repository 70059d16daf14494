//! Scene renderer
//!
//! Draws a [`Scene`] through any [`RenderBackend`]: projects every object,
//! sorts far-to-near, culls footprints outside the viewport and overlays the HUD.

use crate::core::config::ProjectionConfig;
use crate::foundation::math::Vec2;
use crate::scene::{EditorMode, ObjectId, ObjectKind, Scene};

use super::{Color, PerspectiveProjector, RenderBackend, RenderError, RenderResult, ScreenPoint, Viewport};

/// Sizes, colors and overlays used when drawing a scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneStyle {
    /// Frame background
    pub background: Color,
    /// HUD and label color
    pub text_color: Color,
    /// Outline drawn around the selected object
    pub selection_color: Color,
    /// Planet radius before perspective scaling
    pub planet_radius: f32,
    /// Platform half edge before perspective scaling
    pub platform_half_extent: f32,
    /// Crystal half height before perspective scaling
    pub crystal_half_height: f32,
    /// Crystal half width before perspective scaling
    pub crystal_half_width: f32,
    /// Smallest drawn half extent, so distant objects stay visible
    pub min_half_extent: f32,
    /// Draw object names under their shapes
    pub show_labels: bool,
    /// Draw the HUD
    pub show_hud: bool,
    /// Distance between HUD lines
    pub line_height: f32,
    /// Width of one text character, used to center labels
    pub char_width: f32,
    /// HUD inset from the viewport edge
    pub margin: f32,
    /// Control help shown at the bottom of the HUD
    pub help_lines: Vec<String>,
}

impl SceneStyle {
    /// Preset for pixel surfaces (SVG)
    pub fn pixels() -> Self {
        Self {
            background: Color::from_rgb8(0x00, 0x04, 0x28),
            text_color: Color::WHITE,
            selection_color: Color::YELLOW,
            planet_radius: 30.0,
            platform_half_extent: 15.0,
            crystal_half_height: 10.0,
            crystal_half_width: 8.0,
            min_half_extent: 1.0,
            show_labels: true,
            show_hud: true,
            line_height: 25.0,
            char_width: 8.0,
            margin: 10.0,
            help_lines: default_help(),
        }
    }

    /// Preset for character surfaces (console)
    pub fn cells() -> Self {
        Self {
            background: Color::BLACK,
            text_color: Color::WHITE,
            selection_color: Color::WHITE,
            planet_radius: 3.0,
            platform_half_extent: 1.5,
            crystal_half_height: 1.0,
            crystal_half_width: 0.8,
            min_half_extent: 0.5,
            show_labels: false,
            show_hud: true,
            line_height: 1.0,
            char_width: 1.0,
            margin: 0.0,
            help_lines: default_help(),
        }
    }

    /// Disable the HUD (builder style)
    pub fn without_hud(mut self) -> Self {
        self.show_hud = false;
        self
    }

    /// Toggle object labels (builder style)
    pub fn with_labels(mut self, show_labels: bool) -> Self {
        self.show_labels = show_labels;
        self
    }

    /// Replace the control help lines (builder style)
    pub fn with_help(mut self, lines: Vec<String>) -> Self {
        self.help_lines = lines;
        self
    }

    /// Unscaled half extents of an object's footprint
    fn half_extents(&self, kind: ObjectKind) -> Vec2 {
        match kind {
            ObjectKind::Planet => Vec2::new(self.planet_radius, self.planet_radius),
            ObjectKind::Platform => Vec2::new(self.platform_half_extent, self.platform_half_extent),
            ObjectKind::Collectible => Vec2::new(self.crystal_half_width, self.crystal_half_height),
        }
    }
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self::pixels()
    }
}

fn default_help() -> Vec<String> {
    vec![
        "W/A/S/D - Move Camera | Q/C - Up/Down | E - Edit Mode | X - Create Platform".to_string(),
        "Mouse Click - Interact | ESC - Quit | Space - Reset Camera".to_string(),
    ]
}

/// What one render call drew
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Objects drawn
    pub drawn: usize,
    /// Objects skipped because their footprint was off-viewport
    pub culled: usize,
}

/// An object after projection
#[derive(Debug, Clone, Copy)]
pub struct ProjectedObject {
    /// Object handle
    pub id: ObjectId,
    /// Object kind
    pub kind: ObjectKind,
    /// Projected center
    pub point: ScreenPoint,
    /// Scaled half extents of the footprint
    pub half_extents: Vec2,
}

impl ProjectedObject {
    /// Top-left corner of the footprint
    pub fn min(&self) -> Vec2 {
        self.point.position() - self.half_extents
    }

    /// Bottom-right corner of the footprint
    pub fn max(&self) -> Vec2 {
        self.point.position() + self.half_extents
    }

    /// Whether a viewport point lies on the drawn shape
    pub fn contains(&self, point: Vec2) -> bool {
        let offset = point - self.point.position();
        match self.kind {
            ObjectKind::Planet => offset.norm() <= self.half_extents.x,
            ObjectKind::Platform => offset.x.abs() <= self.half_extents.x && offset.y.abs() <= self.half_extents.y,
            ObjectKind::Collectible => {
                offset.x.abs() / self.half_extents.x + offset.y.abs() / self.half_extents.y <= 1.0
            }
        }
    }
}

/// Draws scenes through a backend
#[derive(Debug, Clone)]
pub struct SceneRenderer {
    projection: ProjectionConfig,
    style: SceneStyle,
}

impl SceneRenderer {
    /// Create a renderer
    pub fn new(projection: ProjectionConfig, style: SceneStyle) -> Self {
        Self { projection, style }
    }

    /// Drawing style
    pub fn style(&self) -> &SceneStyle {
        &self.style
    }

    /// Mutable drawing style
    pub fn style_mut(&mut self) -> &mut SceneStyle {
        &mut self.style
    }

    /// Projector centered on `viewport`
    pub fn projector(&self, viewport: Viewport) -> PerspectiveProjector {
        PerspectiveProjector::new(self.projection.clone(), viewport.width as f32, viewport.height as f32)
    }

    /// Project every object, farthest first
    pub fn project_scene(&self, scene: &Scene, viewport: Viewport) -> Vec<ProjectedObject> {
        let projector = self.projector(viewport);
        let camera = scene.camera.position;

        let mut projected: Vec<ProjectedObject> = scene
            .iter()
            .map(|(id, object)| {
                let point = projector.project(&camera, &object.position());
                let half_extents = (self.style.half_extents(object.kind()) * point.scale)
                    .map(|extent| extent.max(self.style.min_half_extent));
                ProjectedObject { id, kind: object.kind(), point, half_extents }
            })
            .collect();

        projected.sort_by(|a, b| b.point.distance.total_cmp(&a.point.distance));
        projected
    }

    /// Nearest object whose drawn footprint contains `point`
    pub fn pick(&self, scene: &Scene, viewport: Viewport, point: Vec2) -> Option<ObjectId> {
        self.project_scene(scene, viewport)
            .into_iter()
            .rev()
            .find(|object| object.contains(point))
            .map(|object| object.id)
    }

    /// Draw one frame of `scene` and present it
    pub fn render<B: RenderBackend + ?Sized>(&self, scene: &Scene, backend: &mut B) -> RenderResult<RenderStats> {
        let viewport = backend.viewport();
        if viewport.width == 0 || viewport.height == 0 {
            return Err(RenderError::InvalidViewport { width: viewport.width, height: viewport.height });
        }

        backend.clear(self.style.background);

        let mut stats = RenderStats::default();
        for projected in self.project_scene(scene, viewport) {
            if !viewport.intersects(projected.min(), projected.max()) {
                stats.culled += 1;
                continue;
            }
            let Some(object) = scene.get(projected.id) else {
                continue;
            };

            self.draw_shape(backend, &projected, object.color());
            if self.style.show_labels {
                let label_y = projected.max().y + self.style.line_height * 0.2;
                let label_x = projected.point.x - object.name().chars().count() as f32 * self.style.char_width / 2.0;
                backend.draw_text(object.name(), Vec2::new(label_x, label_y), self.style.text_color);
            }
            if scene.selected() == Some(projected.id) {
                self.draw_outline(backend, &projected);
            }
            stats.drawn += 1;
        }

        if self.style.show_hud {
            self.draw_hud(scene, backend, viewport);
        }

        backend.present()?;
        log::debug!("Rendered {} objects ({} culled)", stats.drawn, stats.culled);
        Ok(stats)
    }

    fn draw_shape<B: RenderBackend + ?Sized>(&self, backend: &mut B, projected: &ProjectedObject, color: Color) {
        let center = projected.point.position();
        let half = projected.half_extents;
        match projected.kind {
            ObjectKind::Planet => backend.draw_circle(center, half.x, color),
            ObjectKind::Platform => backend.draw_rect(projected.min(), half * 2.0, color),
            ObjectKind::Collectible => {
                let diamond = [
                    Vec2::new(center.x, center.y - half.y),
                    Vec2::new(center.x + half.x, center.y),
                    Vec2::new(center.x, center.y + half.y),
                    Vec2::new(center.x - half.x, center.y),
                ];
                backend.draw_polygon(&diamond, color);
            }
        }
    }

    fn draw_outline<B: RenderBackend + ?Sized>(&self, backend: &mut B, projected: &ProjectedObject) {
        let (min, max) = (projected.min() - Vec2::new(1.0, 1.0), projected.max() + Vec2::new(1.0, 1.0));
        let corners = [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)];
        for i in 0..corners.len() {
            backend.draw_line(corners[i], corners[(i + 1) % corners.len()], self.style.selection_color);
        }
    }

    fn draw_hud<B: RenderBackend + ?Sized>(&self, scene: &Scene, backend: &mut B, viewport: Viewport) {
        let style = &self.style;
        let camera = scene.camera.position;
        let mode = match scene.mode() {
            EditorMode::Edit => "EDIT MODE - Build your game!",
            EditorMode::Play => "PLAY MODE - Explore the universe!",
        };
        let top = [
            "EPOCH OF ELRIA - 3D GAME ENGINE".to_string(),
            mode.to_string(),
            format!("Scene: {} | Objects: {}", scene.name(), scene.len()),
            format!("Camera: ({:.1}, {:.1}, {:.1})", camera.x, camera.y, camera.z),
        ];
        for (row, line) in top.iter().enumerate() {
            let position = Vec2::new(style.margin, style.margin + row as f32 * style.line_height);
            backend.draw_text(line, position, style.text_color);
        }

        let status = match scene.mode() {
            EditorMode::Edit => "Edit Mode: Click to add objects, use commands to modify scene",
            EditorMode::Play => "Play Mode: Explore the 3D world, press E to start building",
        };
        let bottom: Vec<&str> = style.help_lines.iter().map(String::as_str).chain(std::iter::once(status)).collect();
        let first_row = viewport.height as f32 - style.margin - bottom.len() as f32 * style.line_height;
        for (row, line) in bottom.iter().enumerate() {
            let position = Vec2::new(style.margin, first_row + row as f32 * style.line_height);
            backend.draw_text(line, position, style.text_color);
        }
    }
}
