//! Side-scrolling world: follow camera, parallax layers, platforms and effects
//!
//! World coordinates are pixels with y growing downward. The [`ViewCamera`]
//! maps them to view coordinates; drawing then scales the view to whatever
//! backend it is given.

use std::sync::Arc;

use rand::Rng;

use crate::foundation::math::{Vec2, VectorExt};
use crate::render::{Color, RenderBackend, SvgTexture};

use super::collision::Bounds2D;
use super::particles::ParticleSystem;

/// A 2D camera clamped to the world
#[derive(Debug, Clone, PartialEq)]
pub struct ViewCamera {
    position: Vec2,
    size: Vec2,
    world: Vec2,
}

impl ViewCamera {
    /// Camera of `view` size at the world origin
    pub fn new(view: Vec2, world: Vec2) -> Self {
        Self {
            position: Vec2::zeros(),
            size: view,
            world,
        }
    }

    /// Top-left corner of the view in world space
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// View size
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Place the view, clamped so it stays inside the world
    ///
    /// A world smaller than the view pins that axis to 0.
    pub fn set_position(&mut self, position: Vec2) {
        let limit = (self.world - self.size).map(|extent| extent.max(0.0));
        self.position = Vec2::new(position.x.clamp(0.0, limit.x), position.y.clamp(0.0, limit.y));
    }

    /// Shift the view by `offset`
    pub fn move_by(&mut self, offset: Vec2) {
        self.set_position(self.position + offset);
    }

    /// Ease toward centering `target`, covering `smoothing` of the distance
    pub fn follow(&mut self, target: Vec2, smoothing: f32) {
        let desired = target - self.size * 0.5;
        self.set_position(self.position + (desired - self.position) * smoothing);
    }

    /// World to view coordinates
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.position
    }

    /// View to world coordinates
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.position
    }

    /// Whether a box at `world` of `size` touches the view
    pub fn is_in_view(&self, world: Vec2, size: Vec2) -> bool {
        let screen = self.world_to_screen(world);
        !(screen.x + size.x < 0.0 || screen.x > self.size.x || screen.y + size.y < 0.0 || screen.y > self.size.y)
    }
}

/// A rectangle the player can stand on
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    /// Footprint in world space
    pub bounds: Bounds2D,
    /// Fill color
    pub color: Color,
    /// Non-solid platforms are drawn but never collide
    pub solid: bool,
}

impl Platform {
    /// A solid platform
    pub fn new(origin: Vec2, size: Vec2, color: Color) -> Self {
        Self {
            bounds: Bounds2D::new(origin, size),
            color,
            solid: true,
        }
    }

    /// Mark as decoration only (builder style)
    pub fn decorative(mut self) -> Self {
        self.solid = false;
        self
    }
}

/// A tiled texture that scrolls at a fraction of the camera speed
#[derive(Debug, Clone)]
pub struct BackgroundLayer {
    texture: Arc<SvgTexture>,
    scroll: Vec2,
    offset: Vec2,
    tile: Vec2,
    repeating: bool,
}

impl BackgroundLayer {
    /// Layer scrolling at `scroll` times the camera motion, tiled at the texture size
    pub fn new(texture: Arc<SvgTexture>, scroll: Vec2, repeating: bool) -> Self {
        let size = texture.size();
        let tile = if size.x > 0.0 && size.y > 0.0 { size } else { Vec2::new(800.0, 600.0) };
        Self {
            texture,
            scroll,
            offset: Vec2::zeros(),
            tile,
            repeating,
        }
    }

    /// Space tiles `tile` apart (builder style)
    pub fn with_tile_size(mut self, tile: Vec2) -> Self {
        if tile.x > 0.0 && tile.y > 0.0 {
            self.tile = tile;
        }
        self
    }

    /// Change the scroll factor
    pub fn set_scroll(&mut self, scroll: Vec2) {
        self.scroll = scroll;
    }

    /// Current view offset of the first tile
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Follow the camera; repeating layers wrap into `(-tile, 0]`
    pub fn update(&mut self, camera: &ViewCamera) {
        self.offset = -camera.position().component_mul(&self.scroll);
        if self.repeating {
            self.offset.x = wrap_tile(self.offset.x, self.tile.x);
            self.offset.y = wrap_tile(self.offset.y, self.tile.y);
        }
    }

    /// Draw enough tiles to cover the view
    pub fn draw<B: RenderBackend + ?Sized>(&self, backend: &mut B, camera: &ViewCamera, scale: Vec2) {
        if !self.repeating {
            backend.draw_texture(&self.texture, self.offset.component_mul(&scale), scale.x);
            return;
        }
        let view = camera.size();
        let columns = (view.x / self.tile.x).ceil() as i32 + 2;
        let rows = (view.y / self.tile.y).ceil() as i32 + 2;
        for row in -1..rows {
            for column in -1..columns {
                let tile = self.offset + Vec2::new(column as f32 * self.tile.x, row as f32 * self.tile.y);
                if tile.x < view.x && tile.y < view.y && tile.x + self.tile.x > 0.0 && tile.y + self.tile.y > 0.0 {
                    backend.draw_texture(&self.texture, tile.component_mul(&scale), scale.x);
                }
            }
        }
    }
}

fn wrap_tile(offset: f32, tile: f32) -> f32 {
    let wrapped = offset.rem_euclid(tile);
    if wrapped == 0.0 {
        0.0
    } else {
        wrapped - tile
    }
}

/// Platforms, parallax layers and particle effects around a follow camera
#[derive(Debug, Clone)]
pub struct Environment {
    camera: ViewCamera,
    world: Vec2,
    layers: Vec<BackgroundLayer>,
    platforms: Vec<Platform>,
    effects: Vec<ParticleSystem>,
    wind_direction: Vec2,
    wind_strength: f32,
    smoothing: f32,
}

impl Environment {
    /// Empty world of `world` size seen through a `view` sized camera
    pub fn new(view: Vec2, world: Vec2) -> Self {
        Self {
            camera: ViewCamera::new(view, world),
            world,
            layers: Vec::new(),
            platforms: Vec::new(),
            effects: Vec::new(),
            wind_direction: Vec2::new(1.0, 0.0),
            wind_strength: 0.0,
            smoothing: 0.1,
        }
    }

    /// Camera easing per update (builder style)
    pub fn with_follow_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// The camera
    pub fn camera(&self) -> &ViewCamera {
        &self.camera
    }

    /// Mutable camera access
    pub fn camera_mut(&mut self) -> &mut ViewCamera {
        &mut self.camera
    }

    /// World size
    pub fn world_size(&self) -> Vec2 {
        self.world
    }

    /// Add a parallax layer; layers draw in insertion order
    pub fn add_layer(&mut self, layer: BackgroundLayer) {
        self.layers.push(layer);
    }

    /// Background layers
    pub fn layers(&self) -> &[BackgroundLayer] {
        &self.layers
    }

    /// Add a platform
    pub fn add_platform(&mut self, platform: Platform) {
        self.platforms.push(platform);
    }

    /// All platforms
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// First level: a full-width ground, four floating ledges and two side walls
    pub fn build_level_one(&mut self) {
        let (width, height) = (self.world.x, self.world.y);
        self.add_platform(Platform::new(Vec2::new(0.0, height - 50.0), Vec2::new(width, 50.0), Color::GREEN));
        for (x, rise) in [(200.0, 150.0), (400.0, 250.0), (600.0, 180.0), (800.0, 300.0)] {
            self.add_platform(Platform::new(Vec2::new(x, height - rise), Vec2::new(150.0, 20.0), Color::GREEN));
        }
        self.add_platform(Platform::new(Vec2::new(-10.0, 0.0), Vec2::new(10.0, height), Color::RED));
        self.add_platform(Platform::new(Vec2::new(width, 0.0), Vec2::new(10.0, height), Color::RED));
    }

    /// Start a particle effect
    pub fn add_effect(&mut self, effect: ParticleSystem) {
        self.effects.push(effect);
    }

    /// Burst of yellow sparks at `position`
    pub fn spawn_collection_effect<R: Rng + ?Sized>(&mut self, position: Vec2, rng: &mut R) {
        self.add_effect(ParticleSystem::collection_effect(position, rng));
    }

    /// Orange and red blast at `position`
    pub fn spawn_explosion_effect<R: Rng + ?Sized>(&mut self, position: Vec2, rng: &mut R) {
        self.add_effect(ParticleSystem::explosion_effect(position, rng));
    }

    /// Live particle effects
    pub fn effects(&self) -> &[ParticleSystem] {
        &self.effects
    }

    /// Set the wind that pushes particles; the direction is normalized
    pub fn set_wind(&mut self, direction: Vec2, strength: f32) {
        self.wind_direction = direction.normalize_or_zero();
        self.wind_strength = strength;
    }

    /// Acceleration the wind applies
    pub fn wind(&self) -> Vec2 {
        self.wind_direction * self.wind_strength
    }

    /// Follow `target`, scroll the layers and age the effects
    ///
    /// Effects with no particles left are removed.
    pub fn update(&mut self, delta_time: f32, target: Vec2) {
        self.camera.follow(target, self.smoothing);
        for layer in &mut self.layers {
            layer.update(&self.camera);
        }
        let wind = self.wind();
        for effect in &mut self.effects {
            effect.update(delta_time, wind);
        }
        self.effects.retain(|effect| !effect.is_empty());
    }

    /// Draw layers, visible platforms and effects, scaling the view to `scale`
    pub fn draw<B: RenderBackend + ?Sized>(&self, backend: &mut B, scale: Vec2) {
        for layer in &self.layers {
            layer.draw(backend, &self.camera, scale);
        }
        for platform in &self.platforms {
            if self.camera.is_in_view(platform.bounds.origin, platform.bounds.size) {
                let screen = self.camera.world_to_screen(platform.bounds.origin);
                backend.draw_rect(
                    screen.component_mul(&scale),
                    platform.bounds.size.component_mul(&scale),
                    platform.color,
                );
            }
        }
        for effect in &self.effects {
            effect.draw(backend, &self.camera, scale);
        }
    }

    /// Offset that pushes `bounds` out of the first solid platform it overlaps
    ///
    /// The push is along the axis of least overlap. `None` means no contact.
    pub fn platform_correction(&self, bounds: &Bounds2D) -> Option<Vec2> {
        let platform = self
            .platforms
            .iter()
            .find(|platform| platform.solid && platform.bounds.overlaps(bounds))?;

        let platform_center = platform.bounds.center();
        let center = bounds.center();
        let gap = center - platform_center;
        let overlap = (bounds.size + platform.bounds.size) * 0.5 - gap.abs();

        let correction = if overlap.x < overlap.y {
            Vec2::new(if gap.x > 0.0 { overlap.x } else { -overlap.x }, 0.0)
        } else {
            Vec2::new(0.0, if gap.y > 0.0 { overlap.y } else { -overlap.y })
        };
        Some(correction)
    }

    /// Platforms whose center lies within `radius` of `position`
    pub fn nearby_platforms(&self, position: Vec2, radius: f32) -> impl Iterator<Item = &Platform> + '_ {
        self.platforms
            .iter()
            .filter(move |platform| position.distance_to(&platform.bounds.center()) <= radius)
    }

    /// Whether `position` lies inside the world, edges included
    pub fn is_in_world_bounds(&self, position: Vec2) -> bool {
        position.x >= 0.0 && position.x <= self.world.x && position.y >= 0.0 && position.y <= self.world.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn camera() -> ViewCamera {
        ViewCamera::new(Vec2::new(800.0, 600.0), Vec2::new(2000.0, 600.0))
    }

    #[test]
    fn test_camera_clamps_to_world() {
        let mut camera = camera();
        camera.set_position(Vec2::new(5000.0, 40.0));
        assert_eq!(camera.position(), Vec2::new(1200.0, 0.0));
        camera.move_by(Vec2::new(-2000.0, 0.0));
        assert_eq!(camera.position(), Vec2::zeros());
    }

    #[test]
    fn test_camera_follow_eases_toward_target() {
        let mut camera = camera();
        camera.follow(Vec2::new(1400.0, 300.0), 0.1);
        assert_relative_eq!(camera.position().x, 100.0);
        camera.follow(Vec2::new(1400.0, 300.0), 1.0);
        assert_relative_eq!(camera.position().x, 1000.0);
        assert_eq!(camera.world_to_screen(Vec2::new(1400.0, 300.0)), Vec2::new(400.0, 300.0));
        assert_eq!(camera.screen_to_world(Vec2::new(400.0, 300.0)), Vec2::new(1400.0, 300.0));
    }

    #[test]
    fn test_camera_view_test() {
        let mut camera = camera();
        camera.set_position(Vec2::new(500.0, 0.0));
        assert!(camera.is_in_view(Vec2::new(480.0, 10.0), Vec2::new(20.0, 20.0)));
        assert!(!camera.is_in_view(Vec2::new(470.0, 10.0), Vec2::new(20.0, 20.0)));
        assert!(camera.is_in_view(Vec2::new(1300.0, 600.0), Vec2::new(5.0, 5.0)));
        assert!(!camera.is_in_view(Vec2::new(1301.0, 10.0), Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_layer_wraps_offset() {
        let markup = SvgTexture::rectangle(100.0, 50.0, Color::WHITE, Color::WHITE, 0.0);
        let texture = Arc::new(SvgTexture::from_markup(markup));
        assert_eq!(texture.size(), Vec2::new(100.0, 50.0));
        let mut layer = BackgroundLayer::new(texture, Vec2::new(0.5, 0.5), true);
        let mut camera = camera();
        layer.update(&camera);
        assert_eq!(layer.offset(), Vec2::zeros());

        camera.set_position(Vec2::new(250.0, 0.0));
        layer.update(&camera);
        assert_relative_eq!(layer.offset().x, -25.0);
    }

    #[test]
    fn test_ground_contact_pushes_up() {
        let mut environment = Environment::new(Vec2::new(800.0, 600.0), Vec2::new(2000.0, 600.0));
        environment.build_level_one();
        assert_eq!(environment.platforms().len(), 7);

        // Sinking 4px into the ground
        let feet = Bounds2D::new(Vec2::new(1000.0, 504.0), Vec2::new(50.0, 50.0));
        let correction = environment.platform_correction(&feet).expect("contact");
        assert_relative_eq!(correction.y, -4.0);
        assert_relative_eq!(correction.x, 0.0);

        let standing = Bounds2D::new(Vec2::new(1000.0, 500.0), Vec2::new(50.0, 50.0));
        assert_eq!(environment.platform_correction(&standing), None);
    }

    #[test]
    fn test_side_contact_pushes_sideways() {
        let mut environment = Environment::new(Vec2::new(800.0, 600.0), Vec2::new(2000.0, 600.0));
        environment.add_platform(Platform::new(Vec2::new(100.0, 100.0), Vec2::new(20.0, 200.0), Color::RED));
        let body = Bounds2D::new(Vec2::new(117.0, 150.0), Vec2::new(50.0, 50.0));
        let correction = environment.platform_correction(&body).expect("contact");
        assert_relative_eq!(correction.x, 3.0);
        assert_relative_eq!(correction.y, 0.0);
    }

    #[test]
    fn test_decorative_platform_never_collides() {
        let mut environment = Environment::new(Vec2::new(800.0, 600.0), Vec2::new(2000.0, 600.0));
        environment.add_platform(Platform::new(Vec2::zeros(), Vec2::new(100.0, 100.0), Color::GREEN).decorative());
        let body = Bounds2D::new(Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0));
        assert_eq!(environment.platform_correction(&body), None);
    }

    #[test]
    fn test_world_bounds_and_nearby() {
        let mut environment = Environment::new(Vec2::new(800.0, 600.0), Vec2::new(2000.0, 600.0));
        environment.build_level_one();
        assert!(environment.is_in_world_bounds(Vec2::new(2000.0, 600.0)));
        assert!(!environment.is_in_world_bounds(Vec2::new(-1.0, 10.0)));

        let near: Vec<_> = environment.nearby_platforms(Vec2::new(275.0, 460.0), 10.0).collect();
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].bounds.origin, Vec2::new(200.0, 450.0));
    }

    #[test]
    fn test_update_drops_finished_effects() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut environment = Environment::new(Vec2::new(800.0, 600.0), Vec2::new(2000.0, 600.0));
        environment.spawn_collection_effect(Vec2::new(100.0, 100.0), &mut rng);
        environment.spawn_explosion_effect(Vec2::new(300.0, 100.0), &mut rng);
        environment.update(1.1, Vec2::zeros());
        assert_eq!(environment.effects().len(), 1);
        environment.update(0.5, Vec2::zeros());
        assert!(environment.effects().is_empty());
    }

    #[test]
    fn test_wind_is_normalized() {
        let mut environment = Environment::new(Vec2::new(800.0, 600.0), Vec2::new(2000.0, 600.0));
        assert_eq!(environment.wind(), Vec2::zeros());
        environment.set_wind(Vec2::new(3.0, 4.0), 10.0);
        assert_relative_eq!(environment.wind().x, 6.0);
        assert_relative_eq!(environment.wind().y, 8.0);
    }
}
