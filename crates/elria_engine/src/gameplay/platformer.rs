//! Side-scrolling collect-them-all level
//!
//! The walker starts at the left end of a world wider than the view. Coins sit
//! on the ground and above each ledge, with a gem on the highest one. The camera
//! follows the walker and every pickup bursts into sparks.

use std::sync::Arc;

use rand::Rng;

use crate::core::config::PlatformerConfig;
use crate::foundation::math::Vec2;
use crate::input::InputManager;
use crate::render::{Color, RenderBackend, RenderResult, SvgTexture};

use super::collectible::Collectible;
use super::environment::{BackgroundLayer, Environment};
use super::walker::Walker;

const SKY: Color = Color::rgb(20.0 / 255.0, 30.0 / 255.0, 60.0 / 255.0);
const GROUND_COINS: [f32; 4] = [500.0, 1100.0, 1400.0, 1700.0];
const ITEM_SIZE: f32 = 20.0;
const ITEM_LIFT: f32 = 40.0;
const HUD_MARGIN: f32 = 10.0;
const HUD_LINE: f32 = 20.0;

/// Notable things that happened during a platformer update
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformerEvent {
    /// An item was picked up
    Collected {
        /// Center of the item
        position: Vec2,
        /// Points it was worth
        value: u32,
        /// Score afterwards
        score: u32,
    },
    /// The walker jumped
    Jumped,
    /// The walker touched down
    Landed,
    /// The last item was collected
    Cleared {
        /// Final score
        score: u32,
    },
}

/// The side-scrolling game state
pub struct Platformer {
    environment: Environment,
    walker: Walker,
    items: Vec<Collectible>,
    score: u32,
    cleared: bool,
}

impl Platformer {
    /// Build level one seen through a `view` sized camera
    pub fn new(config: &PlatformerConfig, view: Vec2) -> Self {
        let world = Vec2::new(config.world_width, config.world_height);
        let mut environment = Environment::new(view, world).with_follow_smoothing(config.follow_smoothing);
        environment.set_wind(Vec2::new(1.0, 0.0), config.wind_strength);
        environment.build_level_one();

        let cloud = SvgTexture::from_markup(SvgTexture::circle(25.0, Color::WHITE, Color::WHITE, 0.0));
        environment.add_layer(
            BackgroundLayer::new(Arc::new(cloud), Vec2::new(0.3, 0.0), true).with_tile_size(Vec2::new(320.0, view.y)),
        );

        let items = Self::place_items(&environment, config);
        let start = Vec2::new(50.0, world.y - 50.0 - config.player_size);
        log::info!("Platformer level ready: {} items across {}x{}", items.len(), world.x, world.y);

        Self {
            environment,
            walker: Walker::new(start, config),
            items,
            score: 0,
            cleared: false,
        }
    }

    fn place_items(environment: &Environment, config: &PlatformerConfig) -> Vec<Collectible> {
        let ground_top = environment.world_size().y - 50.0;
        let ledges: Vec<_> = environment
            .platforms()
            .iter()
            .filter(|platform| platform.bounds.size.x > platform.bounds.size.y && platform.bounds.size.y < 50.0)
            .map(|platform| platform.bounds)
            .collect();
        let highest = ledges.iter().map(|ledge| ledge.origin.y).fold(f32::INFINITY, f32::min);

        let mut items: Vec<Collectible> = ledges
            .iter()
            .map(|ledge| {
                let position = Vec2::new(ledge.center().x - ITEM_SIZE * 0.5, ledge.origin.y - ITEM_LIFT);
                let value = if ledge.origin.y == highest { config.gem_value } else { config.coin_value };
                Collectible::with_size(position, ITEM_SIZE, value)
            })
            .collect();
        items.extend(
            GROUND_COINS
                .iter()
                .filter(|&&x| x + ITEM_SIZE <= environment.world_size().x)
                .map(|&x| Collectible::with_size(Vec2::new(x, ground_top - ITEM_LIFT), ITEM_SIZE, config.coin_value)),
        );
        items
    }

    /// The walker
    pub fn walker(&self) -> &Walker {
        &self.walker
    }

    /// Mutable access to the walker
    pub fn walker_mut(&mut self) -> &mut Walker {
        &mut self.walker
    }

    /// Platforms, camera and effects
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Every item, collected or not
    pub fn items(&self) -> &[Collectible] {
        &self.items
    }

    /// Replace the items and reopen the level
    pub fn set_items(&mut self, items: Vec<Collectible>) {
        self.items = items;
        self.cleared = false;
    }

    /// Items not yet collected
    pub fn remaining(&self) -> usize {
        self.items.iter().filter(|item| !item.collected).count()
    }

    /// Current score
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Whether every item has been collected
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// Step the walker, collect touched items and advance camera and effects
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        input: &InputManager,
        delta_time: f32,
        rng: &mut R,
    ) -> Vec<PlatformerEvent> {
        let mut events = Vec::new();
        let outcome = self.walker.step(input, delta_time, &self.environment);
        if outcome.jumped {
            events.push(PlatformerEvent::Jumped);
        }
        if outcome.landed {
            events.push(PlatformerEvent::Landed);
        }

        let body = self.walker.bounds();
        for item in self.items.iter_mut().filter(|item| !item.collected) {
            if body.overlaps(&item.bounds) {
                item.collected = true;
                self.score = self.score.saturating_add(item.value);
                let center = item.bounds.center();
                log::info!(
                    "Collected item worth {} at ({}, {})! Score: {}",
                    item.value,
                    center.x as i32,
                    center.y as i32,
                    self.score
                );
                self.environment.spawn_collection_effect(center, rng);
                events.push(PlatformerEvent::Collected {
                    position: center,
                    value: item.value,
                    score: self.score,
                });
            }
        }

        if !self.cleared && !self.items.is_empty() && self.remaining() == 0 {
            self.cleared = true;
            log::info!("Level cleared with {} points", self.score);
            self.environment.spawn_explosion_effect(self.walker.center(), rng);
            events.push(PlatformerEvent::Cleared { score: self.score });
        }

        self.environment.update(delta_time, self.walker.center());
        events
    }

    /// HUD lines, top block then help block
    pub fn hud(&self, fps: f32) -> ([String; 4], [&'static str; 2]) {
        let position = self.walker.position;
        (
            [
                format!("FPS: {:.1}", fps),
                format!("Score: {}", self.score),
                format!("Items: {}/{}", self.items.len() - self.remaining(), self.items.len()),
                format!("Position: ({}, {})", position.x as i32, position.y as i32),
            ],
            ["A/D to walk, W or Space to jump", "Collect every coin and the gem!"],
        )
    }

    /// Draw the view scaled to the backend's viewport and present it
    pub fn draw<B: RenderBackend + ?Sized>(&self, backend: &mut B, fps: f32) -> RenderResult<()> {
        let viewport = backend.viewport();
        let target = Vec2::new(viewport.width as f32, viewport.height as f32);
        let camera = self.environment.camera();
        let scale = target.component_div(&camera.size());

        backend.clear(SKY);
        self.environment.draw(backend, scale);

        for item in self.items.iter().filter(|item| !item.collected) {
            if camera.is_in_view(item.bounds.origin, item.bounds.size) {
                let color = if item.value > Collectible::DEFAULT_VALUE { Color::BLUE } else { Color::GOLD };
                let screen = camera.world_to_screen(item.bounds.origin);
                backend.draw_rect(screen.component_mul(&scale), item.bounds.size.component_mul(&scale), color);
            }
        }

        let body = self.walker.bounds();
        let screen = camera.world_to_screen(body.origin);
        backend.draw_rect(screen.component_mul(&scale), body.size.component_mul(&scale), Color::WHITE);

        let line = (HUD_LINE * scale.y).max(1.0);
        let margin = HUD_MARGIN * scale.x;
        let top = HUD_MARGIN * scale.y;
        let (status, help) = self.hud(fps);
        for (i, text) in status.iter().enumerate() {
            backend.draw_text(text, Vec2::new(margin, top + line * i as f32), Color::WHITE);
        }
        for (i, text) in help.iter().enumerate() {
            let y = target.y - line * (help.len() - i) as f32;
            backend.draw_text(text, Vec2::new(margin, y), Color::WHITE);
        }

        backend.present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use crate::render::{ConsoleRenderer, SvgRenderer};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const STEP: f32 = 1.0 / 60.0;

    fn level() -> (Platformer, StdRng) {
        let game = Platformer::new(&PlatformerConfig::default(), Vec2::new(800.0, 600.0));
        (game, StdRng::seed_from_u64(21))
    }

    #[test]
    fn test_level_layout() {
        let (game, _) = level();
        assert_eq!(game.items().len(), 8);
        assert_eq!(game.remaining(), 8);
        let gems: Vec<_> = game.items().iter().filter(|item| item.value == 25).collect();
        assert_eq!(gems.len(), 1);
        // Above the highest ledge at (800, 300)
        assert_eq!(gems[0].position(), Vec2::new(865.0, 260.0));
        assert_eq!(game.walker().position, Vec2::new(50.0, 500.0));
        assert!(game.walker().is_on_ground());
    }

    #[test]
    fn test_touching_a_coin_collects_it() {
        let (mut game, mut rng) = level();
        game.walker_mut().position = Vec2::new(480.0, 500.0);
        let events = game.update(&InputManager::new(), STEP, &mut rng);

        assert_eq!(
            events,
            vec![PlatformerEvent::Collected { position: Vec2::new(510.0, 520.0), value: 10, score: 10 }]
        );
        assert_eq!(game.remaining(), 7);
        assert_eq!(game.environment().effects().len(), 1);
        assert_eq!(game.environment().effects()[0].len(), 15);
    }

    #[test]
    fn test_last_item_clears_once() {
        let (mut game, mut rng) = level();
        game.set_items(vec![Collectible::with_size(Vec2::new(1000.0, 510.0), 20.0, 10)]);
        game.walker_mut().position = Vec2::new(990.0, 500.0);

        let events = game.update(&InputManager::new(), STEP, &mut rng);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], PlatformerEvent::Cleared { score: 10 });
        assert!(game.is_cleared());
        assert_eq!(game.environment().effects().len(), 2);

        let events = game.update(&InputManager::new(), STEP, &mut rng);
        assert!(events.is_empty());
    }

    #[test]
    fn test_jump_and_land_events() {
        let (mut game, mut rng) = level();
        let mut input = InputManager::new();
        input.handle_key_input(KeyCode::Space, true);
        let events = game.update(&input, STEP, &mut rng);
        assert_eq!(events, vec![PlatformerEvent::Jumped]);

        let idle = InputManager::new();
        let landed = (0..150)
            .flat_map(|_| game.update(&idle, STEP, &mut rng))
            .filter(|event| *event == PlatformerEvent::Landed)
            .count();
        assert_eq!(landed, 1);
    }

    #[test]
    fn test_camera_follows_walker() {
        let (mut game, mut rng) = level();
        assert_eq!(game.environment().camera().position(), Vec2::zeros());
        game.walker_mut().position = Vec2::new(1500.0, 500.0);
        for _ in 0..100 {
            game.update(&InputManager::new(), STEP, &mut rng);
        }
        let camera = game.environment().camera().position();
        assert!(camera.x > 1000.0 && camera.x <= 1125.0, "camera at {}", camera.x);
        assert_eq!(camera.y, 0.0);
    }

    #[test]
    fn test_draw_to_svg() {
        let (mut game, _) = level();
        game.set_items(vec![Collectible::with_size(Vec2::new(100.0, 510.0), 20.0, 10)]);
        let mut svg = SvgRenderer::new(800, 600);
        game.draw(&mut svg, 60.0).expect("draw");
        let body = svg.body();
        assert!(body.contains("<rect x=\"0\" y=\"550\" width=\"2000\" height=\"50\" fill=\"#00FF00\"/>"));
        assert!(body.contains("<rect x=\"100\" y=\"510\" width=\"20\" height=\"20\" fill=\"gold\"/>"));
        assert!(body.contains("<rect x=\"50\" y=\"500\" width=\"50\" height=\"50\" fill=\"white\"/>"));
        assert!(body.contains("Items: 0/1"));
    }

    #[test]
    fn test_draw_to_console() {
        let (game, _) = level();
        let mut console = ConsoleRenderer::new(80, 24, Vec::new()).with_clear_screen(false);
        game.draw(&mut console, 30.0).expect("draw");
        let frame = console.frame();
        let lines: Vec<&str> = frame.lines().collect();
        assert!(lines[1].contains("Score: 0"));
        assert!(lines[23].contains("Collect every coin and the gem!"));
    }
}
