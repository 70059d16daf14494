//! Interactive pickup sandbox
//!
//! The player starts at the center of the play area and steers with WASD or the
//! arrow keys. Pickups within reach of the player's center are collected with a
//! burst of sparks; once the area is cleared a fresh wave is scattered.

use rand::Rng;

use crate::core::config::PlayerConfig;
use crate::foundation::math::{Vec2, VectorExt};
use crate::input::InputManager;
use crate::render::{Color, RenderBackend, RenderResult};

use super::environment::ViewCamera;
use super::particles::ParticleSystem;
use super::player::Player;

const BACKGROUND: Color = Color::rgb(20.0 / 255.0, 30.0 / 255.0, 60.0 / 255.0);
const HUD_MARGIN: f32 = 10.0;
const HUD_LINE: f32 = 20.0;

/// A pickup, positioned by its center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    /// Center in play-area units
    pub position: Vec2,
}

/// Notable things that happened during a sandbox update
#[derive(Debug, Clone, PartialEq)]
pub enum SandboxEvent {
    /// A pickup was collected
    Collected {
        /// Where the pickup was
        position: Vec2,
        /// Score afterwards
        score: u32,
    },
    /// A new wave of pickups was scattered
    Regenerated {
        /// Pickups in the new wave
        count: usize,
    },
}

/// The sandbox game state
pub struct Sandbox {
    config: PlayerConfig,
    area: Vec2,
    player: Player,
    pickups: Vec<Pickup>,
    view: ViewCamera,
    effects: Vec<ParticleSystem>,
}

impl Sandbox {
    /// Create a sandbox over a `width` x `height` play area with a first wave of pickups
    pub fn new<R: Rng + ?Sized>(config: &PlayerConfig, width: u32, height: u32, rng: &mut R) -> Self {
        let area = Vec2::new(width.max(1) as f32, height.max(1) as f32);
        let player = Player::new(area * 0.5, Vec2::new(config.size, config.size), config.speed)
            .with_bounds(area)
            .with_max_health(config.max_health);

        let mut sandbox = Self {
            config: config.clone(),
            area,
            player,
            pickups: Vec::with_capacity(config.pickup_count),
            view: ViewCamera::new(area, area),
            effects: Vec::new(),
        };
        sandbox.scatter(rng);
        sandbox
    }

    /// The player
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable access to the player
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Pickups still in play
    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    /// Replace the pickups in play
    pub fn set_pickups(&mut self, pickups: Vec<Pickup>) {
        self.pickups = pickups;
    }

    /// Play area size
    pub fn area(&self) -> Vec2 {
        self.area
    }

    /// Current score
    pub fn score(&self) -> u32 {
        self.player.score
    }

    /// Sparks from recent pickups
    pub fn effects(&self) -> &[ParticleSystem] {
        &self.effects
    }

    fn scatter<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let width = self.area.x as u32;
        let height = self.area.y as u32;
        self.pickups = (0..self.config.pickup_count)
            .map(|_| Pickup {
                position: Vec2::new(rng.gen_range(0..width) as f32, rng.gen_range(0..height) as f32),
            })
            .collect();
    }

    /// Move the player from held keys, collect pickups in reach, refill an empty area
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        input: &InputManager,
        delta_time: f32,
        rng: &mut R,
    ) -> Vec<SandboxEvent> {
        self.player.apply_input(input, delta_time);
        for effect in &mut self.effects {
            effect.update(delta_time, Vec2::zeros());
        }
        self.effects.retain(|effect| !effect.is_empty());

        let mut events = Vec::new();
        let center = self.player.position;
        let radius = self.config.pickup_radius;
        let mut kept = Vec::with_capacity(self.pickups.len());
        for pickup in self.pickups.drain(..) {
            if center.distance_to(&pickup.position) < radius {
                self.player.collect(self.config.score_per_pickup, self.config.heal_on_collect);
                log::debug!("Pickup collected, score {}", self.player.score);
                self.effects.push(ParticleSystem::collection_effect(pickup.position, rng));
                events.push(SandboxEvent::Collected {
                    position: pickup.position,
                    score: self.player.score,
                });
            } else {
                kept.push(pickup);
            }
        }
        self.pickups = kept;

        if self.pickups.is_empty() {
            self.scatter(rng);
            log::info!("All pickups collected, scattering {} more", self.pickups.len());
            events.push(SandboxEvent::Regenerated {
                count: self.pickups.len(),
            });
        }
        events
    }

    /// HUD lines, top block then help block
    pub fn hud(&self, fps: f32) -> ([String; 4], [&'static str; 2]) {
        let position = self.player.position;
        (
            [
                format!("FPS: {:.1}", fps),
                format!("Score: {}", self.player.score),
                format!("Collectibles: {}", self.pickups.len()),
                format!("Position: ({}, {})", position.x as i32, position.y as i32),
            ],
            ["WASD to move", "Collect yellow squares!"],
        )
    }

    /// Draw the sandbox scaled to the backend's viewport and present it
    pub fn draw<B: RenderBackend + ?Sized>(&self, backend: &mut B, fps: f32) -> RenderResult<()> {
        let viewport = backend.viewport();
        let target = Vec2::new(viewport.width as f32, viewport.height as f32);
        let scale = target.component_div(&self.area);

        backend.clear(BACKGROUND);

        let pickup_size = Vec2::new(self.config.pickup_size, self.config.pickup_size);
        for pickup in &self.pickups {
            let corner = pickup.position - pickup_size * 0.5;
            backend.draw_rect(corner.component_mul(&scale), pickup_size.component_mul(&scale), Color::YELLOW);
        }
        for effect in &self.effects {
            effect.draw(backend, &self.view, scale);
        }

        let player = self.player.centered_bounds();
        backend.draw_rect(
            player.origin.component_mul(&scale),
            player.size.component_mul(&scale),
            Color::WHITE,
        );

        // HUD keeps pixel spacing on large targets and one line per row on small ones
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
