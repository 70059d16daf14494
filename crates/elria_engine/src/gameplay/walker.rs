//! Side-view player that walks, jumps and falls onto platforms

use crate::core::config::PlatformerConfig;
use crate::foundation::math::Vec2;
use crate::input::{InputManager, KeyCode};

use super::collision::Bounds2D;
use super::environment::Environment;

const LEFT_KEYS: [KeyCode; 2] = [KeyCode::A, KeyCode::Left];
const RIGHT_KEYS: [KeyCode; 2] = [KeyCode::D, KeyCode::Right];
const JUMP_KEYS: [KeyCode; 3] = [KeyCode::W, KeyCode::Up, KeyCode::Space];

// Corrections applied per step, enough for a corner touching two platforms
const MAX_CORRECTIONS: usize = 4;

/// What changed during one [`Walker::step`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Left the ground by jumping
    pub jumped: bool,
    /// Touched down after being airborne
    pub landed: bool,
}

/// A gravity-bound player; `position` is the top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct Walker {
    /// Top-left corner in world space
    pub position: Vec2,
    /// Velocity in pixels per second
    pub velocity: Vec2,
    /// Width and height
    pub size: Vec2,
    /// Horizontal speed while a direction is held
    pub walk_speed: f32,
    /// Upward speed at the start of a jump
    pub jump_power: f32,
    /// Downward acceleration
    pub gravity: f32,
    on_ground: bool,
}

impl Walker {
    /// Create a walker standing at `position`
    pub fn new(position: Vec2, config: &PlatformerConfig) -> Self {
        Self {
            position,
            velocity: Vec2::zeros(),
            size: Vec2::new(config.player_size, config.player_size),
            walk_speed: config.walk_speed,
            jump_power: config.jump_power,
            gravity: config.gravity,
            on_ground: true,
        }
    }

    /// Whether the walker is standing on something
    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    /// Footprint in world space
    pub fn bounds(&self) -> Bounds2D {
        Bounds2D::new(self.position, self.size)
    }

    /// Center of the footprint
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Start a jump if standing; returns whether it happened
    pub fn jump(&mut self) -> bool {
        if !self.on_ground {
            return false;
        }
        self.velocity.y = -self.jump_power;
        self.on_ground = false;
        true
    }

    /// Walk from held keys, apply gravity, move and resolve platform contacts
    ///
    /// The walker is kept inside the world; the world floor counts as ground.
    pub fn step(&mut self, input: &InputManager, delta_time: f32, environment: &Environment) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        if delta_time <= 0.0 {
            return outcome;
        }
        let was_on_ground = self.on_ground;

        let mut direction = 0.0;
        if input.any_held(&LEFT_KEYS) {
            direction -= 1.0;
        }
        if input.any_held(&RIGHT_KEYS) {
            direction += 1.0;
        }
        self.velocity.x = direction * self.walk_speed;
        if input.any_held(&JUMP_KEYS) {
            outcome.jumped = self.jump();
        }

        self.velocity.y += self.gravity * delta_time;
        self.position += self.velocity * delta_time;
        self.on_ground = false;

        for _ in 0..MAX_CORRECTIONS {
            let Some(correction) = environment.platform_correction(&self.bounds()) else {
                break;
            };
            self.position += correction;
            if correction.y < 0.0 {
                self.on_ground = true;
                self.velocity.y = self.velocity.y.min(0.0);
            } else if correction.y > 0.0 {
                // Head hit the underside
                self.velocity.y = self.velocity.y.max(0.0);
            }
            if correction.x != 0.0 {
                self.velocity.x = 0.0;
            }
        }

        let world = environment.world_size();
        let limit = (world - self.size).map(|extent| extent.max(0.0));
        self.position.x = self.position.x.clamp(0.0, limit.x);
        if self.position.y >= limit.y {
            self.position.y = limit.y;
            self.velocity.y = self.velocity.y.min(0.0);
            self.on_ground = true;
        }
        self.position.y = self.position.y.max(0.0);

        if self.on_ground {
            self.velocity.y = 0.0;
        }
        outcome.landed = self.on_ground && !was_on_ground;
        outcome
    }
}
