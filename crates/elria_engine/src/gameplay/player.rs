//! Player-controlled square

use crate::foundation::math::Vec2;
use crate::input::{InputManager, KeyCode};

use super::collision::Bounds2D;

const UP_KEYS: [KeyCode; 2] = [KeyCode::W, KeyCode::Up];
const DOWN_KEYS: [KeyCode; 2] = [KeyCode::S, KeyCode::Down];
const LEFT_KEYS: [KeyCode; 2] = [KeyCode::A, KeyCode::Left];
const RIGHT_KEYS: [KeyCode; 2] = [KeyCode::D, KeyCode::Right];

/// The player's avatar
///
/// `position` is the anchor point: the top-left corner for [`bounds`](Self::bounds)
/// and the center for [`centered_bounds`](Self::centered_bounds).
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Anchor point in canvas units
    pub position: Vec2,
    /// Velocity in units per second
    pub velocity: Vec2,
    /// Width and height
    pub size: Vec2,
    /// Current health
    pub health: u32,
    /// Health ceiling for healing
    pub max_health: u32,
    /// Accumulated points
    pub score: u32,
    /// Movement speed applied per held direction
    pub speed: f32,
    /// Position limit; movement is clamped to `[0, bounds]` when set
    pub bounds: Option<Vec2>,
}

impl Player {
    /// Default starting health
    pub const DEFAULT_HEALTH: u32 = 100;

    /// Create a player at `position` with the given size and speed
    pub fn new(position: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            position,
            velocity: Vec2::zeros(),
            size,
            health: Self::DEFAULT_HEALTH,
            max_health: Self::DEFAULT_HEALTH,
            score: 0,
            speed,
            bounds: None,
        }
    }

    /// Clamp movement to `[0, limit]` (builder style)
    pub fn with_bounds(mut self, limit: Vec2) -> Self {
        self.bounds = Some(limit);
        self
    }

    /// Set the health ceiling and refill (builder style)
    pub fn with_max_health(mut self, max_health: u32) -> Self {
        self.max_health = max_health;
        self.health = max_health;
        self
    }

    /// Replace the velocity
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Recompute velocity from held keys, then move
    ///
    /// Velocity starts from zero every call, so releasing all keys stops the player.
    pub fn apply_input(&mut self, input: &InputManager, delta_time: f32) {
        let mut velocity = Vec2::zeros();
        if input.any_held(&UP_KEYS) {
            velocity.y -= self.speed;
        }
        if input.any_held(&DOWN_KEYS) {
            velocity.y += self.speed;
        }
        if input.any_held(&LEFT_KEYS) {
            velocity.x -= self.speed;
        }
        if input.any_held(&RIGHT_KEYS) {
            velocity.x += self.speed;
        }
        self.velocity = velocity;
        self.integrate(delta_time);
    }

    /// Move by `velocity * delta_time`, clamping to the bounds if any
    pub fn integrate(&mut self, delta_time: f32) {
        self.position += self.velocity * delta_time;
        if let Some(limit) = self.bounds {
            self.position.x = self.position.x.clamp(0.0, limit.x);
            self.position.y = self.position.y.clamp(0.0, limit.y);
        }
    }

    /// Award `value` points and heal by `heal`, capped at max health
    pub fn collect(&mut self, value: u32, heal: u32) {
        self.score = self.score.saturating_add(value);
        self.health = self.health.saturating_add(heal).min(self.max_health);
    }

    /// Footprint with `position` as the top-left corner
    pub fn bounds(&self) -> Bounds2D {
        Bounds2D::new(self.position, self.size)
    }

    /// Footprint centered on `position`
    pub fn centered_bounds(&self) -> Bounds2D {
        Bounds2D::new(self.position - self.size * 0.5, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sandbox_player() -> Player {
        Player::new(Vec2::new(400.0, 300.0), Vec2::new(30.0, 30.0), 300.0)
            .with_bounds(Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_held_keys_drive_velocity() {
        let mut player = sandbox_player();
        let mut input = InputManager::new();
        input.handle_key_input(KeyCode::D, true);
        input.handle_key_input(KeyCode::Up, true);

        player.apply_input(&input, 0.1);
        assert_relative_eq!(player.velocity.x, 300.0);
        assert_relative_eq!(player.velocity.y, -300.0);
        assert_relative_eq!(player.position.x, 430.0, epsilon = 1e-3);
        assert_relative_eq!(player.position.y, 270.0, epsilon = 1e-3);
    }

    #[test]
    fn test_releasing_keys_stops_player() {
        let mut player = sandbox_player();
        let mut input = InputManager::new();
        input.handle_key_input(KeyCode::A, true);
        player.apply_input(&input, 0.1);

        input.handle_key_input(KeyCode::A, false);
        let before = player.position;
        player.apply_input(&input, 0.1);
        assert_eq!(player.velocity, Vec2::zeros());
        assert_eq!(player.position, before);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut player = sandbox_player();
        let mut input = InputManager::new();
        input.handle_key_input(KeyCode::W, true);
        input.handle_key_input(KeyCode::S, true);
        player.apply_input(&input, 1.0);
        assert_relative_eq!(player.velocity.y, 0.0);
    }

    #[test]
    fn test_position_is_clamped() {
        let mut player = sandbox_player();
        player.set_velocity(Vec2::new(-10_000.0, 10_000.0));
        player.integrate(1.0);
        assert_eq!(player.position, Vec2::new(0.0, 600.0));
    }

    #[test]
    fn test_collect_caps_health() {
        let mut player = sandbox_player();
        player.health = 97;
        player.collect(10, 5);
        assert_eq!(player.score, 10);
        assert_eq!(player.health, 100);
    }

    #[test]
    fn test_bounds_anchors() {
        let player = sandbox_player();
        assert_eq!(player.bounds().origin, Vec2::new(400.0, 300.0));
        assert_eq!(player.centered_bounds().origin, Vec2::new(385.0, 285.0));
    }
}
