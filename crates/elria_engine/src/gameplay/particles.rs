//! Short-lived particle effects
//!
//! A [`ParticleSystem`] emits from one point. Particles fall under a fixed
//! gravity, fade out over their lifetime and are dropped once it runs out.

use std::f32::consts::TAU;

use rand::Rng;

use crate::foundation::math::Vec2;
use crate::render::{Color, RenderBackend};

use super::environment::ViewCamera;

/// Downward pull on every particle, in pixels per second squared
pub const PARTICLE_GRAVITY: f32 = 98.0;

const DEFAULT_PARTICLE_SIZE: f32 = 2.0;

/// One particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// World position
    pub position: Vec2,
    /// Velocity in pixels per second
    pub velocity: Vec2,
    /// Current color; alpha tracks the remaining life
    pub color: Color,
    /// Seconds left
    pub life: f32,
    /// Lifetime at emission
    pub max_life: f32,
    /// Radius
    pub size: f32,
}

impl Particle {
    /// Create a particle with a full lifetime
    pub fn new(position: Vec2, velocity: Vec2, color: Color, lifetime: f32, size: f32) -> Self {
        Self {
            position,
            velocity,
            color,
            life: lifetime,
            max_life: lifetime,
            size,
        }
    }

    /// Advance by `delta_time` with an extra `acceleration`; returns whether it is still alive
    pub fn update(&mut self, delta_time: f32, acceleration: Vec2) -> bool {
        self.position += self.velocity * delta_time;
        self.life -= delta_time;
        self.color.a = if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.velocity += (Vec2::new(0.0, PARTICLE_GRAVITY) + acceleration) * delta_time;
        self.life > 0.0
    }
}

/// A bounded set of particles sharing an emitter
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    emitter: Vec2,
    max_particles: usize,
}

impl ParticleSystem {
    /// Create an empty system at `emitter` holding at most `max_particles`
    pub fn new(emitter: Vec2, max_particles: usize) -> Self {
        Self {
            particles: Vec::with_capacity(max_particles),
            emitter,
            max_particles,
        }
    }

    /// A yellow upward burst for a collected item
    pub fn collection_effect<R: Rng + ?Sized>(position: Vec2, rng: &mut R) -> Self {
        let mut system = Self::new(position, 20);
        system.emit_burst(rng, 15, Vec2::new(0.0, -50.0), Color::YELLOW, 1.0, 30.0);
        system
    }

    /// A two-colour orange and red blast
    pub fn explosion_effect<R: Rng + ?Sized>(position: Vec2, rng: &mut R) -> Self {
        let mut system = Self::new(position, 50);
        system.emit_burst(rng, 30, Vec2::new(0.0, -100.0), Color::ORANGE, 1.5, 80.0);
        system.emit_burst(rng, 20, Vec2::new(0.0, -80.0), Color::RED, 1.2, 60.0);
        system
    }

    /// Emit one particle; ignored when the system is full
    pub fn emit(&mut self, velocity: Vec2, color: Color, lifetime: f32, size: f32) {
        if self.particles.len() < self.max_particles {
            self.particles.push(Particle::new(self.emitter, velocity, color, lifetime, size));
        }
    }

    /// Emit up to `count` particles around `base_velocity`
    ///
    /// Each particle gets a random direction and a speed of `spread` times a
    /// factor in `[0.5, 1.5)`. Emission stops when the system is full.
    pub fn emit_burst<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        count: usize,
        base_velocity: Vec2,
        color: Color,
        lifetime: f32,
        spread: f32,
    ) {
        for _ in 0..count {
            if self.particles.len() >= self.max_particles {
                break;
            }
            let angle = rng.gen_range(0.0..TAU);
            let speed = rng.gen_range(0.5..1.5);
            let velocity = base_velocity + Vec2::new(angle.cos(), angle.sin()) * spread * speed;
            self.emit(velocity, color, lifetime, DEFAULT_PARTICLE_SIZE);
        }
    }

    /// Advance every particle and drop the expired ones
    pub fn update(&mut self, delta_time: f32, acceleration: Vec2) {
        self.particles.retain_mut(|particle| particle.update(delta_time, acceleration));
    }

    /// Draw visible particles through `camera`, scaled by `scale` into backend units
    pub fn draw<B: RenderBackend + ?Sized>(&self, backend: &mut B, camera: &ViewCamera, scale: Vec2) {
        for particle in &self.particles {
            let extent = Vec2::new(particle.size, particle.size);
            if camera.is_in_view(particle.position, extent) {
                let screen = camera.world_to_screen(particle.position).component_mul(&scale);
                backend.draw_circle(screen, particle.size * scale.x, particle.color);
            }
        }
    }

    /// Move the emitter
    pub fn set_position(&mut self, position: Vec2) {
        self.emitter = position;
    }

    /// Live particles
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether every particle has expired
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_particle_fades_and_falls() {
        let mut particle = Particle::new(Vec2::zeros(), Vec2::new(10.0, 0.0), Color::YELLOW, 2.0, 2.0);
        assert!(particle.update(0.5, Vec2::zeros()));
        assert_relative_eq!(particle.position.x, 5.0);
        assert_relative_eq!(particle.color.a, 0.75);
        assert_relative_eq!(particle.velocity.y, PARTICLE_GRAVITY * 0.5);

        assert!(!particle.update(1.5, Vec2::zeros()));
        assert_relative_eq!(particle.color.a, 0.0);
    }

    #[test]
    fn test_emit_respects_capacity() {
        let mut system = ParticleSystem::new(Vec2::new(5.0, 5.0), 2);
        for _ in 0..4 {
            system.emit(Vec2::zeros(), Color::WHITE, 1.0, 2.0);
        }
        assert_eq!(system.len(), 2);
        assert!(system.particles().iter().all(|p| p.position == Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_burst_speed_stays_in_spread() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut system = ParticleSystem::new(Vec2::zeros(), 100);
        system.emit_burst(&mut rng, 40, Vec2::new(0.0, -50.0), Color::YELLOW, 1.0, 30.0);
        assert_eq!(system.len(), 40);
        for particle in system.particles() {
            let offset = (particle.velocity - Vec2::new(0.0, -50.0)).norm();
            assert!((15.0..=45.0).contains(&offset), "offset {offset}");
        }
    }

    #[test]
    fn test_collection_effect_expires() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut system = ParticleSystem::collection_effect(Vec2::new(100.0, 100.0), &mut rng);
        assert_eq!(system.len(), 15);
        system.update(0.6, Vec2::zeros());
        assert_eq!(system.len(), 15);
        system.update(0.5, Vec2::zeros());
        assert!(system.is_empty());
    }

    #[test]
    fn test_explosion_effect_caps_at_fifty() {
        let mut rng = StdRng::seed_from_u64(1);
        let system = ParticleSystem::explosion_effect(Vec2::zeros(), &mut rng);
        assert_eq!(system.len(), 50);
    }

    #[test]
    fn test_wind_pushes_particles() {
        let mut calm = Particle::new(Vec2::zeros(), Vec2::zeros(), Color::WHITE, 5.0, 2.0);
        let mut windy = calm.clone();
        calm.update(1.0, Vec2::zeros());
        windy.update(1.0, Vec2::new(20.0, 0.0));
        calm.update(1.0, Vec2::zeros());
        windy.update(1.0, Vec2::new(20.0, 0.0));
        assert!(windy.position.x > calm.position.x);
        assert_relative_eq!(windy.velocity.x, 40.0);
    }
}
