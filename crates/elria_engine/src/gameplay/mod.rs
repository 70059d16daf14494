//! # Gameplay
//!
//! The playable layer on top of the engine foundation:
//!
//! - **Player**: immediate-mode movement and scoring
//! - **Collectible**: simple pickups with an AABB footprint
//! - **Parallel**: fixed-split fork-join updates over a slice
//! - **Simulation**: headless frame loop writing one SVG per frame
//! - **Sandbox**: interactive pickup game drawn through any render backend
//! - **Environment**: follow camera, parallax layers, platforms and particle effects
//! - **Platformer**: side-scrolling level with a gravity-bound walker

mod collectible;
mod collision;
mod environment;
pub mod parallel;
mod particles;
mod platformer;
mod player;
mod sandbox;
mod simulation;
mod walker;

pub use collectible::Collectible;
pub use collision::Bounds2D;
pub use environment::{BackgroundLayer, Environment, Platform, ViewCamera};
pub use parallel::{parallel_update, partition_ranges, worker_count};
pub use particles::{Particle, ParticleSystem, PARTICLE_GRAVITY};
pub use platformer::{Platformer, PlatformerEvent};
pub use player::Player;
pub use sandbox::{Pickup, Sandbox, SandboxEvent};
pub use simulation::{FrameReport, Simulation, SimulationSummary};
pub use walker::{StepOutcome, Walker};

use thiserror::Error;

use crate::render::RenderError;

/// Gameplay errors
#[derive(Error, Debug)]
pub enum GameplayError {
    /// Drawing a frame failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Preparing output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// One or more update workers panicked
    #[error("{count} update worker(s) panicked")]
    WorkerPanicked {
        /// Number of workers that did not finish
        count: usize,
    },
}
