//! # Elria Engine
//!
//! A small, headless game engine for the Epoch of Elria sandbox scene: a
//! rotating planet, a ring of platforms and a handful of collectible crystals.
//!
//! ## Features
//!
//! - **One scene model**: a single `GameObject`, `Camera` and `Scene` shared by every frontend
//! - **Pseudo-perspective projection**: scale-by-distance projection used by all renderers
//! - **Renderer abstraction**: console ASCII, SVG and HTML output behind one trait
//! - **Parallel updates**: fixed-split fork-join over disjoint slices
//! - **Configurable**: TOML and RON configuration files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use elria_engine::prelude::*;
//!
//! struct Explorer;
//!
//! impl Application for Explorer {
//!     fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn poll_events(&mut self, _engine: &mut Engine) -> Result<Vec<AppEvent>, AppError> {
//!         Ok(vec![AppEvent::WindowCloseRequested])
//!     }
//!
//!     fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApplicationConfig::default();
//!     let backend = ConsoleRenderer::stdout(80, 24);
//!     Engine::run(config, Box::new(backend), &mut Explorer)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod scene;
pub mod render;
pub mod gameplay;
pub mod input;

mod application;
mod engine;

pub use application::{Application, AppError, AppEvent};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Application, AppError, AppEvent,
        Engine, EngineError,
        config::{Config, ConfigError},
        core::config::ApplicationConfig,
        foundation::{
            math::{Vec2, Vec3, Transform},
            time::{Timer, FrameCounter},
        },
        scene::{Scene, SceneError, GameObject, ObjectKind, ObjectId, Camera, CameraMove, EditorMode},
        render::{
            Color, RenderBackend, RenderError, RenderResult,
            ConsoleRenderer, SvgRenderer, HtmlExporter,
            PerspectiveProjector, SceneRenderer, SceneStyle,
        },
        gameplay::{Player, Simulation, Sandbox, Platformer, GameplayError},
        input::{InputManager, KeyCode, MouseButton, KeyBindings, SceneCommand},
    };
}
