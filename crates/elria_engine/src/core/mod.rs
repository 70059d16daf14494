//! # Core Engine Module
//!
//! Shared configuration for every engine subsystem.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for the engine loop, viewport, projection,
//!   scene construction, simulation, player and controls

pub mod config;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    EngineConfig,
    ViewportConfig,
    ConsoleConfig,
    ProjectionConfig,
    CameraConfig,
    SceneConfig,
    SimulationConfig,
    PlayerConfig,
    ControlsConfig,
    Config,
    ConfigError,
};
