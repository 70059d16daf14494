//! # Unified Configuration System
//!
//! This module consolidates all configuration structures into one serializable
//! tree. Every table uses `#[serde(default)]`, so a config file only needs to
//! mention the values it changes.
//!
//! ## Configuration Categories
//!
//! - **Engine**: loop pacing, logging, deterministic seeding
//! - **Viewport / Console / Projection**: output surfaces and the pseudo-3D projection
//! - **Camera / Scene**: the default sandbox scene and woven platforms
//! - **Simulation / Player**: the frame simulation and the pickup sandbox
//! - **Platformer**: the side-scrolling level with gravity and platforms
//! - **Controls**: key names for every scene command

use serde::{Serialize, Deserialize};

use crate::foundation::math::{Vec2, Vec3};
use crate::input::KeyBindings;

// Re-export from the config module for convenience
pub use crate::config::{Config, ConfigError};

/// # Engine Configuration
///
/// Core engine loop behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level for the engine (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
    /// Whether to enable debug features
    pub debug_mode: bool,
    /// Target FPS for frame rate limiting (`None` = unlimited)
    pub target_fps: Option<u32>,
    /// Stop the main loop after this many frames (`None` = run until quit)
    pub max_frames: Option<u64>,
    /// Seed for the engine RNG (`None` = seeded from entropy)
    pub rng_seed: Option<u64>,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: cfg!(debug_assertions),
            target_fps: Some(60),
            max_frames: None,
            rng_seed: None,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set target FPS
    pub fn with_target_fps(mut self, fps: Option<u32>) -> Self {
        self.target_fps = fps;
        self
    }

    /// Limit the number of frames the main loop runs
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Use a fixed RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Viewport Configuration
///
/// Pixel-space output surface used by the SVG and HTML renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Document / window title
    pub title: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            title: "Epoch of Elria - 3D Game Engine".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

/// # Console Configuration
///
/// Character-cell output surface. Terminal cells are roughly twice as tall as
/// they are wide, hence the vertical squash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Columns in the character framebuffer
    pub columns: usize,
    /// Rows in the character framebuffer
    pub rows: usize,
    /// Projection numerator used for cell output
    pub focal_scale: f32,
    /// Vertical factor applied to projected Y offsets
    pub vertical_squash: f32,
    /// Emit an ANSI clear-screen sequence before each frame
    pub clear_screen: bool,
}

impl ConsoleConfig {
    /// Projection settings for cell output, derived from the pixel projection
    pub fn projection(&self, base: &ProjectionConfig) -> ProjectionConfig {
        ProjectionConfig {
            focal_scale: self.focal_scale,
            vertical_squash: self.vertical_squash,
            ..base.clone()
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            columns: 100,
            rows: 32,
            focal_scale: 200.0,
            vertical_squash: 0.5,
            clear_screen: true,
        }
    }
}

/// # Projection Configuration
///
/// Constants of the scale-by-distance projection:
/// `scale = focal_scale / (max(distance, min_distance) + distance_offset)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Numerator `K` of the scale function
    pub focal_scale: f32,
    /// Offset added to the planar distance
    pub distance_offset: f32,
    /// Lower clamp for the planar distance
    pub min_distance: f32,
    /// Vertical factor applied to projected Y offsets
    pub vertical_squash: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            focal_scale: 500.0,
            distance_offset: 100.0,
            min_distance: 1.0,
            vertical_squash: 1.0,
        }
    }
}

/// # Camera Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Position restored by "reset camera"
    pub home_position: Vec3,
    /// Look-at target restored by "reset camera"
    pub home_target: Vec3,
    /// Distance moved per camera key press
    pub move_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            home_position: Vec3::new(0.0, 8.0, 20.0),
            home_target: Vec3::zeros(),
            move_step: 2.0,
        }
    }
}

/// # Scene Configuration
///
/// Layout of the default sandbox scene and the placement range of woven platforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Scene display name
    pub name: String,
    /// Name of the central planet
    pub planet_name: String,
    /// Planet spin in degrees per second
    pub planet_spin_rate: f32,
    /// Number of platforms in the ring
    pub platform_count: usize,
    /// Radius of the platform ring
    pub platform_ring_radius: f32,
    /// Vertical wave amplitude of the ring
    pub platform_height_amplitude: f32,
    /// Number of crystals
    pub crystal_count: usize,
    /// Horizontal spacing between crystals (X, Z)
    pub crystal_spacing: Vec2,
    /// Height of the crystal row
    pub crystal_height: f32,
    /// Woven platforms land in `[-extent, extent)` on X and Z
    pub weave_extent: f32,
    /// Lowest woven platform height
    pub weave_height_min: f32,
    /// Height range above `weave_height_min`
    pub weave_height_range: f32,
    /// Counter value used for the first woven platform name
    pub first_woven_index: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: "Earth Sphere Sandbox".to_string(),
            planet_name: "Earth".to_string(),
            planet_spin_rate: 50.0,
            platform_count: 6,
            platform_ring_radius: 8.0,
            platform_height_amplitude: 2.0,
            crystal_count: 4,
            crystal_spacing: Vec2::new(3.0, 2.0),
            crystal_height: 4.0,
            weave_extent: 10.0,
            weave_height_min: 2.0,
            weave_height_range: 8.0,
            first_woven_index: 6,
        }
    }
}

/// # Simulation Configuration
///
/// The frame simulation: a player sweeping across a field of collectibles that
/// are updated in parallel, each frame written out as SVG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of collectibles scattered on the canvas
    pub collectible_count: usize,
    /// Frames to simulate
    pub frames: u32,
    /// Fixed time step in seconds
    pub delta_time: f32,
    /// Worker threads for the collectible update (`None` = available parallelism)
    pub worker_threads: Option<usize>,
    /// Canvas width in pixels
    pub canvas_width: u32,
    /// Canvas height in pixels
    pub canvas_height: u32,
    /// Player start position (top-left corner)
    pub player_start: Vec2,
    /// Player edge length
    pub player_size: f32,
    /// Player speed to the right, units per second
    pub player_speed: f32,
    /// Collectible edge length
    pub collectible_size: f32,
    /// Points per collectible
    pub collectible_value: u32,
    /// Simulated per-collectible work in microseconds
    pub simulated_work_micros: u64,
    /// Directory receiving the frame files
    pub output_dir: String,
    /// Frame file prefix (`{prefix}{frame}.svg`)
    pub file_prefix: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            collectible_count: 1000,
            frames: 50,
            delta_time: 1.0 / 60.0,
            worker_threads: None,
            canvas_width: 800,
            canvas_height: 400,
            player_start: Vec2::new(100.0, 100.0),
            player_size: 50.0,
            player_speed: 50.0,
            collectible_size: 20.0,
            collectible_value: 10,
            simulated_work_micros: 10,
            output_dir: "frames".to_string(),
            file_prefix: "game_frame_".to_string(),
        }
    }
}

/// # Player Configuration
///
/// The top-down pickup sandbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Movement speed in units per second while a key is held
    pub speed: f32,
    /// Player edge length
    pub size: f32,
    /// Pickup distance from the player center
    pub pickup_radius: f32,
    /// Pickups spawned per wave
    pub pickup_count: usize,
    /// Pickup edge length
    pub pickup_size: f32,
    /// Maximum health
    pub max_health: u32,
    /// Health restored per pickup
    pub heal_on_collect: u32,
    /// Points per pickup
    pub score_per_pickup: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 300.0,
            size: 30.0,
            pickup_radius: 30.0,
            pickup_count: 20,
            pickup_size: 20.0,
            max_health: 100,
            heal_on_collect: 5,
            score_per_pickup: 10,
        }
    }
}

/// # Platformer Configuration
///
/// The side-scrolling level. The view size comes from [`ViewportConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerConfig {
    /// World width in pixels
    pub world_width: f32,
    /// World height in pixels
    pub world_height: f32,
    /// Player edge length
    pub player_size: f32,
    /// Horizontal walking speed in pixels per second
    pub walk_speed: f32,
    /// Upward speed given by a jump
    pub jump_power: f32,
    /// Downward acceleration in pixels per second squared
    pub gravity: f32,
    /// Fraction of the distance to the target the camera covers each update
    pub follow_smoothing: f32,
    /// Horizontal pull on particles in pixels per second squared
    pub wind_strength: f32,
    /// Points for a coin
    pub coin_value: u32,
    /// Points for the gem on the highest platform
    pub gem_value: u32,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        Self {
            world_width: 2000.0,
            world_height: 600.0,
            player_size: 50.0,
            walk_speed: 200.0,
            jump_power: 300.0,
            gravity: 300.0,
            follow_smoothing: 0.1,
            wind_strength: 0.0,
            coin_value: 10,
            gem_value: 25,
        }
    }
}

/// # Controls Configuration
///
/// Key names for every scene command, parsed by [`KeyBindings::from_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Camera forward (-Z)
    pub forward: String,
    /// Camera backward (+Z)
    pub backward: String,
    /// Camera left (-X)
    pub left: String,
    /// Camera right (+X)
    pub right: String,
    /// Camera up (+Y)
    pub up: String,
    /// Camera down (-Y)
    pub down: String,
    /// Toggle edit / play mode
    pub toggle_edit: String,
    /// Weave a new platform
    pub weave: String,
    /// Reset the camera
    pub reset_camera: String,
    /// Quit
    pub quit: String,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            forward: "W".to_string(),
            backward: "S".to_string(),
            left: "A".to_string(),
            right: "D".to_string(),
            up: "Q".to_string(),
            down: "C".to_string(),
            toggle_edit: "E".to_string(),
            weave: "X".to_string(),
            reset_camera: "Space".to_string(),
            quit: "Escape".to_string(),
        }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine loop configuration
    pub engine: EngineConfig,
    /// Pixel viewport
    pub viewport: ViewportConfig,
    /// Character viewport
    pub console: ConsoleConfig,
    /// Projection constants
    pub projection: ProjectionConfig,
    /// Camera home pose and step
    pub camera: CameraConfig,
    /// Default scene layout
    pub scene: SceneConfig,
    /// Frame simulation
    pub simulation: SimulationConfig,
    /// Pickup sandbox
    pub player: PlayerConfig,
    /// Side-scrolling level
    pub platformer: PlatformerConfig,
    /// Key bindings
    pub controls: ControlsConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ConfigError::Invalid("viewport must be at least 1x1".to_string()));
        }
        if self.console.columns == 0 || self.console.rows == 0 {
            return Err(ConfigError::Invalid("console must be at least 1x1".to_string()));
        }
        if self.projection.focal_scale <= 0.0 || self.console.focal_scale <= 0.0 {
            return Err(ConfigError::Invalid("focal_scale must be positive".to_string()));
        }
        if self.projection.distance_offset <= 0.0 {
            return Err(ConfigError::Invalid("distance_offset must be positive".to_string()));
        }
        if self.projection.min_distance < 0.0 {
            return Err(ConfigError::Invalid("min_distance cannot be negative".to_string()));
        }
        if self.simulation.delta_time <= 0.0 {
            return Err(ConfigError::Invalid("simulation delta_time must be positive".to_string()));
        }
        if self.simulation.worker_threads == Some(0) {
            return Err(ConfigError::Invalid("worker_threads must be at least 1".to_string()));
        }
        if self.simulation.canvas_width == 0 || self.simulation.canvas_height == 0 {
            return Err(ConfigError::Invalid("simulation canvas must be at least 1x1".to_string()));
        }
        if self.scene.weave_extent <= 0.0 || self.scene.weave_height_range <= 0.0 {
            return Err(ConfigError::Invalid("weave ranges must be positive".to_string()));
        }

        let platformer = &self.platformer;
        if platformer.world_width <= 0.0 || platformer.world_height <= 0.0 || platformer.player_size <= 0.0 {
            return Err(ConfigError::Invalid("platformer world and player must have a positive size".to_string()));
        }
        if !(platformer.follow_smoothing > 0.0 && platformer.follow_smoothing <= 1.0) {
            return Err(ConfigError::Invalid("follow_smoothing must be in (0, 1]".to_string()));
        }
        if platformer.gravity < 0.0 {
            return Err(ConfigError::Invalid("gravity cannot be negative".to_string()));
        }

        KeyBindings::from_config(&self.controls)?;
        Ok(())
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApplicationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.camera.home_position, Vec3::new(0.0, 8.0, 20.0));
        assert_eq!(config.simulation.collectible_count, 1000);
        assert_eq!(config.scene.first_woven_index, 6);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = ApplicationConfig::default();
        config.simulation.worker_threads = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ApplicationConfig::default();
        config.projection.distance_offset = 0.0;
        assert!(config.validate().is_err());

        let mut config = ApplicationConfig::default();
        config.controls.weave = "Hyper".to_string();
        assert!(config.validate().is_err());

        let mut config = ApplicationConfig::default();
        config.platformer.follow_smoothing = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("elria.toml");
        std::fs::write(
            &path,
            "[engine]\nmax_frames = 3\n\n[simulation]\ncollectible_count = 12\nworker_threads = 2\n",
        )
        .expect("write config");

        let config = ApplicationConfig::load_from_file(&path).expect("load toml");
        assert_eq!(config.engine.max_frames, Some(3));
        assert_eq!(config.simulation.collectible_count, 12);
        assert_eq!(config.simulation.worker_threads, Some(2));
        assert_eq!(config.simulation.frames, 50);
        assert_eq!(config.controls, ControlsConfig::default());
    }

    #[test]
    fn test_ron_save_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("elria.ron");

        let mut config = ApplicationConfig::default();
        config.camera.move_step = 5.0;
        config.scene.name = "Ring World".to_string();
        config.save_to_file(&path).expect("save ron");

        let loaded = ApplicationConfig::load_from_file(&path).expect("load ron");
        assert_eq!(loaded.camera.move_step, 5.0);
        assert_eq!(loaded.scene.name, "Ring World");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ApplicationConfig::load_or_default(dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(config, ApplicationConfig::default());
    }

    #[test]
    fn test_console_projection_override() {
        let config = ApplicationConfig::default();
        let projection = config.console.projection(&config.projection);
        assert_eq!(projection.focal_scale, 200.0);
        assert_eq!(projection.vertical_squash, 0.5);
        assert_eq!(projection.distance_offset, 100.0);
    }
}
