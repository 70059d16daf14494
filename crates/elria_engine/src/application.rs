//! Application trait, events and errors

use crate::config::ConfigError;
use crate::engine::{Engine, EngineError};
use crate::gameplay::GameplayError;
use crate::render::RenderError;
use thiserror::Error;

/// Hooks an application plugs into the engine loop
///
/// Implement this trait to drive the engine loop. The engine owns the scene,
/// input state and render backend; the application decides where events come
/// from and what happens each frame.
pub trait Application {
    /// Prepare the application's state
    ///
    /// Called once after the engine is created, before the first frame.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Collect the events for this frame
    ///
    /// Called at the start of every frame. Blocking here (for example on a
    /// line of terminal input) paces the loop.
    fn poll_events(&mut self, engine: &mut Engine) -> Result<Vec<AppEvent>, AppError>;

    /// Advance the application by `delta_time` seconds
    ///
    /// Called every frame after events are dispatched.
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Draw the frame
    ///
    /// Called after update. The default draws the engine's scene.
    fn render(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine.render()
    }

    /// Handle one event
    fn handle_event(&mut self, engine: &mut Engine, event: AppEvent) -> Result<(), AppError> {
        engine.handle_event(event)
    }

    /// Tear down the application
    ///
    /// Called once when the loop ends, including after a quit request.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Errors an application can raise from its hooks
#[derive(Error, Debug)]
pub enum AppError {
    /// Failure inside the engine
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Anything application specific
    #[error("Application error: {0}")]
    Custom(String),

    /// Bad or unreadable configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Gameplay rule or simulation failure
    #[error("Game logic error: {0}")]
    GameLogic(String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Engine(EngineError::RenderError(err.to_string()))
    }
}

impl From<GameplayError> for AppError {
    fn from(err: GameplayError) -> Self {
        AppError::GameLogic(err.to_string())
    }
}

/// Input and window events delivered to [`Application::handle_event`]
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The output surface changed size
    WindowResized {
        /// Width in backend units
        width: u32,
        /// Height in backend units
        height: u32,
    },

    /// The user asked to close the frontend
    WindowCloseRequested,

    /// Key down
    KeyPressed(crate::input::KeyCode),

    /// Key up
    KeyReleased(crate::input::KeyCode),

    /// Key transition in one event
    KeyInput {
        /// Affected key
        key: crate::input::KeyCode,
        /// `true` for down, `false` for up
        pressed: bool,
    },

    /// Mouse button transition
    MouseButton {
        /// Affected button
        button: crate::input::MouseButton,
        /// `true` for down, `false` for up
        pressed: bool,
    },

    /// Cursor moved
    MouseMoved {
        /// Cursor x in backend units
        x: f64,
        /// Cursor y in backend units
        y: f64,
    },
}
