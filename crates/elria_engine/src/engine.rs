//! Core engine implementation

use std::thread;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::{
    application::{AppError, AppEvent, Application},
    core::config::ApplicationConfig,
    foundation::{
        logging,
        math::Vec2,
        time::{frame_budget, FrameCounter, Timer},
    },
    input::{InputManager, KeyBindings, KeyCode, MouseButton, SceneCommand},
    render::{RenderBackend, RenderStats, SceneRenderer, SceneStyle},
    scene::{EditorMode, ObjectId, Scene, SceneError},
};

/// Main engine struct
///
/// The engine owns the scene and every per-frame subsystem, and runs the main
/// loop on behalf of an [`Application`].
pub struct Engine {
    scene: Scene,
    input: InputManager,
    bindings: KeyBindings,
    scene_renderer: SceneRenderer,
    backend: Box<dyn RenderBackend>,
    timer: Timer,
    frame_counter: FrameCounter,
    rng: StdRng,
    config: ApplicationConfig,
    last_stats: RenderStats,
    running: bool,
    frame: u64,
}

impl Engine {
    /// Create a new engine instance drawing through `backend`
    pub fn new(config: ApplicationConfig, backend: Box<dyn RenderBackend>) -> Result<Self, EngineError> {
        logging::init_with_level(&config.engine.log_level);
        log::info!("Initializing engine...");

        config
            .validate()
            .map_err(|e| EngineError::ConfigError(e.to_string()))?;
        let bindings = KeyBindings::from_config(&config.controls)
            .map_err(|e| EngineError::ConfigError(e.to_string()))?;

        let viewport = backend.viewport();
        if viewport.width == 0 || viewport.height == 0 {
            return Err(EngineError::InitializationFailed(format!(
                "Render backend has an empty viewport ({}x{})",
                viewport.width, viewport.height
            )));
        }

        let rng = match config.engine.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let scene = Scene::default_sandbox(&config.scene, &config.camera);
        let scene_renderer = SceneRenderer::new(config.projection.clone(), SceneStyle::pixels());
        log::info!(
            "Scene '{}' ready with {} objects, viewport {}x{}",
            scene.name(),
            scene.len(),
            viewport.width,
            viewport.height
        );

        Ok(Self {
            scene,
            input: InputManager::new(),
            bindings,
            scene_renderer,
            backend,
            timer: Timer::new(),
            frame_counter: FrameCounter::new(),
            rng,
            config,
            last_stats: RenderStats::default(),
            running: true,
            frame: 0,
        })
    }

    /// Run the engine main loop with the given application
    pub fn run<T: Application + ?Sized>(
        config: ApplicationConfig,
        backend: Box<dyn RenderBackend>,
        app: &mut T,
    ) -> Result<(), EngineError> {
        let mut engine = Self::new(config, backend)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {}", e)))?;

        log::info!("Starting main loop...");
        let budget = frame_budget(engine.config.engine.target_fps);

        while engine.running {
            let frame_start = Instant::now();
            engine.timer.update();
            let delta_time = engine.timer.delta_time();
            engine.input.begin_frame();

            let events = app
                .poll_events(&mut engine)
                .map_err(|e| EngineError::ApplicationError(format!("App events: {}", e)))?;
            for event in events {
                app.handle_event(&mut engine, event)
                    .map_err(|e| EngineError::ApplicationError(format!("App event: {}", e)))?;
            }
            if !engine.running {
                break;
            }

            // Update application
            app.update(&mut engine, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {}", e)))?;

            // Update engine systems
            engine.update(delta_time);

            // Render
            app.render(&mut engine)
                .map_err(|e| EngineError::ApplicationError(format!("App render: {}", e)))?;

            engine.frame_counter.tick();
            engine.frame += 1;
            log::debug!("Frame {} done in {:?}", engine.frame, frame_start.elapsed());

            if engine.config.engine.max_frames.is_some_and(|max| engine.frame >= max) {
                log::info!("Reached frame limit ({})", engine.frame);
                engine.running = false;
            }

            if let Some(budget) = budget.filter(|_| engine.running) {
                if let Some(remaining) = budget.checked_sub(frame_start.elapsed()) {
                    thread::sleep(remaining);
                }
            }
        }

        app.cleanup(&mut engine);

        log::info!("Engine shutdown complete after {} frames", engine.frame);
        Ok(())
    }

    /// Update engine systems
    fn update(&mut self, delta_time: f32) {
        self.scene.update(delta_time);
    }

    /// Render the scene through the backend
    pub fn render(&mut self) -> Result<(), AppError> {
        self.last_stats = self
            .scene_renderer
            .render(&self.scene, self.backend.as_mut())
            .map_err(|e| EngineError::RenderError(e.to_string()))?;
        Ok(())
    }

    /// Handle an application event
    ///
    /// Key presses run their bound scene command and left clicks weave or
    /// select. Everything else goes to [`handle_input_event`](Self::handle_input_event).
    pub fn handle_event(&mut self, event: AppEvent) -> Result<(), AppError> {
        match event {
            AppEvent::KeyPressed(key) => self.handle_key(key, true),
            AppEvent::KeyReleased(key) => self.handle_key(key, false),
            AppEvent::KeyInput { key, pressed } => self.handle_key(key, pressed),
            AppEvent::MouseButton { button, pressed } => {
                self.input.handle_mouse_button(button, pressed);
                if pressed && button == MouseButton::Left {
                    self.click(self.input.mouse_position());
                }
            }
            other => return self.handle_input_event(other),
        }

        Ok(())
    }

    /// Record an event in the input state without touching the scene
    ///
    /// Close requests and resizes are still honoured.
    pub fn handle_input_event(&mut self, event: AppEvent) -> Result<(), AppError> {
        match event {
            AppEvent::WindowCloseRequested => {
                self.quit();
            }
            AppEvent::WindowResized { width, height } => {
                log::info!("Viewport resized to {}x{}", width, height);
                self.backend.resize(width, height);
            }
            AppEvent::KeyPressed(key) | AppEvent::KeyInput { key, pressed: true } => {
                self.input.handle_key_input(key, true);
            }
            AppEvent::KeyReleased(key) | AppEvent::KeyInput { key, pressed: false } => {
                self.input.handle_key_input(key, false);
            }
            AppEvent::MouseButton { button, pressed } => {
                self.input.handle_mouse_button(button, pressed);
            }
            AppEvent::MouseMoved { x, y } => {
                self.input.handle_mouse_move(x, y);
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        let fresh_press = self.input.handle_key_input(key, pressed);
        if fresh_press {
            if let Some(command) = self.bindings.command_for(key) {
                self.execute(command);
            }
        }
    }

    /// Apply a scene command
    pub fn execute(&mut self, command: SceneCommand) {
        log::debug!("Command: {}", command.action_name());
        match command {
            SceneCommand::MoveCamera(movement) => {
                self.scene.move_camera(movement, self.config.camera.move_step);
            }
            SceneCommand::ToggleEditMode => {
                self.scene.toggle_mode();
            }
            SceneCommand::WeavePlatform => {
                self.weave();
            }
            SceneCommand::ResetCamera => {
                self.scene.camera.reset();
                log::info!("Camera reset");
            }
            SceneCommand::Quit => self.quit(),
        }
    }

    fn weave(&mut self) -> Option<ObjectId> {
        match self.scene.weave_platform(&mut self.rng, &self.config.scene) {
            Ok(id) => Some(id),
            Err(SceneError::NotInEditMode) => {
                log::warn!("Weaving needs edit mode; press the edit toggle first");
                None
            }
            Err(e) => {
                log::warn!("Weave failed: {}", e);
                None
            }
        }
    }

    /// Left click at `point`: weave in edit mode, select in play mode
    pub fn click(&mut self, point: Vec2) -> Option<ObjectId> {
        match self.scene.mode() {
            EditorMode::Edit => self.weave(),
            EditorMode::Play => {
                let viewport = self.backend.viewport();
                match self.scene_renderer.pick(&self.scene, viewport, point) {
                    Some(id) => {
                        // id came from this scene, so selection cannot fail
                        if self.scene.select(id).is_ok() {
                            if let Some(object) = self.scene.get(id) {
                                log::info!("Selected {}", object.name());
                            }
                        }
                        Some(id)
                    }
                    None => {
                        self.scene.clear_selection();
                        None
                    }
                }
            }
        }
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop will run another frame
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Get the scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Get mutable access to the scene
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Get the input manager
    pub fn input(&self) -> &InputManager {
        &self.input
    }

    /// Active key bindings
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Scene renderer used by [`render`](Self::render)
    pub fn scene_renderer(&self) -> &SceneRenderer {
        &self.scene_renderer
    }

    /// Replace the scene renderer (for example with a console style)
    pub fn set_scene_renderer(&mut self, renderer: SceneRenderer) {
        self.scene_renderer = renderer;
    }

    /// Get the render backend
    pub fn backend(&self) -> &dyn RenderBackend {
        self.backend.as_ref()
    }

    /// Get mutable access to the render backend
    pub fn backend_mut(&mut self) -> &mut dyn RenderBackend {
        self.backend.as_mut()
    }

    /// Engine random number generator
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Engine configuration
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    /// Statistics of the last scene render
    pub fn last_stats(&self) -> RenderStats {
        self.last_stats
    }

    /// Frames completed so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Measured frames per second
    pub fn fps(&self) -> f32 {
        self.frame_counter.fps()
    }

    /// Get the current frame delta time
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Initialization error
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Rendering error
    #[error("Rendering error: {0}")]
    RenderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),
}
