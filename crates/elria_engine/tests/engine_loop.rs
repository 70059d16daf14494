//! Drives scripted applications through the full engine loop

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use elria_engine::prelude::*;

/// `Write` sink the test can read after the engine drops the backend
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct Outcome {
    initialized: bool,
    updates: u32,
    frames: u64,
    objects: usize,
    mode: EditorMode,
    woven: bool,
}

/// Replays one batch of events per frame
struct Scripted {
    frames: Vec<Vec<AppEvent>>,
    next: usize,
    outcome: Outcome,
}

impl Scripted {
    fn new(frames: Vec<Vec<AppEvent>>) -> Self {
        Self {
            frames,
            next: 0,
            outcome: Outcome::default(),
        }
    }
}

impl Application for Scripted {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let config = engine.config().clone();
        let projection = config.console.projection(&config.projection);
        engine.set_scene_renderer(SceneRenderer::new(projection, SceneStyle::cells()));
        self.outcome.initialized = true;
        Ok(())
    }

    fn poll_events(&mut self, _engine: &mut Engine) -> Result<Vec<AppEvent>, AppError> {
        let events = self.frames.get(self.next).cloned().unwrap_or_default();
        self.next += 1;
        Ok(events)
    }

    fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        self.outcome.updates += 1;
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        self.outcome.frames = engine.frame();
        self.outcome.objects = engine.scene().len();
        self.outcome.mode = engine.scene().mode();
        self.outcome.woven = engine.scene().find_by_name("Woven_6").is_some();
    }
}

fn config(max_frames: u64) -> ApplicationConfig {
    let mut config = ApplicationConfig::default();
    config.engine = config
        .engine
        .with_target_fps(None)
        .with_max_frames(max_frames)
        .with_seed(5);
    config
}

fn console(buffer: &SharedBuffer) -> Box<dyn RenderBackend> {
    Box::new(ConsoleRenderer::new(100, 32, buffer.clone()).with_clear_screen(false))
}

#[test]
fn test_loop_stops_at_frame_limit() {
    let buffer = SharedBuffer::default();
    let mut app = Scripted::new(Vec::new());

    Engine::run(config(4), console(&buffer), &mut app).expect("run");

    assert!(app.outcome.initialized);
    assert_eq!(app.outcome.frames, 4);
    assert_eq!(app.outcome.updates, 4);
    let output = buffer.contents();
    assert_eq!(output.matches("PLAY MODE").count(), 4);
    assert!(output.contains("EPOCH OF ELRIA"));
}

#[test]
fn test_scripted_editing_session() {
    let buffer = SharedBuffer::default();
    let script = vec![
        // Weaving is refused in play mode
        vec![AppEvent::KeyPressed(KeyCode::X), AppEvent::KeyReleased(KeyCode::X)],
        vec![AppEvent::KeyInput { key: KeyCode::E, pressed: true }],
        vec![AppEvent::KeyPressed(KeyCode::X)],
        vec![
            AppEvent::MouseMoved { x: 10.0, y: 10.0 },
            AppEvent::MouseButton { button: MouseButton::Left, pressed: true },
        ],
    ];
    let mut app = Scripted::new(script);

    Engine::run(config(6), console(&buffer), &mut app).expect("run");

    assert_eq!(app.outcome.frames, 6);
    assert_eq!(app.outcome.mode, EditorMode::Edit);
    assert!(app.outcome.woven);
    // One platform from X, one from the click
    assert_eq!(app.outcome.objects, 13);
    assert!(buffer.contents().contains("EDIT MODE"));
}

#[test]
fn test_close_request_ends_loop_early() {
    let buffer = SharedBuffer::default();
    let script = vec![Vec::new(), Vec::new(), vec![AppEvent::WindowCloseRequested]];
    let mut app = Scripted::new(script);

    Engine::run(config(100), console(&buffer), &mut app).expect("run");

    assert_eq!(app.outcome.frames, 2);
    assert_eq!(app.outcome.updates, 2);
    assert_eq!(app.outcome.objects, 11);
}

#[test]
fn test_initialize_error_is_reported() {
    struct Failing;

    impl Application for Failing {
        fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
            Err(AppError::Custom("no assets".to_string()))
        }

        fn poll_events(&mut self, _engine: &mut Engine) -> Result<Vec<AppEvent>, AppError> {
            Ok(Vec::new())
        }

        fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
            Ok(())
        }

        fn cleanup(&mut self, _engine: &mut Engine) {}
    }

    let buffer = SharedBuffer::default();
    let result = Engine::run(config(1), console(&buffer), &mut Failing);
    assert!(matches!(result, Err(EngineError::ApplicationError(_))));
}
