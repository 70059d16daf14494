//! Pickup sandbox
//!
//! Steer the white square with WASD or the arrow keys and collect the yellow
//! squares. Each input line lists the keys held for that frame.

use std::io::StdinLock;
use std::path::PathBuf;

use clap::Parser;
use elria_app::{handle_game_event, rng_from, CommonArgs, KeyMode, LineInput};
use elria_engine::gameplay::SandboxEvent;
use elria_engine::prelude::*;
use rand::rngs::StdRng;

// Longest step applied for one line of input
const MAX_STEP: f32 = 0.1;

/// Collect pickups in a terminal or SVG sandbox
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Draw each frame to this SVG file instead of the terminal
    #[arg(long, value_name = "FILE")]
    svg: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,
}

struct SandboxApp {
    sandbox: Sandbox,
    input: LineInput<StdinLock<'static>>,
    rng: StdRng,
}

impl Application for SandboxApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let area = self.sandbox.area();
        log::info!("Sandbox started: {}x{}", area.x, area.y);
        log::info!("Use WASD to move, collect yellow squares!");
        self.render(engine)
    }

    fn poll_events(&mut self, _engine: &mut Engine) -> Result<Vec<AppEvent>, AppError> {
        self.input
            .next_events()
            .map_err(|e| AppError::Custom(format!("reading input: {}", e)))
    }

    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
        let step = delta_time.min(MAX_STEP);
        for event in self.sandbox.update(engine.input(), step, &mut self.rng) {
            match event {
                SandboxEvent::Collected { score, .. } => log::info!("Score: {}", score),
                SandboxEvent::Regenerated { count } => log::info!("{} new collectibles appeared", count),
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, engine: &mut Engine, event: AppEvent) -> Result<(), AppError> {
        handle_game_event(engine, event)
    }

    fn render(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let fps = engine.fps();
        self.sandbox.draw(engine.backend_mut(), fps)?;
        Ok(())
    }

    fn cleanup(&mut self, _engine: &mut Engine) {
        let player = self.sandbox.player();
        println!("Final score: {} (health {})", player.score, player.health);
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = args.common.load_config()?;
    if let Some(frames) = args.frames {
        config.engine.max_frames = Some(frames);
    }

    let mut rng = rng_from(&config);
    let sandbox = Sandbox::new(&config.player, config.viewport.width, config.viewport.height, &mut rng);

    let backend: Box<dyn RenderBackend> = match args.svg {
        Some(path) => Box::new(SvgRenderer::new(config.viewport.width, config.viewport.height).with_target(path)),
        None => Box::new(
            ConsoleRenderer::stdout(config.console.columns, config.console.rows)
                .with_clear_screen(config.console.clear_screen),
        ),
    };
    let mut app = SandboxApp {
        sandbox,
        input: LineInput::stdin(KeyMode::Hold),
        rng,
    };

    Engine::run(config, backend, &mut app)?;
    Ok(())
}
