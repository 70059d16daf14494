//! Side-scrolling platformer
//!
//! Walk with A/D, jump with W or Space and collect every coin and the gem.
//! Each input line lists the keys held for that frame.

use std::io::StdinLock;
use std::path::PathBuf;

use clap::Parser;
use elria_app::{handle_game_event, rng_from, CommonArgs, KeyMode, LineInput};
use elria_engine::gameplay::PlatformerEvent;
use elria_engine::prelude::*;
use rand::rngs::StdRng;

// Longest step applied for one line of input
const MAX_STEP: f32 = 0.1;

/// Run the side-scrolling level in a terminal or SVG file
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

    /// Horizontal wind pushing the sparks
    #[arg(long)]
    wind: Option<f32>,
}

struct PlatformerApp {
    game: Platformer,
    input: LineInput<StdinLock<'static>>,
    rng: StdRng,
}

impl Application for PlatformerApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let world = self.game.environment().world_size();
        log::info!("Platformer started: world {}x{}", world.x, world.y);
        log::info!("A/D to walk, W or Space to jump");
        self.render(engine)
    }

    fn poll_events(&mut self, _engine: &mut Engine) -> Result<Vec<AppEvent>, AppError> {
        self.input
            .next_events()
            .map_err(|e| AppError::Custom(format!("reading input: {}", e)))
    }

    fn handle_event(&mut self, engine: &mut Engine, event: AppEvent) -> Result<(), AppError> {
        handle_game_event(engine, event)
    }

    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
        let step = delta_time.min(MAX_STEP);
        for event in self.game.update(engine.input(), step, &mut self.rng) {
            match event {
                PlatformerEvent::Cleared { score } => {
                    println!("Level cleared! Score: {}", score);
                    engine.quit();
                }
                PlatformerEvent::Landed => log::debug!("Landed"),
                PlatformerEvent::Jumped => log::debug!("Jumped"),
                PlatformerEvent::Collected { .. } => {}
            }
        }
        Ok(())
    }

    fn render(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let fps = engine.fps();
        self.game.draw(engine.backend_mut(), fps)?;
        Ok(())
    }

    fn cleanup(&mut self, _engine: &mut Engine) {
        println!(
            "Final score: {} ({} of {} items)",
            self.game.score(),
            self.game.items().len() - self.game.remaining(),
            self.game.items().len()
        );
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = args.common.load_config()?;
    if let Some(frames) = args.frames {
        config.engine.max_frames = Some(frames);
    }
    if let Some(wind) = args.wind {
        config.platformer.wind_strength = wind;
    }

    // The view spans the world height and keeps the viewport's aspect ratio
    let aspect = config.viewport.width as f32 / config.viewport.height as f32;
    let height = config.platformer.world_height;
    let view = Vec2::new(height * aspect, height);
    let game = Platformer::new(&config.platformer, view);

    let backend: Box<dyn RenderBackend> = match args.svg {
        Some(path) => Box::new(SvgRenderer::new(config.viewport.width, config.viewport.height).with_target(path)),
        None => Box::new(
            ConsoleRenderer::stdout(config.console.columns, config.console.rows)
                .with_clear_screen(config.console.clear_screen),
        ),
    };
    let mut app = PlatformerApp {
        game,
        input: LineInput::stdin(KeyMode::Hold),
        rng: rng_from(&config),
    };

    Engine::run(config, backend, &mut app)?;
    Ok(())
}
