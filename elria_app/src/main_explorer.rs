//! Terminal scene explorer
//!
//! Renders the sandbox scene as ASCII art. Each line of input is one frame of
//! key taps: `w`, `qa`, `e` then `x` to weave, `click 40 12` to select.

use std::io::StdinLock;
use std::path::PathBuf;

use clap::Parser;
use elria_app::{CommonArgs, KeyMode, LineInput};
use elria_engine::prelude::*;

/// Explore the Epoch of Elria scene in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Write the final scene as HTML on exit
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Do not clear the terminal between frames
    #[arg(long)]
    no_clear: bool,
}

struct Explorer {
    input: LineInput<StdinLock<'static>>,
    html: Option<PathBuf>,
}

impl Application for Explorer {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let config = engine.config().clone();
        let projection = config.console.projection(&config.projection);
        engine.set_scene_renderer(SceneRenderer::new(projection, SceneStyle::cells()));
        log::info!("Scene explorer ready; type keys and press Enter (EOF quits)");
        engine.render()
    }

    fn poll_events(&mut self, _engine: &mut Engine) -> Result<Vec<AppEvent>, AppError> {
        self.input
            .next_events()
            .map_err(|e| AppError::Custom(format!("reading input: {}", e)))
    }

    fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        log::info!(
            "Explored {} frames; scene has {} objects",
            engine.frame(),
            engine.scene().len()
        );
        if let Some(path) = &self.html {
            let exporter = HtmlExporter::new(engine.config()).with_bindings(engine.bindings().clone());
            match exporter.write_to(engine.scene(), path) {
                Ok(path) => println!("Saved scene to {}", path.display()),
                Err(e) => log::error!("Could not save scene: {}", e),
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = args.common.load_config()?;
    if let Some(frames) = args.frames {
        config.engine.max_frames = Some(frames);
    }

    let backend = ConsoleRenderer::stdout(config.console.columns, config.console.rows)
        .with_clear_screen(config.console.clear_screen && !args.no_clear);
    let mut app = Explorer {
        input: LineInput::stdin(KeyMode::Tap),
        html: args.html,
    };

    Engine::run(config, Box::new(backend), &mut app)?;
    Ok(())
}
