//! Shared pieces of the Epoch of Elria demo binaries
//!
//! Terminal frontends have no key-up events, so input arrives one line per
//! frame. A line lists keys (`wd`, `space`, `esc`) and optional pointer
//! commands (`click 12 7`, `resize 120 40`). End of input closes the window.

use std::io::{self, BufRead, StdinLock};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use elria_engine::foundation::logging;
use elria_engine::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Flags understood by every binary
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Configuration file (.toml or .ron); a missing file means defaults
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Seed for random placement
    #[arg(long)]
    pub seed: Option<u64>,
}

impl CommonArgs {
    /// Load the configuration, apply flag overrides, start logging and validate
    pub fn load_config(&self) -> anyhow::Result<ApplicationConfig> {
        let mut config = match &self.config {
            Some(path) => ApplicationConfig::load_or_default(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ApplicationConfig::default(),
        };
        if let Some(level) = &self.log_level {
            config.engine.log_level = level.clone();
        }
        if let Some(seed) = self.seed {
            config.engine.rng_seed = Some(seed);
        }

        logging::init_with_level(&config.engine.log_level);
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

/// RNG seeded from the configuration, or from entropy when no seed is set
pub fn rng_from(config: &ApplicationConfig) -> StdRng {
    match config.engine.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// How keys listed on a line are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// Each key is pressed and released within the frame
    Tap,
    /// Keys stay held until a line no longer lists them
    Hold,
}

#[derive(Debug, Default, PartialEq)]
struct ParsedLine {
    keys: Vec<KeyCode>,
    pointer: Vec<AppEvent>,
    close: bool,
}

fn push_key(keys: &mut Vec<KeyCode>, key: KeyCode) {
    if !keys.contains(&key) {
        keys.push(key);
    }
}

fn parse_line(line: &str) -> ParsedLine {
    let mut parsed = ParsedLine::default();

    let mut tokens = line.split_whitespace();
    while let Some(token) = tokens.next() {
        match token.to_ascii_lowercase().as_str() {
            "quit" | "exit" => parsed.close = true,
            "click" => {
                let x = tokens.next().and_then(|t| t.parse::<f64>().ok());
                let y = tokens.next().and_then(|t| t.parse::<f64>().ok());
                if let (Some(x), Some(y)) = (x, y) {
                    parsed.pointer.push(AppEvent::MouseMoved { x, y });
                    parsed.pointer.push(AppEvent::MouseButton { button: MouseButton::Left, pressed: true });
                    parsed.pointer.push(AppEvent::MouseButton { button: MouseButton::Left, pressed: false });
                } else {
                    log::warn!("Usage: click <x> <y>");
                }
            }
            "resize" => {
                let width = tokens.next().and_then(|t| t.parse::<u32>().ok());
                let height = tokens.next().and_then(|t| t.parse::<u32>().ok());
                if let (Some(width), Some(height)) = (width, height) {
                    parsed.pointer.push(AppEvent::WindowResized { width, height });
                } else {
                    log::warn!("Usage: resize <width> <height>");
                }
            }
            _ => match KeyCode::from_name(token).filter(|_| token.chars().count() > 1) {
                Some(key) => push_key(&mut parsed.keys, key),
                None => {
                    for ch in token.chars() {
                        match KeyCode::from_char(ch) {
                            Some(key) => push_key(&mut parsed.keys, key),
                            None => log::debug!("Ignoring input character {:?}", ch),
                        }
                    }
                }
            },
        }
    }
    parsed
}

/// Line-oriented event source
pub struct LineInput<R> {
    reader: R,
    mode: KeyMode,
    held: Vec<KeyCode>,
    closed: bool,
}

impl LineInput<StdinLock<'static>> {
    /// Read from standard input
    pub fn stdin(mode: KeyMode) -> Self {
        Self::new(io::stdin().lock(), mode)
    }
}

impl<R: BufRead> LineInput<R> {
    /// Read lines from `reader`
    pub fn new(reader: R, mode: KeyMode) -> Self {
        Self {
            reader,
            mode,
            held: Vec::new(),
            closed: false,
        }
    }

    /// Whether end of input has been reached
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Block for the next line and translate it into events
    pub fn next_events(&mut self) -> io::Result<Vec<AppEvent>> {
        if self.closed {
            return Ok(vec![AppEvent::WindowCloseRequested]);
        }

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            self.closed = true;
            let mut events: Vec<AppEvent> = self.held.drain(..).map(AppEvent::KeyReleased).collect();
            events.push(AppEvent::WindowCloseRequested);
            return Ok(events);
        }

        let parsed = parse_line(&line);
        let mut events = Vec::new();
        match self.mode {
            KeyMode::Tap => {
                for &key in &parsed.keys {
                    events.push(AppEvent::KeyPressed(key));
                    events.push(AppEvent::KeyReleased(key));
                }
            }
            KeyMode::Hold => {
                events.extend(
                    self.held
                        .iter()
                        .filter(|key| !parsed.keys.contains(key))
                        .map(|&key| AppEvent::KeyReleased(key)),
                );
                events.extend(
                    parsed
                        .keys
                        .iter()
                        .filter(|key| !self.held.contains(key))
                        .map(|&key| AppEvent::KeyPressed(key)),
                );
                self.held = parsed.keys;
            }
        }
        events.extend(parsed.pointer);
        if parsed.close {
            self.closed = true;
            events.push(AppEvent::WindowCloseRequested);
        }
        Ok(events)
    }
}

/// Dispatch an event for a game that draws its own world instead of the scene
///
/// Keys and the pointer only update the input state, so held movement keys
/// never steer the scene camera. The quit binding still ends the loop.
pub fn handle_game_event(engine: &mut Engine, event: AppEvent) -> Result<(), AppError> {
    let pressed = match &event {
        AppEvent::KeyPressed(key) | AppEvent::KeyInput { key, pressed: true } => Some(*key),
        _ => None,
    };
    engine.handle_input_event(event)?;
    if pressed.and_then(|key| engine.bindings().command_for(key)) == Some(SceneCommand::Quit) {
        engine.quit();
    }
    Ok(())
}
