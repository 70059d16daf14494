//! Headless frame simulation
//!
//! A player drifts right across a canvas scattered with collectibles. Each
//! frame the collectibles update in parallel, collisions are resolved on the
//! calling thread, and the frame is written out as an SVG document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;

use crate::core::config::SimulationConfig;
use crate::foundation::math::Vec2;
use crate::render::{Color, RenderBackend, SvgRenderer};

use super::collectible::Collectible;
use super::parallel::{parallel_update, worker_count};
use super::player::Player;
use super::GameplayError;

/// What happened during one simulated frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Zero-based frame index
    pub frame: u32,
    /// Positions of the collectibles picked up this frame
    pub collected: Vec<Vec2>,
    /// Score after this frame
    pub score: u32,
    /// Collectibles still on the canvas
    pub remaining: usize,
}

/// Outcome of a complete run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    /// Frames simulated
    pub frames: u32,
    /// Score at the end of the run
    pub final_score: u32,
    /// Collectibles picked up over the run
    pub collected: usize,
    /// Frame files written, in order
    pub files: Vec<PathBuf>,
}

/// The player-versus-collectibles frame loop
pub struct Simulation {
    config: SimulationConfig,
    player: Player,
    collectibles: Vec<Collectible>,
    workers: usize,
    frame: u32,
}

impl Simulation {
    /// Set up a run with collectibles at random integer canvas positions
    pub fn new<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Self {
        let width = config.canvas_width.max(1);
        let height = config.canvas_height.max(1);
        let collectibles = (0..config.collectible_count)
            .map(|_| {
                let position = Vec2::new(
                    rng.gen_range(0..width) as f32,
                    rng.gen_range(0..height) as f32,
                );
                Collectible::with_size(position, config.collectible_size, config.collectible_value)
            })
            .collect();
        Self::with_collectibles(config, collectibles)
    }

    /// Set up a run with a fixed collectible layout
    pub fn with_collectibles(config: &SimulationConfig, collectibles: Vec<Collectible>) -> Self {
        let player = Player::new(
            config.player_start,
            Vec2::new(config.player_size, config.player_size),
            config.player_speed,
        );
        let workers = worker_count(config.worker_threads);
        log::info!(
            "Simulation ready: {} collectibles, {} threads for collectible updates",
            collectibles.len(),
            workers
        );

        Self {
            config: config.clone(),
            player,
            collectibles,
            workers,
            frame: 0,
        }
    }

    /// The player
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// All collectibles, collected or not
    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    /// Worker threads used per frame
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Frames simulated so far
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Current score
    pub fn score(&self) -> u32 {
        self.player.score
    }

    /// Collectibles not yet picked up
    pub fn remaining(&self) -> usize {
        self.collectibles.iter().filter(|item| !item.collected).count()
    }

    /// Advance one frame: move the player, update collectibles, resolve pickups
    pub fn step(&mut self) -> Result<FrameReport, GameplayError> {
        let delta_time = self.config.delta_time;
        log::debug!("--- Frame {} ---", self.frame);

        self.player.set_velocity(Vec2::new(self.config.player_speed, 0.0));
        self.player.integrate(delta_time);

        let work = Duration::from_micros(self.config.simulated_work_micros);
        parallel_update(&mut self.collectibles, self.workers, |item| {
            item.update(delta_time, work)
        })?;

        let player_bounds = self.player.bounds();
        let mut collected = Vec::new();
        for item in self.collectibles.iter_mut() {
            if item.collected || !player_bounds.overlaps(&item.bounds) {
                continue;
            }
            item.collected = true;
            self.player.collect(item.value, 0);
            let position = item.position();
            log::info!(
                "Player collected Collectible at ({}, {})! Score: {}",
                position.x,
                position.y,
                self.player.score
            );
            collected.push(position);
        }

        let report = FrameReport {
            frame: self.frame,
            collected,
            score: self.player.score,
            remaining: self.remaining(),
        };
        self.frame += 1;
        Ok(report)
    }

    /// Draw the current state: a blue player and gold collectibles
    pub fn draw(&self, svg: &mut SvgRenderer) {
        svg.reset();
        svg.draw_rect(self.player.position, self.player.size, Color::BLUE);
        for item in self.collectibles.iter().filter(|item| !item.collected) {
            svg.draw_rect(item.bounds.origin, item.bounds.size, Color::GOLD);
        }
    }

    /// File name for frame `frame`
    pub fn frame_file_name(&self, frame: u32) -> String {
        format!("{}{}.svg", self.config.file_prefix, frame)
    }

    /// Run the configured number of frames, writing one SVG per frame into `out_dir`
    pub fn run(&mut self, out_dir: &Path) -> Result<SimulationSummary, GameplayError> {
        fs::create_dir_all(out_dir)?;
        let mut svg = SvgRenderer::new(self.config.canvas_width, self.config.canvas_height);
        let start_remaining = self.remaining();
        let mut files = Vec::with_capacity(self.config.frames as usize);

        for _ in 0..self.config.frames {
            let report = self.step()?;
            self.draw(&mut svg);
            let path = out_dir.join(self.frame_file_name(report.frame));
            svg.save_to_file(&path)?;
            log::trace!("Wrote {}", path.display());
            files.push(path);
        }

        let summary = SimulationSummary {
            frames: self.config.frames,
            final_score: self.player.score,
            collected: start_remaining - self.remaining(),
            files,
        };
        log::info!(
            "Simulation finished after {} frames. Final Score: {}",
            summary.frames,
            summary.final_score
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quick_config() -> SimulationConfig {
        SimulationConfig {
            simulated_work_micros: 0,
            worker_threads: Some(3),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_random_layout_stays_on_canvas() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = quick_config();
        let sim = Simulation::new(&config, &mut rng);
        assert_eq!(sim.collectibles().len(), 1000);
        assert!(sim.collectibles().iter().all(|item| {
            let p = item.position();
            p.x >= 0.0 && p.x < 800.0 && p.y >= 0.0 && p.y < 400.0 && p.x.fract() == 0.0
        }));
    }

    #[test]
    fn test_step_collects_overlapping_items() {
        let config = quick_config();
        let layout = vec![
            Collectible::new(Vec2::new(150.0, 110.0)),
            Collectible::new(Vec2::new(300.0, 100.0)),
            Collectible::new(Vec2::new(120.0, 120.0)),
        ];
        let mut sim = Simulation::with_collectibles(&config, layout);

        let report = sim.step().expect("step");
        assert_eq!(report.frame, 0);
        assert_eq!(report.collected.len(), 2);
        assert_eq!(report.score, 20);
        assert_eq!(report.remaining, 1);

        // Already collected items never score twice
        let report = sim.step().expect("step");
        assert!(report.collected.is_empty());
        assert_eq!(report.score, 20);
    }

    #[test]
    fn test_player_drifts_right() {
        let config = quick_config();
        let mut sim = Simulation::with_collectibles(&config, Vec::new());
        for _ in 0..60 {
            sim.step().expect("step");
        }
        approx::assert_relative_eq!(sim.player().position.x, 150.0, epsilon = 1e-2);
        approx::assert_relative_eq!(sim.player().position.y, 100.0);
    }

    #[test]
    fn test_draw_skips_collected() {
        let config = quick_config();
        let layout = vec![
            Collectible::new(Vec2::new(130.0, 100.0)),
            Collectible::new(Vec2::new(600.0, 300.0)),
        ];
        let mut sim = Simulation::with_collectibles(&config, layout);
        sim.step().expect("step");

        let mut svg = SvgRenderer::new(800, 400);
        sim.draw(&mut svg);
        let body = svg.body();
        assert_eq!(body.matches("fill=\"blue\"").count(), 1);
        assert_eq!(body.matches("fill=\"gold\"").count(), 1);
        assert!(body.contains("<rect x=\"600\" y=\"300\" width=\"20\" height=\"20\" fill=\"gold\"/>"));
    }

    #[test]
    fn test_run_writes_every_frame() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = SimulationConfig {
            frames: 5,
            collectible_count: 50,
            ..quick_config()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let mut sim = Simulation::new(&config, &mut rng);

        let summary = sim.run(dir.path()).expect("run");
        assert_eq!(summary.frames, 5);
        assert_eq!(summary.files.len(), 5);
        assert_eq!(summary.final_score, summary.collected as u32 * 10);
        assert_eq!(summary.files[4], dir.path().join("game_frame_4.svg"));

        let document = std::fs::read_to_string(&summary.files[0]).expect("read frame");
        assert!(document.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n"));
        assert!(document.contains("<svg width=\"800\" height=\"400\" xmlns=\"http://www.w3.org/2000/svg\">"));
        assert!(document.ends_with("</svg>\n"));
    }
}
