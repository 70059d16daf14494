//! Headless simulation: a player sweeps across 1000 collectibles while the
//! collectibles update on worker threads. Every frame is written as an SVG.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use elria_app::{rng_from, CommonArgs};
use elria_engine::prelude::*;

/// Simulate the collectible sweep and write one SVG per frame
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Frames to simulate
    #[arg(long)]
    frames: Option<u32>,

    /// Number of collectibles
    #[arg(long)]
    collectibles: Option<usize>,

    /// Worker threads for collectible updates (default: available parallelism)
    #[arg(long)]
    threads: Option<usize>,

    /// Directory receiving the frame files
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = args.common.load_config()?;

    let simulation_config = &mut config.simulation;
    if let Some(frames) = args.frames {
        simulation_config.frames = frames;
    }
    if let Some(count) = args.collectibles {
        simulation_config.collectible_count = count;
    }
    if args.threads.is_some() {
        simulation_config.worker_threads = args.threads;
    }
    config.validate().context("invalid simulation settings")?;

    let out_dir = args
        .out_dir
        .unwrap_or_else(|| PathBuf::from(&config.simulation.output_dir));

    let mut rng = rng_from(&config);
    let mut simulation = Simulation::new(&config.simulation, &mut rng);
    println!("Using {} threads for collectible updates.", simulation.workers());

    let summary = simulation
        .run(&out_dir)
        .with_context(|| format!("simulation failed writing to {}", out_dir.display()))?;

    println!("Final Score: {}", summary.final_score);
    println!(
        "Collected {} of {} collectibles; wrote {} frames to {}",
        summary.collected,
        config.simulation.collectible_count,
        summary.files.len(),
        out_dir.display()
    );
    Ok(())
}
