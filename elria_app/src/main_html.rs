//! Export the sandbox scene as an interactive HTML page and open it

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use elria_app::CommonArgs;
use elria_engine::prelude::*;
use elria_engine::render::DEFAULT_HTML_FILE;

/// Write the Epoch of Elria scene as a standalone HTML page
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Output file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_HTML_FILE)]
    output: PathBuf,

    /// Only write the file; do not launch a browser
    #[arg(long)]
    no_open: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.common.load_config()?;

    let scene = Scene::default_sandbox(&config.scene, &config.camera);
    let bindings = KeyBindings::from_config(&config.controls)?;
    let exporter = HtmlExporter::new(&config).with_bindings(bindings);
    let path = exporter
        .write_to(&scene, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Generated {} with {} objects", path.display(), scene.len());

    if args.no_open {
        return Ok(());
    }
    match HtmlExporter::open_in_browser(&path) {
        Ok(()) => println!("Opened in your default browser"),
        Err(e) => {
            log::warn!("{}", e);
            println!("Open {} in a web browser to explore the scene", path.display());
        }
    }
    Ok(())
}
