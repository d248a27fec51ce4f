//! Floodmap CLI - flood-hazard rasters to an interactive web map

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use floodmap_map::{build_map, DEFAULT_ZOOM};

#[derive(Parser)]
#[command(name = "floodmap")]
#[command(author, version, about = "Render flood-hazard rasters to an interactive web map", long_about = None)]
struct Cli {
    /// Directory scanned (non-recursive) for .tif rasters
    #[arg(short, long, default_value = "data")]
    input: PathBuf,

    /// Primary HTML output
    #[arg(short, long, default_value = "public/combined_flood_risk_map.html")]
    output: PathBuf,

    /// Publishing copy of the same document (e.g. a GitHub Pages root)
    #[arg(long, default_value = "combined_flood_risk_map.html")]
    publish: PathBuf,

    /// Initial map zoom level
    #[arg(long, default_value_t = DEFAULT_ZOOM)]
    zoom: u8,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn run(cli: &Cli) -> Result<()> {
    let start = Instant::now();

    let pb = spinner("Rendering rasters...");
    let doc = build_map(&cli.input, cli.zoom)
        .with_context(|| format!("Failed to build map from {}", cli.input.display()))?;
    pb.finish_and_clear();

    let Some(doc) = doc else {
        println!("No rasters found in {}", cli.input.display());
        return Ok(());
    };

    doc.save(&cli.output)
        .with_context(|| format!("Failed to save map to {}", cli.output.display()))?;
    println!("Map saved to: {}", cli.output.display());

    doc.save(&cli.publish)
        .with_context(|| format!("Failed to save publishing copy to {}", cli.publish.display()))?;
    println!("Publishing copy saved to: {}", cli.publish.display());

    println!("  Processing time: {:.2?}", start.elapsed());
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    // A failed run reports its diagnostics and ends; outputs from a prior
    // successful run are left untouched.
    if let Err(err) = run(&cli) {
        println!("Error: {err:?}");
    }
}
