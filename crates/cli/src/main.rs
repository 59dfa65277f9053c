//! docsynth - Synthetic document page generator
//!
//! Generates annotated page images for training layout detectors.
//!
//! # Usage
//!
//! ```bash
//! # 500 packed pages with the default layout
//! docsynth generate --pages 500 --out ./dataset
//!
//! # Free layout from a config file, real photos, 8 worker threads
//! docsynth generate --config free.json --pages 200 --out ./dataset \
//!     --photos-science ./photos/science --photos-other ./photos/other --jobs 8
//!
//! # Convert the COCO file to YOLO label files
//! docsynth yolo --annotations ./dataset/annotations.json --out ./dataset/labels
//!
//! # Category balance of a dataset
//! docsynth stats --annotations ./dataset/annotations.json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod sink;

use commands::generate::GenerateCommand;
use commands::stats::StatsCommand;
use commands::yolo::YoloCommand;

#[derive(Parser)]
#[command(
    name = "docsynth",
    version,
    about = "Synthetic document page layouts with COCO/YOLO annotations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate annotated pages into a directory
    Generate(GenerateCommand),

    /// Write YOLO label files from a COCO annotation file
    Yolo(YoloCommand),

    /// Print per-category annotation counts
    Stats(StatsCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    match cli.command {
        Commands::Generate(cmd) => cmd.execute(),
        Commands::Yolo(cmd) => cmd.execute(),
        Commands::Stats(cmd) => cmd.execute(),
    }
}
