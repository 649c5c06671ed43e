// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Tonalcodec CLI
//!
//! Command-line tool for silbido tonal annotation files.
//!
//! ## Usage
//!
//! ```sh
//! # Show file information
//! tonalcodec inspect info tonals.bin
//!
//! # List records
//! tonalcodec inspect records tonals.bin --limit 20
//!
//! # Export to JSON and back
//! tonalcodec convert to-json tonals.bin tonals.json
//! tonalcodec convert from-json tonals.json tonals.bin
//!
//! # Keep only one species
//! tonalcodec extract species tonals.bin dolphins.bin "Delphinus delphis"
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{ConvertCmd, ExtractCmd, InspectCmd};
use common::Result;

/// Tonalcodec - silbido tonal annotation toolkit
///
/// Inspect, convert and filter binary whistle/moan annotation files.
#[derive(Parser, Clone)]
#[command(name = "tonalcodec")]
#[command(about = "Silbido tonal annotation toolkit", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Inspect file contents (info, records, contours)
    #[command(subcommand)]
    Inspect(InspectCmd),

    /// Convert between formats (to-json, from-json, upgrade)
    #[command(subcommand)]
    Convert(ConvertCmd),

    /// Extract subsets of records (by species, time)
    #[command(subcommand)]
    Extract(ExtractCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect(cmd) => cmd.run(),
        Commands::Convert(cmd) => cmd.run(),
        Commands::Extract(cmd) => cmd.run(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
