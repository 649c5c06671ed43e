// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Convert command - move annotations between binary and JSON forms.

use std::path::PathBuf;

use clap::Subcommand;

use crate::common::{header_config, open_reader, read_json, write_json, JsonDocument, Result};
use tonalcodec::io::formats::silbido::constants::FORMAT_VERSION;
use tonalcodec::{TonalWriter, WriterBuilder};

/// Convert between formats.
#[derive(Subcommand, Clone, Debug)]
pub enum ConvertCmd {
    /// Export a binary annotation file to JSON
    ToJson {
        /// Input annotation file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output JSON file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Build a binary annotation file from JSON
    FromJson {
        /// Input JSON file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output annotation file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Header comment (overrides the JSON document's)
        #[arg(short, long)]
        comment: Option<String>,

        /// Stamp the header with the current UTC time
        #[arg(long)]
        timestamp_now: bool,
    },

    /// Rewrite any readable annotation file in the current format version
    Upgrade {
        /// Input annotation file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output annotation file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
}

impl ConvertCmd {
    pub fn run(self) -> Result<()> {
        match self {
            ConvertCmd::ToJson { input, output } => cmd_to_json(input, output),
            ConvertCmd::FromJson {
                input,
                output,
                comment,
                timestamp_now,
            } => cmd_from_json(input, output, comment, timestamp_now),
            ConvertCmd::Upgrade { input, output } => cmd_upgrade(input, output),
        }
    }
}

/// Binary to JSON.
fn cmd_to_json(input: PathBuf, output: PathBuf) -> Result<()> {
    let mut reader = open_reader(&input)?;
    let header = reader.header().clone();
    let doc = JsonDocument {
        comment: header.comment,
        timestamp: header.timestamp,
        user_version: header.user_version,
        tonals: reader.read_all()?,
    };
    write_json(&output, &doc)?;

    println!("Exported {} tonals to {}", doc.tonals.len(), output.display());
    Ok(())
}

/// JSON to binary.
fn cmd_from_json(
    input: PathBuf,
    output: PathBuf,
    comment: Option<String>,
    timestamp_now: bool,
) -> Result<()> {
    let doc = read_json(&input)?;

    let mut builder = WriterBuilder::from_config(doc.writer_config()).path(&output);
    if let Some(comment) = comment {
        builder = builder.comment(comment);
    }
    if timestamp_now {
        builder = builder.timestamp_now();
    }

    let stats = builder.create()?.write(&doc.tonals)?;
    println!(
        "Wrote {} tonals ({} nodes, {} bytes) to {}",
        stats.records,
        stats.nodes,
        stats.bytes,
        output.display()
    );
    Ok(())
}

/// Legacy or current binary to current binary.
fn cmd_upgrade(input: PathBuf, output: PathBuf) -> Result<()> {
    let mut reader = open_reader(&input)?;
    let header = reader.header().clone();
    let records = reader.read_all()?;

    let stats = TonalWriter::create(&output, header_config(&header))?.write(&records)?;

    println!(
        "Upgraded version {} -> {}: {} tonals, {} bytes",
        header.version, FORMAT_VERSION, stats.records, stats.bytes
    );
    Ok(())
}
