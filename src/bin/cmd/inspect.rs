// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - show file information, records, contours.

use std::path::PathBuf;

use clap::Subcommand;

use crate::common::{format_opt, format_seconds, open_reader, Result};
use tonalcodec::AnnotationSummary;

/// Inspect file contents.
#[derive(Subcommand, Clone, Debug)]
pub enum InspectCmd {
    /// Show header fields and a summary of the records
    Info {
        /// Input annotation file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List records, one per line
    Records {
        /// Input annotation file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Stop after this many records
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print the time/frequency points of each record
    Contours {
        /// Input annotation file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        match self {
            InspectCmd::Info { input, json } => cmd_info(input, json),
            InspectCmd::Records { input, limit } => cmd_records(input, limit),
            InspectCmd::Contours { input } => cmd_contours(input),
        }
    }
}

/// Cmd: Show file info
fn cmd_info(input: PathBuf, json: bool) -> Result<()> {
    let mut reader = open_reader(&input)?;
    let summary = AnnotationSummary::from_reader(&mut reader)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("=== {} ===", input.display());
    println!("Version: {}", summary.version);
    println!("Features: {}", summary.features.join(", "));
    println!("User version: {}", summary.user_version);
    if let Some(comment) = &summary.comment {
        println!("Comment: {comment}");
    }
    if let Some(timestamp) = &summary.timestamp {
        println!("Timestamp: {timestamp}");
    }
    println!("Records: {}", summary.records);
    println!("Nodes: {}", summary.nodes);
    println!("Empty records: {}", summary.empty_records);
    println!("Graph-linked records: {}", summary.graph_linked);

    if let (Some(start), Some(end)) = (summary.start_time, summary.end_time) {
        println!("Start: {}", format_seconds(start));
        println!("End: {}", format_seconds(end));
        println!("Duration: {}", format_seconds(summary.duration()));
    }
    if let (Some(lo), Some(hi)) = (summary.min_freq, summary.max_freq) {
        println!("Frequency: {lo:.1} - {hi:.1} Hz");
    }

    if !summary.species.is_empty() {
        println!();
        println!("Species:");
        for (species, count) in &summary.species {
            println!("  {species}: {count} records");
        }
    }

    Ok(())
}

/// Cmd: List records
fn cmd_records(input: PathBuf, limit: Option<usize>) -> Result<()> {
    let mut reader = open_reader(&input)?;

    println!("=== Records in {} ===", input.display());
    println!();

    let mut shown = 0usize;
    while let Some(record) = reader.next_record()? {
        if limit.is_some_and(|max| shown >= max) {
            println!("... (limit reached)");
            break;
        }
        let graph = if record.has_graph() {
            record.graph_id.to_string()
        } else {
            "-".to_string()
        };
        println!(
            "[{}] {} | {} | graph {} | conf {:.3} | score {:.3} | {} nodes | {} - {}",
            shown,
            record.species.as_deref().unwrap_or("-"),
            record.call.as_deref().unwrap_or("-"),
            graph,
            record.confidence,
            record.score,
            record.nodes.len(),
            format_opt(record.start_time(), 3),
            format_opt(record.end_time(), 3),
        );
        shown += 1;
    }

    Ok(())
}

/// Cmd: Print contours
fn cmd_contours(input: PathBuf) -> Result<()> {
    let mut reader = open_reader(&input)?;

    for (i, contour) in reader.time_frequency_contours()?.iter().enumerate() {
        println!("# tonal {i} ({} points)", contour.len());
        for (time, freq) in contour {
            println!("{time:.6}\t{freq:.3}");
        }
    }

    Ok(())
}
