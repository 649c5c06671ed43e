// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Extract command - write a subset of records to a new file.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::common::{header_config, open_reader, parse_time_range, Result};
use tonalcodec::{TonalRecord, TonalWriter};

/// Extract subsets of records.
#[derive(Subcommand, Clone, Debug)]
pub enum ExtractCmd {
    /// Keep records with the given species label
    Species {
        /// Input annotation file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output annotation file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Species label to keep (exact match)
        #[arg(value_name = "SPECIES")]
        species: String,
    },

    /// Keep records overlapping a time range in seconds
    Time {
        /// Input annotation file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output annotation file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Range as "start,end" or "start:end"
        #[arg(value_name = "RANGE")]
        range: String,
    },
}

impl ExtractCmd {
    pub fn run(self) -> Result<()> {
        match self {
            ExtractCmd::Species {
                input,
                output,
                species,
            } => filter_records(&input, &output, |r| {
                r.species.as_deref() == Some(species.as_str())
            }),
            ExtractCmd::Time {
                input,
                output,
                range,
            } => {
                let (start, end) = parse_time_range(&range)?;
                filter_records(&input, &output, |r| overlaps(r, start, end))
            }
        }
    }
}

/// True if any part of the contour falls in `[start, end]`.
fn overlaps(record: &TonalRecord, start: f64, end: f64) -> bool {
    match (record.start_time(), record.end_time()) {
        (Some(s), Some(e)) => s.min(e) <= end && s.max(e) >= start,
        _ => false,
    }
}

fn filter_records<F>(input: &Path, output: &Path, keep: F) -> Result<()>
where
    F: Fn(&TonalRecord) -> bool,
{
    let mut reader = open_reader(input)?;
    let header = reader.header().clone();

    let mut total = 0usize;
    let mut kept = Vec::new();
    for record in reader.records() {
        let record = record?;
        total += 1;
        if keep(&record) {
            kept.push(record);
        }
    }

    TonalWriter::create(output, header_config(&header))?.write(&kept)?;

    println!("Kept {} of {} tonals -> {}", kept.len(), total, output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlaps() {
        let record = TonalRecord::from_contour(vec![(10.0, 1.0), (12.0, 1.0)]);
        assert!(overlaps(&record, 11.0, 20.0));
        assert!(overlaps(&record, 0.0, 10.0));
        assert!(!overlaps(&record, 12.5, 13.0));
        assert!(!overlaps(&TonalRecord::new(), 0.0, 100.0));
    }
}
