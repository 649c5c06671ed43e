// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tonalcodec::{
    detect_format, FileFormat, FileHeader, TonalReader, TonalRecord, WriterConfig,
};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// JSON form of an annotation file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonDocument {
    /// Header comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Header timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Header user version
    #[serde(default)]
    pub user_version: u16,
    /// Records in file order
    #[serde(default)]
    pub tonals: Vec<TonalRecord>,
}

impl JsonDocument {
    /// Writer configuration carrying this document's header fields.
    pub fn writer_config(&self) -> WriterConfig {
        WriterConfig {
            comment: self.comment.clone(),
            timestamp: self.timestamp.clone(),
            user_version: self.user_version,
        }
    }
}

/// Writer configuration that preserves a source file's header text.
pub fn header_config(header: &FileHeader) -> WriterConfig {
    WriterConfig {
        comment: header.comment.clone(),
        timestamp: header.timestamp.clone(),
        user_version: header.user_version,
    }
}

/// Format seconds as `h:mm:ss.mmm` (or `m:ss.mmm` under an hour).
pub fn format_seconds(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let secs = (total_ms / 1000) % 60;
    let minutes = (total_ms / 60_000) % 60;
    let hours = total_ms / 3_600_000;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}.{ms:03}")
    } else {
        format!("{minutes}:{secs:02}.{ms:03}")
    }
}

/// Format an optional float, or `-` when absent.
pub fn format_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "-".to_string(),
    }
}

/// Parse a time range in seconds.
///
/// Formats: "start,end" or "start:end".
pub fn parse_time_range(s: &str) -> CliResult<(f64, f64)> {
    let (start, end) = s
        .split_once(',')
        .or_else(|| s.split_once(':'))
        .ok_or_else(|| anyhow::anyhow!("Time range must be in format: start,end or start:end"))?;

    let start: f64 = start
        .trim()
        .parse()
        .with_context(|| format!("Invalid start time: {start}"))?;
    let end: f64 = end
        .trim()
        .parse()
        .with_context(|| format!("Invalid end time: {end}"))?;

    if end <= start {
        return Err(anyhow::anyhow!("End time must be after start time"));
    }

    Ok((start, end))
}

/// Open an annotation file, refusing files that are clearly something else.
pub fn open_reader(path: &Path) -> Result<TonalReader<File>> {
    match detect_format(path)? {
        FileFormat::Json => Err(anyhow::anyhow!(
            "{} looks like JSON; use `convert from-json` first",
            path.display()
        )),
        _ => Ok(TonalReader::open(path)?),
    }
}

/// Load a JSON document.
pub fn read_json(path: &Path) -> Result<JsonDocument> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let doc = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(doc)
}

/// Save a JSON document, pretty-printed.
pub fn write_json(path: &Path, doc: &JsonDocument) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, doc)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0.0), "0:00.000");
        assert_eq!(format_seconds(685.6), "11:25.600");
        assert_eq!(format_seconds(3725.25), "1:02:05.250");
    }

    #[test]
    fn test_format_opt() {
        assert_eq!(format_opt(Some(1.23456), 2), "1.23");
        assert_eq!(format_opt(None, 2), "-");
    }

    #[test]
    fn test_parse_time_range() {
        assert_eq!(parse_time_range("1.5,3").unwrap(), (1.5, 3.0));
        assert_eq!(parse_time_range("10:20").unwrap(), (10.0, 20.0));
        assert!(parse_time_range("5,1").is_err());
        assert!(parse_time_range("abc").is_err());
        assert!(parse_time_range("x,2").is_err());
    }

    #[test]
    fn test_json_document_defaults() {
        let doc: JsonDocument = serde_json::from_str(r#"{"tonals": []}"#).unwrap();
        assert_eq!(doc, JsonDocument::default());
        assert_eq!(doc.writer_config(), WriterConfig::default());
    }
}
