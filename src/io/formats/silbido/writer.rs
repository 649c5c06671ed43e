// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Annotation file writer.
//!
//! The writer sees the complete record set before emitting anything, so the
//! snr/phase flags can be decided once for the whole file: if any node of any
//! record carries a value, every node in the file gets a slot for it and
//! nodes without a value store the absent marker.
//!
//! Output is not rolled back on failure. If the sink errors part way, the
//! destination holds a partial file and should be discarded by the caller.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use tonalcodec::{TfNode, TonalRecord, TonalWriter, WriterConfig};
//!
//! let tonal = TonalRecord::new()
//!     .with_species("Balaenoptera musculus")
//!     .with_call("D")
//!     .with_nodes(vec![TfNode::new(685.0, 50.0), TfNode::new(685.1, 49.5)]);
//!
//! let writer = TonalWriter::create("annotations.bin", WriterConfig::default())?;
//! let stats = writer.write(&[tonal])?;
//! println!("wrote {} bytes", stats.bytes);
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use super::constants::{FORMAT_VERSION, TEXT_MAX_LEN};
use super::encode_record;
use super::field::FieldWriter;
use super::header::FileHeader;
use super::node::NodeFlags;
use super::record::RecordLayout;
use crate::io::writer::WriterConfig;
use crate::{CodecError, Result, TonalRecord};

/// Totals for one completed write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteStats {
    /// Records written
    pub records: u64,
    /// Nodes written across all records
    pub nodes: u64,
    /// Bytes written, header included
    pub bytes: u64,
    /// Header feature mask
    pub features: u16,
}

/// Single-pass writer of tonal records.
pub struct TonalWriter<W> {
    sink: W,
    config: WriterConfig,
}

impl TonalWriter<BufWriter<File>> {
    /// Create (or truncate) the file at `path`.
    pub fn create<P: AsRef<Path>>(path: P, config: WriterConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            CodecError::io(
                "TonalWriter::create",
                format!("failed to create {}: {e}", path.display()),
            )
        })?;
        Ok(Self::with_config(BufWriter::new(file), config))
    }
}

impl<W: Write> TonalWriter<W> {
    /// Writer with the default configuration: no comment or timestamp.
    pub fn new(sink: W) -> Self {
        Self::with_config(sink, WriterConfig::default())
    }

    /// Writer with an explicit configuration.
    pub fn with_config(sink: W, config: WriterConfig) -> Self {
        Self { sink, config }
    }

    /// The writer configuration.
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Header that [`write`](Self::write) would emit for `records`.
    pub fn header_for(&self, records: &[TonalRecord]) -> Result<FileHeader> {
        let layout = RecordLayout::current(NodeFlags::for_records(records));
        FileHeader::new(
            layout.features(FORMAT_VERSION),
            self.config.user_version,
            self.config.comment.clone(),
            self.config.timestamp.clone(),
        )
    }

    /// Write the header and then every record in order, and flush.
    pub fn write(self, records: &[TonalRecord]) -> Result<WriteStats> {
        validate(records)?;
        let header = self.header_for(records)?;
        let layout = header.layout()?;

        let mut out = FieldWriter::new(self.sink);
        header.write(&mut out)?;
        let mut nodes = 0u64;
        for record in records {
            encode_record(&mut out, &layout, record)?;
            nodes += record.nodes.len() as u64;
        }
        out.flush()?;

        let stats = WriteStats {
            records: records.len() as u64,
            nodes,
            bytes: out.position(),
            features: header.features,
        };
        debug!(
            records = stats.records,
            nodes = stats.nodes,
            bytes = stats.bytes,
            snr = layout.node.flags.snr,
            phase = layout.node.flags.phase,
            "wrote annotation file"
        );
        Ok(stats)
    }

    /// Write geometry-only contours as records without metadata.
    pub fn write_contours(self, contours: &[Vec<(f64, f64)>]) -> Result<WriteStats> {
        let records: Vec<TonalRecord> = contours
            .iter()
            .map(|c| TonalRecord::from_contour(c.iter().copied()))
            .collect();
        self.write(&records)
    }
}

/// Reject records that cannot be encoded before any byte is written.
fn validate(records: &[TonalRecord]) -> Result<()> {
    for record in records {
        for (field, label) in [
            ("record.species", &record.species),
            ("record.call", &record.call),
        ] {
            if let Some(text) = label {
                if text.len() > TEXT_MAX_LEN {
                    return Err(CodecError::overflow(field, text.len(), TEXT_MAX_LEN));
                }
            }
        }
        if record.nodes.len() > u32::MAX as usize {
            return Err(CodecError::overflow(
                "record.node_count",
                record.nodes.len(),
                u32::MAX as usize,
            ));
        }
    }
    Ok(())
}

/// Write `records` to a new file at `path`.
pub fn write_tonals<P: AsRef<Path>>(path: P, records: &[TonalRecord]) -> Result<WriteStats> {
    TonalWriter::create(path, WriterConfig::default())?.write(records)
}

/// Write geometry-only contours to a new file at `path`.
pub fn write_contours<P: AsRef<Path>>(
    path: P,
    contours: &[Vec<(f64, f64)>],
) -> Result<WriteStats> {
    TonalWriter::create(path, WriterConfig::default())?.write_contours(contours)
}
