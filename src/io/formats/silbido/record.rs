// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Record codec: one tonal annotation.
//!
//! # Record layout
//!
//! ```text
//! [confidence: f64]     FEAT_CONFIDENCE
//! [score: f64]          FEAT_SCORE
//! [species: text]       FEAT_SPECIES
//! [call: text]          FEAT_CALL
//! graph_id: u64
//! node_count: u32
//! node_count x Node
//! ```
//!
//! There is no per-record length or checksum: the reader stays aligned only
//! by consuming exactly `node_count` nodes. A node block that cannot be
//! decoded therefore fails the whole record.

use std::io::{BufRead, Write};

use tracing::trace;

use super::constants::{
    FEAT_CALL, FEAT_CONFIDENCE, FEAT_FREQ, FEAT_RIDGE, FEAT_SCORE, FEAT_SPECIES, FEAT_TIME,
    FORMAT_VERSION,
};
use super::field::{encoded_text_size, FieldReader, FieldWriter};
use super::node::{decode_node, encode_node, NodeFlags, NodeLayout, RidgeEncoding};
use crate::{CodecError, Result, TonalRecord};

/// Upper bound on nodes pre-allocated from an untrusted count.
const MAX_NODE_PREALLOC: usize = 1024;

/// Per-file record layout, derived once from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    /// Confidence is encoded
    pub confidence: bool,
    /// Score is encoded
    pub score: bool,
    /// Species label is encoded
    pub species: bool,
    /// Call label is encoded
    pub call: bool,
    /// Node layout
    pub node: NodeLayout,
}

impl RecordLayout {
    /// Layout written by this crate: every record field present.
    pub fn current(flags: NodeFlags) -> Self {
        Self {
            confidence: true,
            score: true,
            species: true,
            call: true,
            node: NodeLayout::current(flags),
        }
    }

    /// Layout described by a header's version and feature mask.
    ///
    /// Fails with `UnsupportedFormat` when time or frequency is missing,
    /// since a contour without geometry cannot be represented.
    pub fn for_header(version: u16, features: u16) -> Result<Self> {
        if features & FEAT_TIME == 0 || features & FEAT_FREQ == 0 {
            return Err(CodecError::unsupported(format!(
                "feature mask {features:#06x} lacks time or frequency"
            )));
        }
        Ok(Self {
            confidence: features & FEAT_CONFIDENCE != 0,
            score: features & FEAT_SCORE != 0,
            species: features & FEAT_SPECIES != 0,
            call: features & FEAT_CALL != 0,
            node: NodeLayout::for_header(version, features)?,
        })
    }

    /// Record and node feature bits this layout encodes.
    pub fn features(&self, version: u16) -> u16 {
        let mut features = FEAT_TIME | FEAT_FREQ | self.node.flags.to_features();
        if self.confidence {
            features |= FEAT_CONFIDENCE;
        }
        if self.score {
            features |= FEAT_SCORE;
        }
        if self.species {
            features |= FEAT_SPECIES;
        }
        if self.call {
            features |= FEAT_CALL;
        }
        if version == FORMAT_VERSION || self.node.ridge != RidgeEncoding::Omitted {
            features |= FEAT_RIDGE;
        }
        features
    }

    /// Encoded size of `record` in bytes.
    pub fn encoded_size(&self, record: &TonalRecord) -> usize {
        let mut size = 8 + 4;
        if self.confidence {
            size += 8;
        }
        if self.score {
            size += 8;
        }
        if self.species {
            size += encoded_text_size(record.species.as_deref());
        }
        if self.call {
            size += encoded_text_size(record.call.as_deref());
        }
        size + record.nodes.len() * self.node.encoded_size()
    }
}

/// Read a label; bytes that are not UTF-8 make the record corrupt.
///
/// Labels precede the node count, so the error reports `declared` as 0.
fn read_label<R: BufRead>(
    reader: &mut FieldReader<R>,
    field: &str,
    index: u64,
) -> Result<Option<String>> {
    let position = reader.position();
    match reader.read_text_bytes(field)? {
        None => Ok(None),
        Some(bytes) => String::from_utf8(bytes).map(Some).map_err(|e| {
            CodecError::corrupt(
                index,
                0,
                0,
                format!("{field} at position {position} is not UTF-8: {e}"),
            )
        }),
    }
}

/// Decode one record.
///
/// `index` is the record's position in the file, used in error reports.
/// Truncation inside the metadata prefix is `TruncatedInput`. A label that
/// is not UTF-8, or any failure inside the node block, is `CorruptRecord`.
/// No partial record is returned.
pub fn decode_record<R: BufRead>(
    reader: &mut FieldReader<R>,
    layout: &RecordLayout,
    index: u64,
) -> Result<TonalRecord> {
    let confidence = if layout.confidence {
        reader.read_f64("record.confidence")?
    } else {
        0.0
    };
    let score = if layout.score {
        reader.read_f64("record.score")?
    } else {
        0.0
    };
    let species = if layout.species {
        read_label(reader, "record.species", index)?
    } else {
        None
    };
    let call = if layout.call {
        read_label(reader, "record.call", index)?
    } else {
        None
    };
    let graph_id = reader.read_u64("record.graph_id")?;
    let declared = reader.read_u32("record.node_count")?;

    let mut nodes = Vec::with_capacity((declared as usize).min(MAX_NODE_PREALLOC));
    for decoded in 0..declared {
        match decode_node(reader, &layout.node) {
            Ok(node) => nodes.push(node),
            Err(e) if e.is_malformed_input() => {
                return Err(CodecError::corrupt(index, declared, decoded, e.to_string()))
            }
            Err(e) => return Err(e),
        }
    }

    trace!(index, nodes = declared, graph_id, "decoded tonal record");

    Ok(TonalRecord {
        species,
        call,
        graph_id,
        confidence,
        score,
        nodes,
    })
}

/// Encode one record.
///
/// The node count is always taken from `record.nodes.len()`.
pub fn encode_record<W: Write>(
    writer: &mut FieldWriter<W>,
    layout: &RecordLayout,
    record: &TonalRecord,
) -> Result<()> {
    let count = u32::try_from(record.nodes.len()).map_err(|_| {
        CodecError::overflow("record.node_count", record.nodes.len(), u32::MAX as usize)
    })?;

    if layout.confidence {
        writer.write_f64(record.confidence)?;
    }
    if layout.score {
        writer.write_f64(record.score)?;
    }
    if layout.species {
        writer.write_text(record.species.as_deref(), "record.species")?;
    }
    if layout.call {
        writer.write_text(record.call.as_deref(), "record.call")?;
    }
    writer.write_u64(record.graph_id)?;
    writer.write_u32(count)?;
    for node in &record.nodes {
        encode_node(writer, &layout.node, node)?;
    }
    Ok(())
}
