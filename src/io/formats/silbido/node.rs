// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Node codec: one time-frequency sample of a contour.
//!
//! # Node layout
//!
//! | Field | Encoding | Present when |
//! |---|---|---|
//! | time | f64 | always |
//! | freq | f64 | always |
//! | snr | f64 | `FEAT_SNR` set |
//! | phase | f64 | `FEAT_PHASE` set |
//! | ridge | u8 (0/1) | always (version 5) |
//!
//! Version 4 files store ridge as an f64 and only when `FEAT_RIDGE` is set.
//!
//! The layout is an explicit value handed to every call, derived once from
//! the file header.

use std::io::{BufRead, Write};

use super::constants::{
    ABSENT_F64_BITS, FEAT_PHASE, FEAT_RIDGE, FEAT_SNR, FORMAT_VERSION, LEGACY_VERSION,
};
use super::field::{FieldReader, FieldWriter};
use crate::{CodecError, Result, TfNode, TonalRecord};

/// Which optional per-node attributes are encoded in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeFlags {
    /// Every node carries an snr slot
    pub snr: bool,
    /// Every node carries a phase slot
    pub phase: bool,
}

impl NodeFlags {
    /// Extract the flags from a header feature mask.
    pub fn from_features(features: u16) -> Self {
        Self {
            snr: features & FEAT_SNR != 0,
            phase: features & FEAT_PHASE != 0,
        }
    }

    /// Feature bits for these flags.
    pub fn to_features(self) -> u16 {
        let mut features = 0;
        if self.snr {
            features |= FEAT_SNR;
        }
        if self.phase {
            features |= FEAT_PHASE;
        }
        features
    }

    /// Flags needed to store `records` without losing any attribute.
    ///
    /// A flag is set when any node of any record carries that attribute.
    pub fn for_records(records: &[TonalRecord]) -> Self {
        let mut flags = Self::default();
        for node in records.iter().flat_map(|r| r.nodes.iter()) {
            flags.snr |= node.snr.is_some();
            flags.phase |= node.phase.is_some();
            if flags.snr && flags.phase {
                break;
            }
        }
        flags
    }
}

/// How the ridge flag is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RidgeEncoding {
    /// One byte, 0 or 1
    Byte,
    /// An f64, nonzero meaning true
    Float,
    /// Not stored; decodes as false
    Omitted,
}

/// Per-file node layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLayout {
    /// Optional attribute flags
    pub flags: NodeFlags,
    /// Ridge storage
    pub ridge: RidgeEncoding,
}

impl NodeLayout {
    /// Layout written by this crate.
    pub fn current(flags: NodeFlags) -> Self {
        Self {
            flags,
            ridge: RidgeEncoding::Byte,
        }
    }

    /// Layout described by a header.
    pub fn for_header(version: u16, features: u16) -> Result<Self> {
        let ridge = match version {
            FORMAT_VERSION => RidgeEncoding::Byte,
            LEGACY_VERSION if features & FEAT_RIDGE != 0 => RidgeEncoding::Float,
            LEGACY_VERSION => RidgeEncoding::Omitted,
            other => {
                return Err(CodecError::unsupported(format!(
                    "no node layout for version {other}"
                )))
            }
        };
        Ok(Self {
            flags: NodeFlags::from_features(features),
            ridge,
        })
    }

    /// Encoded size of one node in bytes.
    pub fn encoded_size(&self) -> usize {
        let mut size = 16;
        if self.flags.snr {
            size += 8;
        }
        if self.flags.phase {
            size += 8;
        }
        size + match self.ridge {
            RidgeEncoding::Byte => 1,
            RidgeEncoding::Float => 8,
            RidgeEncoding::Omitted => 0,
        }
    }
}

fn read_optional<R: BufRead>(reader: &mut FieldReader<R>, field: &str) -> Result<Option<f64>> {
    let value = reader.read_f64(field)?;
    Ok(if value.to_bits() == ABSENT_F64_BITS {
        None
    } else {
        Some(value)
    })
}

fn write_optional<W: Write>(writer: &mut FieldWriter<W>, value: Option<f64>) -> Result<()> {
    match value {
        None => writer.write_u64(ABSENT_F64_BITS),
        // Keep a recorded NaN from reading back as absent
        Some(v) if v.to_bits() == ABSENT_F64_BITS => writer.write_f64(f64::NAN),
        Some(v) => writer.write_f64(v),
    }
}

/// Decode one node.
///
/// Fails with `TruncatedInput` if any sub-field is cut short and with
/// `InvalidValue` for an out-of-range ridge byte.
pub fn decode_node<R: BufRead>(
    reader: &mut FieldReader<R>,
    layout: &NodeLayout,
) -> Result<TfNode> {
    let time = reader.read_f64("node.time")?;
    let freq = reader.read_f64("node.freq")?;
    let snr = if layout.flags.snr {
        read_optional(reader, "node.snr")?
    } else {
        None
    };
    let phase = if layout.flags.phase {
        read_optional(reader, "node.phase")?
    } else {
        None
    };
    let ridge = match layout.ridge {
        RidgeEncoding::Byte => {
            let position = reader.position();
            match reader.read_u8("node.ridge")? {
                0 => false,
                1 => true,
                other => {
                    return Err(CodecError::invalid_value(
                        "node.ridge",
                        position,
                        format!("expected 0 or 1, found {other}"),
                    ))
                }
            }
        }
        RidgeEncoding::Float => reader.read_f64("node.ridge")? != 0.0,
        RidgeEncoding::Omitted => false,
    };

    Ok(TfNode {
        time,
        freq,
        snr,
        phase,
        ridge,
    })
}

/// Encode one node.
///
/// Attributes whose flag is clear are dropped; with the flag set, `None` is
/// written as the absent marker.
pub fn encode_node<W: Write>(
    writer: &mut FieldWriter<W>,
    layout: &NodeLayout,
    node: &TfNode,
) -> Result<()> {
    writer.write_f64(node.time)?;
    writer.write_f64(node.freq)?;
    if layout.flags.snr {
        write_optional(writer, node.snr)?;
    }
    if layout.flags.phase {
        write_optional(writer, node.phase)?;
    }
    match layout.ridge {
        RidgeEncoding::Byte => writer.write_bool(node.ridge),
        RidgeEncoding::Float => writer.write_f64(if node.ridge { 1.0 } else { 0.0 }),
        RidgeEncoding::Omitted => Ok(()),
    }
}
