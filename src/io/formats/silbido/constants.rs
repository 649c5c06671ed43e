// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Silbido annotation format constants.
//!
//! Magic bytes, version numbers and the header feature mask shared by the
//! reader and writer. All multi-byte values in the format are big-endian.

/// File magic bytes at offset 0.
pub const MAGIC: [u8; 8] = *b"silbido!";

/// Version written by this crate: one-byte ridge, absent-value markers.
pub const FORMAT_VERSION: u16 = 5;

/// Original silbido detection version: ridge stored as f64 when present.
pub const LEGACY_VERSION: u16 = 4;

/// Versions the reader accepts.
pub const SUPPORTED_VERSIONS: [u16; 2] = [LEGACY_VERSION, FORMAT_VERSION];

/// Size of the fixed header prefix: magic, version, features, user version, header size.
pub const FIXED_HEADER_LEN: usize = MAGIC.len() + 2 + 2 + 2 + 4;

// Feature mask bits. Per-node fields:

/// Node time is encoded.
pub const FEAT_TIME: u16 = 1;
/// Node frequency is encoded.
pub const FEAT_FREQ: u16 = 1 << 1;
/// Node signal-to-noise is encoded.
pub const FEAT_SNR: u16 = 1 << 2;
/// Node phase is encoded.
pub const FEAT_PHASE: u16 = 1 << 3;
/// Node ridge flag is encoded.
pub const FEAT_RIDGE: u16 = 1 << 6;

// Per-record fields:

/// Record score is encoded.
pub const FEAT_SCORE: u16 = 1 << 4;
/// Record confidence is encoded.
pub const FEAT_CONFIDENCE: u16 = 1 << 5;
/// Record species label is encoded.
pub const FEAT_SPECIES: u16 = 1 << 9;
/// Record call label is encoded.
pub const FEAT_CALL: u16 = 1 << 10;

// Per-file header fields:

/// Header carries a timestamp string.
pub const FEAT_TIMESTAMP: u16 = 1 << 7;
/// Header carries a user comment string.
pub const FEAT_USERCOMMENT: u16 = 1 << 8;

/// Bits a version 5 writer always sets.
pub const FEAT_ALWAYS: u16 =
    FEAT_TIME | FEAT_FREQ | FEAT_RIDGE | FEAT_SCORE | FEAT_CONFIDENCE | FEAT_SPECIES | FEAT_CALL;

/// Every bit this crate understands.
pub const FEAT_KNOWN: u16 = FEAT_ALWAYS | FEAT_SNR | FEAT_PHASE | FEAT_TIMESTAMP | FEAT_USERCOMMENT;

/// Text length prefix reserved for an absent string.
pub const TEXT_ABSENT: u16 = u16::MAX;

/// Longest encodable text in bytes.
pub const TEXT_MAX_LEN: usize = (TEXT_ABSENT - 1) as usize;

/// Bit pattern stored for an absent snr/phase in a file whose flag is set.
pub const ABSENT_F64_BITS: u64 = 0x7FF8_DEAD_0000_0000;

/// Names of the feature bits, in bit order, for display.
pub const FEATURE_NAMES: [(u16, &str); 11] = [
    (FEAT_TIME, "time"),
    (FEAT_FREQ, "freq"),
    (FEAT_SNR, "snr"),
    (FEAT_PHASE, "phase"),
    (FEAT_SCORE, "score"),
    (FEAT_CONFIDENCE, "confidence"),
    (FEAT_RIDGE, "ridge"),
    (FEAT_TIMESTAMP, "timestamp"),
    (FEAT_USERCOMMENT, "comment"),
    (FEAT_SPECIES, "species"),
    (FEAT_CALL, "call"),
];

/// Human-readable names of the bits set in `features`.
pub fn feature_names(features: u16) -> Vec<&'static str> {
    FEATURE_NAMES
        .iter()
        .filter(|(bit, _)| features & bit != 0)
        .map(|(_, name)| *name)
        .collect()
}
