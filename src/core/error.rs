// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for tonalcodec.
//!
//! Every failure of the annotation codec maps onto one of a small set of
//! variants:
//! - Header validation (`UnsupportedFormat`)
//! - Stream ending inside a field (`TruncatedInput`)
//! - Node blocks inconsistent with their declared count (`CorruptRecord`)
//! - Bytes that are not a legal field value (`InvalidValue`)
//! - Encode-side length limits (`FieldOverflow`)
//! - Source/sink failures (`Io`)

use thiserror::Error;

/// Errors that can occur while reading or writing annotation files.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// Magic, version or header layout not recognized
    #[error("Unsupported format: {reason}")]
    UnsupportedFormat {
        /// Why the header was rejected
        reason: String,
    },

    /// Stream ended before a field was complete
    #[error(
        "Truncated input: field '{field}' needs {requested} bytes at position {position}, but only {available} bytes available"
    )]
    TruncatedInput {
        /// Field being decoded
        field: String,
        /// Requested bytes
        requested: usize,
        /// Bytes that could actually be read
        available: usize,
        /// Stream position where the field starts
        position: u64,
    },

    /// Record content does not match its declared node count
    #[error(
        "Corrupt record {index}: declared {declared} nodes, decoded {decoded}: {reason}"
    )]
    CorruptRecord {
        /// Zero-based record index in the file
        index: u64,
        /// Node count from the length prefix
        declared: u32,
        /// Nodes decoded before the failure
        decoded: u32,
        /// What went wrong
        reason: String,
    },

    /// Field bytes present but not a legal value
    #[error("Invalid value for field '{field}' at position {position}: {reason}")]
    InvalidValue {
        /// Field being decoded
        field: String,
        /// Stream position where the field starts
        position: u64,
        /// What is wrong with it
        reason: String,
    },

    /// Value too large for its length prefix
    #[error("Field '{field}' overflows its encoding: length {length} exceeds maximum {max}")]
    FieldOverflow {
        /// Field being encoded
        field: String,
        /// Actual length
        length: usize,
        /// Largest encodable length
        max: usize,
    },

    /// A previous read failed; the cursor position is undefined
    #[error("Reader is poisoned by an earlier decode failure; rewind before reading again")]
    Poisoned,

    /// Underlying source or sink failure
    #[error("I/O error in {context}: {message}")]
    Io {
        /// Operation that failed
        context: String,
        /// Error message
        message: String,
    },
}

impl CodecError {
    /// Create an unsupported format error.
    pub fn unsupported(reason: impl Into<String>) -> Self {
        CodecError::UnsupportedFormat {
            reason: reason.into(),
        }
    }

    /// Create a truncated input error.
    pub fn truncated(
        field: impl Into<String>,
        requested: usize,
        available: usize,
        position: u64,
    ) -> Self {
        CodecError::TruncatedInput {
            field: field.into(),
            requested,
            available,
            position,
        }
    }

    /// Create a corrupt record error.
    pub fn corrupt(index: u64, declared: u32, decoded: u32, reason: impl Into<String>) -> Self {
        CodecError::CorruptRecord {
            index,
            declared,
            decoded,
            reason: reason.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(
        field: impl Into<String>,
        position: u64,
        reason: impl Into<String>,
    ) -> Self {
        CodecError::InvalidValue {
            field: field.into(),
            position,
            reason: reason.into(),
        }
    }

    /// Create a field overflow error.
    pub fn overflow(field: impl Into<String>, length: usize, max: usize) -> Self {
        CodecError::FieldOverflow {
            field: field.into(),
            length,
            max,
        }
    }

    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::Io {
            context: context.into(),
            message: message.into(),
        }
    }

    /// True for failures caused by malformed input bytes rather than the
    /// environment or the caller.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            CodecError::UnsupportedFormat { .. }
                | CodecError::TruncatedInput { .. }
                | CodecError::CorruptRecord { .. }
                | CodecError::InvalidValue { .. }
        )
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::UnsupportedFormat { reason } => vec![("reason", reason.clone())],
            CodecError::TruncatedInput {
                field,
                requested,
                available,
                position,
            } => vec![
                ("field", field.clone()),
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::CorruptRecord {
                index,
                declared,
                decoded,
                reason,
            } => vec![
                ("index", index.to_string()),
                ("declared", declared.to_string()),
                ("decoded", decoded.to_string()),
                ("reason", reason.clone()),
            ],
            CodecError::InvalidValue {
                field,
                position,
                reason,
            } => vec![
                ("field", field.clone()),
                ("position", position.to_string()),
                ("reason", reason.clone()),
            ],
            CodecError::FieldOverflow { field, length, max } => vec![
                ("field", field.clone()),
                ("length", length.to_string()),
                ("max", max.to_string()),
            ],
            CodecError::Poisoned => vec![],
            CodecError::Io { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::Io {
            context: "IO".to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type for tonalcodec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
