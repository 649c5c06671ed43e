// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer for tonal annotation files.
//!
//! This module provides the format implementation and the types around it:
//! detection, file summaries, writer configuration and the record stream
//! trait.

pub mod detection;
pub mod formats;
pub mod metadata;
pub mod traits;
pub mod writer;

// Re-exports
pub use detection::{detect_format, is_silbido_file};
pub use metadata::{AnnotationSummary, FileFormat};
pub use traits::TonalStream;
pub use writer::{WriterBuilder, WriterConfig};
