// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Tonalcodec
//!
//! Reader and writer for silbido binary tonal annotation files.
//!
//! A tonal is a whistle or moan detected in underwater audio, stored as an
//! ordered time-frequency contour plus optional classification metadata
//! (species, call type, confidence, score) and optional per-node signal
//! attributes (snr, phase, ridge).
//!
//! ## Architecture
//!
//! - `core/` - [`TonalRecord`] / [`TfNode`] model and [`CodecError`]
//! - `io/formats/silbido/` - the binary format, leaf first: field codec,
//!   node codec, record codec, header, [`TonalReader`], [`TonalWriter`]
//! - `io/` - format detection, file summaries, writer configuration
//!
//! ## Example: Round Trip
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::io::Cursor;
//! use tonalcodec::{TfNode, TonalReader, TonalRecord, TonalWriter};
//!
//! let tonal = TonalRecord::new()
//!     .with_species("Balaenoptera musculus")
//!     .with_call("D")
//!     .with_nodes(vec![TfNode::new(685.0, 50.0), TfNode::new(685.1, 49.0)]);
//!
//! let mut bytes = Vec::new();
//! TonalWriter::new(&mut bytes).write(std::slice::from_ref(&tonal))?;
//!
//! let mut reader = TonalReader::new(Cursor::new(bytes))?;
//! assert_eq!(reader.read_all()?, vec![tonal]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Contours Only
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let contours = tonalcodec::read_contours("annotations.bin")?;
//! for contour in &contours {
//!     println!("{} points", contour.len());
//! }
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{CodecError, Result, TfNode, TonalRecord, GRAPH_ID_NONE};

// I/O types (format, detection, metadata, configuration)
pub mod io;

pub use io::formats::silbido::{
    read_contours, read_tonals, write_contours, write_tonals, FileHeader, NodeFlags, Records,
    TonalReader, TonalWriter, WriteStats,
};
pub use io::{
    detect_format, AnnotationSummary, FileFormat, TonalStream, WriterBuilder, WriterConfig,
};
