// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Silbido binary tonal annotation format.
//!
//! # File structure
//!
//! ```text
//! Header   magic "silbido!", version, feature mask, user version,
//!          header size, [comment], [timestamp]
//! Record*  [confidence] [score] [species] [call] graph_id node_count Node*
//! Node     time freq [snr] [phase] ridge
//! ```
//!
//! Everything is big-endian; floats are f64; text is u16 length-prefixed
//! UTF-8. There is no trailing index or checksum. See [`constants`] for the
//! feature bits and [`header`], [`record`] and [`node`] for the layouts.
//!
//! Modules, leaf first:
//! - [`field`] - primitive field codec
//! - [`node`] - one contour sample
//! - [`record`] - one tonal
//! - [`reader`] / [`writer`] - whole files

pub mod constants;
pub mod field;
pub mod header;
pub mod node;
pub mod reader;
pub mod record;
pub mod writer;

pub use field::{FieldReader, FieldWriter};
pub use header::FileHeader;
pub use node::{decode_node, encode_node, NodeFlags, NodeLayout, RidgeEncoding};
pub use reader::{read_contours, read_tonals, Records, TonalReader};
pub use record::{decode_record, encode_record, RecordLayout};
pub use writer::{write_contours, write_tonals, TonalWriter, WriteStats};
