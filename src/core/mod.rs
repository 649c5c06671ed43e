// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout tonalcodec.
//!
//! This module provides the foundational types for the library:
//! - [`CodecError`] - Error handling for every codec operation
//! - [`TonalRecord`] / [`TfNode`] - The in-memory annotation model

pub mod error;
pub mod tonal;

pub use error::{CodecError, Result};
pub use tonal::{TfNode, TonalRecord, GRAPH_ID_NONE};
