// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Writer configuration.

pub mod builder;

pub use builder::{WriterBuilder, WriterConfig};
