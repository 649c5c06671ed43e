// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! File format implementations.
//!
//! - [`silbido`]: silbido binary tonal annotations (versions 4 and 5)

pub mod silbido;
