// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Builder pattern for configuring annotation writers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::io::formats::silbido::constants::TEXT_MAX_LEN;
use crate::io::formats::silbido::TonalWriter;
use crate::{CodecError, Result};

/// Configuration for writing an annotation file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterConfig {
    /// Header comment; omitted from the file when `None`
    pub comment: Option<String>,
    /// Base timestamp of the detections; omitted when `None`
    pub timestamp: Option<String>,
    /// Opaque producer version stored in the header
    pub user_version: u16,
}

impl WriterConfig {
    /// Check header strings against the format's length limit.
    pub fn validate(&self) -> Result<()> {
        for (field, text) in [
            ("header.comment", &self.comment),
            ("header.timestamp", &self.timestamp),
        ] {
            if let Some(t) = text {
                if t.len() > TEXT_MAX_LEN {
                    return Err(CodecError::overflow(field, t.len(), TEXT_MAX_LEN));
                }
            }
        }
        Ok(())
    }
}

/// Builder for annotation writers.
#[derive(Debug, Clone, Default)]
pub struct WriterBuilder {
    path: Option<PathBuf>,
    config: WriterConfig,
}

impl WriterBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: WriterConfig) -> Self {
        Self { path: None, config }
    }

    /// Set the path used by [`create`](Self::create).
    pub fn path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the header comment.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.config.comment = Some(comment.into());
        self
    }

    /// Set the header timestamp.
    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.config.timestamp = Some(timestamp.into());
        self
    }

    /// Set the header timestamp to the current UTC time (RFC 3339).
    pub fn timestamp_now(self) -> Self {
        let now = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        self.timestamp(now)
    }

    /// Set the header user version.
    pub fn user_version(mut self, user_version: u16) -> Self {
        self.config.user_version = user_version;
        self
    }

    /// The configuration built so far.
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Build a writer over an arbitrary sink.
    pub fn build<W: Write>(self, sink: W) -> Result<TonalWriter<W>> {
        self.config.validate()?;
        Ok(TonalWriter::with_config(sink, self.config))
    }

    /// Create the file at the configured path and build a buffered writer.
    pub fn create(self) -> Result<TonalWriter<BufWriter<File>>> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| CodecError::io("WriterBuilder", "Path is not set"))?;
        self.config.validate()?;
        TonalWriter::create(path, self.config)
    }
}
