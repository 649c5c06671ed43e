// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format detection using magic bytes and file extension.
//!
//! # Supported Formats
//!
//! - **Silbido**: starts with the `silbido!` magic
//! - **JSON**: first non-whitespace byte is `{` or `[`
//!
//! # Example
//!
//! ```rust,no_run
//! use tonalcodec::io::detection::detect_format;
//! use tonalcodec::io::metadata::FileFormat;
//!
//! let format = detect_format("annotations.bin")?;
//! assert_eq!(format, FileFormat::Silbido);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::io::formats::silbido::constants::MAGIC;
use crate::CodecError;

use super::metadata::FileFormat;

/// Bytes inspected when sniffing content.
const SNIFF_LEN: usize = 64;

/// Detect the format of a file from its content, falling back to its extension.
pub fn detect_format<P: AsRef<Path>>(path: P) -> Result<FileFormat, CodecError> {
    let path_ref = path.as_ref();

    match detect_from_magic(path_ref) {
        Ok(FileFormat::Unknown) | Err(_) => {}
        Ok(format) => return Ok(format),
    }

    Ok(detect_from_extension(path_ref))
}

/// Detect format from the leading bytes of a buffer.
pub fn detect_from_bytes(header: &[u8]) -> FileFormat {
    if header.starts_with(&MAGIC) {
        return FileFormat::Silbido;
    }
    match header.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') | Some(b'[') => FileFormat::Json,
        _ => FileFormat::Unknown,
    }
}

fn detect_from_magic(path: &Path) -> Result<FileFormat, CodecError> {
    let file = File::open(path).map_err(|e| {
        CodecError::io("FormatDetection", format!("Failed to open file: {e}"))
    })?;

    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64)
        .read_to_end(&mut header)
        .map_err(|e| CodecError::io("FormatDetection", format!("Failed to read header: {e}")))?;

    Ok(detect_from_bytes(&header))
}

fn detect_from_extension(path: &Path) -> FileFormat {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| match ext.to_lowercase().as_str() {
            "bin" | "det" => FileFormat::Silbido,
            "json" => FileFormat::Json,
            _ => FileFormat::Unknown,
        })
        .unwrap_or(FileFormat::Unknown)
}

/// Check if a file is a silbido annotation file by content.
pub fn is_silbido_file<P: AsRef<Path>>(path: P) -> bool {
    matches!(detect_from_magic(path.as_ref()), Ok(FileFormat::Silbido))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_bytes() {
        assert_eq!(detect_from_bytes(b"silbido!\x00\x05"), FileFormat::Silbido);
        assert_eq!(detect_from_bytes(b"  \n{\"tonals\": []}"), FileFormat::Json);
        assert_eq!(detect_from_bytes(b"[]"), FileFormat::Json);
        assert_eq!(detect_from_bytes(b"RIFF"), FileFormat::Unknown);
        assert_eq!(detect_from_bytes(b""), FileFormat::Unknown);
    }

    #[test]
    fn test_detect_from_extension() {
        assert_eq!(detect_from_extension(Path::new("a.bin")), FileFormat::Silbido);
        assert_eq!(detect_from_extension(Path::new("a.JSON")), FileFormat::Json);
        assert_eq!(detect_from_extension(Path::new("a.wav")), FileFormat::Unknown);
        assert_eq!(detect_from_extension(Path::new("noext")), FileFormat::Unknown);
    }

    #[test]
    fn test_missing_file_falls_back_to_extension() {
        let format = detect_format("/nonexistent/dir/tonals.bin").unwrap();
        assert_eq!(format, FileFormat::Silbido);
        assert!(!is_silbido_file("/nonexistent/dir/tonals.bin"));
    }
}
