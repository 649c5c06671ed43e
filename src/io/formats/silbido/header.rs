// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! File header.
//!
//! ```text
//! magic: "silbido!"        8 bytes
//! version: u16
//! features: u16            feature mask, see constants
//! user_version: u16
//! header_size: u32         offset of the first record
//! [comment: text]          FEAT_USERCOMMENT
//! [timestamp: text]        FEAT_TIMESTAMP
//! ```

use std::io::{BufRead, Write};

use serde::Serialize;
use tracing::{debug, warn};

use super::constants::{
    feature_names, FEAT_KNOWN, FEAT_TIMESTAMP, FEAT_USERCOMMENT, FIXED_HEADER_LEN,
    FORMAT_VERSION, LEGACY_VERSION, MAGIC, SUPPORTED_VERSIONS,
};
use super::field::{encoded_text_size, text_len, FieldReader, FieldWriter};
use super::node::NodeFlags;
use super::record::RecordLayout;
use crate::{CodecError, Result};

/// Parsed annotation file header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    /// Format version
    pub version: u16,
    /// Feature mask naming the encoded fields
    pub features: u16,
    /// Opaque producer version
    pub user_version: u16,
    /// Byte offset of the first record
    pub header_size: u32,
    /// Free-form comment
    pub comment: Option<String>,
    /// Base timestamp of the detections
    pub timestamp: Option<String>,
}

impl FileHeader {
    /// Build a current-version header for the given record/node features.
    ///
    /// Comment and timestamp bits are derived from the strings; `header_size`
    /// is computed.
    pub fn new(
        features: u16,
        user_version: u16,
        comment: Option<String>,
        timestamp: Option<String>,
    ) -> Result<Self> {
        let mut features = features & !(FEAT_USERCOMMENT | FEAT_TIMESTAMP);
        let mut size = FIXED_HEADER_LEN;
        if let Some(c) = comment.as_deref() {
            text_len(c, "header.comment")?;
            features |= FEAT_USERCOMMENT;
            size += encoded_text_size(Some(c));
        }
        if let Some(t) = timestamp.as_deref() {
            text_len(t, "header.timestamp")?;
            features |= FEAT_TIMESTAMP;
            size += encoded_text_size(Some(t));
        }
        Ok(Self {
            version: FORMAT_VERSION,
            features,
            user_version,
            header_size: size as u32,
            comment,
            timestamp,
        })
    }

    /// Optional node attribute flags.
    pub fn node_flags(&self) -> NodeFlags {
        NodeFlags::from_features(self.features)
    }

    /// Record layout this header describes.
    pub fn layout(&self) -> Result<RecordLayout> {
        RecordLayout::for_header(self.version, self.features)
    }

    /// True for original silbido version 4 files.
    pub fn is_legacy(&self) -> bool {
        self.version == LEGACY_VERSION
    }

    /// Names of the feature bits that are set.
    pub fn feature_names(&self) -> Vec<&'static str> {
        feature_names(self.features)
    }

    /// Bytes occupied by the fields this crate parses.
    pub fn parsed_len(&self) -> usize {
        let mut len = FIXED_HEADER_LEN;
        if self.features & FEAT_USERCOMMENT != 0 {
            len += encoded_text_size(self.comment.as_deref());
        }
        if self.features & FEAT_TIMESTAMP != 0 {
            len += encoded_text_size(self.timestamp.as_deref());
        }
        len
    }

    /// Read and validate a header, leaving the reader at the first record.
    ///
    /// Bytes between the parsed fields and `header_size` are skipped.
    pub fn read<R: BufRead>(reader: &mut FieldReader<R>) -> Result<Self> {
        let magic = reader
            .read_bytes(MAGIC.len(), "header.magic")
            .map_err(|e| match e {
                CodecError::TruncatedInput { available, .. } => CodecError::unsupported(format!(
                    "file too short for magic ({available} of {} bytes)",
                    MAGIC.len()
                )),
                other => other,
            })?;
        if magic != MAGIC {
            return Err(CodecError::unsupported(format!(
                "invalid magic: {:?}",
                String::from_utf8_lossy(&magic)
            )));
        }

        let version = reader.read_u16("header.version")?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(CodecError::unsupported(format!(
                "unrecognized version {version}, expected one of {SUPPORTED_VERSIONS:?}"
            )));
        }

        let features = reader.read_u16("header.features")?;
        let unknown = features & !FEAT_KNOWN;
        if unknown != 0 {
            return Err(CodecError::unsupported(format!(
                "unknown feature bits {unknown:#06x}"
            )));
        }

        let user_version = reader.read_u16("header.user_version")?;
        let header_size = reader.read_u32("header.header_size")?;

        let comment = if features & FEAT_USERCOMMENT != 0 {
            read_header_text(reader, "header.comment")?
        } else {
            None
        };
        let timestamp = if features & FEAT_TIMESTAMP != 0 {
            read_header_text(reader, "header.timestamp")?
        } else {
            None
        };

        let header = Self {
            version,
            features,
            user_version,
            header_size,
            comment,
            timestamp,
        };

        let parsed = reader.position();
        let declared = u64::from(header_size);
        if declared < parsed {
            return Err(CodecError::unsupported(format!(
                "header_size {header_size} is smaller than the {parsed} header bytes present"
            )));
        }
        if declared > parsed {
            warn!(
                skipped = declared - parsed,
                "skipping unrecognized header bytes"
            );
            reader.skip(declared - parsed, "header.padding")?;
        }

        debug!(
            version,
            features = ?header.feature_names(),
            header_size,
            "parsed annotation header"
        );

        Ok(header)
    }

    /// Write the header.
    pub fn write<W: Write>(&self, writer: &mut FieldWriter<W>) -> Result<()> {
        writer.write_bytes(&MAGIC)?;
        writer.write_u16(self.version)?;
        writer.write_u16(self.features)?;
        writer.write_u16(self.user_version)?;
        writer.write_u32(self.header_size)?;
        if self.features & FEAT_USERCOMMENT != 0 {
            writer.write_text(self.comment.as_deref(), "header.comment")?;
        }
        if self.features & FEAT_TIMESTAMP != 0 {
            writer.write_text(self.timestamp.as_deref(), "header.timestamp")?;
        }
        let pad = u64::from(self.header_size).saturating_sub(writer.position());
        for _ in 0..pad {
            writer.write_u8(0)?;
        }
        Ok(())
    }
}

fn read_header_text<R: BufRead>(
    reader: &mut FieldReader<R>,
    field: &str,
) -> Result<Option<String>> {
    match reader.read_text_bytes(field)? {
        None => Ok(None),
        Some(bytes) => String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| CodecError::unsupported(format!("{field} is not UTF-8: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::io::formats::silbido::constants::{FEAT_ALWAYS, FEAT_FREQ, FEAT_SNR, FEAT_TIME};

    fn round_trip(header: &FileHeader) -> Result<FileHeader> {
        let mut writer = FieldWriter::new(Vec::new());
        header.write(&mut writer).unwrap();
        assert_eq!(writer.position(), u64::from(header.header_size));
        let mut reader = FieldReader::new(Cursor::new(writer.into_inner()));
        let parsed = FileHeader::read(&mut reader)?;
        assert_eq!(reader.position(), u64::from(header.header_size));
        Ok(parsed)
    }

    #[test]
    fn test_minimal_header() {
        let header = FileHeader::new(FEAT_ALWAYS, 0, None, None).unwrap();
        assert_eq!(header.header_size, 18);
        assert_eq!(header.parsed_len(), 18);
        assert_eq!(round_trip(&header).unwrap(), header);
    }

    #[test]
    fn test_comment_and_timestamp() {
        let header = FileHeader::new(
            FEAT_ALWAYS | FEAT_SNR,
            3,
            Some("palmyra 2006".to_string()),
            Some("2006-11-13T06:00:00Z".to_string()),
        )
        .unwrap();
        assert_ne!(header.features & FEAT_USERCOMMENT, 0);
        assert_ne!(header.features & FEAT_TIMESTAMP, 0);
        assert_eq!(header.header_size as usize, 18 + 2 + 12 + 2 + 20);
        let parsed = round_trip(&header).unwrap();
        assert_eq!(parsed, header);
        assert!(parsed.node_flags().snr);
        assert!(parsed.feature_names().contains(&"comment"));
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = b"silbidx!".to_vec();
        bytes.extend_from_slice(&[0; 10]);
        let mut reader = FieldReader::new(Cursor::new(bytes));
        let err = FileHeader::read(&mut reader).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_short_file_is_unsupported() {
        let mut reader = FieldReader::new(Cursor::new(b"silb".to_vec()));
        let err = FileHeader::read(&mut reader).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_unknown_version() {
        let mut header = FileHeader::new(FEAT_ALWAYS, 0, None, None).unwrap();
        header.version = 99;
        let err = round_trip(&header).unwrap_err();
        assert!(err.to_string().contains("unrecognized version 99"));
    }

    #[test]
    fn test_unknown_feature_bits() {
        let mut header = FileHeader::new(FEAT_ALWAYS, 0, None, None).unwrap();
        header.features |= 1 << 14;
        let err = round_trip(&header).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_header_padding_is_skipped() {
        let mut header = FileHeader::new(FEAT_TIME | FEAT_FREQ, 0, None, None).unwrap();
        header.header_size += 6;
        let parsed = round_trip(&header).unwrap();
        assert_eq!(parsed.header_size, 24);
        assert_eq!(parsed.parsed_len(), 18);
    }

    #[test]
    fn test_header_size_too_small() {
        let mut writer = FieldWriter::new(Vec::new());
        let mut header = FileHeader::new(FEAT_ALWAYS, 0, Some("x".into()), None).unwrap();
        header.header_size = 18;
        header.write(&mut writer).unwrap();
        let mut reader = FieldReader::new(Cursor::new(writer.into_inner()));
        let err = FileHeader::read(&mut reader).unwrap_err();
        assert!(err.to_string().contains("smaller"));
    }

    #[test]
    fn test_new_strips_stale_text_bits() {
        let header = FileHeader::new(FEAT_ALWAYS | FEAT_USERCOMMENT, 0, None, None).unwrap();
        assert_eq!(header.features & FEAT_USERCOMMENT, 0);
        assert!(!header.is_legacy());
    }
}
