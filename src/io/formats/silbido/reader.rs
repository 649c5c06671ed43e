// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Annotation file reader.
//!
//! [`TonalReader`] validates the header on construction and then decodes
//! records lazily, one per [`next_record`](TonalReader::next_record) call.
//! The eager [`read_all`](TonalReader::read_all) and the geometry-only
//! [`time_frequency_contours`](TonalReader::time_frequency_contours) are
//! built on the same lazy primitive.
//!
//! A failed read poisons the reader: the format has no resynchronization
//! points, so the cursor is meaningless until [`rewind`](TonalReader::rewind).
//!
//! Records carry no length of their own. A node count that overstates the
//! data fails the record, but one that understates it decodes a short record
//! and leaves the remaining nodes to be read as the start of the next record,
//! which may then decode as a wrong record before the stream fails.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use tonalcodec::TonalReader;
//!
//! let mut reader = TonalReader::open("palmyra092007FS192-070924-205730.bin")?;
//! while let Some(tonal) = reader.next_record()? {
//!     println!("{:?}: {} nodes", tonal.species, tonal.nodes.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, warn};

use super::decode_record;
use super::field::FieldReader;
use super::header::FileHeader;
use super::node::NodeFlags;
use super::record::RecordLayout;
use crate::{CodecError, Result, TonalRecord};

/// Lazy, forward-only reader of tonal records.
pub struct TonalReader<R> {
    /// Field decoder over the buffered source
    fields: FieldReader<BufReader<R>>,
    /// Parsed header
    header: FileHeader,
    /// Layout derived from the header, threaded into every record decode
    layout: RecordLayout,
    /// Absolute source offset of the header
    base: u64,
    /// Index of the next record to decode
    next_index: u64,
    /// Set after a failed read
    poisoned: bool,
}

impl TonalReader<File> {
    /// Open an annotation file and validate its header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            CodecError::io(
                "TonalReader::open",
                format!("failed to open {}: {e}", path.display()),
            )
        })?;
        Self::new(file)
    }
}

impl<R: Read + Seek> TonalReader<R> {
    /// Wrap a seekable source positioned at the start of a header.
    pub fn new(source: R) -> Result<Self> {
        let mut source = BufReader::new(source);
        let base = source
            .stream_position()
            .map_err(|e| CodecError::io("TonalReader::new", e.to_string()))?;

        let mut fields = FieldReader::new(source);
        let header = FileHeader::read(&mut fields)?;
        let layout = header.layout()?;

        if header.is_legacy() {
            warn!(
                version = header.version,
                "reading legacy silbido file; ridge and metadata follow the feature mask"
            );
        }
        debug!(
            snr = layout.node.flags.snr,
            phase = layout.node.flags.phase,
            records_start = header.header_size,
            "opened annotation file"
        );

        Ok(Self {
            fields,
            header,
            layout,
            base,
            next_index: 0,
            poisoned: false,
        })
    }

    /// The parsed header.
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Optional node attribute flags for this file.
    pub fn node_flags(&self) -> NodeFlags {
        self.layout.node.flags
    }

    /// Record layout for this file.
    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    /// Number of records decoded since open or the last rewind.
    pub fn records_read(&self) -> u64 {
        self.next_index
    }

    /// Byte offset of the cursor relative to the start of the header.
    pub fn position(&self) -> u64 {
        self.fields.position()
    }

    /// Decode the next record, or `None` at a clean end of file.
    pub fn next_record(&mut self) -> Result<Option<TonalRecord>> {
        if self.poisoned {
            return Err(CodecError::Poisoned);
        }
        let result = match self.fields.at_eof() {
            Ok(true) => return Ok(None),
            Ok(false) => decode_record(&mut self.fields, &self.layout, self.next_index),
            Err(e) => Err(e),
        };
        match result {
            Ok(record) => {
                self.next_index += 1;
                Ok(Some(record))
            }
            Err(e) => {
                debug!(index = self.next_index, error = %e, "record decode failed");
                self.poisoned = true;
                Err(e)
            }
        }
    }

    /// Iterate over the remaining records.
    ///
    /// The iterator ends after yielding the first error.
    pub fn records(&mut self) -> Records<'_, R> {
        Records {
            reader: self,
            done: false,
        }
    }

    /// Decode every remaining record, in file order.
    pub fn read_all(&mut self) -> Result<Vec<TonalRecord>> {
        self.records().collect()
    }

    /// The `(time, freq)` contour of every remaining record, metadata dropped.
    pub fn time_frequency_contours(&mut self) -> Result<Vec<Vec<(f64, f64)>>> {
        self.records()
            .map(|record| record.map(|r| r.contour()))
            .collect()
    }

    /// Seek back to the first record and clear any failure.
    pub fn rewind(&mut self) -> Result<()> {
        let records_start = u64::from(self.header.header_size);
        self.fields
            .get_mut()
            .seek(SeekFrom::Start(self.base + records_start))
            .map_err(|e| CodecError::io("TonalReader::rewind", e.to_string()))?;
        self.fields.set_position(records_start);
        self.next_index = 0;
        self.poisoned = false;
        Ok(())
    }

    /// Release the reader and return the underlying source.
    pub fn into_inner(self) -> R {
        self.fields.into_inner().into_inner()
    }
}

/// Iterator over the records of a [`TonalReader`].
pub struct Records<'a, R> {
    reader: &'a mut TonalReader<R>,
    done: bool,
}

impl<R: Read + Seek> Iterator for Records<'_, R> {
    type Item = Result<TonalRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read + Seek> std::iter::FusedIterator for Records<'_, R> {}

/// Read every record of an annotation file.
pub fn read_tonals<P: AsRef<Path>>(path: P) -> Result<Vec<TonalRecord>> {
    TonalReader::open(path)?.read_all()
}

/// Read only the `(time, freq)` contours of an annotation file.
pub fn read_contours<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<(f64, f64)>>> {
    TonalReader::open(path)?.time_frequency_contours()
}
