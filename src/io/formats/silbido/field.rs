// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Primitive field codec.
//!
//! Fixed-width integers and floats in big-endian byte order, one-byte
//! booleans and u16 length-prefixed text. Knows nothing about nodes or
//! records; callers name the field they are decoding so that a short read
//! can be reported precisely.
//!
//! # Text encoding
//!
//! `<len: u16><len bytes of UTF-8>`. The length [`TEXT_ABSENT`] (`0xFFFF`)
//! encodes an absent string, so `Some("")` and `None` have different bytes.

use std::io::{self, BufRead, Read, Write};

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use super::constants::{TEXT_ABSENT, TEXT_MAX_LEN};
use crate::{CodecError, Result};

/// Byte order of every multi-byte field in the format.
pub type Endian = BigEndian;

/// Upper bound on speculative allocation driven by an untrusted length.
const MAX_PREALLOC: usize = 4096;

/// Position-tracking reader of primitive fields.
pub struct FieldReader<R> {
    inner: R,
    position: u64,
}

impl<R> FieldReader<R> {
    /// Wrap a source positioned at byte 0.
    pub fn new(inner: R) -> Self {
        Self::with_position(inner, 0)
    }

    /// Wrap a source already positioned at `position`.
    pub fn with_position(inner: R, position: u64) -> Self {
        Self { inner, position }
    }

    /// Current byte offset in the stream.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reset the tracked offset after seeking the underlying source.
    pub(crate) fn set_position(&mut self, position: u64) {
        self.position = position;
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying source.
    pub(crate) fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwrap the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BufRead> FieldReader<R> {
    /// True if the stream has no more bytes. Consumes nothing.
    pub fn at_eof(&mut self) -> Result<bool> {
        let buf = self
            .inner
            .fill_buf()
            .map_err(|e| CodecError::io("FieldReader::at_eof", e.to_string()))?;
        Ok(buf.is_empty())
    }

    /// Read as many bytes as are available, up to `buf.len()`.
    fn read_up_to(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(CodecError::io("FieldReader::read", e.to_string())),
            }
        }
        Ok(filled)
    }

    fn read_array<const N: usize>(&mut self, field: &str) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        let got = self.read_up_to(&mut buf)?;
        if got < N {
            return Err(CodecError::truncated(field, N, got, self.position));
        }
        self.position += N as u64;
        Ok(buf)
    }

    /// Read an unsigned byte.
    pub fn read_u8(&mut self, field: &str) -> Result<u8> {
        Ok(self.read_array::<1>(field)?[0])
    }

    /// Read a signed byte.
    pub fn read_i8(&mut self, field: &str) -> Result<i8> {
        Ok(self.read_u8(field)? as i8)
    }

    /// Read a u16 value.
    pub fn read_u16(&mut self, field: &str) -> Result<u16> {
        Ok(Endian::read_u16(&self.read_array::<2>(field)?))
    }

    /// Read an i16 value.
    pub fn read_i16(&mut self, field: &str) -> Result<i16> {
        Ok(Endian::read_i16(&self.read_array::<2>(field)?))
    }

    /// Read a u32 value.
    pub fn read_u32(&mut self, field: &str) -> Result<u32> {
        Ok(Endian::read_u32(&self.read_array::<4>(field)?))
    }

    /// Read an i32 value.
    pub fn read_i32(&mut self, field: &str) -> Result<i32> {
        Ok(Endian::read_i32(&self.read_array::<4>(field)?))
    }

    /// Read a u64 value.
    pub fn read_u64(&mut self, field: &str) -> Result<u64> {
        Ok(Endian::read_u64(&self.read_array::<8>(field)?))
    }

    /// Read an i64 value.
    pub fn read_i64(&mut self, field: &str) -> Result<i64> {
        Ok(Endian::read_i64(&self.read_array::<8>(field)?))
    }

    /// Read an f32 value.
    pub fn read_f32(&mut self, field: &str) -> Result<f32> {
        Ok(Endian::read_f32(&self.read_array::<4>(field)?))
    }

    /// Read an f64 value.
    pub fn read_f64(&mut self, field: &str) -> Result<f64> {
        Ok(Endian::read_f64(&self.read_array::<8>(field)?))
    }

    /// Read exactly `len` bytes.
    pub fn read_bytes(&mut self, len: usize, field: &str) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
        (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(|e| CodecError::io("FieldReader::read_bytes", e.to_string()))?;
        if buf.len() < len {
            return Err(CodecError::truncated(field, len, buf.len(), self.position));
        }
        self.position += len as u64;
        Ok(buf)
    }

    /// Read a length-prefixed text field as raw bytes.
    ///
    /// Returns `None` for the absent marker. UTF-8 validation is left to the
    /// caller, which knows whether bad text is a header or a record problem.
    pub fn read_text_bytes(&mut self, field: &str) -> Result<Option<Vec<u8>>> {
        let len = self.read_u16(field)?;
        if len == TEXT_ABSENT {
            return Ok(None);
        }
        self.read_bytes(len as usize, field).map(Some)
    }

    /// Discard exactly `len` bytes.
    pub fn skip(&mut self, len: u64, field: &str) -> Result<()> {
        let copied = io::copy(&mut (&mut self.inner).take(len), &mut io::sink())
            .map_err(|e| CodecError::io("FieldReader::skip", e.to_string()))?;
        if copied < len {
            return Err(CodecError::truncated(
                field,
                len as usize,
                copied as usize,
                self.position,
            ));
        }
        self.position += len;
        Ok(())
    }
}

/// Position-tracking writer of primitive fields.
pub struct FieldWriter<W> {
    inner: W,
    position: u64,
}

impl<W: Write> FieldWriter<W> {
    /// Wrap a sink positioned at byte 0.
    pub fn new(inner: W) -> Self {
        Self { inner, position: 0 }
    }

    /// Bytes written so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Unwrap the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn track(&mut self, result: io::Result<()>, len: usize) -> Result<()> {
        result.map_err(|e| CodecError::io("FieldWriter::write", e.to_string()))?;
        self.position += len as u64;
        Ok(())
    }

    /// Write an unsigned byte.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        let r = self.inner.write_u8(value);
        self.track(r, 1)
    }

    /// Write a signed byte.
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        let r = self.inner.write_i8(value);
        self.track(r, 1)
    }

    /// Write a u16 value.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        let r = self.inner.write_u16::<Endian>(value);
        self.track(r, 2)
    }

    /// Write an i16 value.
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        let r = self.inner.write_i16::<Endian>(value);
        self.track(r, 2)
    }

    /// Write a u32 value.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        let r = self.inner.write_u32::<Endian>(value);
        self.track(r, 4)
    }

    /// Write an i32 value.
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        let r = self.inner.write_i32::<Endian>(value);
        self.track(r, 4)
    }

    /// Write a u64 value.
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        let r = self.inner.write_u64::<Endian>(value);
        self.track(r, 8)
    }

    /// Write an i64 value.
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        let r = self.inner.write_i64::<Endian>(value);
        self.track(r, 8)
    }

    /// Write an f32 value.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        let r = self.inner.write_f32::<Endian>(value);
        self.track(r, 4)
    }

    /// Write an f64 value.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        let r = self.inner.write_f64::<Endian>(value);
        self.track(r, 8)
    }

    /// Write a boolean as a single 0/1 byte.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let r = self.inner.write_all(bytes);
        self.track(r, bytes.len())
    }

    /// Write a length-prefixed text field; `None` writes the absent marker.
    pub fn write_text(&mut self, text: Option<&str>, field: &str) -> Result<()> {
        match text {
            None => self.write_u16(TEXT_ABSENT),
            Some(s) => {
                let len = text_len(s, field)?;
                self.write_u16(len)?;
                self.write_bytes(s.as_bytes())
            }
        }
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        self.inner
            .flush()
            .map_err(|e| CodecError::io("FieldWriter::flush", e.to_string()))
    }
}

/// Encoded length prefix for `text`, or `FieldOverflow` if it does not fit.
pub fn text_len(text: &str, field: &str) -> Result<u16> {
    let len = text.len();
    if len > TEXT_MAX_LEN {
        return Err(CodecError::overflow(field, len, TEXT_MAX_LEN));
    }
    Ok(len as u16)
}

/// Bytes occupied by an encoded text field.
pub fn encoded_text_size(text: Option<&str>) -> usize {
    2 + text.map_or(0, str::len)
}
