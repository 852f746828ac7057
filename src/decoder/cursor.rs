//! Byte cursor over a single cast record
//!
//! Every WOD field is either fixed width or preceded by a one-digit length.
//! [`FieldCursor`] reads one field at a time. A read that fails leaves the
//! cursor at the start of the field it was decoding, so the position reported
//! on failure is that field's start; the error kind carries the offset of the
//! offending bytes.

use super::error::DecodeErrorKind;

pub(crate) type FieldResult<T> = std::result::Result<T, DecodeErrorKind>;

/// Reads fields from one record and tracks the byte offset
#[derive(Debug, Clone)]
pub struct FieldCursor<'a> {
    record: &'a [u8],
    position: usize,
}

impl<'a> FieldCursor<'a> {
    pub fn new(record: &'a str) -> Self {
        Self {
            record: record.as_bytes(),
            position: 0,
        }
    }

    /// Current byte offset into the record
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.record.len() - self.position
    }

    /// Byte under the cursor without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.record.get(self.position).copied()
    }

    /// Skip `count` bytes
    pub fn advance(&mut self, count: usize) -> FieldResult<()> {
        self.span(count)?;
        self.position += count;
        Ok(())
    }

    /// Read a field, fixed width when `fixed_length` is given, length-prefixed otherwise
    ///
    /// Fixed-width reads always yield a value. A length prefix of `0` yields
    /// `None` after consuming only the prefix digit.
    pub fn read_field(&mut self, fixed_length: Option<usize>) -> FieldResult<Option<&'a str>> {
        match fixed_length {
            Some(length) => self.read_fixed(length).map(Some),
            None => self.read_prefixed(),
        }
    }

    /// Read exactly `length` bytes
    pub fn read_fixed(&mut self, length: usize) -> FieldResult<&'a str> {
        let (start, end) = self.span(length)?;
        let bytes = &self.record[start..end];
        if !bytes.is_ascii() {
            return Err(DecodeErrorKind::InvalidText { offset: start });
        }
        let text =
            std::str::from_utf8(bytes).map_err(|_| DecodeErrorKind::InvalidText { offset: start })?;
        self.position = end;
        Ok(text)
    }

    /// Read a one-digit length followed by that many bytes
    pub fn read_prefixed(&mut self) -> FieldResult<Option<&'a str>> {
        self.rewind_on_error(|cursor| {
            let length = cursor.read_digit()?;
            if length == 0 {
                return Ok(None);
            }
            cursor.read_fixed(usize::from(length)).map(Some)
        })
    }

    /// Run a multi-part field read, restoring the field start if any part fails
    pub(crate) fn rewind_on_error<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> FieldResult<T>,
    ) -> FieldResult<T> {
        let start = self.position;
        let result = read(self);
        if result.is_err() {
            self.position = start;
        }
        result
    }

    /// Read one ASCII digit as a number
    pub fn read_digit(&mut self) -> FieldResult<u8> {
        let offset = self.position;
        let (start, end) = self.span(1)?;
        let byte = self.record[start];
        if !byte.is_ascii_digit() {
            return Err(DecodeErrorKind::NumberFormat {
                offset,
                value: String::from_utf8_lossy(&self.record[start..end]).into_owned(),
            });
        }
        self.position = end;
        Ok(byte - b'0')
    }

    fn span(&self, length: usize) -> FieldResult<(usize, usize)> {
        self.position
            .checked_add(length)
            .filter(|&end| end <= self.record.len())
            .map(|end| (self.position, end))
            .ok_or(DecodeErrorKind::OutOfBounds {
                offset: self.position,
                requested: length,
                length: self.record.len(),
            })
    }
}
