//! Decode failures for a single cast record
//!
//! Every failure inside one record collapses into a [`DecodeError`] carrying
//! an excerpt of the record around the cursor, so a corrupt record can be
//! reported and skipped without affecting the next one.

use crate::constants::EXCERPT_RADIUS;
use thiserror::Error;

/// Reason a record could not be decoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The text does not start with the cast record marker
    #[error("not a cast record")]
    NotARecord,

    /// A read would run past the end of the record
    #[error("read of {requested} bytes at offset {offset} exceeds record length {length}")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        length: usize,
    },

    /// A length, digit, or integer field is not a valid number
    #[error("invalid number {value:?} at offset {offset}")]
    NumberFormat { offset: usize, value: String },

    /// A structurally required field is missing or inconsistent
    #[error("malformed record: {reason}")]
    MalformedRecord { reason: String },

    /// Field bytes are not ASCII text
    #[error("non-ASCII bytes in field at offset {offset}")]
    InvalidText { offset: usize },
}

impl DecodeErrorKind {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
        }
    }

    /// Short stable name used as a statistics key
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotARecord => "not_a_record",
            Self::OutOfBounds { .. } => "out_of_bounds",
            Self::NumberFormat { .. } => "number_format",
            Self::MalformedRecord { .. } => "malformed_record",
            Self::InvalidText { .. } => "invalid_text",
        }
    }
}

/// A record that failed to decode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} (cursor at byte {position}, near \"{excerpt}\")")]
pub struct DecodeError {
    /// Slice of the record around the failing offset
    pub excerpt: String,
    /// Cursor position when decoding stopped
    pub position: usize,
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    pub fn new(record: &str, position: usize, kind: DecodeErrorKind) -> Self {
        Self {
            excerpt: excerpt_around(record, position),
            position,
            kind,
        }
    }

    /// Non-record fragments are expected input, not failures
    pub fn is_not_a_record(&self) -> bool {
        matches!(self.kind, DecodeErrorKind::NotARecord)
    }
}

fn excerpt_around(record: &str, position: usize) -> String {
    let bytes = record.as_bytes();
    let start = position.saturating_sub(EXCERPT_RADIUS).min(bytes.len());
    let end = position.saturating_add(EXCERPT_RADIUS).min(bytes.len());
    String::from_utf8_lossy(&bytes[start..end]).into_owned()
}
