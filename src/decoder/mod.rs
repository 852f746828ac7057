//! WOD ASCII cast record decoder
//!
//! Decodes World Ocean Database ASCII exchange records into [`CastRecord`]s.
//! The format has no delimiters: every field is fixed width or preceded by a
//! one-digit length, and numbers are written as digit strings with an
//! explicit precision. A single misread length desynchronizes the rest of the
//! record, so all reads go through one bounds-checked byte cursor.
//!
//! ## Architecture
//!
//! - [`cursor`] - fixed and length-prefixed field reads
//! - [`numeric`] - integer fields and significant/total/precision numbers
//! - [`cast`] - the record grammar and output assembly
//! - [`error`] - per-record decode failures
//!
//! ## Usage
//!
//! ```rust
//! use wod_processor::decoder::decode_cast_record;
//!
//! let raw = "C3123567890US17202306154421230442-5513552123452250011100";
//! match decode_cast_record(raw, "CTD") {
//!     Ok(cast) => println!("{} {:?}", cast.timestamp, cast.latitude_degrees()),
//!     Err(error) => eprintln!("skipped: {error}"),
//! }
//! ```
//!
//! The decoder does no I/O. Reassembling records from file lines is the job
//! of [`crate::reader`].
//!
//! [`CastRecord`]: crate::models::CastRecord

pub mod cast;
pub mod cursor;
pub mod error;
pub mod numeric;

#[cfg(test)]
pub mod tests;

pub use cast::decode_cast_record;
pub use cursor::FieldCursor;
pub use error::{DecodeError, DecodeErrorKind};
