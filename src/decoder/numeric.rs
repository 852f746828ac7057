//! Integer and encoded-decimal field decoding
//!
//! WOD numbers carry no decimal point. Each value is written as a triplet of
//! one-digit counts (significant digits, total digits, precision) followed by
//! the digits themselves, e.g. `442-5513` for -55.13. A lone `-` in place of
//! the triplet marks a missing value.

use super::cursor::{FieldCursor, FieldResult};
use super::error::DecodeErrorKind;
use crate::constants::ABSENT_SENTINEL;
use crate::models::NumericValue;

impl<'a> FieldCursor<'a> {
    /// Read a field and parse it as a trimmed base-10 integer
    ///
    /// An absent or blank field yields `None`, never zero.
    pub fn read_integer_field(&mut self, fixed_length: Option<usize>) -> FieldResult<Option<i64>> {
        let offset = self.position();
        self.rewind_on_error(|cursor| match cursor.read_field(fixed_length)? {
            Some(text) => parse_integer(text, offset),
            None => Ok(None),
        })
    }

    /// Read a numeric field and apply its precision
    pub fn read_float_field(&mut self) -> FieldResult<Option<f64>> {
        Ok(self.read_numeric_value()?.map(|value| value.value()))
    }

    /// Read a numeric field, keeping its encoding triplet
    pub fn read_numeric_value(&mut self) -> FieldResult<Option<NumericValue>> {
        if self.peek() == Some(ABSENT_SENTINEL) {
            self.advance(1)?;
            return Ok(None);
        }

        self.rewind_on_error(|cursor| {
            let significant_digits = cursor.read_digit()?;
            let total_digits = cursor.read_digit()?;
            let precision = cursor.read_digit()?;

            if total_digits == 0 {
                return Ok(None);
            }

            // A sign is written ahead of the digits and is not counted in the total
            let sign_length = match cursor.peek() {
                Some(b'-' | b'+') => 1,
                _ => 0,
            };

            let offset = cursor.position();
            let digits = cursor.read_fixed(sign_length + usize::from(total_digits))?;

            Ok(parse_integer(digits, offset)?
                .map(|raw| NumericValue::new(significant_digits, total_digits, precision, raw)))
        })
    }
}

fn parse_integer(text: &str, offset: usize) -> FieldResult<Option<i64>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| DecodeErrorKind::NumberFormat {
            offset,
            value: text.to_string(),
        })
}
