//! Cast record decoding
//!
//! Walks the primary header of one WOD ASCII cast record in grammar order:
//! identification, date, position, then the variable list with its
//! variable-specific metadata. Decoding is all-or-nothing: any failure yields
//! a [`DecodeError`] and no partially filled record.

use super::cursor::{FieldCursor, FieldResult};
use super::error::{DecodeError, DecodeErrorKind};
use crate::constants::{RECORD_MARKER, TEMPERATURE_VARIABLE_CODE, field_widths};
use crate::models::{CastRecord, NumericValue, VariableMeta, VariableValue};
use chrono::{DateTime, NaiveDate, Utc};

/// Decode one logical cast record
///
/// `instrument_hint` is the instrument category of the source file; it is
/// not stored in the record body.
pub fn decode_cast_record(raw: &str, instrument_hint: &str) -> Result<CastRecord, DecodeError> {
    if raw.as_bytes().first() != Some(&RECORD_MARKER) {
        return Err(DecodeError::new(raw, 0, DecodeErrorKind::NotARecord));
    }

    let mut cursor = FieldCursor::new(raw);
    decode_body(&mut cursor, instrument_hint)
        .map_err(|kind| DecodeError::new(raw, cursor.position(), kind))
}

fn decode_body(cursor: &mut FieldCursor<'_>, instrument_hint: &str) -> FieldResult<CastRecord> {
    cursor.advance(1)?;

    let _profile_bytes = cursor.read_prefixed()?;
    let cast_number = cursor.read_prefixed()?.map(str::to_owned);
    let country_code = cursor.read_fixed(field_widths::COUNTRY_CODE)?.to_owned();
    let _cruise_number = cursor.read_prefixed()?;

    let year = cursor.read_integer_field(Some(field_widths::YEAR))?;
    let month = cursor.read_integer_field(Some(field_widths::MONTH))?;
    let day = cursor.read_integer_field(Some(field_widths::DAY))?;
    let timestamp = cast_timestamp(year, month, day)?;

    // Time of day is not part of the output but must be consumed
    let _time = cursor.read_numeric_value()?;

    let latitude = cursor.read_numeric_value()?;
    let longitude = cursor.read_numeric_value()?;

    let _level_count = cursor
        .read_integer_field(None)?
        .ok_or_else(|| DecodeErrorKind::malformed("number of levels is absent"))?;
    let _profile_type = cursor
        .read_integer_field(Some(field_widths::PROFILE_TYPE))?
        .ok_or_else(|| DecodeErrorKind::malformed("profile type is absent"))?;
    let variable_count = cursor
        .read_integer_field(Some(field_widths::VARIABLE_COUNT))?
        .ok_or_else(|| DecodeErrorKind::malformed("number of variables is absent"))?;
    let variable_count = usize::try_from(variable_count).map_err(|_| {
        DecodeErrorKind::malformed(format!("negative number of variables: {variable_count}"))
    })?;

    let mut variables = Vec::with_capacity(variable_count);
    for _ in 0..variable_count {
        variables.push(read_variable(cursor)?);
    }

    let temperature = find_temperature(&variables);

    Ok(CastRecord {
        instrument_type: instrument_hint.to_string(),
        cast_number,
        timestamp,
        country_code,
        latitude,
        longitude,
        temperature,
        variables,
    })
}

/// Start of the observation day, or the epoch when any date part is missing
fn cast_timestamp(
    year: Option<i64>,
    month: Option<i64>,
    day: Option<i64>,
) -> FieldResult<DateTime<Utc>> {
    let (Some(year), Some(month), Some(day)) = (year, month, day) else {
        return Ok(DateTime::<Utc>::UNIX_EPOCH);
    };

    let date = match (
        i32::try_from(year),
        u32::try_from(month),
        u32::try_from(day),
    ) {
        (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d),
        _ => None,
    };

    date.and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|start_of_day| start_of_day.and_utc())
        .ok_or_else(|| {
            DecodeErrorKind::malformed(format!("invalid date {year:04}-{month:02}-{day:02}"))
        })
}

fn read_variable(cursor: &mut FieldCursor<'_>) -> FieldResult<VariableMeta> {
    let code = cursor.read_prefixed()?.map(str::to_owned);
    let qc_flag = cursor
        .read_integer_field(Some(field_widths::QC_FLAG))?
        .unwrap_or_default();
    let meta_count = cursor.read_integer_field(None)?.unwrap_or(0);
    let meta_count = usize::try_from(meta_count).map_err(|_| {
        DecodeErrorKind::malformed(format!(
            "negative number of variable-specific metadata: {meta_count}"
        ))
    })?;

    // A count of zero ends this variable's metadata
    let mut values = Vec::new();
    for _ in 0..meta_count {
        let entry_code = cursor.read_prefixed()?.map(str::to_owned);
        let value = cursor.read_numeric_value()?;
        values.push(VariableValue {
            code: entry_code,
            value,
        });
    }

    Ok(VariableMeta {
        code,
        qc_flag,
        meta_count,
        values,
    })
}

fn find_temperature(variables: &[VariableMeta]) -> Option<NumericValue> {
    variables
        .iter()
        .filter(|variable| variable.code.as_deref() == Some(TEMPERATURE_VARIABLE_CODE))
        .find_map(VariableMeta::first_value)
}
