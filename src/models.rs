//! Core data structures and types for WOD processing.
//!
//! Defines the decoded cast model (numeric values, variable metadata, cast
//! records) together with the decode and processing statistics reported by
//! the pipeline.

use crate::constants::{POWERS_OF_TEN, SUCCESS_RATE_THRESHOLD};
use crate::decoder::DecodeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A number in the decimal-point-free WOD encoding
///
/// The raw digit string is kept as an integer together with the triplet that
/// described it, so the decoded value is `raw / 10^precision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumericValue {
    /// Significant digits as declared in the record (informational only)
    pub significant_digits: u8,
    /// Number of digit bytes in the value, sign excluded
    pub total_digits: u8,
    /// Implied decimal places
    pub precision: u8,
    /// Signed digit string parsed as an integer
    pub raw: i64,
}

impl NumericValue {
    pub fn new(significant_digits: u8, total_digits: u8, precision: u8, raw: i64) -> Self {
        Self {
            significant_digits,
            total_digits,
            precision,
            raw,
        }
    }

    /// Decoded value with the implied decimal shift applied
    pub fn value(&self) -> f64 {
        self.raw as f64 / POWERS_OF_TEN[usize::from(self.precision).min(POWERS_OF_TEN.len() - 1)]
    }
}

/// One entry of variable-specific metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableValue {
    pub code: Option<String>,
    pub value: Option<NumericValue>,
}

/// A variable declared in the cast header with its metadata entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableMeta {
    pub code: Option<String>,
    pub qc_flag: i64,
    pub meta_count: usize,
    pub values: Vec<VariableValue>,
}

impl VariableMeta {
    /// Value of the first metadata entry, if it carries one
    pub fn first_value(&self) -> Option<NumericValue> {
        self.values.first().and_then(|entry| entry.value)
    }
}

/// A decoded oceanographic cast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastRecord {
    /// Instrument category supplied by the caller (OSD, CTD, XBT, ...)
    pub instrument_type: String,
    /// WOD unique cast number
    pub cast_number: Option<String>,
    /// Start of the observation day in UTC, or the Unix epoch when the date is incomplete
    pub timestamp: DateTime<Utc>,
    pub country_code: String,
    pub latitude: Option<NumericValue>,
    pub longitude: Option<NumericValue>,
    pub temperature: Option<NumericValue>,
    /// Variables declared in the cast header, in record order
    pub variables: Vec<VariableMeta>,
}

impl CastRecord {
    pub fn latitude_degrees(&self) -> Option<f64> {
        self.latitude.map(|v| v.value())
    }

    pub fn longitude_degrees(&self) -> Option<f64> {
        self.longitude.map(|v| v.value())
    }

    pub fn temperature_celsius(&self) -> Option<f64> {
        self.temperature.map(|v| v.value())
    }

    /// True when the date fields were incomplete and the epoch fallback was used
    pub fn has_epoch_timestamp(&self) -> bool {
        self.timestamp == DateTime::<Utc>::UNIX_EPOCH
    }

    /// Look up a declared variable by its WOD code
    pub fn variable(&self, code: &str) -> Option<&VariableMeta> {
        self.variables
            .iter()
            .find(|variable| variable.code.as_deref() == Some(code))
    }
}

/// Per-file decode statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecodeStats {
    /// Logical records produced by the line source
    pub total_records: usize,

    /// Records decoded into casts
    pub casts_decoded: usize,

    /// Fragments that did not start with the record marker
    pub not_a_record: usize,

    /// Records that failed to decode
    pub decode_failures: usize,

    /// Failure counts keyed by error kind
    pub failures_by_kind: BTreeMap<String, usize>,

    /// First few failure messages for reporting
    pub error_samples: Vec<String>,
}

impl DecodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one decode outcome, keeping at most `max_samples` messages
    pub fn record(&mut self, outcome: &Result<CastRecord, DecodeError>, max_samples: usize) {
        self.total_records += 1;
        match outcome {
            Ok(_) => self.casts_decoded += 1,
            Err(error) if error.is_not_a_record() => self.not_a_record += 1,
            Err(error) => {
                self.decode_failures += 1;
                *self
                    .failures_by_kind
                    .entry(error.kind.label().to_string())
                    .or_insert(0) += 1;
                if self.error_samples.len() < max_samples {
                    self.error_samples
                        .push(format!("Record {}: {}", self.total_records, error));
                }
            }
        }
    }

    /// Fold another file's statistics into this one
    pub fn merge(&mut self, other: &DecodeStats, max_samples: usize) {
        self.total_records += other.total_records;
        self.casts_decoded += other.casts_decoded;
        self.not_a_record += other.not_a_record;
        self.decode_failures += other.decode_failures;
        for (kind, count) in &other.failures_by_kind {
            *self.failures_by_kind.entry(kind.clone()).or_insert(0) += count;
        }
        let room = max_samples.saturating_sub(self.error_samples.len());
        self.error_samples
            .extend(other.error_samples.iter().take(room).cloned());
    }

    /// Decoded casts as a percentage of candidate records (fragments excluded)
    pub fn success_rate(&self) -> f64 {
        let candidates = self.casts_decoded + self.decode_failures;
        if candidates == 0 {
            0.0
        } else {
            (self.casts_decoded as f64 / candidates as f64) * 100.0
        }
    }

    pub fn is_successful(&self) -> bool {
        self.success_rate() > SUCCESS_RATE_THRESHOLD
    }
}

/// Casts decoded from one source file
#[derive(Debug, Clone)]
pub struct FileDecodeResult {
    pub path: PathBuf,
    pub instrument: String,
    pub casts: Vec<CastRecord>,
    pub stats: DecodeStats,
}

impl FileDecodeResult {
    /// File name used in the `source_file` output column
    pub fn source_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub total_casts: usize,
    pub decode: DecodeStats,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}
