//! Application constants for the WOD processor
//!
//! This module contains the fixed widths of the WOD ASCII exchange grammar,
//! default values, and the output column names used throughout the
//! application.

// =============================================================================
// Record Grammar
// =============================================================================

/// First byte of every cast record in the ASCII exchange variant
pub const RECORD_MARKER: u8 = b'C';

/// Byte standing in place of a numeric triplet when the value is missing
pub const ABSENT_SENTINEL: u8 = b'-';

/// Fixed field widths of the primary header
pub mod field_widths {
    /// Cruise country code (ISO-like, two characters)
    pub const COUNTRY_CODE: usize = 2;

    /// Observation year
    pub const YEAR: usize = 4;

    /// Observation month, zero padded
    pub const MONTH: usize = 2;

    /// Observation day, zero padded
    pub const DAY: usize = 2;

    /// Profile type (0 = observed levels, 1 = standard levels)
    pub const PROFILE_TYPE: usize = 1;

    /// Number of variables in the profile
    pub const VARIABLE_COUNT: usize = 2;

    /// Quality control flag for a variable
    pub const QC_FLAG: usize = 1;
}

/// WOD variable code for temperature
pub const TEMPERATURE_VARIABLE_CODE: &str = "1";

/// Powers of ten indexed by a one-digit precision
pub const POWERS_OF_TEN: [f64; 10] = [
    1.0,
    10.0,
    100.0,
    1_000.0,
    10_000.0,
    100_000.0,
    1_000_000.0,
    10_000_000.0,
    100_000_000.0,
    1_000_000_000.0,
];

/// Bytes shown either side of the failing offset in decode error excerpts
pub const EXCERPT_RADIUS: usize = 24;

// =============================================================================
// File Discovery
// =============================================================================

/// File name patterns picked up when scanning an input directory
pub const DEFAULT_FILE_PATTERNS: &[&str] = &["ocldb*", "*.gz"];

/// Compression suffix of WOD select exports
pub const GZIP_EXTENSION: &str = "gz";

// =============================================================================
// Processing Defaults
// =============================================================================

/// Number of decode error messages kept per file for reporting
pub const DEFAULT_MAX_ERROR_SAMPLES: usize = 10;

/// Default Parquet row group size (rows)
pub const DEFAULT_ROW_GROUP_SIZE: usize = 250_000;

/// Minimum success rate (percent) for a file to count as cleanly decoded
pub const SUCCESS_RATE_THRESHOLD: f64 = 90.0;

// =============================================================================
// Output Columns
// =============================================================================

/// Column names of the Parquet cast table
pub mod columns {
    pub const SOURCE_FILE: &str = "source_file";
    pub const INSTRUMENT_TYPE: &str = "instrument_type";
    pub const CAST_NUMBER: &str = "cast_number";
    pub const TIMESTAMP: &str = "timestamp";
    pub const COUNTRY_CODE: &str = "country_code";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const TEMPERATURE: &str = "temperature";
}
