//! WOD Processor Library
//!
//! A Rust library for decoding World Ocean Database (WOD) ASCII cast
//! records and converting WOD select exports into Parquet tables.
//!
//! This library provides tools for:
//! - Decoding cast records with a bounds-checked field cursor
//! - Reading significant/total/precision encoded numeric fields
//! - Reassembling wrapped records from plain or gzip-compressed files
//! - Decoding whole exports concurrently with per-file statistics
//! - Writing decoded casts to Parquet with configurable compression
//!
//! ```
//! use wod_processor::decode_str;
//!
//! let export = "C3123567890US1720230615\n\
//!               4421230442-551355212345\n\
//!               22500111011153421850\n";
//! let casts = decode_str(export, "CTD");
//!
//! let cast = casts[0].as_ref().unwrap();
//! assert_eq!(cast.country_code, "US");
//! assert_eq!(cast.temperature_celsius(), Some(18.5));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod models;
pub mod processor;
pub mod reader;

pub use config::{CompressionAlgorithm, ParquetOutputConfig, WodConfig};
pub use decoder::{DecodeError, DecodeErrorKind, FieldCursor, decode_cast_record};
pub use error::{Result, WodError};
pub use models::{
    CastRecord, DecodeStats, FileDecodeResult, NumericValue, ProcessingStats, VariableMeta,
    VariableValue,
};
pub use reader::{RecordReader, decode_str, extract_instrument, open_wod_file};
