//! Integration tests for WOD decoding and conversion
//!
//! These tests drive the public API end to end: a wrapped, gzip-compressed
//! export is written to disk, decoded file by file, and converted to a
//! Parquet table that is read back and checked.

use chrono::{DateTime, TimeZone, Utc};
use flate2::Compression;
use flate2::write::GzEncoder;
use polars::prelude::{ParquetReader, SerReader};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use wod_processor::processor::WodProcessor;
use wod_processor::processor::streaming::decode_file;
use wod_processor::{
    CompressionAlgorithm, DecodeErrorKind, ParquetOutputConfig, WodConfig, decode_cast_record,
    decode_str, open_wod_file,
};

/// Three casts as exported, wrapped at 24 columns, behind a banner line
const EXPORT: &str = "WOD select export\n\
C3123567890US1720230615\n\
4421230442-551355212345\n\
22500111011153421850\n\
C3124567891JP1719991231\n\
4423500--\n\
2250011101115-\n\
C3123567892US172023061\n";

fn write_gzip(path: &Path, content: &str) {
    let mut encoder = GzEncoder::new(File::create(path).unwrap(), Compression::best());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

#[test]
fn test_decode_str_mixed_export() {
    let results = decode_str(EXPORT, "CTD");

    assert_eq!(results.len(), 4);
    assert!(results[0].as_ref().unwrap_err().is_not_a_record());

    let us = results[1].as_ref().unwrap();
    assert_eq!(us.instrument_type, "CTD");
    assert_eq!(
        us.timestamp,
        Utc.with_ymd_and_hms(2023, 6, 15, 0, 0, 0).unwrap()
    );
    assert_eq!(us.latitude_degrees(), Some(-55.13));
    assert_eq!(us.longitude_degrees(), Some(123.45));
    assert_eq!(us.temperature_celsius(), Some(18.5));

    let jp = results[2].as_ref().unwrap();
    assert_eq!(jp.cast_number.as_deref(), Some("67891"));
    assert_eq!(jp.temperature, None);

    let truncated = results[3].as_ref().unwrap_err();
    assert!(matches!(truncated.kind, DecodeErrorKind::OutOfBounds { .. }));
}

#[test]
fn test_epoch_sentinel_for_missing_month() {
    let raw = "C3123567890US172023  ";
    let result = decode_cast_record(raw, "OSD");

    // The record is cut after the date, so it fails, but not on the date
    assert!(matches!(
        result.unwrap_err().kind,
        DecodeErrorKind::OutOfBounds { .. }
    ));

    let raw = "C3123567890US172023  154421230442-55135521234522500111011153421850";
    let cast = decode_cast_record(raw, "OSD").unwrap();
    assert_eq!(cast.timestamp, DateTime::<Utc>::UNIX_EPOCH);
    assert_eq!(cast.temperature_celsius(), Some(18.5));
}

#[test]
fn test_epoch_sentinel_for_missing_day() {
    let raw = "C3123567890US17202306  4421230442-55135521234522500111011153421850";
    let cast = decode_cast_record(raw, "OSD").unwrap();
    assert!(cast.has_epoch_timestamp());
    assert_eq!(cast.country_code, "US");
    assert_eq!(cast.latitude_degrees(), Some(-55.13));
}

#[test]
fn test_gzip_file_decoding() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ocldb1753579979.3150694.CTD3.gz");
    write_gzip(&path, EXPORT);

    let records = open_wod_file(&path)
        .unwrap()
        .collect::<std::io::Result<Vec<_>>>()
        .unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[1].line_number, 2);
    assert_eq!(records[2].line_number, 5);

    let result = decode_file(&path, 10).unwrap();
    assert_eq!(result.instrument, "CTD");
    assert_eq!(result.casts.len(), 2);
    assert_eq!(result.stats.total_records, 4);
    assert_eq!(result.stats.not_a_record, 1);
    assert_eq!(result.stats.decode_failures, 1);
    assert!((result.stats.success_rate() - 66.666).abs() < 0.01);
}

#[tokio::test]
async fn test_export_to_parquet() {
    let temp_dir = TempDir::new().unwrap();
    let export_path = temp_dir.path().join("export");
    fs::create_dir_all(&export_path).unwrap();
    write_gzip(&export_path.join("ocldb1.3150694.XBT.gz"), EXPORT);
    write_gzip(&export_path.join("ocldb1.3150694.CTD.gz"), EXPORT);

    let output_path = temp_dir.path().join("casts.parquet");
    let config = WodConfig::default()
        .with_max_concurrent_files(2)
        .with_parquet_output(ParquetOutputConfig {
            compression_algorithm: CompressionAlgorithm::Zstd,
            row_group_size: 2,
            ..Default::default()
        });

    let processor = WodProcessor::new(export_path, Some(output_path.clone()))
        .unwrap()
        .with_config(config);
    let stats = processor.process().await.unwrap();

    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.total_casts, 4);
    assert_eq!(stats.decode.decode_failures, 2);
    assert_eq!(stats.decode.failures_by_kind.get("out_of_bounds"), Some(&2));

    let df = ParquetReader::new(File::open(&output_path).unwrap())
        .finish()
        .unwrap();
    assert_eq!(df.height(), 4);

    let countries: Vec<Option<&str>> = df
        .column("country_code")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(countries, vec![Some("JP"), Some("US"), Some("JP"), Some("US")]);

    let cast_numbers = df.column("cast_number").unwrap();
    assert_eq!(cast_numbers.null_count(), 0);
}
