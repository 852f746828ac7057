//! Basic processing integration tests

use super::{GOOD_CAST, TRUNCATED_CAST, create_test_export, wrap, write_gzip};
use crate::config::WodConfig;
use crate::constants::columns;
use crate::processor::WodProcessor;
use polars::prelude::{ParquetReader, SerReader};
use std::fs::{self, File};
use tempfile::TempDir;

#[tokio::test]
async fn test_basic_processing_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let (export_path, output_path) = create_test_export(&temp_dir);

    let processor = WodProcessor::new(export_path, Some(output_path.clone())).unwrap();

    let stats = processor.process().await.unwrap();

    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.files_failed, 0);
    assert_eq!(stats.total_casts, 3);
    assert_eq!(stats.decode.decode_failures, 0);
    assert_eq!(stats.output_path, output_path);

    // Output directory is created on demand
    assert!(output_path.exists());

    let df = ParquetReader::new(File::open(&output_path).unwrap())
        .finish()
        .unwrap();
    assert_eq!(df.height(), stats.total_casts);

    let instruments: Vec<Option<&str>> = df
        .column(columns::INSTRUMENT_TYPE)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(instruments, vec![Some("CTD"), Some("CTD"), Some("XBT")]);

    let sources: Vec<Option<&str>> = df
        .column(columns::SOURCE_FILE)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(sources[2], Some("ocldb1753579979.3150694.XBT2.gz"));
}

#[tokio::test]
async fn test_decode_only_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let (export_path, output_path) = create_test_export(&temp_dir);

    let processor = WodProcessor::new(export_path, Some(output_path.clone()))
        .unwrap()
        .with_config(WodConfig::default().with_decode_only());

    let stats = processor.process().await.unwrap();

    assert_eq!(stats.total_casts, 3);
    assert!(!output_path.exists());
    assert!(!output_path.parent().unwrap().exists());
}

#[tokio::test]
async fn test_single_file_input() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("ocldb1.3150694.OSD.gz");
    write_gzip(&input, &wrap(GOOD_CAST, 30));

    let processor = WodProcessor::new(input, None).unwrap();
    assert_eq!(
        processor.output_path(),
        temp_dir
            .path()
            .join("parquet")
            .join("ocldb1.3150694.OSD.parquet")
    );

    let stats = processor.process().await.unwrap();

    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.total_casts, 1);
    assert!(processor.output_path().exists());
}

#[tokio::test]
async fn test_corrupt_records_are_counted_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let export_path = temp_dir.path().join("export");
    fs::create_dir_all(&export_path).unwrap();
    write_gzip(
        &export_path.join("ocldb1.CTD.gz"),
        &format!("{GOOD_CAST}\n{TRUNCATED_CAST}\n{GOOD_CAST}\n"),
    );

    let output_path = temp_dir.path().join("casts.parquet");
    let processor = WodProcessor::new(export_path, Some(output_path.clone())).unwrap();

    let stats = processor.process().await.unwrap();

    assert_eq!(stats.total_casts, 2);
    assert_eq!(stats.decode.decode_failures, 1);
    assert_eq!(stats.decode.error_samples.len(), 1);
    assert!((stats.decode.success_rate() - 66.666).abs() < 0.01);

    let df = ParquetReader::new(File::open(&output_path).unwrap())
        .finish()
        .unwrap();
    assert_eq!(df.height(), 2);
}
