//! Integration tests for the processor module
//!
//! Tests the complete processing pipeline using small gzip WOD exports
//! written into temporary directories.

pub mod basic_processing;

use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// US cast from 2023-06-15 at -55.13/123.45 with a temperature of 18.5
pub const GOOD_CAST: &str = "C3123567890US17202306154421230442-55135521234522500111011153421850";

/// JP cast from 1999-12-31 with no position and no temperature value
pub const SPARSE_CAST: &str = "C3124567891JP17199912314423500--2250011101115-";

/// `GOOD_CAST` cut inside its last temperature field
pub const TRUNCATED_CAST: &str = "C3123567890US17202306154421230442-55135521234522500111011153421";

/// Write `content` gzip-compressed to `path`
pub fn write_gzip(path: &Path, content: &str) {
    let mut encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

/// Wrap a record across physical lines the way exports do
pub fn wrap(record: &str, width: usize) -> String {
    record
        .as_bytes()
        .chunks(width)
        .map(|chunk| format!("{}\n", String::from_utf8_lossy(chunk)))
        .collect()
}

/// Helper to create a WOD export directory with one file per instrument
pub fn create_test_export(temp_dir: &TempDir) -> (PathBuf, PathBuf) {
    let export_path = temp_dir.path().join("ocldb-export");
    fs::create_dir_all(&export_path).unwrap();

    write_gzip(
        &export_path.join("ocldb1753579979.3150694.CTD.gz"),
        &format!("{}{}", wrap(GOOD_CAST, 20), wrap(SPARSE_CAST, 20)),
    );
    write_gzip(
        &export_path.join("ocldb1753579979.3150694.XBT2.gz"),
        &wrap(GOOD_CAST, 80),
    );

    let output_path = temp_dir.path().join("output").join("casts.parquet");
    (export_path, output_path)
}
