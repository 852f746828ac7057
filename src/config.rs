//! Configuration management and validation.
//!
//! Provides configuration structures for file discovery, decode
//! concurrency, error reporting, and Parquet output settings.

use crate::constants::{DEFAULT_FILE_PATTERNS, DEFAULT_MAX_ERROR_SAMPLES, DEFAULT_ROW_GROUP_SIZE};
use crate::error::{Result, WodError};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Parquet output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParquetOutputConfig {
    /// Compression algorithm selection
    pub compression_algorithm: CompressionAlgorithm,

    /// Rows per row group
    pub row_group_size: usize,

    /// Enable column statistics for query pruning
    pub enable_statistics: bool,

    /// Sort casts by instrument then timestamp before writing
    pub sort_by_instrument_then_time: bool,
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl Default for ParquetOutputConfig {
    fn default() -> Self {
        Self {
            compression_algorithm: CompressionAlgorithm::Snappy,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            enable_statistics: true,
            sort_by_instrument_then_time: true,
        }
    }
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = WodError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "snappy" => Ok(Self::Snappy),
            "zstd" => Ok(Self::Zstd),
            "lz4" => Ok(Self::Lz4),
            "none" | "uncompressed" => Ok(Self::Uncompressed),
            other => Err(WodError::configuration(format!(
                "Unknown compression '{}' (expected snappy, zstd, lz4, or none)",
                other
            ))),
        }
    }
}

/// Global configuration for WOD processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WodConfig {
    /// Maximum files decoded concurrently
    pub max_concurrent_files: usize,

    /// Glob patterns selecting WOD files inside an input directory
    pub file_patterns: Vec<String>,

    /// Descend into subdirectories during discovery
    pub recursive: bool,

    /// Decode error messages kept per file
    pub max_error_samples: usize,

    /// Decode and report only, without writing Parquet output
    pub decode_only: bool,

    /// Parquet output configuration
    pub parquet_output: ParquetOutputConfig,
}

impl Default for WodConfig {
    fn default() -> Self {
        Self {
            max_concurrent_files: num_cpus::get().max(1),
            file_patterns: DEFAULT_FILE_PATTERNS
                .iter()
                .map(|pattern| pattern.to_string())
                .collect(),
            recursive: false,
            max_error_samples: DEFAULT_MAX_ERROR_SAMPLES,
            decode_only: false,
            parquet_output: ParquetOutputConfig::default(),
        }
    }
}

impl WodConfig {
    /// Set maximum concurrent files
    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files;
        self
    }

    /// Replace the discovery file patterns
    pub fn with_file_patterns(mut self, patterns: Vec<String>) -> Self {
        self.file_patterns = patterns;
        self
    }

    /// Enable recursive discovery
    pub fn with_recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    /// Set the number of decode error messages kept per file
    pub fn with_max_error_samples(mut self, samples: usize) -> Self {
        self.max_error_samples = samples;
        self
    }

    /// Enable decode only mode
    pub fn with_decode_only(mut self) -> Self {
        self.decode_only = true;
        self
    }

    /// Configure parquet output settings
    pub fn with_parquet_output(mut self, config: ParquetOutputConfig) -> Self {
        self.parquet_output = config;
        self
    }

    /// Check the configuration for values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_files == 0 {
            return Err(WodError::configuration(
                "max_concurrent_files must be at least 1",
            ));
        }
        if self.file_patterns.is_empty() {
            return Err(WodError::configuration(
                "at least one file pattern is required",
            ));
        }
        if self.parquet_output.row_group_size == 0 {
            return Err(WodError::configuration("row_group_size must be at least 1"));
        }
        Ok(())
    }
}
