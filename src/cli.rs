//! Command-line interface components.

use crate::config::{CompressionAlgorithm, ParquetOutputConfig, WodConfig};
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "wod_processor")]
#[command(about = "Decode World Ocean Database ASCII cast records into Parquet")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// WOD export directory or a single WOD file (.gz or plain text)
    #[arg(value_name = "INPUT_PATH")]
    pub input_path: PathBuf,

    /// Output Parquet file (defaults to <input parent>/parquet/<input name>.parquet)
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Decode and report statistics without writing Parquet output
    #[arg(long)]
    pub decode_only: bool,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy")]
    pub compression: String,

    /// Keep casts in file order instead of sorting by instrument and time
    #[arg(long)]
    pub no_sort: bool,

    /// Rows per Parquet row group
    #[arg(long)]
    pub row_group_size: Option<usize>,

    /// File name patterns selecting WOD files in a directory (repeatable)
    #[arg(short, long = "pattern", value_name = "GLOB")]
    pub patterns: Vec<String>,

    /// Descend into subdirectories of the input directory
    #[arg(short, long)]
    pub recursive: bool,

    /// Maximum number of files decoded concurrently (defaults to CPU count)
    #[arg(short = 'j', long)]
    pub max_concurrent_files: Option<usize>,

    /// Number of decode error messages to report
    #[arg(long)]
    pub max_error_samples: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Build the processing configuration, starting from defaults
    pub fn build_config(&self) -> Result<WodConfig> {
        let compression: CompressionAlgorithm = self.compression.parse()?;
        let defaults = ParquetOutputConfig::default();
        let parquet_output = ParquetOutputConfig {
            compression_algorithm: compression,
            row_group_size: self.row_group_size.unwrap_or(defaults.row_group_size),
            sort_by_instrument_then_time: !self.no_sort,
            ..defaults
        };

        let mut config = WodConfig::default().with_parquet_output(parquet_output);
        if !self.patterns.is_empty() {
            config = config.with_file_patterns(self.patterns.clone());
        }
        if self.recursive {
            config = config.with_recursive();
        }
        if let Some(max_files) = self.max_concurrent_files {
            config = config.with_max_concurrent_files(max_files);
        }
        if let Some(samples) = self.max_error_samples {
            config = config.with_max_error_samples(samples);
        }
        if self.decode_only {
            config = config.with_decode_only();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn get_log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

/// Initialize the tracing subscriber; `RUST_LOG` overrides the level
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wod_processor={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}
