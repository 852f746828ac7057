//! Main processing engine for WOD exports.
//!
//! Orchestrates the complete workflow: file discovery, concurrent decoding
//! of gzip-compressed cast records, decode statistics, and Parquet output.

pub mod discovery;
pub mod streaming;
pub mod writer;

#[cfg(test)]
pub mod tests;

use crate::config::WodConfig;
use crate::constants::GZIP_EXTENSION;
use crate::error::{Result, WodError};
use crate::models::ProcessingStats;

use colored::*;
use discovery::FileDiscovery;
use std::path::{Path, PathBuf};
use std::time::Instant;
use streaming::StreamingProcessor;
use tokio::fs;
use tracing::{debug, info, warn};
use writer::ParquetWriter;

/// Main processor for WOD export conversion
pub struct WodProcessor {
    input_path: PathBuf,
    output_path: PathBuf,
    config: WodConfig,
}

impl WodProcessor {
    /// Create a new processor
    ///
    /// Without an explicit output path, casts are written next to the input
    /// as `parquet/<input name>.parquet`.
    pub fn new(input_path: PathBuf, output_path: Option<PathBuf>) -> Result<Self> {
        if !input_path.exists() {
            return Err(WodError::InputNotFound { path: input_path });
        }

        let output_path = output_path.unwrap_or_else(|| default_output_path(&input_path));

        Ok(Self {
            input_path,
            output_path,
            config: WodConfig::default(),
        })
    }

    /// Configure the processor
    pub fn with_config(mut self, config: WodConfig) -> Self {
        self.config = config;
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Main processing entry point
    pub async fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        self.config.validate()?;

        println!("{}", "Starting WOD cast processing".bright_green().bold());
        println!(
            "  {} {}",
            "Input:".bright_cyan(),
            self.input_path.display()
        );
        if !self.config.decode_only {
            println!(
                "  {} {}",
                "Output:".bright_cyan(),
                self.output_path.display()
            );
        }

        // Step 1: Discover WOD files
        println!("\n{}", "Discovering WOD files...".bright_yellow());
        let discovery = FileDiscovery::new(
            self.input_path.clone(),
            &self.config.file_patterns,
            self.config.recursive,
        )?;
        let files = discovery.discover_wod_files().await?;

        if files.is_empty() {
            return Err(WodError::NoWodFiles {
                path: self.input_path.clone(),
                patterns: self.config.file_patterns.clone(),
            });
        }
        println!(
            "  {} {} WOD files",
            "Found".bright_green(),
            files.len().to_string().bright_white().bold()
        );

        // Step 2: Decode files
        println!("\n{}", "Decoding casts...".bright_yellow());
        let streaming = StreamingProcessor::new(self.config.clone());
        let (results, mut stats) = streaming.process_files(&files, &self.output_path).await?;

        // Step 3: Write the cast table
        if self.config.decode_only {
            info!("Decode only mode, skipping parquet output");
        } else {
            if let Some(parent) = self.output_path.parent() {
                fs::create_dir_all(parent).await?;
            }

            println!("\n{}", "Writing parquet...".bright_yellow());
            let writer = ParquetWriter::new(
                self.output_path.clone(),
                self.config.parquet_output.clone(),
            );
            let rows = writer.write_casts(&results).await?;
            debug!("Wrote {} rows to {}", rows, self.output_path.display());
        }

        stats.processing_time_ms = start_time.elapsed().as_millis();
        self.print_summary(&stats);

        Ok(stats)
    }

    fn print_summary(&self, stats: &ProcessingStats) {
        println!("\n{}", "Processing Summary".bright_green().bold());
        println!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            stats.processing_time_ms.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Files processed:".bright_cyan(),
            stats.files_processed.to_string().bright_white()
        );
        if stats.files_failed > 0 {
            println!(
                "  {} {}",
                "Files failed:".bright_red(),
                stats.files_failed.to_string().bright_red().bold()
            );
        }
        println!(
            "  {} {}",
            "Casts decoded:".bright_cyan(),
            stats.total_casts.to_string().bright_white().bold()
        );

        let decode = &stats.decode;
        if decode.decode_failures > 0 {
            println!(
                "  {} {} ({:.2}% success)",
                "Records failed:".bright_red(),
                decode.decode_failures.to_string().bright_red().bold(),
                decode.success_rate()
            );
            for (kind, count) in &decode.failures_by_kind {
                println!("    {} {}", format!("{}:", kind).bright_black(), count);
            }
            for sample in &decode.error_samples {
                println!("    {}", sample.bright_black());
            }
            if !decode.is_successful() {
                warn!(
                    "Decode success rate {:.2}% is below the expected threshold",
                    decode.success_rate()
                );
            }
        }
    }
}

/// Default output location: `<parent>/parquet/<input name>.parquet`
fn default_output_path(input_path: &Path) -> PathBuf {
    let file_name = input_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy();
    let gzip_suffix = format!(".{}", GZIP_EXTENSION);
    let stem = file_name
        .strip_suffix(gzip_suffix.as_str())
        .unwrap_or(&*file_name)
        .to_string();

    input_path
        .parent()
        .unwrap_or(input_path)
        .join("parquet")
        .join(format!("{}.parquet", stem))
}
