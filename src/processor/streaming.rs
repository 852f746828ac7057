//! Streaming decode module for WOD exports
//!
//! Decodes files concurrently on the blocking thread pool. Results come back
//! in discovery order, so every cast stays associated with the file it was
//! read from.

use crate::config::WodConfig;
use crate::decoder::decode_cast_record;
use crate::error::{Result, WodError};
use crate::models::{DecodeStats, FileDecodeResult, ProcessingStats};
use crate::reader::{instrument_from_path, open_wod_file};

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{debug, error, warn};

/// Streaming processor for WOD exports
#[derive(Debug, Clone)]
pub struct StreamingProcessor {
    config: WodConfig,
}

impl StreamingProcessor {
    /// Create a new streaming processor
    pub fn new(config: WodConfig) -> Self {
        Self { config }
    }

    /// Decode files with bounded concurrency
    ///
    /// A file that cannot be read is counted as failed; the remaining files
    /// are still decoded.
    pub async fn process_files(
        &self,
        files: &[PathBuf],
        output_path: &Path,
    ) -> Result<(Vec<FileDecodeResult>, ProcessingStats)> {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .map_err(|e| WodError::configuration(format!("Invalid progress template: {}", e)))?
                .progress_chars("#>-"),
        );
        pb.set_message("Decoding files");

        let concurrent_limit = self.config.max_concurrent_files.clamp(1, files.len().max(1));
        let max_error_samples = self.config.max_error_samples;
        debug!(
            "Decoding {} files with concurrency {}",
            files.len(),
            concurrent_limit
        );

        let outcomes: Vec<(PathBuf, Result<FileDecodeResult>)> = stream::iter(files.iter().cloned())
            .map(|file_path| {
                let pb = pb.clone();
                async move {
                    if let Some(file_name) = file_path.file_name() {
                        pb.set_message(format!("Decoding: {}", file_name.to_string_lossy()));
                    }

                    let result = task::spawn_blocking({
                        let file_path = file_path.clone();
                        move || decode_file(&file_path, max_error_samples)
                    })
                    .await
                    .map_err(|e| {
                        WodError::processing_failed(
                            file_path.clone(),
                            format!("Decode task failed: {}", e),
                        )
                    })
                    .and_then(|result| result);

                    pb.inc(1);
                    (file_path, result)
                }
            })
            .buffered(concurrent_limit)
            .collect()
            .await;

        pb.finish_with_message("All WOD files decoded");

        let mut stats = ProcessingStats {
            output_path: output_path.to_path_buf(),
            ..Default::default()
        };
        let mut results = Vec::with_capacity(outcomes.len());

        for (file_path, outcome) in outcomes {
            match outcome {
                Ok(result) => {
                    if result.stats.decode_failures > 0 {
                        warn!(
                            "{}: {} of {} records failed to decode",
                            file_path.display(),
                            result.stats.decode_failures,
                            result.stats.total_records
                        );
                    }
                    stats.files_processed += 1;
                    stats.total_casts += result.casts.len();
                    stats.decode.merge(&result.stats, max_error_samples);
                    results.push(result);
                }
                Err(e) => {
                    error!("Failed to decode {}: {:#}", file_path.display(), e);
                    stats.files_failed += 1;
                }
            }
        }

        Ok((results, stats))
    }
}

/// Decode every record of one WOD file
///
/// Corrupt records are counted and skipped. Only read failures of the file
/// itself (missing file, broken gzip stream) fail the whole file.
pub fn decode_file(path: &Path, max_error_samples: usize) -> Result<FileDecodeResult> {
    let instrument = instrument_from_path(path);
    debug!(
        "Decoding {} as instrument {}",
        path.display(),
        instrument
    );

    let mut casts = Vec::new();
    let mut stats = DecodeStats::new();

    for raw in open_wod_file(path)? {
        let raw = raw.map_err(|e| {
            WodError::processing_failed(
                path,
                format!("Read failed after {} records: {}", stats.total_records, e),
            )
        })?;

        let outcome = decode_cast_record(&raw.text, &instrument);
        stats.record(&outcome, max_error_samples);

        match outcome {
            Ok(cast) => casts.push(cast),
            Err(e) if e.is_not_a_record() => {
                debug!(
                    "{}:{}: skipping non-record text",
                    path.display(),
                    raw.line_number
                );
            }
            Err(e) => {
                debug!("{}:{}: {}", path.display(), raw.line_number, e);
            }
        }
    }

    debug!(
        "Decoded {} casts from {} ({} failures)",
        casts.len(),
        path.display(),
        stats.decode_failures
    );

    Ok(FileDecodeResult {
        path: path.to_path_buf(),
        instrument,
        casts,
        stats,
    })
}
