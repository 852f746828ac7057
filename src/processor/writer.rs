//! Parquet writing module for WOD casts
//!
//! Flattens decoded casts into one row per cast and writes them to a
//! single Parquet file with the configured compression, statistics, and
//! row group size.

use crate::config::ParquetOutputConfig;
use crate::constants::columns;
use crate::error::{Result, WodError};
use crate::models::FileDecodeResult;

use polars::prelude::{
    DataFrame, DataType, IntoLazy, ParquetWriter as PolarsParquetWriter, SortMultipleOptions,
    StatisticsOptions, TimeUnit, col, df,
};
use std::path::PathBuf;
use tracing::debug;

/// Parquet writer for the cast table
#[derive(Debug, Clone)]
pub struct ParquetWriter {
    output_path: PathBuf,
    config: ParquetOutputConfig,
}

impl ParquetWriter {
    /// Create a new Parquet writer
    pub fn new(output_path: PathBuf, config: ParquetOutputConfig) -> Self {
        Self {
            output_path,
            config,
        }
    }

    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }

    /// Write every decoded cast, returning the number of rows written
    ///
    /// An empty result set still produces a file with the full schema.
    pub async fn write_casts(&self, results: &[FileDecodeResult]) -> Result<usize> {
        let df = casts_to_dataframe(results, self.config.sort_by_instrument_then_time)?;
        let rows = df.height();

        debug!(
            "Writing {} casts to {}",
            rows,
            self.output_path.display()
        );

        let writer = self.clone();
        tokio::task::spawn_blocking(move || writer.write_dataframe_optimized(df))
            .await
            .map_err(|e| {
                WodError::processing_failed(
                    self.output_path.clone(),
                    format!("Failed to spawn parquet write task: {}", e),
                )
            })??;

        debug!("Parquet write completed: {} rows", rows);
        Ok(rows)
    }

    /// Write DataFrame to parquet with optimized settings
    fn write_dataframe_optimized(&self, mut df: DataFrame) -> Result<()> {
        let statistics = if self.config.enable_statistics {
            StatisticsOptions::full()
        } else {
            StatisticsOptions::empty()
        };

        let file = std::fs::File::create(&self.output_path)?;
        PolarsParquetWriter::new(file)
            .with_compression(self.config.compression_algorithm.to_polars_compression())
            .with_statistics(statistics)
            .with_row_group_size(Some(self.config.row_group_size))
            .finish(&mut df)
            .map_err(|e| {
                WodError::processing_failed(
                    self.output_path.clone(),
                    format!("Failed to write parquet: {}", e),
                )
            })?;

        Ok(())
    }
}

/// Build the cast table, one row per decoded cast
///
/// Absent latitude, longitude, temperature and cast number become nulls.
/// Timestamps are stored as UTC milliseconds.
pub fn casts_to_dataframe(results: &[FileDecodeResult], sort: bool) -> Result<DataFrame> {
    let rows: usize = results.iter().map(|result| result.casts.len()).sum();

    let mut source_file = Vec::with_capacity(rows);
    let mut instrument_type = Vec::with_capacity(rows);
    let mut cast_number = Vec::with_capacity(rows);
    let mut timestamp = Vec::with_capacity(rows);
    let mut country_code = Vec::with_capacity(rows);
    let mut latitude = Vec::with_capacity(rows);
    let mut longitude = Vec::with_capacity(rows);
    let mut temperature = Vec::with_capacity(rows);

    for result in results {
        let source = result.source_name();
        for cast in &result.casts {
            source_file.push(source.clone());
            instrument_type.push(cast.instrument_type.clone());
            cast_number.push(cast.cast_number.clone());
            timestamp.push(cast.timestamp.timestamp_millis());
            country_code.push(cast.country_code.clone());
            latitude.push(cast.latitude_degrees());
            longitude.push(cast.longitude_degrees());
            temperature.push(cast.temperature_celsius());
        }
    }

    let df = df!(
        columns::SOURCE_FILE => source_file,
        columns::INSTRUMENT_TYPE => instrument_type,
        columns::CAST_NUMBER => cast_number,
        columns::TIMESTAMP => timestamp,
        columns::COUNTRY_CODE => country_code,
        columns::LATITUDE => latitude,
        columns::LONGITUDE => longitude,
        columns::TEMPERATURE => temperature,
    )?;

    let frame = df.lazy().with_column(
        col(columns::TIMESTAMP).cast(DataType::Datetime(TimeUnit::Milliseconds, None)),
    );

    // Instrument then time keeps row group statistics tight for the usual queries
    let frame = if sort {
        frame.sort_by_exprs(
            [col(columns::INSTRUMENT_TYPE), col(columns::TIMESTAMP)],
            SortMultipleOptions::default().with_maintain_order(true),
        )
    } else {
        frame
    };

    Ok(frame.collect()?)
}
