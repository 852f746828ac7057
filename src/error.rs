//! Error handling for WOD processing operations.
//!
//! Provides error types with context for file discovery, decompression,
//! table conversion, and Parquet output failures. Per-record decode
//! failures live in [`crate::decoder::DecodeError`] and never surface here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WodError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("No WOD files matching {patterns:?} found in: {path}")]
    NoWodFiles {
        path: PathBuf,
        patterns: Vec<String>,
    },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl WodError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing failure for a specific file
    pub fn processing_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ProcessingFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WodError>;
