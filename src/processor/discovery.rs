//! File discovery module for WOD exports
//!
//! Resolves the input path into the list of WOD files to decode. A file
//! path is used as is; a directory is scanned for file names matching the
//! configured glob patterns.

use crate::error::{Result, WodError};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::debug;
use walkdir::WalkDir;

/// File discovery component for WOD exports
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    input_path: PathBuf,
    patterns: Vec<Pattern>,
    recursive: bool,
}

impl FileDiscovery {
    /// Create a new file discovery instance, compiling the glob patterns
    pub fn new(input_path: PathBuf, patterns: &[String], recursive: bool) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| {
                    WodError::configuration(format!("Invalid file pattern '{}': {}", pattern, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            input_path,
            patterns,
            recursive,
        })
    }

    /// Discover all WOD files, sorted by path
    ///
    /// WOD select exports are delivered as one flat directory:
    /// ```text
    /// export/
    ///   ocldb1753579979.3150694.OSD.gz
    ///   ocldb1753579979.3150694.OSD2.gz
    ///   ocldb1753579979.3150694.CTD.gz
    ///   ocldb1753579979.3150694.XBT.gz
    /// ```
    pub async fn discover_wod_files(&self) -> Result<Vec<PathBuf>> {
        if !self.input_path.exists() {
            return Err(WodError::InputNotFound {
                path: self.input_path.clone(),
            });
        }

        if self.input_path.is_file() {
            debug!("Input is a single file: {}", self.input_path.display());
            return Ok(vec![self.input_path.clone()]);
        }

        let discovery = self.clone();
        let files = task::spawn_blocking(move || discovery.scan_directory())
            .await
            .map_err(|e| {
                WodError::processing_failed(
                    self.input_path.clone(),
                    format!("File discovery task failed: {}", e),
                )
            })??;

        debug!(
            "Found {} WOD files in {}",
            files.len(),
            self.input_path.display()
        );

        Ok(files)
    }

    fn scan_directory(&self) -> Result<Vec<PathBuf>> {
        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.input_path).min_depth(1).max_depth(max_depth) {
            let entry = entry.map_err(|e| {
                WodError::processing_failed(
                    self.input_path.clone(),
                    format!("Directory traversal failed: {}", e),
                )
            })?;
            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Check whether a file name matches any configured pattern
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.patterns.iter().any(|pattern| pattern.matches(name)))
    }
}
