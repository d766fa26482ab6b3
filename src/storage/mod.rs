// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::TickerReport;
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn report_path(&self, ticker: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}_stockanalysis_data.json", ticker.to_lowercase()))
    }

    /// Writes the report as pretty JSON (2-space indent, UTF-8, non-ASCII kept as is).
    pub fn save_report(&self, report: &TickerReport) -> Result<PathBuf, StorageError> {
        let file_path = self.report_path(&report.ticker);

        let json = serde_json::to_string_pretty(report)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, json).map_err(StorageError::IoError)?;

        tracing::info!("Saved report to {}", file_path.display());
        Ok(file_path)
    }
}
