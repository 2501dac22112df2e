//! Configuration management and validation.
//!
//! A run is configured by one JSON document with three sections:
//! processing parameters, the QC threshold mapping, and logging. Every
//! section and key is optional; unknown sections (for example database or
//! data-source settings used by other tools) are ignored.

use crate::app::services::qc_engine::{ThresholdConfig, ThresholdPolicy};
use crate::constants::{DEFAULT_MAX_WORKERS, LOG_LEVELS};
use crate::error::{QcError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Processing parameters for the batch pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Profiles quality controlled concurrently
    pub max_workers: usize,

    /// Show a progress bar while running
    pub show_progress: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            show_progress: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityControlConfig {
    /// Threshold mapping handed to the QC engine
    pub thresholds: ThresholdConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,

    /// Emit one JSON object per log line
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub processing: ProcessingConfig,
    pub quality_control: QualityControlConfig,
    pub logging: LoggingConfig,
}

impl PipelineConfig {
    /// Load configuration from a JSON file
    ///
    /// A missing file reports a `.template.json` sibling when one exists.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let template = template_path(path).filter(|candidate| candidate.exists());
            return Err(QcError::ConfigNotFound {
                path: path.to_path_buf(),
                template,
            });
        }

        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check the configuration can drive a run
    pub fn validate(&self) -> Result<()> {
        if self.processing.max_workers == 0 {
            return Err(QcError::configuration(
                "processing.max_workers must be at least 1",
            ));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(QcError::configuration(format!(
                "logging.level '{}' is not one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        self.threshold_policy().map(|_| ())
    }

    /// Build the QC threshold policy from the `quality_control` section
    pub fn threshold_policy(&self) -> Result<ThresholdPolicy> {
        ThresholdPolicy::from_config(&self.quality_control.thresholds)
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.processing.max_workers = max_workers;
        self
    }

    pub fn with_thresholds(mut self, thresholds: ThresholdConfig) -> Self {
        self.quality_control.thresholds = thresholds;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.processing.show_progress = show_progress;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }
}

/// `config.json` -> `config.template.json`
fn template_path(path: &Path) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_string_lossy();
    Some(path.with_file_name(format!("{}.template.json", stem)))
}
