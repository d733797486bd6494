//! Pipeline configuration

use crate::dataset::{OPPORTUNITIES_FILE, PAGES_FILE};
use crate::embedding::DEFAULT_MODEL;
use std::path::PathBuf;
use thiserror::Error;

/// Directory both stages read from and write to, relative to the working dir
pub const DEFAULT_OUTPUT_DIR: &str = ".internal-links";

/// Default corpus root
pub const DEFAULT_CONTENT_DIR: &str = "content";

/// Minimum cosine similarity for a link opportunity
pub const DEFAULT_THRESHOLD: f32 = 0.7;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("threshold must be within [-1, 1], got {0}")]
    ThresholdOutOfRange(f32),

    #[error("invalid threshold '{0}': expected a number")]
    InvalidThreshold(String),
}

/// Settings shared by the extractor and the finder
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Where `pages.json` and `opportunities.json` live
    pub output_dir: PathBuf,
    /// Similarity cut-off for the finder (inclusive)
    pub threshold: f32,
    /// Embedding model name for the extractor
    pub model: String,
    /// Log progress every this many embedded documents
    pub progress_interval: usize,
    /// Rows shown in each console summary section
    pub report_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            threshold: DEFAULT_THRESHOLD,
            model: DEFAULT_MODEL.to_string(),
            progress_interval: 10,
            report_limit: 10,
        }
    }
}

impl PipelineConfig {
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Result<Self, ConfigError> {
        self.threshold = validate_threshold(threshold)?;
        Ok(self)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_report_limit(mut self, limit: usize) -> Self {
        self.report_limit = limit;
        self
    }

    pub fn pages_path(&self) -> PathBuf {
        self.output_dir.join(PAGES_FILE)
    }

    pub fn opportunities_path(&self) -> PathBuf {
        self.output_dir.join(OPPORTUNITIES_FILE)
    }
}

pub fn validate_threshold(threshold: f32) -> Result<f32, ConfigError> {
    if (-1.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(ConfigError::ThresholdOutOfRange(threshold))
    }
}

/// Parse a `--threshold` argument
pub fn parse_threshold(raw: &str) -> Result<f32, ConfigError> {
    let value: f32 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidThreshold(raw.to_string()))?;
    validate_threshold(value)
}

/// Cache directory for downloaded embedding models
/// (~/.cache/interlink/models on Linux)
pub fn model_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("interlink").join("models"))
}
