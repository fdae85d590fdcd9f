//! Configuration for the biomarker extraction pipeline
//!
//! Thresholds and limits are tuned for OCR'd lab-report text and can be
//! overridden from a JSON file pointed at by `BIOMARK_CONFIG_PATH`.

use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{info, warn};

use crate::errors::{error_logging, AppError, AppResult};

fn default_fuzzy_threshold() -> f64 {
    0.7
}

fn default_strict_threshold() -> f64 {
    0.85
}

fn default_auto_correct_threshold() -> f64 {
    0.85
}

fn default_reference_ttl_secs() -> u64 {
    300
}

fn default_max_name_length() -> usize {
    50
}

fn default_min_segment_length() -> usize {
    10
}

fn default_max_input_bytes() -> usize {
    1_048_576
}

/// Configuration options for extraction and validation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionConfig {
    /// Minimum similarity for a fuzzy alias match to count (exclusive)
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
    /// Stricter similarity used by the async validator's last-resort fuzzy check
    #[serde(default = "default_strict_threshold")]
    pub strict_threshold: f64,
    /// Confidence above which a correction is applied automatically (exclusive)
    #[serde(default = "default_auto_correct_threshold")]
    pub auto_correct_threshold: f64,
    /// Time-to-live for the cached reference table, in seconds
    #[serde(default = "default_reference_ttl_secs")]
    pub reference_ttl_secs: u64,
    /// Candidate names longer than this are rejected outright
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    /// Names shorter than this skip the word-segmentation pass
    #[serde(default = "default_min_segment_length")]
    pub min_segment_length: usize,
    /// Input texts larger than this are rejected as a contract violation
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
            strict_threshold: default_strict_threshold(),
            auto_correct_threshold: default_auto_correct_threshold(),
            reference_ttl_secs: default_reference_ttl_secs(),
            max_name_length: default_max_name_length(),
            min_segment_length: default_min_segment_length(),
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

impl ExtractionConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> AppResult<()> {
        for (name, value) in [
            ("fuzzy_threshold", self.fuzzy_threshold),
            ("strict_threshold", self.strict_threshold),
            ("auto_correct_threshold", self.auto_correct_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AppError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.strict_threshold < self.fuzzy_threshold {
            return Err(AppError::Config(format!(
                "strict_threshold ({}) must not be below fuzzy_threshold ({})",
                self.strict_threshold, self.fuzzy_threshold
            )));
        }

        if self.reference_ttl_secs == 0 {
            return Err(AppError::Config(
                "reference_ttl_secs must be greater than 0".to_string(),
            ));
        }

        if self.max_name_length == 0 {
            return Err(AppError::Config(
                "max_name_length must be greater than 0".to_string(),
            ));
        }

        if self.max_input_bytes == 0 {
            return Err(AppError::Config(
                "max_input_bytes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from a JSON file, falling back to defaults
    ///
    /// Resolution order:
    /// 1. Path from the `BIOMARK_CONFIG_PATH` environment variable
    /// 2. `config/biomark.json` relative to the working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(config_path) = std::env::var("BIOMARK_CONFIG_PATH") {
            info!(
                "Loading extraction config from environment variable: {}",
                config_path
            );
            match Self::from_file(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    error_logging::log_config_error(&e, "BIOMARK_CONFIG_PATH", "load");
                    warn!(
                        "Falling back to default config paths after failing to load '{}'",
                        config_path
                    );
                }
            }
        }

        let fallback_paths = ["config/biomark.json", "../config/biomark.json"];
        for config_path in &fallback_paths {
            if let Ok(config) = Self::from_file(config_path) {
                info!(
                    "Successfully loaded extraction config from fallback path: {}",
                    config_path
                );
                return config;
            }
        }

        Self::default()
    }

    fn from_file(path: &str) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read '{}': {}", path, e)))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("cannot parse '{}': {}", path, e)))?;
        config.validate()?;
        Ok(config)
    }
}
