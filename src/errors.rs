//! # Application Error Types
//!
//! This module defines common error types used throughout the biomark crate.
//! It provides structured error handling for the extraction pipeline and its
//! collaborators.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Input validation errors (contract violations by the caller)
    Validation(String),
    /// Reference-data source errors (backend fetch failures)
    Reference(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Validation(msg) => write!(f, "[VALIDATION] {}", msg),
            AppError::Reference(msg) => write!(f, "[REFERENCE] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Reference(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the crate
pub mod error_logging {
    use tracing::error;

    /// Log reference-data fetch errors with cache context
    pub fn log_reference_error(
        error: &impl std::fmt::Display,
        operation: &str,
        cached_rows: Option<usize>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            cached_rows = ?cached_rows,
            "Reference data operation failed"
        );
    }

    /// Log extraction errors with input context
    pub fn log_extraction_error(
        error: &impl std::fmt::Display,
        operation: &str,
        input_preview: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            input_preview = ?input_preview.map(truncate_preview),
            "Extraction failed"
        );
    }

    /// Truncate a preview to 100 chars on a char boundary
    pub(crate) fn truncate_preview(text: &str) -> String {
        match text.char_indices().nth(100) {
            Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
            None => text.to_string(),
        }
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_prefixes() {
        assert_eq!(
            AppError::Config("bad threshold".to_string()).to_string(),
            "[CONFIG] bad threshold"
        );
        assert_eq!(
            AppError::Reference("timeout".to_string()).to_string(),
            "[REFERENCE] timeout"
        );
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(err, AppError::Internal("boom".to_string()));
    }

    #[test]
    fn test_preview_truncation_respects_char_boundaries() {
        // Multi-byte chars straddling the cutoff must not split mid-char
        let multibyte = "µ".repeat(150);
        let preview = error_logging::truncate_preview(&multibyte);
        assert_eq!(preview.chars().count(), 103); // 100 chars + "..."
        assert!(preview.ends_with("..."));

        let short = "Cholesterol: 180 mg/dL";
        assert_eq!(error_logging::truncate_preview(short), short);
    }
}
