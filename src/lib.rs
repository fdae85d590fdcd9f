//! # biomark
//!
//! Biomarker extraction and normalization for OCR'd lab-report text.
//!
//! The pipeline takes raw extracted text, repairs common OCR concatenation
//! artifacts, pulls out `(name, value, unit)` candidates with layered regex
//! patterns, validates them through a synchronous quick tier and an async
//! reference-backed tier, corrects mangled names against an immutable alias
//! table, and returns deduplicated canonical results.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use biomark::cache::ReferenceCache;
//! use biomark::config::ExtractionConfig;
//! use biomark::pipeline::extract_biomarkers;
//! use biomark::reference::PgReferenceSource;
//! use biomark::validation::ReferenceValidator;
//!
//! # async fn run(pool: sqlx::PgPool) -> biomark::errors::AppResult<()> {
//! let config = ExtractionConfig::load();
//! let cache = Arc::new(ReferenceCache::new(
//!     PgReferenceSource::new(pool),
//!     Duration::from_secs(config.reference_ttl_secs),
//! ));
//! let validator = ReferenceValidator::new(cache, &config);
//!
//! let results = extract_biomarkers("Cholesterol: 180 mg/dL", &validator, &config).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod codes;
pub mod config;
pub mod correction;
pub mod dedup;
pub mod errors;
pub mod fuzzy;
pub mod normalize;
pub mod observability;
pub mod pipeline;
pub mod preprocessing;
pub mod reference;
pub mod text_processing;
pub mod validation;

pub use codes::{find_code, PanelCategory, RangeStatus};
pub use config::ExtractionConfig;
pub use errors::{AppError, AppResult};
pub use pipeline::{extract_biomarkers, ExtractedBiomarker};
pub use validation::{QuickValidator, ReferenceValidator};
