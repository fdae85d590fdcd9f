//! # Extraction Pipeline Module
//!
//! End-to-end orchestration: preprocess raw report text, extract candidate
//! triples, validate them concurrently, resolve canonical codes, and
//! deduplicate.
//!
//! Candidate validation fans out with `join_all`, so results come back
//! paired with their candidates in input order; output order is the order
//! candidates were extracted, never the order validations completed.

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::codes::{categorize, find_code, range_status, reference_range, PanelCategory, RangeStatus};
use crate::config::ExtractionConfig;
use crate::correction::CorrectionEngine;
use crate::dedup::dedupe_by_code;
use crate::errors::{error_logging, AppError, AppResult};
use crate::preprocessing::preprocess;
use crate::reference::ReferenceSource;
use crate::text_processing::BiomarkerDetector;
use crate::validation::ReferenceValidator;

/// A validated, code-resolved extraction result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedBiomarker {
    /// Canonical biomarker code
    pub code: String,
    /// Measured value
    pub value: f64,
    /// Unit as reported
    pub unit: String,
}

/// A report entry enriched with range classification and panel category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub code: String,
    pub value: f64,
    pub unit: String,
    /// `None` when no reference range is known for the code
    pub status: Option<RangeStatus>,
    pub category: PanelCategory,
}

/// Run the full extraction pipeline over raw report text.
///
/// Empty or whitespace-only text yields an empty result. Reference fetch
/// failures degrade inside the validator; this function only errors on an
/// invalid configuration or a caller contract violation (input larger than
/// `max_input_bytes`), via [`AppError::Validation`].
pub async fn extract_biomarkers<S: ReferenceSource>(
    text: &str,
    validator: &ReferenceValidator<S>,
    config: &ExtractionConfig,
) -> AppResult<Vec<ExtractedBiomarker>> {
    config.validate()?;

    if text.len() > config.max_input_bytes {
        let err = AppError::Validation(format!(
            "input of {} bytes exceeds max_input_bytes ({})",
            text.len(),
            config.max_input_bytes
        ));
        error_logging::log_extraction_error(&err, "extract_biomarkers", Some(text));
        return Err(err);
    }

    if text.trim().is_empty() {
        debug!("Empty input text; nothing to extract");
        return Ok(Vec::new());
    }

    let start_time = std::time::Instant::now();
    let cleaned = preprocess(text);

    let detector = BiomarkerDetector::new();
    let candidates = detector.extract_candidates(&cleaned);
    if candidates.is_empty() {
        info!("No biomarker candidates found in input");
        return Ok(Vec::new());
    }

    // Concurrent fan-out; join_all keeps verdicts index-paired with candidates
    let verdicts = join_all(
        candidates
            .iter()
            .map(|candidate| validator.is_valid(&candidate.raw_name)),
    )
    .await;

    let engine = CorrectionEngine::new(config);
    let mut results: Vec<ExtractedBiomarker> = Vec::with_capacity(candidates.len());
    for (candidate, valid) in candidates.iter().zip(verdicts) {
        if !valid {
            debug!(name = %candidate.raw_name, "Candidate failed validation");
            continue;
        }

        let corrected = engine.auto_correct(&candidate.raw_name);
        let code = find_code(&corrected);
        results.push(ExtractedBiomarker {
            code,
            value: candidate.value,
            unit: candidate.unit.clone(),
        });
    }

    let results = dedupe_by_code(results);
    crate::observability::record_extraction_metrics(
        "extract_biomarkers",
        start_time.elapsed(),
        text.len(),
        results.len(),
    );
    info!(
        candidates = candidates.len(),
        extracted = results.len(),
        "Extraction pipeline complete"
    );
    Ok(results)
}

/// Enrich extraction results with range status and panel category
pub fn analyze_results(results: &[ExtractedBiomarker]) -> Vec<ReportEntry> {
    results
        .iter()
        .map(|result| {
            let status =
                reference_range(&result.code).map(|range| range_status(result.value, &range));
            ReportEntry {
                code: result.code.clone(),
                value: result.value,
                unit: result.unit.clone(),
                status,
                category: categorize(&result.code),
            }
        })
        .collect()
}
