//! # Correction Module
//!
//! Suggests and applies corrections for mangled biomarker names.
//!
//! Two suggestion passes run against the alias table:
//!
//! 1. Segmentation pass: the name is re-segmented ("aserumfolate" ->
//!    "a serum folate") and the segmented form is scored against spaced
//!    alias names. Only runs when segmentation actually changed the name.
//! 2. Direct pass: the lowercased name is scored against aliases and
//!    canonical codes with a looser threshold.
//!
//! Suggestions are deduplicated by canonical code (highest confidence wins)
//! and sorted by confidence descending, code ascending on ties.
//! `auto_correct` applies the top suggestion only when its confidence is
//! strictly above the configured threshold.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::codes::{ALIAS_TABLE, KNOWN_CODES};
use crate::config::ExtractionConfig;
use crate::fuzzy::similarity;
use crate::normalize::{normalize, WordSegmenter};

/// Looser threshold for the direct (non-segmented) suggestion pass
const DIRECT_MATCH_THRESHOLD: f64 = 0.6;

/// A proposed replacement for a suspicious biomarker name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedCorrection {
    /// Name as extracted
    pub original: String,
    /// Proposed replacement name
    pub suggested: String,
    /// Canonical code the replacement resolves to
    pub code: String,
    /// Similarity score backing the suggestion, in `[0, 1]`
    pub confidence: f64,
}

/// A name flagged during report-level screening, with its suggestions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousName {
    pub name: String,
    pub suggestions: Vec<SuggestedCorrection>,
}

/// Correction engine over the static alias table
#[derive(Debug, Clone)]
pub struct CorrectionEngine {
    segmenter: WordSegmenter,
    segment_threshold: f64,
    auto_correct_threshold: f64,
}

impl CorrectionEngine {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            segmenter: WordSegmenter::new(config.min_segment_length),
            segment_threshold: config.fuzzy_threshold,
            auto_correct_threshold: config.auto_correct_threshold,
        }
    }

    /// Produce ranked correction suggestions for a name.
    ///
    /// Returns an empty vector when nothing scores above the thresholds.
    pub fn suggest_corrections(&self, name: &str) -> Vec<SuggestedCorrection> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        let lowered = trimmed.to_lowercase();

        let mut suggestions: Vec<SuggestedCorrection> = Vec::new();

        // Segmentation pass, only when segmentation changed the name
        let segmented = self.segmenter.segment(trimmed);
        if segmented != lowered {
            for entry in ALIAS_TABLE {
                let score = similarity(&segmented, entry.alias);
                if score > self.segment_threshold {
                    suggestions.push(SuggestedCorrection {
                        original: trimmed.to_string(),
                        suggested: entry.alias.to_string(),
                        code: entry.code.to_string(),
                        confidence: score,
                    });
                }
            }
        }

        // Direct pass against spaced aliases and bare codes
        for entry in ALIAS_TABLE {
            let score = similarity(&lowered, entry.alias);
            if score > DIRECT_MATCH_THRESHOLD {
                suggestions.push(SuggestedCorrection {
                    original: trimmed.to_string(),
                    suggested: entry.alias.to_string(),
                    code: entry.code.to_string(),
                    confidence: score,
                });
            }
        }
        let normalized = normalize(trimmed);
        for code in KNOWN_CODES {
            let score = similarity(&normalized, code);
            if score > DIRECT_MATCH_THRESHOLD {
                suggestions.push(SuggestedCorrection {
                    original: trimmed.to_string(),
                    suggested: (*code).to_string(),
                    code: (*code).to_string(),
                    confidence: score,
                });
            }
        }

        let suggestions = dedupe_by_best_code(suggestions);
        debug!(
            name = %trimmed,
            suggestions = suggestions.len(),
            "Generated correction suggestions"
        );
        suggestions
    }

    /// Apply the best suggestion when its confidence is strictly above the
    /// configured threshold; otherwise return the name unchanged.
    pub fn auto_correct(&self, name: &str) -> String {
        let suggestions = self.suggest_corrections(name);
        match auto_correct_with(&suggestions, self.auto_correct_threshold) {
            Some(correction) => {
                info!(
                    original = %correction.original,
                    suggested = %correction.suggested,
                    code = %correction.code,
                    confidence = correction.confidence,
                    "Auto-corrected biomarker name"
                );
                crate::observability::record_auto_correction();
                correction.suggested.clone()
            }
            None => name.trim().to_string(),
        }
    }

    /// Screen a set of extracted names for run-together artifacts.
    ///
    /// A name is suspicious when it is long with no spaces, contains a glued
    /// qualifier like "lessthan", or segmentation finds embedded words.
    pub fn analyze_names(&self, names: &[&str]) -> Vec<SuspiciousName> {
        names
            .iter()
            .filter(|name| self.is_suspicious(name))
            .map(|name| SuspiciousName {
                name: (*name).to_string(),
                suggestions: self.suggest_corrections(name),
            })
            .collect()
    }

    fn is_suspicious(&self, name: &str) -> bool {
        let trimmed = name.trim();
        let lowered = trimmed.to_lowercase();

        if trimmed.chars().count() > 15 && !trimmed.contains(' ') {
            return true;
        }
        if lowered.contains("lessthan") {
            return true;
        }
        self.segmenter.segment(trimmed) != lowered
    }
}

/// Pick the suggestion to apply: highest-ranked, strictly above `threshold`.
///
/// A confidence exactly at the threshold is not applied.
pub fn auto_correct_with(
    suggestions: &[SuggestedCorrection],
    threshold: f64,
) -> Option<&SuggestedCorrection> {
    suggestions
        .first()
        .filter(|suggestion| suggestion.confidence > threshold)
}

/// Keep the highest-confidence suggestion per code, then rank the result
fn dedupe_by_best_code(mut suggestions: Vec<SuggestedCorrection>) -> Vec<SuggestedCorrection> {
    suggestions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.code.cmp(&b.code))
    });

    let mut seen: std::collections::HashSet<String> = std::collections::HashSet::new();
    suggestions.retain(|suggestion| seen.insert(suggestion.code.clone()));
    suggestions
}
