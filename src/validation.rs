//! # Validation Module
//!
//! Two-tier validation of extracted biomarker candidate names.
//!
//! ## Tiers
//!
//! - [`QuickValidator`]: pure, synchronous, no I/O. Rejects obvious lab-report
//!   noise (dates, patient metadata, page markers), accepts names resolving
//!   through the static tables or matching biomarker-shaped patterns, and
//!   returns [`QuickVerdict::Unknown`] for everything in between.
//! - [`ReferenceValidator`]: async. Defers to the quick tier first, then
//!   consults the cached reference table and finally a strict fuzzy match.
//!
//! The async tier accepts a superset of what the quick tier accepts: a quick
//! `Accept` short-circuits to `true` and a quick `Reject` to `false`, so the
//! reference lookup only ever widens acceptance.

use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::cache::ReferenceCache;
use crate::codes::{is_known_code, lookup_alias};
use crate::config::ExtractionConfig;
use crate::fuzzy::FuzzyMatcher;
use crate::normalize::{normalize, WordSegmenter};
use crate::reference::ReferenceSource;

lazy_static! {
    /// Lab-report noise that must never validate as a biomarker name
    static ref FALSE_POSITIVE_PATTERNS: Vec<Regex> = vec![
        // Dates: 12/05/2024, 2024-05-12
        Regex::new(r"\d{1,2}/\d{1,2}/\d{2,4}").expect("false-positive pattern should be valid"),
        Regex::new(r"\d{4}-\d{2}-\d{2}").expect("false-positive pattern should be valid"),
        // Patient and specimen metadata
        Regex::new(r"(?i)\b(patient|specimen|accession|dob|date of birth|requisition)\b")
            .expect("false-positive pattern should be valid"),
        Regex::new(r"(?i)\bpage\s+\d+").expect("false-positive pattern should be valid"),
        Regex::new(r"(?i)\b(collected|received|reported|printed)\b")
            .expect("false-positive pattern should be valid"),
        Regex::new(r"(?i)\blab\s*#").expect("false-positive pattern should be valid"),
        Regex::new(
            r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\b"
        )
        .expect("false-positive pattern should be valid"),
        // Long digit runs are IDs, not names
        Regex::new(r"\d{6,}").expect("false-positive pattern should be valid"),
    ];

    /// Name shapes that look like biomarkers even when the static tables miss them
    static ref BIOMARKER_SHAPE_PATTERNS: Vec<Regex> = vec![
        // "Vitamin K", "Vitamin B6"
        Regex::new(r"(?i)^vitamin\s+[a-z][0-9]{0,2}$").expect("shape pattern should be valid"),
        // Panel abbreviations
        Regex::new(
            r"(?i)\b(wbc|rbc|hdl|ldl|vldl|tsh|alt|ast|ggt|egfr|bun|crp|a1c|mch|mchc|mcv|rdw)\b"
        )
        .expect("shape pattern should be valid"),
        // Common analyte vocabulary
        Regex::new(
            r"(?i)(cholesterol|triglyceride|glucose|creatinine|bilirubin|albumin|globulin|protein|hemoglobin|hematocrit|platelet|ferritin|folate|insulin|cortisol|testosterone|estradiol|homocysteine|calcium|sodium|potassium|chloride|magnesium|iron\b)"
        )
        .expect("shape pattern should be valid"),
        // Enzymes and hormone suffixes
        Regex::new(r"(?i)[a-z]+ase\b").expect("shape pattern should be valid"),
        Regex::new(r"(?i)[a-z]+(sterone|tropin)\b").expect("shape pattern should be valid"),
    ];
}

/// Outcome of the synchronous validation tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickVerdict {
    /// Definitely a biomarker name
    Accept,
    /// Definitely noise
    Reject,
    /// Needs the reference tier to decide
    Unknown,
}

/// Synchronous, I/O-free candidate name validator
#[derive(Debug, Clone)]
pub struct QuickValidator {
    max_name_length: usize,
    segmenter: WordSegmenter,
}

impl QuickValidator {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            max_name_length: config.max_name_length,
            segmenter: WordSegmenter::new(config.min_segment_length),
        }
    }

    /// Classify a candidate name without touching reference data
    pub fn verdict(&self, name: &str) -> QuickVerdict {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return QuickVerdict::Reject;
        }

        if trimmed.chars().count() > self.max_name_length {
            trace!(name = %trimmed, "Rejected: name too long");
            return QuickVerdict::Reject;
        }

        for pattern in FALSE_POSITIVE_PATTERNS.iter() {
            if pattern.is_match(trimmed) {
                trace!(name = %trimmed, pattern = %pattern.as_str(), "Rejected: false-positive pattern");
                return QuickVerdict::Reject;
            }
        }

        let normalized = normalize(trimmed);
        if is_known_code(&normalized) || lookup_alias(&normalized).is_some() {
            return QuickVerdict::Accept;
        }

        // Run-together names validate through their segmented form. Leading
        // OCR debris ("a serum folate") is shed one word at a time.
        let segmented = self.segmenter.segment(trimmed);
        let words: Vec<&str> = segmented.split(' ').collect();
        if words.len() > 1 {
            for start in 0..words.len() {
                let suffix = normalize(&words[start..].join(" "));
                if is_known_code(&suffix) || lookup_alias(&suffix).is_some() {
                    debug!(name = %trimmed, segmented = %segmented, "Accepted via segmented form");
                    return QuickVerdict::Accept;
                }
            }
        }

        for pattern in BIOMARKER_SHAPE_PATTERNS.iter() {
            if pattern.is_match(trimmed) {
                trace!(name = %trimmed, "Accepted: biomarker-shaped name");
                return QuickVerdict::Accept;
            }
        }

        QuickVerdict::Unknown
    }

    /// Convenience wrapper: strict acceptance only
    pub fn is_valid(&self, name: &str) -> bool {
        self.verdict(name) == QuickVerdict::Accept
    }
}

/// Async validator backed by the cached reference table
pub struct ReferenceValidator<S: ReferenceSource> {
    quick: QuickValidator,
    cache: Arc<ReferenceCache<S>>,
    matcher: FuzzyMatcher,
    strict_threshold: f64,
}

impl<S: ReferenceSource> ReferenceValidator<S> {
    pub fn new(cache: Arc<ReferenceCache<S>>, config: &ExtractionConfig) -> Self {
        Self {
            quick: QuickValidator::new(config),
            cache,
            matcher: FuzzyMatcher::new(),
            strict_threshold: config.strict_threshold,
        }
    }

    /// Access the synchronous tier directly
    pub fn quick(&self) -> &QuickValidator {
        &self.quick
    }

    /// Validate a candidate name against every tier.
    ///
    /// Accepts everything [`QuickValidator`] accepts. A reference fetch
    /// failure degrades to the static tables and fuzzy matching; this method
    /// never errors.
    pub async fn is_valid(&self, name: &str) -> bool {
        match self.quick.verdict(name) {
            QuickVerdict::Accept => {
                crate::observability::record_validation_outcome("quick", true);
                return true;
            }
            QuickVerdict::Reject => {
                crate::observability::record_validation_outcome("quick", false);
                return false;
            }
            QuickVerdict::Unknown => {}
        }

        let normalized = normalize(name);
        let rows = self.cache.get().await;
        for row in rows.iter() {
            if row.code == normalized {
                debug!(name = %name, code = %row.code, "Accepted: reference code match");
                crate::observability::record_validation_outcome("reference", true);
                return true;
            }
            let reference_name = normalize(&row.name);
            // Substring check needs a minimum length or everything matches
            if reference_name.chars().count() >= 4 && normalized.contains(&reference_name) {
                debug!(name = %name, code = %row.code, "Accepted: reference name match");
                crate::observability::record_validation_outcome("reference", true);
                return true;
            }
        }

        if let Some(code) = self.matcher.best_match(name, self.strict_threshold) {
            debug!(name = %name, code = %code, "Accepted: strict fuzzy match");
            crate::observability::record_validation_outcome("fuzzy", true);
            return true;
        }

        trace!(name = %name, "Rejected: no tier accepted");
        crate::observability::record_validation_outcome("reference", false);
        false
    }
}
