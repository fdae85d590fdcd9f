//! Biomarker name normalization and word re-segmentation
//!
//! `normalize` produces the canonical lookup key: lowercase with every
//! character outside `[a-z0-9]` stripped. `WordSegmenter` attacks the other
//! direction of the OCR problem: names that survived preprocessing still
//! glued together ("aserumfolate") get spaces re-inserted around known
//! biomarker vocabulary terms.

use tracing::trace;

/// Lowercase and strip every character outside `[a-z0-9]`.
///
/// Deterministic and idempotent: `normalize(x) == normalize(normalize(x))`.
pub fn normalize(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Fixed vocabulary of biomarker-related terms used for re-segmentation.
///
/// Scanned longest-first at each position so "cholesterol" wins over any
/// shorter embedded term.
const SEGMENT_VOCABULARY: &[&str] = &[
    "concentration",
    "triglycerides",
    "testosterone",
    "cholesterol",
    "hemoglobin",
    "creatinine",
    "bilirubin",
    "potassium",
    "magnesium",
    "ferritin",
    "lessthan",
    "vitamin",
    "albumin",
    "calcium",
    "glucose",
    "insulin",
    "protein",
    "folate",
    "plasma",
    "sodium",
    "count",
    "ratio",
    "serum",
    "total",
    "free",
    "hdl",
    "ldl",
    "tsh",
];

/// Heuristic word re-segmenter for run-together biomarker names
#[derive(Debug, Clone)]
pub struct WordSegmenter {
    /// Names at or below this length are returned unchanged
    min_length: usize,
}

impl Default for WordSegmenter {
    fn default() -> Self {
        Self { min_length: 10 }
    }
}

impl WordSegmenter {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// Insert single spaces around embedded vocabulary terms.
    ///
    /// Boundary-aware: a term already delimited by spaces is left alone, so
    /// `segment(segment(x)) == segment(x)` modulo whitespace collapsing.
    /// Matching is case-insensitive; the output is lowercased.
    pub fn segment(&self, name: &str) -> String {
        let trimmed = name.trim();
        if trimmed.len() <= self.min_length {
            return trimmed.to_lowercase();
        }

        let lower: Vec<char> = trimmed.to_lowercase().chars().collect();
        let mut out = String::with_capacity(lower.len() + 8);
        let mut i = 0;

        while i < lower.len() {
            match self.match_term_at(&lower, i) {
                Some(term) => {
                    if !out.is_empty() && !out.ends_with(' ') {
                        out.push(' ');
                    }
                    out.push_str(term);
                    i += term.chars().count();
                    // Peek ahead: separate the term from a following word
                    if i < lower.len() && lower[i] != ' ' {
                        out.push(' ');
                    }
                }
                None => {
                    out.push(lower[i]);
                    i += 1;
                }
            }
        }

        let segmented = out.split_whitespace().collect::<Vec<&str>>().join(" ");
        if segmented != trimmed.to_lowercase() {
            trace!(original = %trimmed, segmented = %segmented, "Re-segmented name");
        }
        segmented
    }

    /// Longest vocabulary term starting at position `i`, if any
    fn match_term_at(&self, chars: &[char], i: usize) -> Option<&'static str> {
        SEGMENT_VOCABULARY.iter().copied().find(|term| {
            let term_chars: Vec<char> = term.chars().collect();
            chars.len() - i >= term_chars.len()
                && chars[i..i + term_chars.len()] == term_chars[..]
        })
    }
}
