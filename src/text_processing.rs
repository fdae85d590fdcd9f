//! # Text Processing Module
//!
//! Regex-based biomarker candidate extraction from preprocessed lab-report
//! text.
//!
//! ## Features
//!
//! - Ordered extraction patterns: name-then-value, value-then-name, and
//!   tab/space-delimited table rows, with or without reference ranges
//! - Every pattern is applied independently; the same text span may produce
//!   duplicate candidates, which downstream deduplication tolerates
//! - Malformed numeric literals skip the candidate with a warning instead of
//!   failing the extraction

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

/// Unit strings recognized in lab reports, longest first so alternation
/// never partially matches (e.g. "mg/dL" before "g/dL").
const UNIT_STRINGS: &[&str] = &[
    "mmol/L", "mcg/dL", "µIU/mL", "mEq/L", "mIU/L", "mg/dL", "ng/mL", "ng/dL",
    "pg/mL", "g/dL", "K/uL", "M/uL", "IU/L", "U/L", "fL", "pg", "%",
];

/// An unvalidated (name, value, unit) triple extracted from text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Raw biomarker name as it appeared in the text
    pub raw_name: String,
    /// Parsed numeric value
    pub value: f64,
    /// Unit string as matched (original casing preserved)
    pub unit: String,
    /// 0-based line the match was found on
    pub line_number: usize,
}

/// A compiled extraction pattern with a label for logging
struct ExtractionPattern {
    label: &'static str,
    regex: Regex,
    /// Whether the value appears before the name in the capture order
    value_first: bool,
}

fn unit_alternation() -> String {
    UNIT_STRINGS
        .iter()
        .map(|unit| regex::escape(unit))
        .collect::<Vec<String>>()
        .join("|")
}

fn build_patterns() -> Vec<ExtractionPattern> {
    let units = unit_alternation();
    let value = r"\d+(?:[.,]\d+)*";

    vec![
        // "Cholesterol: 180 mg/dL"
        ExtractionPattern {
            label: "name_colon_value",
            regex: Regex::new(&format!(
                r"(?P<name>[A-Za-z][A-Za-z0-9 ()./,-]{{0,48}}?)\s*:\s*(?P<value>{value})\s*(?P<unit>{units})"
            ))
            .expect("name_colon_value pattern should be valid"),
            value_first: false,
        },
        // "HDL Cholesterol 55 mg/dL"
        ExtractionPattern {
            label: "name_value",
            regex: Regex::new(&format!(
                r"(?P<name>[A-Za-z][A-Za-z0-9 ().,-]{{1,48}}?)\s+(?P<value>{value})\s*(?P<unit>{units})"
            ))
            .expect("name_value pattern should be valid"),
            value_first: false,
        },
        // "55 mg/dL HDL Cholesterol"
        ExtractionPattern {
            label: "value_first",
            regex: Regex::new(&format!(
                r"(?P<value>{value})\s*(?P<unit>{units})\s+(?P<name>[A-Za-z][A-Za-z0-9 ().,-]{{1,48}})"
            ))
            .expect("value_first pattern should be valid"),
            value_first: true,
        },
        // "Glucose\t95\tmg/dL" or column-aligned table rows. `preprocess`
        // collapses tab/space runs, so this fires only for text fed to the
        // detector directly; the name_value pattern covers collapsed rows.
        ExtractionPattern {
            label: "table_row",
            regex: Regex::new(&format!(
                r"(?m)^(?P<name>[A-Za-z][A-Za-z0-9 ().,-]{{1,48}}?)(?:\t+| {{2,}})(?P<value>{value})(?:\t+| +)(?P<unit>{units})"
            ))
            .expect("table_row pattern should be valid"),
            value_first: false,
        },
        // "Glucose 95 mg/dL (70 - 100)"
        ExtractionPattern {
            label: "with_reference_range",
            regex: Regex::new(&format!(
                r"(?P<name>[A-Za-z][A-Za-z0-9 ().,-]{{1,48}}?)\s+(?P<value>{value})\s*(?P<unit>{units})\s*\(?\s*{value}\s*[-–]\s*{value}\s*\)?"
            ))
            .expect("with_reference_range pattern should be valid"),
            value_first: false,
        },
    ]
}

lazy_static! {
    static ref PATTERNS: Vec<ExtractionPattern> = build_patterns();
}

/// Biomarker candidate detector applying the ordered pattern set
pub struct BiomarkerDetector {
    patterns: &'static [ExtractionPattern],
}

impl BiomarkerDetector {
    pub fn new() -> Self {
        Self {
            patterns: &PATTERNS,
        }
    }

    /// Extract every candidate match from the given text.
    ///
    /// Patterns are applied independently per line; overlapping matches are
    /// kept, duplicates included. Malformed numeric text drops the candidate
    /// with a warning.
    pub fn extract_candidates(&self, text: &str) -> Vec<Candidate> {
        let start_time = std::time::Instant::now();
        let mut candidates = Vec::new();

        for pattern in self.patterns {
            let mut pattern_matches = 0;

            for (line_number, line) in text.lines().enumerate() {
                for capture in pattern.regex.captures_iter(line) {
                    let raw_name = capture
                        .name("name")
                        .map(|m| m.as_str())
                        .unwrap_or_default();
                    let value_text = capture
                        .name("value")
                        .map(|m| m.as_str())
                        .unwrap_or_default();
                    let unit = capture
                        .name("unit")
                        .map(|m| m.as_str())
                        .unwrap_or_default();

                    let name = clean_name(raw_name);
                    if name.is_empty() {
                        trace!(pattern = pattern.label, line_number, "Skipping empty name");
                        continue;
                    }

                    let value = match parse_value(value_text) {
                        Some(value) => value,
                        None => {
                            warn!(
                                pattern = pattern.label,
                                line_number,
                                value_text,
                                "Skipping candidate with malformed numeric value"
                            );
                            continue;
                        }
                    };

                    debug!(
                        pattern = pattern.label,
                        name = %name,
                        value,
                        unit,
                        value_first = pattern.value_first,
                        "Extracted candidate"
                    );

                    pattern_matches += 1;
                    candidates.push(Candidate {
                        raw_name: name,
                        value,
                        unit: unit.to_string(),
                        line_number,
                    });
                }
            }

            debug!(
                pattern = pattern.label,
                matches = pattern_matches,
                "Pattern pass complete"
            );
        }

        crate::observability::record_extraction_metrics(
            "extract_candidates",
            start_time.elapsed(),
            text.len(),
            candidates.len(),
        );

        info!(
            candidates = candidates.len(),
            lines = text.lines().count(),
            "Candidate extraction complete"
        );
        candidates
    }

    /// Check whether the text contains at least one extractable candidate
    pub fn has_candidates(&self, text: &str) -> bool {
        text.lines()
            .any(|line| self.patterns.iter().any(|p| p.regex.is_match(line)))
    }
}

impl Default for BiomarkerDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim surrounding whitespace and trailing punctuation from a matched name
fn clean_name(raw: &str) -> String {
    let trimmed = raw
        .trim()
        .trim_end_matches(|c: char| !c.is_alphanumeric() && c != ')');
    trimmed.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Parse a matched numeric literal, tolerating thousands separators.
///
/// Returns `None` for shapes the regex admits but `f64` does not
/// (e.g. OCR fragments like "12.3.4").
fn parse_value(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_colon_value() {
        let detector = BiomarkerDetector::new();
        let candidates = detector.extract_candidates("Cholesterol: 180 mg/dL");

        assert!(!candidates.is_empty());
        assert_eq!(candidates[0].raw_name, "Cholesterol");
        assert_eq!(candidates[0].value, 180.0);
        assert_eq!(candidates[0].unit, "mg/dL");
    }

    #[test]
    fn test_name_value_without_colon() {
        let detector = BiomarkerDetector::new();
        let candidates = detector.extract_candidates("HDL Cholesterol 55 mg/dL");

        assert!(candidates
            .iter()
            .any(|c| c.raw_name == "HDL Cholesterol" && c.value == 55.0));
    }

    #[test]
    fn test_value_first_order() {
        let detector = BiomarkerDetector::new();
        let candidates = detector.extract_candidates("95 mg/dL Glucose");

        assert!(candidates
            .iter()
            .any(|c| c.raw_name == "Glucose" && c.value == 95.0 && c.unit == "mg/dL"));
    }

    #[test]
    fn test_table_row() {
        let detector = BiomarkerDetector::new();
        let candidates = detector.extract_candidates("Ferritin\t150\tng/mL");

        assert!(candidates
            .iter()
            .any(|c| c.raw_name == "Ferritin" && c.value == 150.0 && c.unit == "ng/mL"));
    }

    #[test]
    fn test_reference_range_row() {
        let detector = BiomarkerDetector::new();
        let candidates = detector.extract_candidates("Glucose 95 mg/dL (70 - 100)");

        assert!(candidates
            .iter()
            .any(|c| c.raw_name == "Glucose" && c.value == 95.0));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let detector = BiomarkerDetector::new();
        // Matched by both name_value and with_reference_range
        let candidates = detector.extract_candidates("Glucose 95 mg/dL (70 - 100)");

        let glucose_count = candidates
            .iter()
            .filter(|c| c.raw_name == "Glucose")
            .count();
        assert!(glucose_count >= 2, "expected duplicate candidates");
    }

    #[test]
    fn test_malformed_value_is_skipped() {
        let detector = BiomarkerDetector::new();
        let candidates = detector.extract_candidates("Glucose 9.5.1 mg/dL");

        assert!(candidates.iter().all(|c| c.raw_name != "Glucose"));
    }

    #[test]
    fn test_thousands_separator_parsed() {
        assert_eq!(parse_value("1,234.5"), Some(1234.5));
        assert_eq!(parse_value("95"), Some(95.0));
        assert_eq!(parse_value("12.3.4"), None);
    }

    #[test]
    fn test_line_without_unit_yields_nothing() {
        let detector = BiomarkerDetector::new();
        let candidates = detector.extract_candidates("Patient ID: 4471829");
        assert!(candidates.is_empty());
        assert!(!detector.has_candidates("Patient ID: 4471829"));
    }

    #[test]
    fn test_multi_line_extraction_keeps_line_numbers() {
        let detector = BiomarkerDetector::new();
        let text = "Cholesterol: 180 mg/dL\nTSH: 2.1 mIU/L";
        let candidates = detector.extract_candidates(text);

        let tsh = candidates
            .iter()
            .find(|c| c.raw_name == "TSH")
            .expect("TSH candidate present");
        assert_eq!(tsh.line_number, 1);
        assert_eq!(tsh.value, 2.1);
    }
}
