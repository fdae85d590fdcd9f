//! Text preprocessing for OCR'd lab-report text
//!
//! PDF extraction and OCR frequently glue adjacent words together
//! ("serumfolate", "HDLCholesterol"). This module repairs the common
//! concatenation artifacts with an ordered list of regex substitutions
//! before pattern extraction runs.
//!
//! The pass is purely deterministic and idempotent modulo whitespace
//! collapsing: re-running it on already-clean text changes nothing.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

lazy_static! {
    /// Ordered substitutions.
    ///
    /// The case-preserving boundary splits run first; mixed-case gluings like
    /// "HDLCholesterol" keep their casing. The compound rules below are
    /// case-sensitive and only catch all-lowercase gluings the boundary
    /// rules cannot see.
    static ref SUBSTITUTIONS: Vec<(Regex, &'static str)> = vec![
        // camelCase boundaries: "serumFolate" -> "serum Folate".
        // Both sides need 2+ letters so unit casing like "dL" or "mL" survives.
        (
            Regex::new(r"([a-z]{2,})([A-Z][a-z]{2,})").expect("substitution pattern should be valid"),
            "$1 $2",
        ),
        // Acronym boundaries: "HDLCholesterol" -> "HDL Cholesterol"
        (
            Regex::new(r"([A-Z]{2,})([A-Z][a-z]{2,})").expect("substitution pattern should be valid"),
            "$1 $2",
        ),
        (
            Regex::new(r"\bserumfolate\b").expect("substitution pattern should be valid"),
            "serum folate",
        ),
        (
            Regex::new(r"ldlcholesterol").expect("substitution pattern should be valid"),
            "ldl cholesterol",
        ),
        (
            Regex::new(r"hdlcholesterol").expect("substitution pattern should be valid"),
            "hdl cholesterol",
        ),
        (
            Regex::new(r"vldlcholesterol").expect("substitution pattern should be valid"),
            "vldl cholesterol",
        ),
        (
            Regex::new(r"totalcholesterol").expect("substitution pattern should be valid"),
            "total cholesterol",
        ),
        (
            Regex::new(r"\bvitamind\b").expect("substitution pattern should be valid"),
            "vitamin d",
        ),
        (
            Regex::new(r"\bvitaminb12\b").expect("substitution pattern should be valid"),
            "vitamin b12",
        ),
        (
            Regex::new(r"bloodglucose").expect("substitution pattern should be valid"),
            "blood glucose",
        ),
        (
            Regex::new(r"fastingglucose").expect("substitution pattern should be valid"),
            "fasting glucose",
        ),
        (
            Regex::new(r"\blessthan\b").expect("substitution pattern should be valid"),
            "less than",
        ),
        // Value glued to a unit: "180mg/dL" -> "180 mg/dL"
        (
            Regex::new(r"(?i)(\d)(mg/dl|ng/ml|ng/dl|g/dl|pg/ml|meq/l|miu/l|mcg/dl|mmol/l|iu/l|u/l|%)")
                .expect("substitution pattern should be valid"),
            "$1 $2",
        ),
    ];
}

/// Repair run-together words and common OCR artifacts in raw extracted text.
///
/// Returns the input unchanged (aside from whitespace normalization) when no
/// artifact matches; an empty string returns itself.
pub fn preprocess(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut repaired = text.to_string();
    for (pattern, replacement) in SUBSTITUTIONS.iter() {
        let before = repaired.clone();
        repaired = pattern.replace_all(&repaired, *replacement).to_string();
        if before != repaired {
            trace!(pattern = %pattern.as_str(), "Applied preprocessing substitution");
        }
    }

    normalize_whitespace(&repaired)
}

/// Collapse runs of spaces and tabs while preserving line structure
fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<&str>>().join(" "))
        .collect::<Vec<String>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_known_compounds() {
        assert_eq!(preprocess("serumfolate 5.2"), "serum folate 5.2");
        assert_eq!(
            preprocess("ldlcholesterol 120 mg/dL"),
            "ldl cholesterol 120 mg/dL"
        );
    }

    #[test]
    fn test_camel_case_boundary() {
        assert_eq!(
            preprocess("HDLCholesterol 55 mg/dL"),
            "HDL Cholesterol 55 mg/dL"
        );
        assert_eq!(preprocess("serumFolate 5.2"), "serum Folate 5.2");
    }

    #[test]
    fn test_boundary_split_preserves_case() {
        // Mixed-case gluings go through the boundary rules, not the
        // lowercasing compound rules
        assert_eq!(
            preprocess("TotalCholesterol 200 mg/dL"),
            "Total Cholesterol 200 mg/dL"
        );
        assert_eq!(
            preprocess("VLDLCholesterol 18 mg/dL"),
            "VLDL Cholesterol 18 mg/dL"
        );
        // All-lowercase gluings still split
        assert_eq!(preprocess("hdlcholesterol 55"), "hdl cholesterol 55");
    }

    #[test]
    fn test_units_survive_camel_case_split() {
        assert_eq!(preprocess("Glucose 95 mg/dL"), "Glucose 95 mg/dL");
        assert_eq!(preprocess("Folate 5.2 ng/mL"), "Folate 5.2 ng/mL");
        assert_eq!(preprocess("Hemoglobin A1c 5.4 %"), "Hemoglobin A1c 5.4 %");
    }

    #[test]
    fn test_value_glued_to_unit() {
        assert_eq!(preprocess("Cholesterol: 180mg/dL"), "Cholesterol: 180 mg/dL");
    }

    #[test]
    fn test_idempotent_on_clean_text() {
        let clean = "Cholesterol: 180 mg/dL";
        let once = preprocess(clean);
        assert_eq!(preprocess(&once), once);
    }

    #[test]
    fn test_idempotent_on_repaired_text() {
        let dirty = "aserumfolate 5.2 ng/mL\nHDLCholesterol 55";
        let once = preprocess(dirty);
        let twice = preprocess(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_string_returns_itself() {
        assert_eq!(preprocess(""), "");
    }

    #[test]
    fn test_whitespace_collapsed_per_line() {
        assert_eq!(preprocess("Glucose   95\t mg"), "Glucose 95 mg");
        assert_eq!(preprocess("a  b\nc   d"), "a b\nc d");
    }
}
