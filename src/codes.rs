//! Static biomarker reference tables
//!
//! The alias table and known-code set are compiled into the binary and are
//! immutable at runtime. Every alias maps to exactly one canonical code;
//! several aliases may share a code. Lookups go through [`normalize`] so the
//! tables are insensitive to case and punctuation.
//!
//! The tables are plain slices rather than maps so that iteration order is
//! pinned: fuzzy-match tie-breaks depend on a deterministic order.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::normalize::normalize;

/// Static alias entry: a raw name variant and its canonical code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiomarkerAlias {
    /// Human-readable name variant as it appears in lab reports
    pub alias: &'static str,
    /// Canonical code the alias resolves to
    pub code: &'static str,
}

/// Alias table covering common lab-report name variants.
///
/// Sorted by canonical code, then alias, so scans are deterministic.
pub const ALIAS_TABLE: &[BiomarkerAlias] = &[
    BiomarkerAlias { alias: "alanine aminotransferase", code: "alt" },
    BiomarkerAlias { alias: "alt (sgpt)", code: "alt" },
    BiomarkerAlias { alias: "apo b", code: "apolipoproteinb" },
    BiomarkerAlias { alias: "apolipoprotein b", code: "apolipoproteinb" },
    BiomarkerAlias { alias: "aspartate aminotransferase", code: "ast" },
    BiomarkerAlias { alias: "ast (sgot)", code: "ast" },
    BiomarkerAlias { alias: "bilirubin total", code: "bilirubin" },
    BiomarkerAlias { alias: "total bilirubin", code: "bilirubin" },
    BiomarkerAlias { alias: "blood urea nitrogen", code: "bun" },
    BiomarkerAlias { alias: "cholesterol total", code: "cholesterol" },
    BiomarkerAlias { alias: "total cholesterol", code: "cholesterol" },
    BiomarkerAlias { alias: "c-reactive protein", code: "crp" },
    BiomarkerAlias { alias: "folate (folic acid)", code: "folate" },
    BiomarkerAlias { alias: "folic acid", code: "folate" },
    BiomarkerAlias { alias: "serum folate", code: "folate" },
    BiomarkerAlias { alias: "blood glucose", code: "glucose" },
    BiomarkerAlias { alias: "fasting glucose", code: "glucose" },
    BiomarkerAlias { alias: "glucose fasting", code: "glucose" },
    BiomarkerAlias { alias: "hdl cholesterol", code: "hdl" },
    BiomarkerAlias { alias: "hdl-c", code: "hdl" },
    BiomarkerAlias { alias: "hgb", code: "hemoglobin" },
    BiomarkerAlias { alias: "a1c", code: "hemoglobina1c" },
    BiomarkerAlias { alias: "hba1c", code: "hemoglobina1c" },
    BiomarkerAlias { alias: "hemoglobin a1c", code: "hemoglobina1c" },
    BiomarkerAlias { alias: "homocyst(e)ine", code: "homocysteine" },
    BiomarkerAlias { alias: "ldl chol calc", code: "ldl" },
    BiomarkerAlias { alias: "ldl cholesterol", code: "ldl" },
    BiomarkerAlias { alias: "ldl-c", code: "ldl" },
    BiomarkerAlias { alias: "lymphocytes", code: "lymphs" },
    BiomarkerAlias { alias: "platelet count", code: "platelets" },
    BiomarkerAlias { alias: "red blood cells", code: "rbc" },
    BiomarkerAlias { alias: "t3", code: "t3" },
    BiomarkerAlias { alias: "triiodothyronine", code: "t3" },
    BiomarkerAlias { alias: "free t4", code: "t4" },
    BiomarkerAlias { alias: "t4 free", code: "t4" },
    BiomarkerAlias { alias: "thyroxine", code: "t4" },
    BiomarkerAlias { alias: "trigs", code: "triglycerides" },
    BiomarkerAlias { alias: "thyroid stimulating hormone", code: "tsh" },
    BiomarkerAlias { alias: "tsh", code: "tsh" },
    BiomarkerAlias { alias: "b12", code: "vitaminb12" },
    BiomarkerAlias { alias: "cobalamin", code: "vitaminb12" },
    BiomarkerAlias { alias: "vitamin b-12", code: "vitaminb12" },
    BiomarkerAlias { alias: "vitamin b12", code: "vitaminb12" },
    BiomarkerAlias { alias: "25-hydroxy vitamin d", code: "vitamind" },
    BiomarkerAlias { alias: "vit d", code: "vitamind" },
    BiomarkerAlias { alias: "vit-d", code: "vitamind" },
    BiomarkerAlias { alias: "vitamin d", code: "vitamind" },
    BiomarkerAlias { alias: "vitamin d3", code: "vitamind" },
    BiomarkerAlias { alias: "vitamin d, 25-hydroxy", code: "vitamind" },
    BiomarkerAlias { alias: "vitamin-d", code: "vitamind" },
    BiomarkerAlias { alias: "vitd", code: "vitamind" },
    BiomarkerAlias { alias: "vldl cholesterol", code: "vldl" },
    BiomarkerAlias { alias: "white blood cells", code: "wbc" },
];

/// Canonical codes considered valid regardless of alias-map presence
pub const KNOWN_CODES: &[&str] = &[
    "albumin",
    "alkalinephosphatase",
    "alt",
    "apolipoproteinb",
    "ast",
    "basos",
    "bilirubin",
    "bun",
    "calcium",
    "chloride",
    "cholesterol",
    "cortisol",
    "creatinine",
    "crp",
    "dheasulfate",
    "egfr",
    "eos",
    "ferritin",
    "folate",
    "ggt",
    "globulin",
    "glucose",
    "hdl",
    "hematocrit",
    "hemoglobin",
    "hemoglobina1c",
    "homocysteine",
    "insulin",
    "iron",
    "ldl",
    "lymphs",
    "magnesium",
    "mch",
    "mchc",
    "mcv",
    "monocytes",
    "neutrophils",
    "platelets",
    "potassium",
    "protein",
    "rbc",
    "rdw",
    "sodium",
    "t3",
    "t4",
    "testosterone",
    "triglycerides",
    "tsh",
    "vitaminb12",
    "vitamind",
    "vldl",
    "wbc",
];

lazy_static! {
    /// Alias lookup keyed by the normalized form of each alias
    static ref ALIAS_INDEX: HashMap<String, &'static str> = ALIAS_TABLE
        .iter()
        .map(|entry| (normalize(entry.alias), entry.code))
        .collect();

    /// Known-code membership set
    static ref KNOWN_CODE_SET: HashSet<&'static str> = KNOWN_CODES.iter().copied().collect();
}

/// Resolve a normalized name through the alias table
pub fn lookup_alias(normalized: &str) -> Option<&'static str> {
    ALIAS_INDEX.get(normalized).copied()
}

/// Check whether a normalized name is a known canonical code
pub fn is_known_code(normalized: &str) -> bool {
    KNOWN_CODE_SET.contains(normalized)
}

/// Find the canonical code for any input name variant.
///
/// Falls back to the normalized input itself when no alias matches, so
/// already-canonical inputs pass through unchanged.
pub fn find_code(input: &str) -> String {
    let normalized = normalize(input);
    match lookup_alias(&normalized) {
        Some(code) => code.to_string(),
        None => normalized,
    }
}

/// Reference range for a biomarker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiomarkerRange {
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

/// Result of comparing a measured value against its reference range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeStatus {
    Low,
    Normal,
    High,
}

const RANGE_TABLE: &[(&str, BiomarkerRange)] = &[
    ("apolipoproteinb", BiomarkerRange { min: 0.0, max: 100.0, unit: "mg/dL" }),
    ("bilirubin", BiomarkerRange { min: 0.3, max: 1.2, unit: "mg/dL" }),
    ("cholesterol", BiomarkerRange { min: 125.0, max: 200.0, unit: "mg/dL" }),
    ("glucose", BiomarkerRange { min: 70.0, max: 100.0, unit: "mg/dL" }),
    ("hdl", BiomarkerRange { min: 40.0, max: 60.0, unit: "mg/dL" }),
    ("ldl", BiomarkerRange { min: 0.0, max: 100.0, unit: "mg/dL" }),
    ("rbc", BiomarkerRange { min: 4.5, max: 5.9, unit: "M/uL" }),
    ("rdw", BiomarkerRange { min: 11.5, max: 14.5, unit: "%" }),
    ("sodium", BiomarkerRange { min: 135.0, max: 145.0, unit: "mEq/L" }),
    ("testosterone", BiomarkerRange { min: 300.0, max: 1000.0, unit: "ng/dL" }),
    ("triglycerides", BiomarkerRange { min: 0.0, max: 150.0, unit: "mg/dL" }),
    ("tsh", BiomarkerRange { min: 0.4, max: 4.0, unit: "mIU/L" }),
    ("vitamind", BiomarkerRange { min: 30.0, max: 100.0, unit: "ng/mL" }),
];

/// Look up the static reference range for a canonical code
pub fn reference_range(code: &str) -> Option<BiomarkerRange> {
    RANGE_TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, range)| *range)
}

/// Classify a measured value against a reference range
pub fn range_status(value: f64, range: &BiomarkerRange) -> RangeStatus {
    if value < range.min {
        RangeStatus::Low
    } else if value > range.max {
        RangeStatus::High
    } else {
        RangeStatus::Normal
    }
}

/// Lab panel category for a biomarker code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelCategory {
    CompleteBloodCount,
    MetabolicPanel,
    LipidPanel,
    ThyroidPanel,
    VitaminsAndHormones,
    Other,
}

lazy_static! {
    static ref CBC_PATTERN: regex::Regex = regex::Regex::new(
        r"^(wbc|rbc|hemoglobin|hematocrit|mcv|mch|mchc|rdw|platelets|neutrophils|lymphs|monocytes|eos|basos)$"
    )
    .expect("CBC category pattern should be valid");
    static ref METABOLIC_PATTERN: regex::Regex = regex::Regex::new(
        r"^(glucose|bun|creatinine|egfr|sodium|potassium|chloride|calcium|protein|albumin|globulin|bilirubin|alkalinephosphatase|ast|alt|ggt)$"
    )
    .expect("metabolic category pattern should be valid");
    static ref LIPID_PATTERN: regex::Regex =
        regex::Regex::new(r"^(cholesterol|triglycerides|hdl|ldl|vldl|apolipoproteinb)$")
            .expect("lipid category pattern should be valid");
    static ref THYROID_PATTERN: regex::Regex = regex::Regex::new(r"^(tsh|t3|t4)$")
        .expect("thyroid category pattern should be valid");
    static ref VITAMIN_HORMONE_PATTERN: regex::Regex = regex::Regex::new(
        r"^(vitamind|vitaminb12|folate|testosterone|cortisol|dheasulfate|insulin|ferritin|iron|magnesium)$"
    )
    .expect("vitamin/hormone category pattern should be valid");
}

/// Categorize a canonical biomarker code into its lab panel
pub fn categorize(code: &str) -> PanelCategory {
    if CBC_PATTERN.is_match(code) {
        PanelCategory::CompleteBloodCount
    } else if METABOLIC_PATTERN.is_match(code) {
        PanelCategory::MetabolicPanel
    } else if LIPID_PATTERN.is_match(code) {
        PanelCategory::LipidPanel
    } else if THYROID_PATTERN.is_match(code) {
        PanelCategory::ThyroidPanel
    } else if VITAMIN_HORMONE_PATTERN.is_match(code) {
        PanelCategory::VitaminsAndHormones
    } else {
        PanelCategory::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_alias_maps_to_one_code() {
        // Normalized aliases must be unique: many-to-one is allowed, one-to-many is not
        let mut seen: HashMap<String, &str> = HashMap::new();
        for entry in ALIAS_TABLE {
            let normalized = normalize(entry.alias);
            if let Some(existing) = seen.insert(normalized.clone(), entry.code) {
                assert_eq!(
                    existing, entry.code,
                    "alias '{}' maps to both '{}' and '{}'",
                    entry.alias, existing, entry.code
                );
            }
        }
    }

    #[test]
    fn test_find_code_resolves_aliases() {
        assert_eq!(find_code("HDL Cholesterol"), "hdl");
        assert_eq!(find_code("Vitamin-D"), "vitamind");
        assert_eq!(find_code("Thyroid Stimulating Hormone"), "tsh");
        assert_eq!(find_code("serum folate"), "folate");
    }

    #[test]
    fn test_find_code_passes_through_unknown_names() {
        assert_eq!(find_code("Cholesterol"), "cholesterol");
        assert_eq!(find_code("Something Else"), "somethingelse");
    }

    #[test]
    fn test_known_codes_sorted_and_known() {
        let mut sorted = KNOWN_CODES.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, KNOWN_CODES, "KNOWN_CODES must stay sorted");
        assert!(is_known_code("hemoglobin"));
        assert!(!is_known_code("patientid"));
    }

    #[test]
    fn test_range_status() {
        let range = reference_range("glucose").unwrap();
        assert_eq!(range_status(65.0, &range), RangeStatus::Low);
        assert_eq!(range_status(85.0, &range), RangeStatus::Normal);
        assert_eq!(range_status(140.0, &range), RangeStatus::High);
    }

    #[test]
    fn test_categorize() {
        assert_eq!(categorize("hemoglobin"), PanelCategory::CompleteBloodCount);
        assert_eq!(categorize("glucose"), PanelCategory::MetabolicPanel);
        assert_eq!(categorize("hdl"), PanelCategory::LipidPanel);
        assert_eq!(categorize("tsh"), PanelCategory::ThyroidPanel);
        assert_eq!(categorize("vitamind"), PanelCategory::VitaminsAndHormones);
        assert_eq!(categorize("unknowncode"), PanelCategory::Other);
    }
}
