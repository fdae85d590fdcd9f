//! Preprocessing and candidate extraction working together

use biomark::preprocessing::preprocess;
use biomark::text_processing::BiomarkerDetector;

#[test]
fn glued_acronym_name_is_split_then_extracted() {
    let cleaned = preprocess("HDLCholesterol 55 mg/dL");
    assert_eq!(cleaned, "HDL Cholesterol 55 mg/dL");

    let candidates = BiomarkerDetector::new().extract_candidates(&cleaned);
    assert!(candidates
        .iter()
        .any(|c| c.raw_name == "HDL Cholesterol" && c.value == 55.0 && c.unit == "mg/dL"));
}

#[test]
fn glued_value_and_unit_are_separated() {
    let cleaned = preprocess("Cholesterol: 180mg/dL");
    let candidates = BiomarkerDetector::new().extract_candidates(&cleaned);

    assert!(candidates
        .iter()
        .any(|c| c.raw_name == "Cholesterol" && c.value == 180.0 && c.unit == "mg/dL"));
}

#[test]
fn extracts_from_mixed_layout_report() {
    let text = "\
Cholesterol: 180 mg/dL
Ferritin\t150\tng/mL
95 mg/dL Glucose
TSH 2.1 mIU/L (0.4 - 4.0)";
    let cleaned = preprocess(text);
    let candidates = BiomarkerDetector::new().extract_candidates(&cleaned);

    for expected in ["Cholesterol", "Ferritin", "Glucose", "TSH"] {
        assert!(
            candidates.iter().any(|c| c.raw_name == expected),
            "missing {} in {:?}",
            expected,
            candidates
        );
    }
}

#[test]
fn malformed_numbers_do_not_abort_the_line_set() {
    let text = "Glucose 9.5.1 mg/dL\nSodium: 140 mEq/L";
    let candidates = BiomarkerDetector::new().extract_candidates(&preprocess(text));

    assert!(candidates.iter().all(|c| c.raw_name != "Glucose"));
    assert!(candidates
        .iter()
        .any(|c| c.raw_name == "Sodium" && c.value == 140.0));
}

#[test]
fn overlapping_patterns_tolerate_duplicates() {
    let candidates =
        BiomarkerDetector::new().extract_candidates("Glucose 95 mg/dL (70 - 100)");

    let glucose: Vec<_> = candidates.iter().filter(|c| c.raw_name == "Glucose").collect();
    assert!(glucose.len() >= 2);
    assert!(glucose.iter().all(|c| c.value == 95.0));
}

#[test]
fn non_biomarker_text_produces_no_candidates() {
    let detector = BiomarkerDetector::new();
    for text in [
        "Patient ID: 4471829",
        "Collected 12/05/2024",
        "Page 2 of 3",
        "",
    ] {
        assert!(
            detector.extract_candidates(&preprocess(text)).is_empty(),
            "unexpected candidates in {:?}",
            text
        );
    }
}
