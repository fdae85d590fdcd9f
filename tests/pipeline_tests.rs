//! End-to-end extraction pipeline tests

use std::sync::Arc;
use std::time::Duration;

use biomark::cache::ReferenceCache;
use biomark::config::ExtractionConfig;
use biomark::errors::{AppError, AppResult};
use biomark::pipeline::{analyze_results, extract_biomarkers};
use biomark::reference::{BiomarkerReference, ReferenceSource};
use biomark::validation::ReferenceValidator;
use biomark::{PanelCategory, RangeStatus};

struct StaticSource(Vec<BiomarkerReference>);

impl ReferenceSource for StaticSource {
    async fn fetch_all(&self) -> AppResult<Vec<BiomarkerReference>> {
        Ok(self.0.clone())
    }
}

struct FailingSource;

impl ReferenceSource for FailingSource {
    async fn fetch_all(&self) -> AppResult<Vec<BiomarkerReference>> {
        Err(AppError::Reference("connection refused".to_string()))
    }
}

fn validator_with<S: ReferenceSource>(source: S) -> (ReferenceValidator<S>, ExtractionConfig) {
    let config = ExtractionConfig::default();
    let cache = Arc::new(ReferenceCache::new(
        source,
        Duration::from_secs(config.reference_ttl_secs),
    ));
    (ReferenceValidator::new(cache, &config), config)
}

fn validator() -> (ReferenceValidator<StaticSource>, ExtractionConfig) {
    validator_with(StaticSource(Vec::new()))
}

#[tokio::test]
async fn extracts_colon_separated_biomarker() {
    let (validator, config) = validator();
    let results = extract_biomarkers("Cholesterol: 180 mg/dL", &validator, &config)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].code, "cholesterol");
    assert_eq!(results[0].value, 180.0);
    assert_eq!(results[0].unit, "mg/dL");
}

#[tokio::test]
async fn corrects_run_together_name_to_canonical_code() {
    let (validator, config) = validator();
    let results = extract_biomarkers("aserumfolate 5.2 ng/mL", &validator, &config)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].code, "folate");
    assert_eq!(results[0].value, 5.2);
}

#[tokio::test]
async fn ignores_patient_metadata() {
    let (validator, config) = validator();
    let results = extract_biomarkers("Patient ID: 4471829", &validator, &config)
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn splits_glued_acronym_names() {
    let (validator, config) = validator();
    let results = extract_biomarkers("HDLCholesterol 55 mg/dL", &validator, &config)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].code, "hdl");
    assert_eq!(results[0].value, 55.0);
}

#[tokio::test]
async fn degrades_gracefully_when_reference_source_fails() {
    let (validator, config) = validator_with(FailingSource);
    let results = extract_biomarkers("Hemoglobin: 14.1 g/dL", &validator, &config)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].code, "hemoglobin");
}

#[tokio::test]
async fn output_order_follows_input_order() {
    let (validator, config) = validator();
    let text = "Glucose: 95 mg/dL\nTSH: 2.1 mIU/L\nSodium: 140 mEq/L";
    let results = extract_biomarkers(text, &validator, &config).await.unwrap();

    let codes: Vec<&str> = results.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["glucose", "tsh", "sodium"]);
}

#[tokio::test]
async fn duplicate_lines_collapse_to_first_occurrence() {
    let (validator, config) = validator();
    let text = "Glucose: 95 mg/dL\nGlucose: 97 mg/dL";
    let results = extract_biomarkers(text, &validator, &config).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].value, 95.0);
}

#[tokio::test]
async fn quick_acceptance_implies_pipeline_acceptance() {
    // The async tier must accept a superset of the quick tier, even when the
    // reference source is down
    let (validator, _) = validator_with(FailingSource);
    for name in [
        "Cholesterol",
        "HDL Cholesterol",
        "Vitamin D",
        "TSH",
        "Hemoglobin A1c",
        "aserumfolate",
    ] {
        if validator.quick().is_valid(name) {
            assert!(validator.is_valid(name).await, "async rejected {}", name);
        }
    }
}

#[tokio::test]
async fn reference_table_extends_acceptance() {
    let (validator, config) = validator_with(StaticSource(vec![BiomarkerReference {
        code: "cystatinc".to_string(),
        name: "Cystatin C".to_string(),
        unit: Some("mg/L".to_string()),
    }]));

    let results = extract_biomarkers("Cystatin C: 0.9 mg/dL", &validator, &config)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].code, "cystatinc");
}

#[tokio::test]
async fn full_report_with_analysis() {
    let (validator, config) = validator();
    let text = "Glucose: 140 mg/dL\nHDL Cholesterol: 55 mg/dL\nTSH: 2.1 mIU/L";
    let results = extract_biomarkers(text, &validator, &config).await.unwrap();
    let entries = analyze_results(&results);

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].code, "glucose");
    assert_eq!(entries[0].status, Some(RangeStatus::High));
    assert_eq!(entries[1].code, "hdl");
    assert_eq!(entries[1].status, Some(RangeStatus::Normal));
    assert_eq!(entries[1].category, PanelCategory::LipidPanel);
    assert_eq!(entries[2].category, PanelCategory::ThyroidPanel);
}
