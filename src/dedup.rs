//! Result deduplication and merging
//!
//! Extraction patterns overlap on purpose, so the same biomarker routinely
//! surfaces more than once. Deduplication is first-seen-wins on canonical
//! code and preserves the incoming order.

use tracing::debug;

use crate::pipeline::ExtractedBiomarker;

/// Drop repeated codes, keeping the first occurrence and its value.
///
/// Input order is preserved for the survivors.
pub fn dedupe_by_code(results: Vec<ExtractedBiomarker>) -> Vec<ExtractedBiomarker> {
    let before = results.len();
    let mut seen: std::collections::HashSet<String> = std::collections::HashSet::new();
    let mut deduped: Vec<ExtractedBiomarker> = Vec::with_capacity(results.len());

    for result in results {
        if seen.insert(result.code.clone()) {
            deduped.push(result);
        }
    }

    if deduped.len() != before {
        debug!(
            before,
            after = deduped.len(),
            "Deduplicated extraction results"
        );
    }
    deduped
}

/// Merge a secondary result set into a primary one.
///
/// Primary entries always win; secondary entries are appended only when
/// their code is absent from the primary set.
pub fn merge_results(
    primary: Vec<ExtractedBiomarker>,
    secondary: Vec<ExtractedBiomarker>,
) -> Vec<ExtractedBiomarker> {
    let mut merged = primary;
    let existing: std::collections::HashSet<String> =
        merged.iter().map(|r| r.code.clone()).collect();

    for result in secondary {
        if !existing.contains(&result.code) {
            merged.push(result);
        }
    }
    dedupe_by_code(merged)
}
