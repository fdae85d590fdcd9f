//! Tracing setup and metrics recorders for the extraction pipeline
//!
//! Metric names follow the `biomark_*` prefix. Recording is a no-op until
//! the embedding application installs a metrics recorder.

use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber from `RUST_LOG`, defaulting to `info`.
///
/// Call once at startup; repeated calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Record an extraction pass: duration, input size, candidates produced
pub fn record_extraction_metrics(
    operation: &'static str,
    duration: Duration,
    input_bytes: usize,
    candidates: usize,
) {
    metrics::counter!("biomark_extraction_total", "operation" => operation).increment(1);
    metrics::histogram!("biomark_extraction_duration_seconds", "operation" => operation)
        .record(duration.as_secs_f64());
    metrics::histogram!("biomark_extraction_input_bytes", "operation" => operation)
        .record(input_bytes as f64);
    metrics::histogram!("biomark_extraction_candidates", "operation" => operation)
        .record(candidates as f64);
}

/// Record a validation decision per tier
pub fn record_validation_outcome(tier: &'static str, accepted: bool) {
    let outcome = if accepted { "accepted" } else { "rejected" };
    metrics::counter!("biomark_validation_total", "tier" => tier, "outcome" => outcome)
        .increment(1);
}

/// Record a reference cache hit or miss
pub fn record_reference_cache(outcome: &'static str) {
    metrics::counter!("biomark_reference_cache_total", "outcome" => outcome).increment(1);
}

/// Record a reference refresh attempt
pub fn record_reference_refresh(success: bool) {
    let outcome = if success { "ok" } else { "error" };
    metrics::counter!("biomark_reference_refresh_total", "outcome" => outcome).increment(1);
}

/// Record an applied automatic name correction
pub fn record_auto_correction() {
    metrics::counter!("biomark_auto_corrections_total").increment(1);
}
