//! Prometheus metrics for the decision pipeline.
//!
//! The core only records; exposing a registry is up to the embedding
//! process (see [`all_metrics`]).

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Decisions
// =============================================================================

/// Decisions made, by result.
pub static DECISIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("tomekeeper_decisions_total", "Total release decisions made"),
        &["result"], // "approved", "rejected", "temporarily_rejected"
    )
    .unwrap()
});

/// Rejections, by reason.
pub static REJECTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("tomekeeper_rejections_total", "Total release rejections"),
        &["reason"],
    )
    .unwrap()
});

/// Specifications that could not reach a verdict.
pub static SPECIFICATION_FAULTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "tomekeeper_specification_faults_total",
            "Total specification faults (evaluation continued)",
        ),
        &["specification"],
    )
    .unwrap()
});

// =============================================================================
// Parsing
// =============================================================================

/// Titles the parser could not make sense of.
pub static UNPARSEABLE_TITLES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "tomekeeper_unparseable_titles_total",
        "Total release titles that could not be parsed",
    )
    .unwrap()
});

// =============================================================================
// Batches
// =============================================================================

/// Candidates per batch.
pub static BATCH_SIZE: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("tomekeeper_batch_candidates", "Number of releases per decision batch")
            .buckets(vec![0.0, 1.0, 10.0, 50.0, 100.0, 250.0, 500.0, 1000.0]),
    )
    .unwrap()
});

/// Time spent deciding a batch, in seconds.
pub static BATCH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("tomekeeper_batch_duration_seconds", "Duration of a decision batch")
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
    )
    .unwrap()
});

/// Get all metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(DECISIONS_TOTAL.clone()),
        Box::new(REJECTIONS_TOTAL.clone()),
        Box::new(SPECIFICATION_FAULTS.clone()),
        Box::new(UNPARSEABLE_TITLES.clone()),
        Box::new(BATCH_SIZE.clone()),
        Box::new(BATCH_DURATION.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        DECISIONS_TOTAL.with_label_values(&["approved"]).inc();
        assert!(registry
            .gather()
            .iter()
            .any(|family| family.get_name() == "tomekeeper_decisions_total"));
    }
}
