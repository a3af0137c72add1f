// Metrics hooks for the `matcher` crate.
//
// Callers install a global `DedupMetrics` implementation via [`set_dedup_metrics`];
// every `DuplicateDecisionEngine::check` then reports its latency, outcome and
// the number of candidates it scored. No recorder installed means no cost
// beyond a read lock.
use std::sync::{Arc, OnceLock, RwLock};
use std::time::Duration;

use crate::types::MatchType;

/// Metrics observer for duplicate checks.
pub trait DedupMetrics: Send + Sync {
    /// `scored_candidates` counts candidates that went through fuzzy scoring;
    /// it is zero for identifier matches and too-short queries.
    fn record_check(&self, match_type: MatchType, latency: Duration, scored_candidates: usize);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn DedupMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn DedupMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn DedupMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global duplicate-check metrics recorder.
pub fn set_dedup_metrics(recorder: Option<Arc<dyn DedupMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
