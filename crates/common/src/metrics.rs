//! Process-wide Prometheus metrics for sync progress.
//!
//! Metrics live in the default registry and are exposed through [`gather_metrics`].

use std::time::Instant;

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter_vec, register_int_gauge, Encoder, Histogram,
    HistogramOpts, IntCounterVec, IntGauge, TextEncoder,
};

lazy_static! {
    // ==================== Fast Sync Metrics ====================

    /// Lowest height below which every block has been inserted without gaps.
    pub static ref FAST_SYNC_FRONTIER: IntGauge = register_int_gauge!(
        "basalt_fast_sync_frontier_height",
        "Lowest inserted height without gaps during fast sync"
    )
    .unwrap();

    /// Approximate number of blocks inserted above the frontier.
    pub static ref FAST_SYNC_QUEUE_SIZE: IntGauge = register_int_gauge!(
        "basalt_fast_sync_queue_size",
        "Blocks inserted but not yet absorbed into the frontier"
    )
    .unwrap();

    /// Counter for batches generated for download
    pub static ref FAST_SYNC_BATCHES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "basalt_fast_sync_batches_total",
        "Total number of fast sync batches",
        &["outcome"] // outcome=[complete|partial|failed|empty]
    )
    .unwrap();

    /// Counter for blocks processed by fast sync workers
    pub static ref FAST_SYNC_BLOCKS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "basalt_fast_sync_blocks_total",
        "Total number of blocks handled by fast sync",
        &["status"] // status=[inserted|missing|rejected|request_failed]
    )
    .unwrap();

    /// Histogram tracking the time to download and insert one batch
    pub static ref FAST_SYNC_BATCH_DURATION: Histogram = register_histogram!(
        HistogramOpts::new(
            "basalt_fast_sync_batch_duration_seconds",
            "Time spent downloading and inserting a fast sync batch"
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0])
    )
    .unwrap();
}

/// Renders every registered metric in the Prometheus text exposition format.
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let mut buf = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buf)?;
    String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

// ==================== Timing Helpers ====================

/// RAII guard that records its lifetime into a histogram on drop.
#[derive(Debug)]
pub struct TimingGuard {
    start: Instant,
    histogram: Histogram,
}

impl TimingGuard {
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            start: Instant::now(),
            histogram: histogram.clone(),
        }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_guard_observes_once() {
        let before = FAST_SYNC_BATCH_DURATION.get_sample_count();
        {
            let _guard = TimingGuard::new(&FAST_SYNC_BATCH_DURATION);
        }
        assert!(FAST_SYNC_BATCH_DURATION.get_sample_count() > before);
    }

    #[test]
    fn test_gather_contains_fast_sync_metrics() {
        FAST_SYNC_FRONTIER.set(42);
        FAST_SYNC_BLOCKS_TOTAL.with_label_values(&["inserted"]).inc();
        let text = gather_metrics().unwrap();
        assert!(text.contains("basalt_fast_sync_frontier_height"));
        assert!(text.contains("basalt_fast_sync_blocks_total"));
    }
}
