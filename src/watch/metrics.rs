//! Metrics collection for the watch loop
//!
//! Metrics recorded:
//! - `watch_cycles_total` (counter): poll cycles started
//! - `watch_cycles_active` (gauge): cycles currently in flight
//! - `watch_cycle_duration_seconds` (histogram): cycle wall time, labeled by status
//! - `watch_cycle_completions_total` (counter): cycles that finished cleanly
//! - `watch_cycle_errors_total` (counter): failed cycles, labeled by error kind
//! - `slots_listed_total` (counter): slots seen in listings
//! - `slots_eligible_total` (counter): slots that passed the filter
//! - `slots_booked_total` (counter): accepted booking submissions
//! - `bookings_failed_total` (counter): rejected booking submissions
//!
//! All metrics are recorded through the `metrics` crate facade. Without an
//! installed exporter the macros are no-ops, so recording is always safe.

use metrics::{counter, decrement_gauge, histogram, increment_counter, increment_gauge};
use std::cell::Cell;
use std::time::Instant;

/// Tracks one poll cycle from start to completion
///
/// Dropping the tracker without recording an outcome still releases the
/// active-cycle gauge, so a panicking cycle does not leak gauge state.
#[derive(Debug)]
pub struct CycleMetrics {
    cycle: u64,
    start: Instant,
    recorded: Cell<bool>,
}

impl CycleMetrics {
    /// Start tracking a new poll cycle
    pub fn new(cycle: u64) -> Self {
        increment_counter!("watch_cycles_total");
        increment_gauge!("watch_cycles_active", 1.0);

        Self {
            cycle,
            start: Instant::now(),
            recorded: Cell::new(false),
        }
    }

    /// Sequence number of the tracked cycle
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Time elapsed since the cycle started
    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }

    /// Record a cycle that ran to completion
    pub fn record_completion(&self, listed: usize, eligible: usize, booked: usize, failed: usize) {
        if self.recorded.get() {
            return;
        }
        self.recorded.set(true);

        let duration = self.start.elapsed();
        histogram!(
            "watch_cycle_duration_seconds",
            duration.as_secs_f64(),
            "status" => "success"
        );
        increment_counter!("watch_cycle_completions_total", "status" => "success");
        counter!("slots_listed_total", listed as u64);
        counter!("slots_eligible_total", eligible as u64);
        counter!("slots_booked_total", booked as u64);
        counter!("bookings_failed_total", failed as u64);
        decrement_gauge!("watch_cycles_active", 1.0);
    }

    /// Record a cycle that failed, labeled by the error kind
    pub fn record_error(&self, kind: &str) {
        if self.recorded.get() {
            return;
        }
        self.recorded.set(true);

        let duration = self.start.elapsed();
        histogram!(
            "watch_cycle_duration_seconds",
            duration.as_secs_f64(),
            "status" => "error"
        );
        increment_counter!("watch_cycle_errors_total", "kind" => kind.to_string());
        decrement_gauge!("watch_cycles_active", 1.0);
    }
}

impl Drop for CycleMetrics {
    fn drop(&mut self) {
        if !self.recorded.get() {
            decrement_gauge!("watch_cycles_active", 1.0);
        }
    }
}

/// Install the Prometheus metrics exporter when built with the
/// `prometheus` feature; otherwise leave the no-op recorder in place
pub fn init_metrics_exporter() {
    #[cfg(feature = "prometheus")]
    {
        use metrics_exporter_prometheus::PrometheusBuilder;

        match PrometheusBuilder::new().install() {
            Ok(()) => tracing::info!("prometheus metrics exporter installed"),
            Err(e) => tracing::warn!(error = %e, "failed to install prometheus exporter"),
        }
    }

    #[cfg(not(feature = "prometheus"))]
    tracing::debug!("metrics exporter disabled; recording to no-op recorder");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cycle_metrics_creation() {
        let metrics = CycleMetrics::new(7);

        assert_eq!(metrics.cycle(), 7);
        assert!(!metrics.recorded.get());
    }

    #[test]
    fn test_elapsed_advances() {
        let metrics = CycleMetrics::new(1);
        std::thread::sleep(Duration::from_millis(5));

        assert!(metrics.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn test_record_completion_sets_flag() {
        let metrics = CycleMetrics::new(1);

        metrics.record_completion(12, 2, 1, 1);

        assert!(metrics.recorded.get());
    }

    #[test]
    fn test_record_error_sets_flag() {
        let metrics = CycleMetrics::new(1);

        metrics.record_error("transport");

        assert!(metrics.recorded.get());
    }

    #[test]
    fn test_second_record_is_ignored() {
        let metrics = CycleMetrics::new(1);

        metrics.record_completion(1, 0, 0, 0);
        metrics.record_error("parse");

        assert!(metrics.recorded.get());
    }

    #[test]
    fn test_drop_without_record_is_safe() {
        let metrics = CycleMetrics::new(1);
        drop(metrics);
    }

    #[test]
    fn test_zero_counts_are_recordable() {
        let metrics = CycleMetrics::new(1);

        metrics.record_completion(0, 0, 0, 0);

        assert!(metrics.recorded.get());
    }

    #[test]
    fn test_init_metrics_exporter_is_callable() {
        init_metrics_exporter();
    }
}
