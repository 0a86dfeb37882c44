//! Pipeline metrics.
//!
//! # Metrics
//! - `pipeline_requests_total` (counter): completed requests by method, outcome
//! - `pipeline_request_duration_seconds` (histogram): end-to-end latency
//! - `pipeline_throttle_wait_seconds` (histogram): time spent queued for a permit
//!
//! # Design Decisions
//! - Outcome is `ok` or an error kind label, keeping label cardinality fixed
//! - No recorder is installed here; without one every call is a no-op

use std::time::{Duration, Instant};

/// Record one finished request.
pub fn record_request(method: &str, outcome: &'static str, start: Instant) {
    let duration = start.elapsed().as_secs_f64();
    ::metrics::counter!(
        "pipeline_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!(
        "pipeline_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(duration);
}

/// Record how long a request waited for a throttle permit.
pub fn record_throttle_wait(waited: Duration) {
    ::metrics::histogram!("pipeline_throttle_wait_seconds").record(waited.as_secs_f64());
}
