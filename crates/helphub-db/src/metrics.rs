//! Storage metrics collection.
//!
//! Provides standardized metrics for monitoring storage operations:
//! - Query counters by operation and outcome
//! - Latency histograms
//! - Booking lifecycle counters

use std::future::Future;
use std::time::Instant;

use metrics::{counter, histogram};

use crate::error::DbResult;

/// Metric name constants for consistency.
pub mod names {
    /// Total storage operations by operation and outcome.
    pub const QUERIES_TOTAL: &str = "helphub_db_queries_total";

    /// Storage operation latency in seconds by operation.
    pub const QUERY_DURATION_SECONDS: &str = "helphub_db_query_duration_seconds";

    /// Booking lifecycle events by event (`created`, `confirmed`, `rejected`).
    pub const BOOKING_EVENTS_TOTAL: &str = "helphub_booking_events_total";
}

/// Record metrics for a completed storage operation.
pub fn record_query(operation: &'static str, outcome: &'static str, latency_secs: f64) {
    counter!(
        names::QUERIES_TOTAL,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);

    histogram!(
        names::QUERY_DURATION_SECONDS,
        "operation" => operation
    )
    .record(latency_secs);
}

/// Record a booking lifecycle transition.
pub fn record_booking_event(event: &'static str) {
    counter!(names::BOOKING_EVENTS_TOTAL, "event" => event).increment(1);
}

/// Run a storage operation and record its outcome and latency.
pub(crate) async fn observe<T, F>(operation: &'static str, fut: F) -> DbResult<T>
where
    F: Future<Output = DbResult<T>>,
{
    let start = Instant::now();
    let result = fut.await;
    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) if e.is_client_error() => "rejected",
        Err(_) => "error",
    };
    record_query(operation, outcome, start.elapsed().as_secs_f64());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::QUERIES_TOTAL.contains("queries"));
        assert!(names::QUERY_DURATION_SECONDS.ends_with("_seconds"));
        assert!(names::BOOKING_EVENTS_TOTAL.starts_with("helphub_"));
    }
}
