//! Metrics collection.
//!
//! # Metrics
//! - `api_requests_total` (counter): requests by method and outcome
//! - `api_session_timeouts_total` (counter): detected session timeouts
//! - `session_timer_events_total` (counter): timer start/warning/timeout/stop

use reqwest::Method;

/// Record a finished request. `outcome` is "success" or an error kind.
pub fn record_request(method: &Method, outcome: &'static str) {
    metrics::counter!(
        "api_requests_total",
        "method" => method.as_str().to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a detected session timeout.
pub fn record_session_timeout() {
    metrics::counter!("api_session_timeouts_total").increment(1);
}

/// Record a timer lifecycle event.
pub fn record_timer_event(event: &'static str) {
    metrics::counter!("session_timer_events_total", "event" => event).increment(1);
}
