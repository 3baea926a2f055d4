//! Prometheus metrics for the API server.

use std::sync::LazyLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Install the Prometheus recorder and return a handle for rendering.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "helphub_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "helphub_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "helphub_http_requests_in_flight";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "helphub_rate_limit_hits_total";

    // Account metrics
    pub const REGISTRATIONS_TOTAL: &str = "helphub_registrations_total";
    pub const LOGINS_TOTAL: &str = "helphub_logins_total";
}

static NUMERIC_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/[0-9]+(/|$)").expect("valid path regex"));

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Record a registration attempt for `role`.
pub fn record_registration(role: &str, outcome: &str) {
    let labels = [("role", role.to_string()), ("outcome", outcome.to_string())];
    counter!(names::REGISTRATIONS_TOTAL, &labels).increment(1);
}

/// Record a login attempt for `role`.
pub fn record_login(role: &str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    let labels = [("role", role.to_string()), ("outcome", outcome.to_string())];
    counter!(names::LOGINS_TOTAL, &labels).increment(1);
}

/// Replace numeric ids in a path so label cardinality stays bounded.
fn sanitize_path(path: &str) -> String {
    // Applied twice: adjacent ids share the separating slash.
    let path = NUMERIC_SEGMENT.replace_all(path, "/:id$1");
    NUMERIC_SEGMENT.replace_all(&path, "/:id$1").into_owned()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
