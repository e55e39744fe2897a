//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "balcao_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "balcao_http_request_duration_seconds";
    pub const RATE_LIMIT_HITS_TOTAL: &str = "balcao_rate_limit_hits_total";
}

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

/// Record a rate limit rejection.
pub fn record_rate_limit_hit(path: &str) {
    counter!(
        names::RATE_LIMIT_HITS_TOTAL,
        "path" => sanitize_path(path)
    )
    .increment(1);
}

/// Middleware recording per-request metrics.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}

/// Collapse identifier path segments so metric cardinality stays bounded.
fn sanitize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.len() >= 16 && segment.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_collapses_uuid_segments() {
        assert_eq!(
            sanitize_path("/api/empresas/8f5b1f9e-6f9c-4a3e-9f3e-0c1a2b3c4d5e"),
            "/api/empresas/:id"
        );
        assert_eq!(sanitize_path("/api/empresas"), "/api/empresas");
        assert_eq!(sanitize_path("/health"), "/health");
    }
}
