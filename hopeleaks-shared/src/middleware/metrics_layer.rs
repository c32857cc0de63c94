use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

const HTTP_DURATION: &str = "http_request_duration_seconds";

/// Admin endpoints run a transaction per call; anything past a few seconds is an outlier.
const HTTP_DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

pub async fn metrics_middleware(
    matched_path: Option<MatchedPath>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    // Unmatched requests share one label to keep label cardinality bounded.
    let route = match matched_path {
        Some(p) => p.as_str().to_owned(),
        None => "unmatched".to_owned(),
    };

    let response = next.run(req).await;
    let labels = [
        ("method", method),
        ("route", route),
        ("status", response.status().as_u16().to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!(HTTP_DURATION, &labels).record(start.elapsed().as_secs_f64());

    response
}

/// Installs the global Prometheus recorder with bucketed request latencies.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(HTTP_DURATION.to_owned()), HTTP_DURATION_BUCKETS)?
        .install_recorder()?;

    describe_counter!("http_requests_total", Unit::Count, "HTTP requests served");
    describe_histogram!(HTTP_DURATION, Unit::Seconds, "HTTP request latency");

    Ok(handle)
}
