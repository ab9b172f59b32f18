use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all songrec metrics
const PREFIX: &str = "songrec";

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Catalog Metrics
    pub static ref CATALOG_TRACKS_TOTAL: Gauge = Gauge::new(
        format!("{PREFIX}_catalog_tracks_total"),
        "Number of tracks in the catalog"
    ).expect("Failed to create catalog_tracks_total metric");

    // Recommendation Metrics
    pub static ref RECOMMENDATION_RESULTS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_recommendation_results"),
            "Number of tracks returned per recommendation query"
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 15.0]),
        &["kind"]
    ).expect("Failed to create recommendation_results metric");

    pub static ref RECOMMENDATION_EMPTY_TOTAL: CounterVec = CounterVec::new(
        Opts::new(
            format!("{PREFIX}_recommendation_empty_total"),
            "Recommendation queries that returned no tracks"
        ),
        &["kind"]
    ).expect("Failed to create recommendation_empty_total metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Already registered metrics are fine (tests call this repeatedly)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(CATALOG_TRACKS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(RECOMMENDATION_RESULTS.clone()));
    let _ = REGISTRY.register(Box::new(RECOMMENDATION_EMPTY_TOTAL.clone()));

    tracing::info!("Metrics system initialized successfully");
}

pub fn init_catalog_metrics(num_tracks: usize) {
    CATALOG_TRACKS_TOTAL.set(num_tracks as f64);
    tracing::info!("Catalog metrics initialized: {} tracks", num_tracks);
}

/// Maps a request path to a bounded label value.
pub fn categorize_endpoint(path: &str) -> &'static str {
    match path {
        "/" => "home",
        "/songs" => "songs",
        "/recommend" => "recommend",
        "/recommend_by_mood" => "recommend_by_mood",
        _ => "other",
    }
}

pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let endpoint = categorize_endpoint(path);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, endpoint])
        .observe(duration.as_secs_f64());
}

/// Record the size of a recommendation answer. `kind` is "similar" or "mood".
pub fn record_recommendation(kind: &str, count: usize) {
    RECOMMENDATION_RESULTS
        .with_label_values(&[kind])
        .observe(count as f64);
    if count == 0 {
        RECOMMENDATION_EMPTY_TOTAL.with_label_values(&[kind]).inc();
    }
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_default();
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
