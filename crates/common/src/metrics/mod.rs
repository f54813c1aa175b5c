//! Metrics and observability utilities
//!
//! Provides Prometheus metrics for the answer pipeline with
//! standardized naming conventions.

use crate::errors::{AppError, Result, UpstreamStage};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Metrics prefix for all assistant metrics
pub const METRICS_PREFIX: &str = "assistant";

/// Histogram buckets for request and upstream latency (in seconds).
/// Model calls dominate, so the tail reaches well past typical API latency.
pub const LATENCY_BUCKETS: &[f64] = &[
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.000,  // 2s
    5.000,  // 5s
    10.00,  // 10s
    20.00,  // 20s
    30.00,  // 30s
    60.00,  // 60s
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    describe_counter!(
        format!("{}_upstream_calls_total", METRICS_PREFIX),
        Unit::Count,
        "Calls to embedding, retrieval and completion providers"
    );

    describe_histogram!(
        format!("{}_upstream_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Provider call latency in seconds"
    );

    describe_gauge!(
        format!("{}_context_chunks", METRICS_PREFIX),
        Unit::Count,
        "Number of chunks retrieved for the last question"
    );

    describe_counter!(
        format!("{}_answers_total", METRICS_PREFIX),
        Unit::Count,
        "Answers produced, by locale"
    );

    tracing::info!("Metrics registered");
}

/// Install the Prometheus exporter on `0.0.0.0:port`
pub fn install_exporter(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(Matcher::Suffix("duration_seconds".to_string()), LATENCY_BUCKETS)
        .and_then(|builder| builder.install())
        .map_err(|e| AppError::Configuration {
            message: format!("Failed to install Prometheus exporter: {}", e),
        })?;

    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: &'static str,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(endpoint: &'static str) -> Self {
        Self {
            start: Instant::now(),
            endpoint,
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "endpoint" => self.endpoint,
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Helper to record one provider call
pub fn record_upstream(stage: UpstreamStage, duration_secs: f64, success: bool) {
    let status = if success { "success" } else { "error" };

    counter!(
        format!("{}_upstream_calls_total", METRICS_PREFIX),
        "stage" => stage.as_str(),
        "status" => status
    )
    .increment(1);

    histogram!(
        format!("{}_upstream_duration_seconds", METRICS_PREFIX),
        "stage" => stage.as_str()
    )
    .record(duration_secs);
}

/// Helper to record retrieval size
pub fn record_context(chunk_count: usize) {
    gauge!(format!("{}_context_chunks", METRICS_PREFIX)).set(chunk_count as f64);
}

/// Helper to record a produced answer
pub fn record_answer(locale: &'static str) {
    counter!(
        format!("{}_answers_total", METRICS_PREFIX),
        "locale" => locale
    )
    .increment(1);
}
