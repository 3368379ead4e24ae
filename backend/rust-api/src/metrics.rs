use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .unwrap();

    // Completion service
    pub static ref COMPLETION_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "completion_request_duration_seconds",
        "Chat completion round trip in seconds",
        &["status"],
        vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0]
    )
    .unwrap();

    // Tutor Metrics
    pub static ref TUTOR_SUBMISSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "tutor_submissions_total",
        "Total number of chat submissions by outcome",
        &["outcome"]
    )
    .unwrap();

    pub static ref TUTOR_REPLY_STAGES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "tutor_reply_stages_total",
        "Model replies by lesson stage",
        &["stage"]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

pub fn record_submission(outcome: &str) {
    TUTOR_SUBMISSIONS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_reply_stage(stage: &str) {
    TUTOR_REPLY_STAGES_TOTAL.with_label_values(&[stage]).inc();
}
