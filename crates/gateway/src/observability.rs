use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static LOGINS_REJECTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "dorm_board_gateway_logins_rejected_total",
        "Total login attempts rejected or failed"
    )
    .expect("register logins_rejected_total")
});

pub static ADS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "dorm_board_gateway_ads_created_total",
        "Total ads created through the gateway"
    )
    .expect("register ads_created_total")
});

pub static UPSTREAM_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dorm_board_gateway_upstream_errors_total",
        "Total failed calls to upstream services",
        &["upstream"]
    )
    .expect("register upstream_errors_total")
});

pub static READINESS_ATTEMPTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "dorm_board_gateway_readiness_attempts_total",
        "Probe rounds spent waiting for upstream services"
    )
    .expect("register readiness_attempts_total")
});

pub fn upstream_error(upstream: &str) {
    UPSTREAM_ERRORS_TOTAL.with_label_values(&[upstream]).inc();
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
