use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static ORDERS_PLACED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "ranna_orders_placed_total",
        "Total orders accepted"
    )
    .expect("register orders_placed_total")
});

pub static MENU_UPSERTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "ranna_menu_upserts_total",
        "Total menu upserts by operation",
        &["op"]
    )
    .expect("register menu_upserts_total")
});

pub static STORAGE_WRITE_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "ranna_storage_write_failures_total",
        "Collection writes that failed to persist",
        &["collection"]
    )
    .expect("register storage_write_failures_total")
});

/// Touch every metric so they show up in `/metrics` before first use.
pub fn init_metrics() {
    Lazy::force(&ORDERS_PLACED_TOTAL);
    Lazy::force(&MENU_UPSERTS_TOTAL);
    Lazy::force(&STORAGE_WRITE_FAILURES_TOTAL);
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
