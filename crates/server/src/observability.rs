use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder};

use service::Quote;

// Prometheus metrics (default registry)
pub static QUOTES_SERVED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("taka_quotes_served_total", "Total quotes served")
        .expect("register quotes_served_total")
});

pub static QUOTE_FALLBACKS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "taka_quote_fallbacks_total",
        "Total requests answered with the fallback quote"
    )
    .expect("register quote_fallbacks_total")
});

pub static CORPUS_RELOADS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("taka_corpus_reloads_total", "Total successful corpus reloads")
        .expect("register corpus_reloads_total")
});

pub static CORPUS_SIZE: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("taka_corpus_size", "Number of quotes currently loaded")
        .expect("register corpus_size")
});

/// Count one served quote.
pub fn record_served(quote: &Quote) {
    QUOTES_SERVED_TOTAL.inc();
    if quote.is_fallback() {
        QUOTE_FALLBACKS_TOTAL.inc();
    }
}

pub fn record_corpus_size(quotes: usize) {
    CORPUS_SIZE.set(i64::try_from(quotes).unwrap_or(i64::MAX));
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    // 确保指标在首次抓取前已注册
    Lazy::force(&QUOTES_SERVED_TOTAL);
    Lazy::force(&QUOTE_FALLBACKS_TOTAL);
    Lazy::force(&CORPUS_RELOADS_TOTAL);
    Lazy::force(&CORPUS_SIZE);

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
