//! Metrics collection and Prometheus export.
//!
//! Initializes the metrics exporter and records chat-specific series.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics recorder.
///
/// Must be called once at startup before any metrics are recorded. Calls
/// after the first are ignored.
pub fn init_metrics() -> anyhow::Result<()> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;

    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count one answered chat message.
pub fn record_answer(source: &'static str, role: &'static str) {
    counter!("chat_answers_total", "source" => source, "role" => role).increment(1);
}

/// Record the latency and outcome of one text-generation call.
pub fn record_provider_call(provider: &'static str, outcome: &'static str, elapsed: Duration) {
    histogram!(
        "chat_provider_latency_seconds",
        "provider" => provider,
        "outcome" => outcome
    )
    .record(elapsed.as_secs_f64());
}
