use std::sync::OnceLock;

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    describe();
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

fn describe() {
    describe_counter!("http_requests_total", "Gateway HTTP responses by status");
    describe_histogram!(
        "http_request_duration_seconds",
        Unit::Seconds,
        "Gateway request latency by status"
    );
    describe_counter!("upstream_requests_total", "Calls to the upstream backend by outcome");
    describe_histogram!(
        "upstream_request_duration_seconds",
        Unit::Seconds,
        "Upstream backend call latency"
    );
    describe_counter!(
        "feedback_index_fetch_failures_total",
        "Feedback lists replaced by an empty list after a failed fetch"
    );
}
