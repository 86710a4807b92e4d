use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("analyze_requests_total", "Accepted /analyze requests.");
        describe_counter!(
            "analyze_rejected_total",
            "Requests rejected before scoring (malformed body)."
        );
        describe_counter!(
            "analyze_verdict_total",
            "Responses by verdict (label: verdict)."
        );
        describe_counter!(
            "provider_errors_total",
            "Signal provider failures (label: provider)."
        );
        describe_histogram!("analyze_score", "Final clamped credibility score.");
    });
}

impl Metrics {
    /// Install the Prometheus recorder. Call once, from the binary.
    pub fn init() -> anyhow::Result<Self> {
        // Use default buckets to avoid API differences across crate versions.
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;
        ensure_metrics_described();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
