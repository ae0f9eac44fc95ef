//! Prometheus metrics & middleware helper.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};

/// Request metrics under the `quiz` namespace, served at `/metrics`.
/// Build once and clone into every worker.
pub fn build() -> anyhow::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("quiz")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("metrics builder: {e}"))
}
