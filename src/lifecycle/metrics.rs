//! Prometheus exposition for the `metrics` facade.
//!
//! Recording happens where the work happens ([`crate::framework`] for the worker,
//! [`crate::http`] for requests). This module only installs the exporter and describes
//! what gets recorded.

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

use crate::framework::{ACTION_DURATION_METRIC, MAILBOX_REJECTIONS_METRIC};
use crate::http::API_DURATION_METRIC;

/// Installs the global recorder and serves `/metrics` on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn setup_metrics(addr: SocketAddr) -> anyhow::Result<()> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    describe_metrics();
    info!(%addr, "metrics exporter listening");
    Ok(())
}

fn describe_metrics() {
    describe_histogram!(
        API_DURATION_METRIC,
        Unit::Milliseconds,
        "Duration of API requests by path, method and status code"
    );
    describe_histogram!(
        ACTION_DURATION_METRIC,
        Unit::Milliseconds,
        "Time each action held the document worker, by action and outcome"
    );
    describe_counter!(
        MAILBOX_REJECTIONS_METRIC,
        Unit::Count,
        "Submissions rejected because the mailbox was full"
    );
}
