//! # Metrics
//!
//! Prometheus metrics for monitoring the dashboard.
//!
//! ## Metrics Exposed
//!
//! - `sandbox_user_last_seen` - Timestamp of last user interaction, per username
//! - `sandbox_requests_total` - Total dashboard requests, per endpoint

use anyhow::Result;
use prometheus::{GaugeVec, IntCounterVec, Opts, Registry};
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static USER_LAST_SEEN: LazyLock<GaugeVec> = LazyLock::new(|| {
    GaugeVec::new(
        Opts::new("sandbox_user_last_seen", "Timestamp of last user interaction"),
        &["username"],
    )
    .expect("Failed to create USER_LAST_SEEN metric - this should never happen")
});

static REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new("sandbox_requests_total", "Total dashboard requests"),
        &["endpoint"],
    )
    .expect("Failed to create REQUESTS_TOTAL metric - this should never happen")
});

/// Register all metrics with the process-wide registry. Call once at startup.
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(USER_LAST_SEEN.clone()))?;
    REGISTRY.register(Box::new(REQUESTS_TOTAL.clone()))?;
    Ok(())
}

/// Record a user interaction at the current UNIX timestamp.
pub fn set_user_last_seen(username: &str) {
    #[allow(
        clippy::cast_precision_loss,
        reason = "UNIX timestamps fit f64 exactly for the foreseeable future"
    )]
    USER_LAST_SEEN
        .with_label_values(&[username])
        .set(chrono::Utc::now().timestamp() as f64);
}

/// Count a handled dashboard request.
pub fn inc_requests(endpoint: &str) {
    REQUESTS_TOTAL.with_label_values(&[endpoint]).inc();
}

/// Gather all registered metric families for encoding.
pub fn gather() -> Vec<prometheus::proto::MetricFamily> {
    REGISTRY.gather()
}
