//! # Observability
//!
//! Prometheus metrics for the dashboard, served on a separate port by
//! [`crate::server`].

pub mod metrics;
