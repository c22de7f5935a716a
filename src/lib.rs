//! Sandbox Dashboard Library
//!
//! Core functionality for the sandbox dashboard: configuration, identity
//! resolution, sandbox naming, capability discovery, the sandbox operations
//! themselves, and the HTTP layers that expose them.

pub mod capabilities;
pub mod config;
pub mod constants;
pub mod error;
pub mod identity;
pub mod naming;
pub mod observability;
pub mod sandbox;
pub mod server;
pub mod web;

pub use error::DashboardError;
pub use identity::User;
