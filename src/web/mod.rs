//! # Dashboard HTTP Interface
//!
//! Routing and request handling for the dashboard. The caller identity is
//! resolved from request headers in every handler; there is no cross-request
//! session state. Responses are JSON view-models and redirects (HTML
//! rendering happens in an external frontend).

pub mod forms;
pub mod handlers;

use axum::routing::get;
use axum::Router;
use kube::Client;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::capabilities::ClusterCapabilities;
use crate::config::DashboardConfig;
use crate::identity::IdentityResolver;

/// Shared, immutable per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub client: Client,
    pub capabilities: Arc<ClusterCapabilities>,
    pub identity: IdentityResolver,
}

/// Build the dashboard router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_sandboxes))
        .route(
            "/add",
            get(handlers::describe_form).post(handlers::create_sandbox),
        )
        .route("/sandbox/{name}", get(handlers::sandbox_detail))
        .route("/sandbox/{name}/delete", get(handlers::delete_sandbox))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
