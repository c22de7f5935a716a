//! # Request Handlers
//!
//! One handler per route. Each resolves the caller identity, performs zero
//! or more Kubernetes API calls through the sandbox modules, and answers
//! with a JSON view-model or a redirect. Failures are propagated, not
//! retried.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Redirect;
use axum::{Form, Json};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::DashboardError;
use crate::observability::metrics;
use crate::sandbox;
use crate::sandbox::{SandboxDetail, SandboxSummary};
use crate::web::forms::{self, FormField};
use crate::web::AppState;

/// `GET /` — the caller's sandboxes.
pub async fn list_sandboxes(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<SandboxSummary>>, DashboardError> {
    let user = state.identity.resolve(&headers).await?;
    metrics::inc_requests("list");
    let sandboxes =
        sandbox::list::list_sandboxes(&state.client, &state.config, Some(&user)).await?;
    Ok(Json(sandboxes))
}

/// `GET /add` — the creation form description.
pub async fn describe_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<FormField>>, DashboardError> {
    state.identity.resolve(&headers).await?;
    metrics::inc_requests("form");
    Ok(Json(forms::form_fields(&state.config)))
}

/// `POST /add` — validate the submission, create the sandbox, redirect to
/// its detail view.
pub async fn create_sandbox(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(submitted): Form<HashMap<String, String>>,
) -> Result<Redirect, DashboardError> {
    let user = state.identity.resolve(&headers).await?;
    metrics::inc_requests("create");
    let parameters = forms::validate(&state.config, &submitted)?;
    let name =
        sandbox::create::create_sandbox(&state.client, &state.config, &user, parameters).await?;
    Ok(Redirect::to(&format!("/sandbox/{name}")))
}

/// `GET /sandbox/{name}` — the detail view.
pub async fn sandbox_detail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<Json<SandboxDetail>, DashboardError> {
    state.identity.resolve(&headers).await?;
    metrics::inc_requests("detail");
    let detail =
        sandbox::detail::sandbox_detail(&state.client, &state.config, &state.capabilities, &name)
            .await?;
    Ok(Json(detail))
}

/// `GET /sandbox/{name}/delete` — delete and redirect to the list.
pub async fn delete_sandbox(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<Redirect, DashboardError> {
    state.identity.resolve(&headers).await?;
    metrics::inc_requests("delete");
    sandbox::delete::delete_sandbox(&state.client, &state.config, &name).await?;
    Ok(Redirect::to("/"))
}
