//! # Sandbox Deleter
//!
//! Deletes the Application descriptor and then the namespace. Ordering is
//! best-effort only; a partial failure (descriptor gone, namespace left) is
//! surfaced to the caller and reconciled externally. Deleting a sandbox
//! that never existed reports not-found rather than silently succeeding.

use k8s_openapi::api::core::v1::Namespace;
use kube::api::DeleteParams;
use kube::{Api, Client};
use tracing::info;

use crate::config::DashboardConfig;
use crate::constants::SANDBOX_NAME_PREFIX;
use crate::error::{is_not_found, DashboardError};
use crate::sandbox::application::Application;

/// Only namespaces provisioned by the dashboard carry the `sb-` prefix;
/// anything else is treated as nonexistent so the delete endpoint cannot
/// touch foreign namespaces.
pub fn is_sandbox_name(name: &str) -> bool {
    name.strip_prefix(SANDBOX_NAME_PREFIX)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|rest| !rest.is_empty())
}

/// Delete a sandbox by name.
pub async fn delete_sandbox(
    client: &Client,
    config: &DashboardConfig,
    name: &str,
) -> Result<(), DashboardError> {
    if !is_sandbox_name(name) {
        return Err(DashboardError::NotFound(format!("sandbox {name}")));
    }

    let mut deleted_any = false;

    if let Some(argo) = &config.argo {
        let applications: Api<Application> = Api::namespaced(client.clone(), &argo.namespace);
        match applications.delete(name, &DeleteParams::default()).await {
            Ok(_) => deleted_any = true,
            Err(err) if is_not_found(&err) => {}
            Err(err) => return Err(err.into()),
        }
    }

    let namespaces: Api<Namespace> = Api::all(client.clone());
    match namespaces.delete(name, &DeleteParams::default()).await {
        Ok(_) => deleted_any = true,
        Err(err) if is_not_found(&err) => {}
        Err(err) => return Err(err.into()),
    }

    if !deleted_any {
        return Err(DashboardError::NotFound(format!("sandbox {name}")));
    }

    info!(sandbox = %name, "deleted sandbox");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, Response, StatusCode};
    use kube::client::Body;
    use std::convert::Infallible;

    const NOT_FOUND_STATUS: &str = r#"{"kind":"Status","apiVersion":"v1","metadata":{},"status":"Failure","message":"not found","reason":"NotFound","code":404}"#;
    const SUCCESS_STATUS: &str =
        r#"{"kind":"Status","apiVersion":"v1","metadata":{},"status":"Success"}"#;

    fn config() -> DashboardConfig {
        DashboardConfig::parse(
            r"
cluster:
  name: playground
  server: https://kube.example.com:6443
  oidc-issuer-url: https://auth.example.com
registry:
  hostname: registry.example.com
argo:
  url: git@git.example.com:lab-template
",
        )
        .unwrap()
    }

    /// A client whose every API call is answered with a canned response.
    fn client_answering(status: StatusCode, body: &'static str) -> Client {
        let service = tower::service_fn(move |_request: Request<Body>| async move {
            let response = Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.as_bytes().to_vec()))
                .unwrap();
            Ok::<_, Infallible>(response)
        });
        Client::new(service, "default")
    }

    #[test]
    fn only_prefixed_names_are_sandboxes() {
        assert!(is_sandbox_name("sb-alice-abcde"));
        assert!(!is_sandbox_name("kube-system"));
        assert!(!is_sandbox_name("sb-"));
        assert!(!is_sandbox_name("sb"));
        assert!(!is_sandbox_name("sandbox-alice"));
    }

    #[tokio::test]
    async fn deleting_never_created_sandbox_yields_not_found() {
        let client = client_answering(StatusCode::NOT_FOUND, NOT_FOUND_STATUS);
        let err = delete_sandbox(&client, &config(), "sb-alice-abcde")
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::NotFound(_)));
    }

    #[tokio::test]
    async fn non_sandbox_names_are_rejected_before_any_api_call() {
        // The API would report success for this name; the prefix guard
        // rejects it first.
        let client = client_answering(StatusCode::OK, SUCCESS_STATUS);
        let err = delete_sandbox(&client, &config(), "kube-system")
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::NotFound(_)));
    }

    #[tokio::test]
    async fn deletion_succeeds_when_resources_existed() {
        let client = client_answering(StatusCode::OK, SUCCESS_STATUS);
        delete_sandbox(&client, &config(), "sb-alice-abcde")
            .await
            .unwrap();
    }
}
