//! # Sandbox Lister
//!
//! Lists existing sandboxes for the caller by reading the Application
//! descriptors, reconstructing each parameter map, and filtering by
//! ownership. Descriptors already marked for deletion are skipped. Without
//! a GitOps configuration the lister falls back to the labeled sandbox
//! namespaces (parameter maps are empty in that mode).

use k8s_openapi::api::core::v1::Namespace;
use kube::api::ListParams;
use kube::{Api, Client};
use std::collections::BTreeMap;

use crate::config::{DashboardConfig, DomainConfig};
use crate::constants::{ENV_LABEL, ENV_LABEL_VALUE, LEGACY_OWNER_LABEL, OWNER_LABEL};
use crate::error::DashboardError;
use crate::identity::User;
use crate::naming;
use crate::sandbox::application::{parameter_bool, parameter_map, Application};
use crate::sandbox::SandboxSummary;

/// List the caller's sandboxes, ordered as returned by the cluster.
///
/// Without a caller identity (metrics, tooling) all sandboxes are returned.
pub async fn list_sandboxes(
    client: &Client,
    config: &DashboardConfig,
    caller: Option<&User>,
) -> Result<Vec<SandboxSummary>, DashboardError> {
    let summaries = match &config.argo {
        Some(argo) => {
            let applications: Api<Application> = Api::namespaced(client.clone(), &argo.namespace);
            let selector = ListParams::default().labels(&format!("{ENV_LABEL}={ENV_LABEL_VALUE}"));
            applications
                .list(&selector)
                .await?
                .items
                .iter()
                .filter_map(|application| summarize(application, &config.domains))
                .collect::<Vec<_>>()
        }
        None => {
            let namespaces: Api<Namespace> = Api::all(client.clone());
            let selector = ListParams::default().labels(&format!("{ENV_LABEL}={ENV_LABEL_VALUE}"));
            namespaces
                .list(&selector)
                .await?
                .items
                .iter()
                .filter_map(summarize_namespace)
                .collect::<Vec<_>>()
        }
    };

    Ok(summaries
        .into_iter()
        .filter(|summary| caller.is_none_or(|user| owned_by(summary, user)))
        .collect())
}

/// Build a list entry from an Application descriptor.
///
/// Returns `None` for descriptors already marked for deletion or created
/// outside the dashboard (no owner identity at all).
pub fn summarize(application: &Application, domains: &DomainConfig) -> Option<SandboxSummary> {
    if application.metadata.deletion_timestamp.is_some() {
        return None;
    }
    let name = application.metadata.name.clone()?;
    let parameters = parameter_map(application);
    let owner = owner_of(&parameters, application.metadata.labels.as_ref())?;
    let username = parameters
        .get("username")
        .cloned()
        .unwrap_or_else(|| owner.clone());
    let subdomain = parameter_bool(&parameters, "subdomain");
    Some(SandboxSummary {
        namespace: application.spec.destination.namespace.clone(),
        hostname_suffix: naming::hostname_suffix(&username, subdomain, domains),
        name,
        owner,
        parameters,
    })
}

fn summarize_namespace(namespace: &Namespace) -> Option<SandboxSummary> {
    if namespace.metadata.deletion_timestamp.is_some() {
        return None;
    }
    let name = namespace.metadata.name.clone()?;
    let labels = namespace.metadata.labels.as_ref()?;
    let owner = labels
        .get(OWNER_LABEL)
        .or_else(|| labels.get(LEGACY_OWNER_LABEL))?
        .clone();
    Some(SandboxSummary {
        namespace: name.clone(),
        hostname_suffix: String::new(),
        name,
        owner,
        parameters: BTreeMap::new(),
    })
}

/// Ownership check: the `email` parameter matches the caller's email, or the
/// recorded owner matches the caller's username.
pub fn owned_by(summary: &SandboxSummary, user: &User) -> bool {
    summary
        .parameters
        .get("email")
        .is_some_and(|email| *email == user.email)
        || summary.owner == user.name
}

fn owner_of(
    parameters: &BTreeMap<String, String>,
    labels: Option<&BTreeMap<String, String>>,
) -> Option<String> {
    parameters
        .get("email")
        .cloned()
        .or_else(|| labels.and_then(|labels| labels.get(OWNER_LABEL).cloned()))
}
