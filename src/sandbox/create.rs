//! # Sandbox Creator
//!
//! Builds the ArgoCD `Application` descriptor and the sandbox namespace.
//!
//! Creation is a two-step sequence: the descriptor first, then the
//! namespace. When namespace creation fails after the descriptor was
//! accepted, the descriptor is deleted best-effort so no orphan is left
//! behind; a rollback failure is logged and the original error surfaced.

use k8s_openapi::api::core::v1::Namespace;
use kube::api::{DeleteParams, ObjectMeta, PostParams};
use kube::{Api, Client};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::config::{ArgoConfig, DashboardConfig};
use crate::constants::{
    ENV_LABEL, ENV_LABEL_VALUE, IN_CLUSTER_API_SERVER, MANAGED_BY, MANAGED_BY_ANNOTATION,
    OWNER_LABEL,
};
use crate::error::DashboardError;
use crate::identity::User;
use crate::naming;
use crate::sandbox::application::{
    Application, ApplicationDestination, ApplicationSource, ApplicationSpec, AutomatedSync,
    HelmParameter, HelmSource, SyncPolicy,
};

/// Create a sandbox for a user from validated form parameters.
///
/// Returns the generated sandbox name, used by the handler to redirect to
/// the detail view.
pub async fn create_sandbox(
    client: &Client,
    config: &DashboardConfig,
    user: &User,
    parameters: Vec<HelmParameter>,
) -> Result<String, DashboardError> {
    let name = naming::sandbox_name(&user.name);
    let parameters = with_identity(parameters, user);
    let labels = sandbox_labels(&user.name);

    match &config.argo {
        Some(argo) => {
            let descriptor = build_application(argo, &name, labels.clone(), parameters);
            let applications: Api<Application> = Api::namespaced(client.clone(), &argo.namespace);
            applications
                .create(&PostParams::default(), &descriptor)
                .await?;

            if let Err(err) = create_namespace(client, &name, labels).await {
                // Roll the descriptor back so no orphan Application remains.
                if let Err(rollback) = applications.delete(&name, &DeleteParams::default()).await {
                    warn!(sandbox = %name, error = %rollback,
                        "failed to roll back application descriptor");
                }
                return Err(err);
            }
        }
        None => create_namespace(client, &name, labels).await?,
    }

    info!(sandbox = %name, owner = %user.name, "created sandbox");
    Ok(name)
}

/// Append the synthesized `username` and `email` parameters.
pub fn with_identity(mut parameters: Vec<HelmParameter>, user: &User) -> Vec<HelmParameter> {
    parameters.push(HelmParameter::new("username", user.name.clone()));
    parameters.push(HelmParameter::new("email", user.email.clone()));
    parameters
}

/// Ownership labels applied to the namespace and the descriptor.
pub fn sandbox_labels(username: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (OWNER_LABEL.to_string(), username.to_string()),
        (ENV_LABEL.to_string(), ENV_LABEL_VALUE.to_string()),
    ])
}

/// Compose the Application descriptor for a sandbox.
pub fn build_application(
    argo: &ArgoConfig,
    name: &str,
    labels: BTreeMap<String, String>,
    parameters: Vec<HelmParameter>,
) -> Application {
    let mut application = Application::new(
        name,
        ApplicationSpec {
            project: argo.project.clone(),
            source: ApplicationSource {
                repo_url: argo.url.clone(),
                path: "./".to_string(),
                target_revision: "HEAD".to_string(),
                helm: Some(HelmSource {
                    release_name: name.to_string(),
                    parameters,
                }),
            },
            destination: ApplicationDestination {
                server: IN_CLUSTER_API_SERVER.to_string(),
                namespace: name.to_string(),
            },
            sync_policy: Some(SyncPolicy {
                automated: Some(AutomatedSync { prune: true }),
                sync_options: vec!["CreateNamespace=true".to_string()],
            }),
        },
    );
    application.metadata.labels = Some(labels);
    application.metadata.annotations = Some(BTreeMap::from([(
        MANAGED_BY_ANNOTATION.to_string(),
        MANAGED_BY.to_string(),
    )]));
    application
}

async fn create_namespace(
    client: &Client,
    name: &str,
    labels: BTreeMap<String, String>,
) -> Result<(), DashboardError> {
    let namespaces: Api<Namespace> = Api::all(client.clone());
    let namespace = Namespace {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        ..Default::default()
    };
    namespaces
        .create(&PostParams::default(), &namespace)
        .await?;
    Ok(())
}
