//! # Application Descriptor
//!
//! Typed view of the ArgoCD `Application` custom resource, restricted to the
//! fields the dashboard reads and writes. The descriptor instructs the
//! external GitOps controller what to deploy and where; this service never
//! observes or waits on the reconciliation it triggers.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ArgoCD `Application` spec.
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "argoproj.io",
    version = "v1alpha1",
    kind = "Application",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSpec {
    pub project: String,
    pub source: ApplicationSource,
    pub destination: ApplicationDestination,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_policy: Option<SyncPolicy>,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSource {
    /// Template repository the sandbox is instantiated from
    #[serde(rename = "repoURL")]
    pub repo_url: String,
    pub path: String,
    pub target_revision: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helm: Option<HelmSource>,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HelmSource {
    pub release_name: String,
    #[serde(default)]
    pub parameters: Vec<HelmParameter>,
}

/// A single helm-style `{name, value}` parameter pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct HelmParameter {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl HelmParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDestination {
    pub server: String,
    pub namespace: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automated: Option<AutomatedSync>,
    #[serde(default)]
    pub sync_options: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutomatedSync {
    #[serde(default)]
    pub prune: bool,
}

/// Reconstruct the sandbox parameter map from a descriptor's helm parameters.
///
/// Later occurrences of a name win, matching how the list was built.
pub fn parameter_map(application: &Application) -> BTreeMap<String, String> {
    application
        .spec
        .source
        .helm
        .as_ref()
        .map(|helm| {
            helm.parameters
                .iter()
                .map(|parameter| (parameter.name.clone(), parameter.value.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// Parse a boolean-valued sandbox parameter; absent or unparsable is false.
pub fn parameter_bool(parameters: &BTreeMap<String, String>, name: &str) -> bool {
    parameters
        .get(name)
        .is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_application(parameters: Vec<HelmParameter>) -> Application {
        Application::new(
            "sb-alice-abcde",
            ApplicationSpec {
                project: "default".into(),
                source: ApplicationSource {
                    repo_url: "git@git.example.com:lab-template".into(),
                    path: "./".into(),
                    target_revision: "HEAD".into(),
                    helm: Some(HelmSource {
                        release_name: "sb-alice-abcde".into(),
                        parameters,
                    }),
                },
                destination: ApplicationDestination {
                    server: "https://kubernetes.default.svc".into(),
                    namespace: "sb-alice-abcde".into(),
                },
                sync_policy: None,
            },
        )
    }

    #[test]
    fn parameter_map_round_trips_pairs() {
        let application = sample_application(vec![
            HelmParameter::new("prometheus", "true"),
            HelmParameter::new("username", "alice"),
        ]);
        let map = parameter_map(&application);
        assert_eq!(map.get("prometheus").map(String::as_str), Some("true"));
        assert_eq!(map.get("username").map(String::as_str), Some("alice"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn parameter_map_empty_without_helm_source() {
        let mut application = sample_application(Vec::new());
        application.spec.source.helm = None;
        assert!(parameter_map(&application).is_empty());
    }

    #[test]
    fn parameter_bool_parsing() {
        let application = sample_application(vec![
            HelmParameter::new("subdomain", "True"),
            HelmParameter::new("prometheus", "false"),
            HelmParameter::new("odd", "yes"),
        ]);
        let map = parameter_map(&application);
        assert!(parameter_bool(&map, "subdomain"));
        assert!(!parameter_bool(&map, "prometheus"));
        assert!(!parameter_bool(&map, "odd"));
        assert!(!parameter_bool(&map, "absent"));
    }

    #[test]
    fn descriptor_serializes_argo_field_names() {
        let application = sample_application(vec![HelmParameter::new("username", "alice")]);
        let value = serde_json::to_value(&application).unwrap();
        assert_eq!(value["apiVersion"], "argoproj.io/v1alpha1");
        assert_eq!(value["kind"], "Application");
        assert!(value["spec"]["source"]["repoURL"].is_string());
        assert!(value["spec"]["source"]["targetRevision"].is_string());
        assert!(value["spec"]["source"]["helm"]["releaseName"].is_string());
    }
}
