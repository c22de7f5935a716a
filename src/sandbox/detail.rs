//! # Sandbox Detail View
//!
//! Fetches everything shown for a single sandbox: the Application
//! descriptor's parameter map, the namespace owner, pods and ingresses, and
//! the auxiliary claim/class resources for kinds present in the startup
//! capability set. Cross-reference links are produced by substituting
//! sandbox parameters into the configured URL templates; links gated by a
//! feature flag the sandbox was created without are omitted.

use k8s_openapi::api::core::v1::{Namespace, Pod};
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::{ApiResource, DynamicObject, ListParams};
use kube::{Api, Client};
use std::collections::BTreeMap;

use crate::capabilities::{ClusterCapabilities, AUXILIARY_KINDS};
use crate::config::{DashboardConfig, LinkTemplate};
use crate::constants::{LEGACY_OWNER_LABEL, OWNER_LABEL};
use crate::error::{is_not_found, DashboardError};
use crate::naming;
use crate::sandbox::application::{parameter_bool, parameter_map, Application};
use crate::sandbox::{PodView, RenderedLink, SandboxDetail};

/// Assemble the detail view for one sandbox.
pub async fn sandbox_detail(
    client: &Client,
    config: &DashboardConfig,
    capabilities: &ClusterCapabilities,
    name: &str,
) -> Result<SandboxDetail, DashboardError> {
    let namespaces: Api<Namespace> = Api::all(client.clone());
    let namespace = match namespaces.get(name).await {
        Ok(namespace) => namespace,
        Err(err) if is_not_found(&err) => {
            return Err(DashboardError::NotFound(format!("sandbox {name}")))
        }
        Err(err) => return Err(err.into()),
    };

    // A namespace without an owner label was not provisioned by the dashboard.
    let owner = namespace
        .metadata
        .labels
        .as_ref()
        .and_then(|labels| {
            labels
                .get(OWNER_LABEL)
                .or_else(|| labels.get(LEGACY_OWNER_LABEL))
        })
        .cloned()
        .ok_or_else(|| DashboardError::NotFound(format!("sandbox {name}")))?;

    let parameters = match &config.argo {
        Some(argo) => {
            let applications: Api<Application> = Api::namespaced(client.clone(), &argo.namespace);
            match applications.get(name).await {
                Ok(application) => parameter_map(&application),
                Err(err) if is_not_found(&err) => BTreeMap::new(),
                Err(err) => return Err(err.into()),
            }
        }
        None => BTreeMap::new(),
    };

    let username = parameters
        .get("username")
        .cloned()
        .unwrap_or_else(|| owner.clone());
    let hostname_suffix = naming::hostname_suffix(
        &username,
        parameter_bool(&parameters, "subdomain"),
        &config.domains,
    );

    let mut variables = parameters.clone();
    variables.insert("namespace".to_string(), name.to_string());
    variables.insert("hostname_suffix".to_string(), hostname_suffix.clone());
    variables.insert("registry".to_string(), config.registry.hostname.clone());

    let links = render_links(&config.sandbox_links, &parameters, &variables);

    let pods: Api<Pod> = Api::namespaced(client.clone(), name);
    let pods = pods
        .list(&ListParams::default())
        .await?
        .items
        .into_iter()
        .map(|pod| {
            let pod_name = pod.metadata.name.unwrap_or_default();
            let mut pod_variables = variables.clone();
            pod_variables.insert("pod".to_string(), pod_name.clone());
            PodView {
                links: render_links(&config.pod_links, &parameters, &pod_variables),
                phase: pod.status.and_then(|status| status.phase),
                name: pod_name,
            }
        })
        .collect();

    let ingresses: Api<Ingress> = Api::namespaced(client.clone(), name);
    let ingresses = ingresses
        .list(&ListParams::default())
        .await?
        .items
        .into_iter()
        .filter_map(|ingress| ingress.metadata.name)
        .collect();

    let resources = auxiliary_resources(client, capabilities, name).await?;

    Ok(SandboxDetail {
        name: name.to_string(),
        owner,
        cluster: config.cluster.clone(),
        registry: config.registry.clone(),
        hostname_suffix,
        parameters,
        links,
        pods,
        ingresses,
        resources,
    })
}

/// List the auxiliary claims (namespaced) and classes (cluster-scoped) for
/// every kind present in the capability set.
async fn auxiliary_resources(
    client: &Client,
    capabilities: &ClusterCapabilities,
    namespace: &str,
) -> Result<BTreeMap<String, Vec<serde_json::Value>>, DashboardError> {
    let mut resources = BTreeMap::new();
    for aux in AUXILIARY_KINDS {
        if !capabilities.has(aux.group, aux.kind) {
            continue;
        }

        let claims: Api<DynamicObject> =
            Api::namespaced_with(client.clone(), namespace, &api_resource(aux.group, aux.version, aux.kind, aux.plural));
        resources.insert(aux.key.to_string(), to_values(claims.list(&ListParams::default()).await?.items)?);

        if let (Some(class_kind), Some(class_plural), Some(class_key)) =
            (aux.class_kind, aux.class_plural, aux.class_key)
        {
            if capabilities.has(aux.group, class_kind) {
                let classes: Api<DynamicObject> = Api::all_with(
                    client.clone(),
                    &api_resource(aux.group, aux.version, class_kind, class_plural),
                );
                resources.insert(
                    class_key.to_string(),
                    to_values(classes.list(&ListParams::default()).await?.items)?,
                );
            }
        }
    }
    Ok(resources)
}

fn api_resource(group: &str, version: &str, kind: &str, plural: &str) -> ApiResource {
    ApiResource {
        group: group.to_string(),
        version: version.to_string(),
        api_version: format!("{group}/{version}"),
        kind: kind.to_string(),
        plural: plural.to_string(),
    }
}

fn to_values(items: Vec<DynamicObject>) -> Result<Vec<serde_json::Value>, DashboardError> {
    items
        .into_iter()
        .map(|item| serde_json::to_value(item).map_err(DashboardError::from))
        .collect()
}

/// Render link templates against the sandbox, omitting links whose gating
/// feature the sandbox was created without.
pub fn render_links(
    templates: &[LinkTemplate],
    parameters: &BTreeMap<String, String>,
    variables: &BTreeMap<String, String>,
) -> Vec<RenderedLink> {
    templates
        .iter()
        .filter(|template| {
            template
                .feature
                .as_deref()
                .is_none_or(|feature| parameter_bool(parameters, feature))
        })
        .map(|template| RenderedLink {
            name: template.name.clone(),
            url: render_template(&template.url, variables),
        })
        .collect()
}

/// Substitute `{placeholder}` occurrences from the variable map.
///
/// Unknown placeholders are left untouched so a misconfigured template is
/// visible in the rendered output instead of failing the request.
pub fn render_template(template: &str, variables: &BTreeMap<String, String>) -> String {
    let mut rendered = template.to_string();
    for (key, value) in variables {
        rendered = rendered.replace(&format!("{{{key}}}"), value);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variables(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn template_substitution() {
        let variables = variables(&[
            ("namespace", "sb-alice-abcde"),
            ("hostname_suffix", ".alice.codemowers.cloud"),
        ]);
        assert_eq!(
            render_template("https://grafana{hostname_suffix}/d/{namespace}", &variables),
            "https://grafana.alice.codemowers.cloud/d/sb-alice-abcde"
        );
    }

    #[test]
    fn unknown_placeholders_are_left_in_place() {
        let variables = variables(&[("namespace", "sb-alice-abcde")]);
        assert_eq!(
            render_template("https://{unknown}/x", &variables),
            "https://{unknown}/x"
        );
    }

    #[test]
    fn links_gated_by_disabled_feature_are_omitted() {
        let templates = vec![
            LinkTemplate {
                name: "Grafana".into(),
                url: "https://grafana{hostname_suffix}".into(),
                feature: Some("prometheus".into()),
            },
            LinkTemplate {
                name: "Registry".into(),
                url: "https://{registry}".into(),
                feature: None,
            },
        ];
        let parameters = variables(&[("prometheus", "false")]);
        let vars = variables(&[
            ("hostname_suffix", "-alice.codemowers.ee"),
            ("registry", "registry.example.com"),
        ]);

        let links = render_links(&templates, &parameters, &vars);
        assert_eq!(
            links,
            vec![RenderedLink {
                name: "Registry".into(),
                url: "https://registry.example.com".into(),
            }]
        );
    }

    #[test]
    fn links_gated_by_absent_feature_are_omitted() {
        let templates = vec![LinkTemplate {
            name: "Grafana".into(),
            url: "https://grafana{hostname_suffix}".into(),
            feature: Some("prometheus".into()),
        }];
        let links = render_links(&templates, &BTreeMap::new(), &BTreeMap::new());
        assert!(links.is_empty());
    }

    #[test]
    fn links_gated_by_enabled_feature_are_rendered() {
        let templates = vec![LinkTemplate {
            name: "Grafana".into(),
            url: "https://grafana{hostname_suffix}".into(),
            feature: Some("prometheus".into()),
        }];
        let parameters = variables(&[("prometheus", "true")]);
        let vars = variables(&[("hostname_suffix", ".alice.codemowers.cloud")]);
        let links = render_links(&templates, &parameters, &vars);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://grafana.alice.codemowers.cloud");
    }
}
