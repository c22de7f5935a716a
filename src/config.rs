//! # Configuration
//!
//! YAML configuration for the dashboard, loaded once at startup and immutable
//! thereafter.
//!
//! The file describes the cluster the dashboard fronts, the container
//! registry, the GitOps template repository, the feature flags offered on the
//! sandbox creation form, and the link templates rendered on sandbox and pod
//! detail views.
//!
//! # Example
//!
//! ```yaml
//! cluster:
//!   name: playground
//!   server: https://kube.example.com:6443
//!   oidc-issuer-url: https://auth.example.com
//! registry:
//!   hostname: registry.example.com
//! argo:
//!   url: git@git.example.com:lab-template
//!   project: default
//!   namespace: argocd
//! features:
//!   - name: prometheus
//!     description: Instantiate Prometheus for this namespace
//!     default: false
//!   - name: subdomain
//!     description: Create dedicated subdomain for this sandbox
//!     default: false
//! sandboxLinks:
//!   - name: Grafana
//!     url: https://grafana{hostname_suffix}
//!     feature: prometheus
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Top-level dashboard configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    /// Cluster the dashboard provisions sandboxes on
    pub cluster: ClusterConfig,
    /// Container registry advertised to sandbox users
    pub registry: RegistryConfig,
    /// GitOps settings. When absent only the namespace is created and no
    /// Application descriptor is submitted.
    #[serde(default)]
    pub argo: Option<ArgoConfig>,
    /// Base domains used for hostname suffix derivation
    #[serde(default)]
    pub domains: DomainConfig,
    /// Ordered feature flag definitions exposed on the creation form
    #[serde(default)]
    pub features: Vec<FeatureFlag>,
    /// Link templates rendered on the sandbox detail view
    #[serde(default, rename = "sandboxLinks")]
    pub sandbox_links: Vec<LinkTemplate>,
    /// Link templates rendered per pod on the detail view
    #[serde(default, rename = "podLinks")]
    pub pod_links: Vec<LinkTemplate>,
}

/// Cluster identity and endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClusterConfig {
    pub name: String,
    /// Kubernetes API endpoint shown to users for kubeconfig setup
    pub server: String,
    #[serde(rename = "oidc-issuer-url")]
    pub oidc_issuer_url: String,
}

/// Container registry settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    pub hostname: String,
}

/// ArgoCD settings for the sandbox template repository
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArgoConfig {
    /// Template repository every sandbox Application points at
    pub url: String,
    /// ArgoCD project the Applications are created under
    #[serde(default = "default_argo_project")]
    pub project: String,
    /// Namespace the Application descriptors are created in
    #[serde(default = "default_argo_namespace")]
    pub namespace: String,
}

fn default_argo_project() -> String {
    "default".to_string()
}

fn default_argo_namespace() -> String {
    "argocd".to_string()
}

/// Base domains for sandbox hostname suffixes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DomainConfig {
    /// Base domain for sandboxes with a dedicated subdomain
    #[serde(default = "default_subdomain_base")]
    pub subdomain_base: String,
    /// Base domain for sandboxes without a dedicated subdomain
    #[serde(default = "default_path_base")]
    pub path_base: String,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            subdomain_base: default_subdomain_base(),
            path_base: default_path_base(),
        }
    }
}

fn default_subdomain_base() -> String {
    "codemowers.cloud".to_string()
}

fn default_path_base() -> String {
    "codemowers.ee".to_string()
}

/// A feature flag offered as a boolean form field at sandbox creation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeatureFlag {
    pub name: String,
    pub description: String,
    pub default: bool,
    /// Disabled flags are suppressed from the form entirely
    #[serde(default)]
    pub disabled: bool,
}

/// A URL template rendered as a cross-reference link on detail views.
///
/// Placeholders of the form `{parameter}` are substituted from the sandbox
/// parameter map plus the synthesized `namespace` and `hostname_suffix`
/// variables. A link gated by `feature` is omitted when the sandbox was
/// created with that flag off.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkTemplate {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub feature: Option<String>,
}

impl DashboardConfig {
    /// Load and validate configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(raw: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(raw).context("failed to parse YAML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.cluster.name.is_empty() {
            bail!("cluster.name must not be empty");
        }
        if self.cluster.server.is_empty() {
            bail!("cluster.server must not be empty");
        }
        if self.cluster.oidc_issuer_url.is_empty() {
            bail!("cluster.oidc-issuer-url must not be empty");
        }
        if self.registry.hostname.is_empty() {
            bail!("registry.hostname must not be empty");
        }
        let mut seen = HashSet::new();
        for flag in &self.features {
            if flag.name.is_empty() {
                bail!("feature flag with empty name");
            }
            if !seen.insert(flag.name.as_str()) {
                bail!("duplicate feature flag {:?}", flag.name);
            }
        }
        for link in self.sandbox_links.iter().chain(self.pod_links.iter()) {
            if link.url.is_empty() {
                bail!("link {:?} has an empty url template", link.name);
            }
        }
        Ok(())
    }

    /// Feature flags offered on the creation form, in configuration order.
    pub fn enabled_features(&self) -> impl Iterator<Item = &FeatureFlag> {
        self.features.iter().filter(|flag| !flag.disabled)
    }
}
