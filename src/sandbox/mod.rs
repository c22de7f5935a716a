//! # Sandbox Operations
//!
//! Create, list, inspect, and delete sandboxes. A sandbox is a namespace plus
//! an ArgoCD `Application` descriptor reconciled by the external GitOps
//! controller; the only state transition this service drives is
//! absent -> create -> (provisioning, owned externally) -> delete -> absent.

pub mod application;
pub mod create;
pub mod delete;
pub mod detail;
pub mod list;

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::{ClusterConfig, RegistryConfig};

/// One sandbox as shown in the list view.
#[derive(Debug, Clone, Serialize)]
pub struct SandboxSummary {
    pub name: String,
    pub namespace: String,
    pub owner: String,
    pub hostname_suffix: String,
    pub parameters: BTreeMap<String, String>,
}

/// A rendered cross-reference link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedLink {
    pub name: String,
    pub url: String,
}

/// One pod as shown on the detail view.
#[derive(Debug, Clone, Serialize)]
pub struct PodView {
    pub name: String,
    pub phase: Option<String>,
    pub links: Vec<RenderedLink>,
}

/// Full sandbox detail view-model.
#[derive(Debug, Serialize)]
pub struct SandboxDetail {
    pub name: String,
    pub owner: String,
    pub cluster: ClusterConfig,
    pub registry: RegistryConfig,
    pub hostname_suffix: String,
    pub parameters: BTreeMap<String, String>,
    pub links: Vec<RenderedLink>,
    pub pods: Vec<PodView>,
    pub ingresses: Vec<String>,
    /// Auxiliary claim/class resources, keyed per kind, present only for
    /// kinds registered in the cluster at startup
    pub resources: BTreeMap<String, Vec<serde_json::Value>>,
}
