//! # Cluster Capabilities
//!
//! Startup discovery of the custom resource kinds registered in the cluster.
//!
//! The capability set is resolved once from the `CustomResourceDefinition`
//! list and passed into the detail view as configuration, so request
//! handling never probes the cluster for resource kinds ad hoc. Auxiliary
//! claim/class kinds the detail view knows how to display are declared in
//! [`AUXILIARY_KINDS`]; only those present in the capability set are queried.

use anyhow::{Context, Result};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::api::ListParams;
use kube::{Api, Client};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Immutable set of `(group, kind)` pairs registered in the cluster.
#[derive(Debug, Clone, Default)]
pub struct ClusterCapabilities {
    kinds: BTreeSet<(String, String)>,
}

impl ClusterCapabilities {
    /// Discover registered custom resource kinds from the cluster.
    pub async fn discover(client: &Client) -> Result<Self> {
        let crds: Api<CustomResourceDefinition> = Api::all(client.clone());
        let list = crds
            .list(&ListParams::default())
            .await
            .context("failed to list CustomResourceDefinitions")?;

        let kinds: BTreeSet<(String, String)> = list
            .items
            .into_iter()
            .map(|crd| (crd.spec.group, crd.spec.names.kind))
            .collect();

        for (group, kind) in &kinds {
            debug!(group = %group, kind = %kind, "discovered custom resource kind");
        }
        info!("discovered {} custom resource kinds", kinds.len());
        Ok(Self { kinds })
    }

    /// Build a capability set from explicit pairs (used by tests and fixtures).
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            kinds: pairs
                .into_iter()
                .map(|(group, kind)| (group.into(), kind.into()))
                .collect(),
        }
    }

    pub fn has(&self, group: &str, kind: &str) -> bool {
        self.kinds
            .contains(&(group.to_string(), kind.to_string()))
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// An auxiliary resource kind the detail view can cross-reference.
///
/// `kind` is namespaced (the claim side); `class_kind`, when present, is the
/// matching cluster-scoped class kind listed alongside.
#[derive(Debug, Clone, Copy)]
pub struct AuxiliaryKind {
    pub group: &'static str,
    pub version: &'static str,
    pub kind: &'static str,
    pub plural: &'static str,
    pub class_kind: Option<&'static str>,
    pub class_plural: Option<&'static str>,
    /// Key the items appear under in the detail view model
    pub key: &'static str,
    /// Key the classes appear under in the detail view model
    pub class_key: Option<&'static str>,
}

/// Auxiliary claim/class kinds known to the detail view.
pub const AUXILIARY_KINDS: &[AuxiliaryKind] = &[
    AuxiliaryKind {
        group: "codemowers.cloud",
        version: "v1beta1",
        kind: "SecretClaim",
        plural: "secretclaims",
        class_kind: None,
        class_plural: None,
        key: "secretclaims",
        class_key: None,
    },
    AuxiliaryKind {
        group: "codemowers.cloud",
        version: "v1beta1",
        kind: "MysqlDatabaseClaim",
        plural: "mysqldatabaseclaims",
        class_kind: Some("MysqlDatabaseClass"),
        class_plural: Some("mysqldatabaseclasses"),
        key: "mysqldatabaseclaims",
        class_key: Some("mysqldatabaseclasses"),
    },
    AuxiliaryKind {
        group: "codemowers.cloud",
        version: "v1beta1",
        kind: "PostgresDatabaseClaim",
        plural: "postgresdatabaseclaims",
        class_kind: Some("PostgresDatabaseClass"),
        class_plural: Some("postgresdatabaseclasses"),
        key: "postgresdatabaseclaims",
        class_key: Some("postgresdatabaseclasses"),
    },
    AuxiliaryKind {
        group: "codemowers.cloud",
        version: "v1beta1",
        kind: "KeydbClaim",
        plural: "keydbclaims",
        class_kind: Some("KeydbClass"),
        class_plural: Some("keydbclasses"),
        key: "keydbclaims",
        class_key: Some("keydbclasses"),
    },
    AuxiliaryKind {
        group: "codemowers.cloud",
        version: "v1beta1",
        kind: "RedisClaim",
        plural: "redisclaims",
        class_kind: Some("RedisClass"),
        class_plural: Some("redisclasses"),
        key: "redisclaims",
        class_key: Some("redisclasses"),
    },
    AuxiliaryKind {
        group: "codemowers.cloud",
        version: "v1beta1",
        kind: "MinioBucketClaim",
        plural: "miniobucketclaims",
        class_kind: Some("MinioBucketClass"),
        class_plural: Some("miniobucketclasses"),
        key: "miniobucketclaims",
        class_key: Some("miniobucketclasses"),
    },
    AuxiliaryKind {
        group: "dragonflydb.io",
        version: "v1alpha1",
        kind: "Dragonfly",
        plural: "dragonflies",
        class_kind: None,
        class_plural: None,
        key: "dragonflies",
        class_key: None,
    },
    AuxiliaryKind {
        group: "postgresql.cnpg.io",
        version: "v1",
        kind: "Cluster",
        plural: "clusters",
        class_kind: None,
        class_plural: None,
        key: "cnpgs",
        class_key: None,
    },
    AuxiliaryKind {
        group: "mongodbcommunity.mongodb.com",
        version: "v1",
        kind: "MongoDBCommunity",
        plural: "mongodbcommunity",
        class_kind: None,
        class_plural: None,
        key: "mongodbs",
        class_key: None,
    },
];
