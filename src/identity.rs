//! # Identity Resolver
//!
//! Maps the inbound identity header to a logical user record backed by the
//! `OidcUser` custom resource.
//!
//! The header name is configurable via `HTTP_REQUEST_HEADER_USERNAME`
//! (default `Remote-Username`) and carries an email address or bare
//! username. The username fragment is the local part filtered to letters;
//! a record is created lazily on first sight. A lookup miss is treated as
//! "create"; any other API failure is fatal to the request.

use axum::http::HeaderMap;
use kube::api::PostParams;
use kube::{Api, Client, CustomResource};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::{DEFAULT_USERNAME_HEADER, USERNAME_HEADER_ENV, USER_NAMESPACE};
use crate::error::{is_not_found, DashboardError};
use crate::naming::sanitize_username;
use crate::observability::metrics;

/// `OidcUser` custom resource, the persisted user record.
///
/// Records are created lazily on first authenticated request and never
/// mutated or deleted by the dashboard.
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "codemowers.cloud",
    version = "v1beta1",
    kind = "OidcUser",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct OidcUserSpec {
    #[serde(default)]
    pub email: Option<String>,
}

/// Resolved caller identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub email: String,
}

/// Resolves the caller identity from request headers.
#[derive(Clone)]
pub struct IdentityResolver {
    client: Client,
    header_name: String,
}

impl IdentityResolver {
    pub fn new(client: Client, header_name: impl Into<String>) -> Self {
        Self {
            client,
            header_name: header_name.into(),
        }
    }

    /// Construct a resolver with the header name from the environment.
    pub fn from_env(client: Client) -> Self {
        let header_name = std::env::var(USERNAME_HEADER_ENV)
            .unwrap_or_else(|_| DEFAULT_USERNAME_HEADER.to_string());
        Self::new(client, header_name)
    }

    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    /// Resolve the caller from request headers, creating the `OidcUser`
    /// record when it does not exist yet.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<User, DashboardError> {
        let raw = headers
            .get(&self.header_name)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty())
            .ok_or(DashboardError::Unauthorized)?;

        let username = sanitize_username(&raw);
        if username.is_empty() {
            return Err(DashboardError::Unauthorized);
        }

        let users: Api<OidcUser> = Api::namespaced(self.client.clone(), USER_NAMESPACE);
        let record = match users.get(&username).await {
            Ok(record) => record,
            Err(err) if is_not_found(&err) => {
                info!(username = %username, "creating user record on first sight");
                let user = OidcUser::new(
                    &username,
                    OidcUserSpec {
                        email: Some(raw.clone()),
                    },
                );
                users.create(&PostParams::default(), &user).await?
            }
            Err(err) => return Err(err.into()),
        };

        metrics::set_user_last_seen(&username);

        let email = record.spec.email.unwrap_or(raw);
        Ok(User {
            name: username,
            email,
        })
    }
}
