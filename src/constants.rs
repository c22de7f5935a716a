//! # Constants
//!
//! Shared constants used throughout the dashboard.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration or environment variables where applicable.

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 5000;

/// Environment variable overriding the metrics port
pub const METRICS_PORT_ENV: &str = "METRICS_PORT";

/// Default dashboard listen address
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3001";

/// Environment variable naming the request header that carries the caller identity
pub const USERNAME_HEADER_ENV: &str = "HTTP_REQUEST_HEADER_USERNAME";

/// Default request header carrying the caller identity
pub const DEFAULT_USERNAME_HEADER: &str = "Remote-Username";

/// Alphabet for sandbox name suffixes.
/// Visually ambiguous characters (`l`, `o`, `0`, `1`) are excluded.
pub const SUFFIX_ALPHABET: &str = "abcdefghijkmnpqrstuvwxyz23456789";

/// Length of the random sandbox name suffix.
/// 32 characters at length 5 gives roughly 2^25 combinations; no collision
/// detection is performed at creation time.
pub const SUFFIX_LENGTH: usize = 5;

/// Prefix for all sandbox names and namespaces
pub const SANDBOX_NAME_PREFIX: &str = "sb";

/// Namespace label identifying the sandbox owner
pub const OWNER_LABEL: &str = "codemowers.cloud/sandbox-owner";

/// Legacy owner label still honored when reading namespaces
pub const LEGACY_OWNER_LABEL: &str = "owner";

/// Environment label applied to sandbox namespaces and descriptors
pub const ENV_LABEL: &str = "env";

/// Value of the environment label for sandboxes
pub const ENV_LABEL_VALUE: &str = "sandbox";

/// Annotation key marking resources managed by this dashboard
pub const MANAGED_BY_ANNOTATION: &str = "app.kubernetes.io/managed-by";

/// Annotation value marking resources managed by this dashboard
pub const MANAGED_BY: &str = "sandbox-dashboard";

/// Namespace where `OidcUser` records live
pub const USER_NAMESPACE: &str = "default";

/// Cluster API endpoint as seen from inside the cluster, used as the
/// ArgoCD Application destination server
pub const IN_CLUSTER_API_SERVER: &str = "https://kubernetes.default.svc";
