//! # Sandbox Dashboard
//!
//! A web service that lets authenticated users self-provision sandbox
//! environments on a Kubernetes cluster.
//!
//! ## Overview
//!
//! A sandbox is a namespace plus an ArgoCD `Application` custom resource
//! reconciled by the external GitOps controller, parameterized by a set of
//! user-chosen feature flags:
//!
//! 1. **Identity resolution** - The caller is identified from a request
//!    header and backed by an `OidcUser` record, created lazily on first sight
//! 2. **Creation** - A form submission becomes an Application descriptor
//!    plus a labeled namespace; the descriptor is rolled back when namespace
//!    creation fails
//! 3. **Listing** - Descriptors are filtered by ownership and rendered as
//!    view-models with derived hostname suffixes
//! 4. **Detail** - Pods, ingresses, and auxiliary claim/class resources are
//!    cross-referenced for kinds discovered in the cluster at startup
//! 5. **Deletion** - Best-effort removal of the descriptor and the namespace
//!
//! Prometheus metrics and probes are served on a separate port.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use sandbox_dashboard::capabilities::ClusterCapabilities;
use sandbox_dashboard::config::DashboardConfig;
use sandbox_dashboard::constants::{DEFAULT_LISTEN_ADDR, DEFAULT_METRICS_PORT, METRICS_PORT_ENV};
use sandbox_dashboard::identity::IdentityResolver;
use sandbox_dashboard::observability::metrics;
use sandbox_dashboard::server::{start_server, ServerState};
use sandbox_dashboard::web::{self, AppState};

/// Run the Kubernetes cluster sandbox dashboard
#[derive(Parser)]
#[command(name = "sandbox-dashboard", about = "Kubernetes cluster sandbox dashboard")]
struct Cli {
    /// Path to the dashboard configuration file
    #[arg(long, default_value = "/config/playground.yaml")]
    config: PathBuf,

    /// Dashboard listen address
    #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
    listen: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sandbox_dashboard=info".into()),
        )
        .init();

    let cli = Cli::parse();

    info!("Starting sandbox dashboard");

    let config = Arc::new(DashboardConfig::load(&cli.config)?);
    info!(
        cluster = %config.cluster.name,
        features = config.features.len(),
        "loaded configuration"
    );

    metrics::register_metrics()?;

    let client = kube::Client::try_default()
        .await
        .context("failed to create Kubernetes client")?;

    // Resolved once; the detail view never probes for resource kinds ad hoc.
    let capabilities = Arc::new(
        ClusterCapabilities::discover(&client)
            .await
            .context("failed to discover cluster capabilities")?,
    );

    let server_state = Arc::new(ServerState::new());
    let metrics_port = std::env::var(METRICS_PORT_ENV)
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_METRICS_PORT);

    let probe_state = Arc::clone(&server_state);
    tokio::spawn(async move {
        if let Err(err) = start_server(metrics_port, probe_state).await {
            error!("metrics server error: {err}");
        }
    });

    let state = Arc::new(AppState {
        identity: IdentityResolver::from_env(client.clone()),
        config,
        client,
        capabilities,
    });

    server_state.mark_ready();

    let listener = TcpListener::bind(&cli.listen)
        .await
        .with_context(|| format!("failed to bind {}", cli.listen))?;
    info!("dashboard listening on {}", cli.listen);

    axum::serve(listener, web::router(state)).await?;

    Ok(())
}
