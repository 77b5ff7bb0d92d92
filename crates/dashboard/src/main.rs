//! ECS cluster dashboard
//!
//! Read-only monitoring dashboard backend: polls the ECS control plane on
//! page load and serves the aggregated cluster -> zone -> service hierarchy.

use anyhow::Result;
use dashboard_lib::{ClusterReader, DashboardMetrics, EcsClient};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod auth;
mod config;
mod credentials;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting ecs-dashboard");

    // Load configuration and optional static credentials
    let config = config::DashboardConfig::load()?;
    info!(region = %config.region, port = config.port, "Dashboard configured");

    let static_credentials = credentials::load_credentials(Path::new(&config.credentials_path));

    // One shared control-plane handle for all requests
    let ecs = EcsClient::new(config.region.clone(), static_credentials).await;
    let reader = ClusterReader::new(Arc::new(ecs));
    let metrics = DashboardMetrics::new();

    let state = Arc::new(api::AppState::new(reader, metrics, config.request_timeout()));

    let page_auth = config.enable_basic_auth.then(|| {
        Arc::new(auth::BasicAuth::new(
            config.basic_auth_user.clone(),
            config.basic_auth_password.clone(),
        ))
    });

    // Start the dashboard server
    let server = tokio::spawn(api::serve(config.port, state, page_auth));

    // Run until the server fails (e.g. the port is taken) or a shutdown
    // signal arrives
    tokio::select! {
        result = server => {
            result??;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    Ok(())
}
