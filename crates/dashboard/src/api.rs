//! HTTP surface of the dashboard
//!
//! Two page routes (cluster list and cluster detail) plus the usual
//! health/metrics endpoints. Page handlers never fail the response: a failed
//! or timed-out aggregation run renders as the degraded page model with the
//! error message attached.

use crate::auth::{require_basic_auth, BasicAuth};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use dashboard_lib::{
    ClusterError, ClusterListPage, ClusterPage, ClusterReader, DashboardMetrics,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Shared application state
pub struct AppState {
    reader: ClusterReader,
    metrics: DashboardMetrics,
    request_timeout: Duration,
    /// Time of the last aggregation run that succeeded, any cluster
    last_update: RwLock<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(reader: ClusterReader, metrics: DashboardMetrics, request_timeout: Duration) -> Self {
        Self {
            reader,
            metrics,
            request_timeout,
            last_update: RwLock::new(None),
        }
    }

    /// Run one fetch bounded by the request timeout, recording metrics and
    /// the last-update marker
    ///
    /// A run that outlives the timeout is abandoned; its result is never
    /// delivered to the page.
    async fn run<T, F>(&self, fut: F) -> Result<T, ClusterError>
    where
        F: Future<Output = Result<T, ClusterError>>,
    {
        let started = Instant::now();
        let result = match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(ClusterError::Fetch(anyhow::anyhow!(
                "request timed out after {}s",
                self.request_timeout.as_secs()
            ))),
        };

        let elapsed = started.elapsed().as_secs_f64();
        self.metrics.observe_fetch_latency(elapsed);

        match &result {
            Ok(_) => {
                let now = Utc::now();
                *self.last_update.write().await = Some(now);
                self.metrics.set_last_fetch_timestamp(now.timestamp());
                info!(elapsed_secs = elapsed, "fetch complete");
            }
            Err(err) if err.is_empty_result() => {
                self.metrics.record_empty_result();
                info!(elapsed_secs = elapsed, reason = %err, "fetch found an idle cluster");
            }
            Err(err) => {
                self.metrics.record_fetch_error();
                warn!(elapsed_secs = elapsed, error = %err, "fetch failed");
            }
        }

        result
    }

    async fn last_update(&self) -> Option<DateTime<Utc>> {
        *self.last_update.read().await
    }
}

/// Cluster selection page
async fn cluster_options(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let result = state.run(state.reader.get_available_clusters()).await;
    Json(ClusterListPage::from_result(result, state.last_update().await))
}

/// Cluster detail page
async fn cluster_overview(
    State(state): State<Arc<AppState>>,
    Path(cluster_name): Path<String>,
) -> impl IntoResponse {
    let result = state.run(state.reader.get_cluster_info(&cluster_name)).await;
    Json(ClusterPage::from_result(result, state.last_update().await))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_update: Option<DateTime<Utc>>,
}

/// Liveness check with the last-successful-fetch marker
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        last_update: state.last_update().await,
    })
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the dashboard router
///
/// Basic auth, when configured, guards the page routes only; probes and
/// metrics stay open.
pub fn create_router(state: Arc<AppState>, auth: Option<Arc<BasicAuth>>) -> Router {
    let mut pages = Router::new()
        .route("/", get(cluster_options))
        .route("/cluster/:cluster_name", get(cluster_overview));

    if let Some(auth) = auth {
        pages = pages.layer(middleware::from_fn_with_state(auth, require_basic_auth));
    }

    Router::new()
        .merge(pages)
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the dashboard server
pub async fn serve(
    port: u16,
    state: Arc<AppState>,
    auth: Option<Arc<BasicAuth>>,
) -> anyhow::Result<()> {
    let app = create_router(state, auth);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting dashboard server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
