//! Error taxonomy for cluster aggregation
//!
//! Every pipeline failure is one of three tagged conditions: an empty result
//! set (expected and reportable), a correlation fault between the instance
//! and task data (fatal to the run), or an underlying API failure (fatal to
//! the run). The pipeline never recovers locally; the HTTP layer renders a
//! degraded view instead.

use thiserror::Error;

/// Resource kind an empty result refers to
pub const RESOURCE_INSTANCES: &str = "instances";
/// Resource kind an empty result refers to
pub const RESOURCE_TASKS: &str = "tasks";

/// Failure of a single aggregation run
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The cluster has no container instances or no tasks
    #[error("no {resource} found in cluster {cluster}")]
    EmptyResult {
        cluster: String,
        resource: &'static str,
    },

    /// Instance and task data from the control plane do not line up
    ///
    /// The ARN is whichever resource the inconsistency was detected on, a
    /// container instance or a task.
    #[error("{arn}: {detail}")]
    Correlation { arn: String, detail: String },

    /// The control-plane API call itself failed (auth, network, not-found)
    #[error("orchestration API request failed: {0}")]
    Fetch(#[source] anyhow::Error),
}

impl ClusterError {
    pub fn empty(cluster: impl Into<String>, resource: &'static str) -> Self {
        Self::EmptyResult {
            cluster: cluster.into(),
            resource,
        }
    }

    pub fn correlation(arn: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Correlation {
            arn: arn.into(),
            detail: detail.into(),
        }
    }

    /// Empty results are a normal condition of idle clusters; everything
    /// else indicates a real problem with the run
    pub fn is_empty_result(&self) -> bool {
        matches!(self, ClusterError::EmptyResult { .. })
    }
}
