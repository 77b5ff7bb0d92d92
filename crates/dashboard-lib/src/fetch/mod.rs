//! Fetch boundary for the ECS control plane
//!
//! The pipeline only ever talks to the control plane through the [`EcsFetch`]
//! trait: five read-only calls, no retries, no pagination beyond what one
//! API call returns natively. [`EcsClient`] is the production implementation;
//! tests substitute in-memory fixtures.

mod ecs;

pub use ecs::EcsClient;

use crate::error::ClusterError;
use crate::models::{ContainerInstance, Task};
use serde::Deserialize;

pub use async_trait::async_trait;

/// Attribute name the control plane uses to tag an instance with its zone
pub const ZONE_ATTRIBUTE: &str = "ecs.availability-zone";

/// Pre-resolved static API credentials
///
/// Resolution (credential file lookup, fallback to the ambient chain) happens
/// outside this crate; the fetch client only consumes the result.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Read-only view of the orchestration API
#[async_trait]
pub trait EcsFetch: Send + Sync {
    /// List all known clusters, as bare names with any ARN prefix stripped
    async fn list_clusters(&self) -> Result<Vec<String>, ClusterError>;

    /// List the ARNs of the container instances registered to a cluster
    async fn list_container_instance_arns(
        &self,
        cluster: &str,
    ) -> Result<Vec<String>, ClusterError>;

    /// Describe container instances by ARN
    ///
    /// Fails with an empty-result error naming the cluster when `arns` is
    /// empty.
    async fn describe_container_instances(
        &self,
        cluster: &str,
        arns: &[String],
    ) -> Result<Vec<ContainerInstance>, ClusterError>;

    /// List the ARNs of the tasks running in a cluster
    async fn list_task_arns(&self, cluster: &str) -> Result<Vec<String>, ClusterError>;

    /// Describe tasks by ARN
    ///
    /// Fails with an empty-result error naming the cluster when `arns` is
    /// empty.
    async fn describe_tasks(
        &self,
        cluster: &str,
        arns: &[String],
    ) -> Result<Vec<Task>, ClusterError>;
}

/// Strip everything before the final path segment of a resource reference
///
/// `arn:aws:ecs:region:acct:cluster/my-cluster` becomes `my-cluster`; a bare
/// name passes through unchanged.
pub fn cluster_name_from_arn(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}

/// Guard shared by the describe calls: describing an empty ARN list is the
/// empty-result condition, reported against the cluster
pub fn ensure_non_empty(
    cluster: &str,
    resource: &'static str,
    arns: &[String],
) -> Result<(), ClusterError> {
    if arns.is_empty() {
        Err(ClusterError::empty(cluster, resource))
    } else {
        Ok(())
    }
}
