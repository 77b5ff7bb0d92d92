//! AWS SDK implementation of the fetch boundary
//!
//! Wraps a shared `aws-sdk-ecs` client handle (connection reuse, safe for
//! concurrent use) and maps the SDK's loosely-typed responses into the crate
//! models. Status strings are lower-cased here, the MEMORY resource entries
//! and the availability-zone attribute are resolved here, and any field the
//! models require that the response does not carry is a correlation fault
//! naming the offending ARN.

use crate::error::{ClusterError, RESOURCE_INSTANCES, RESOURCE_TASKS};
use crate::fetch::{
    cluster_name_from_arn, ensure_non_empty, EcsFetch, StaticCredentials, ZONE_ATTRIBUTE,
};
use crate::models::{ContainerInstance, Task};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ecs::config::{Credentials, Region};
use aws_sdk_ecs::{types, Client};

const MEMORY_RESOURCE: &str = "MEMORY";

/// ECS control-plane client
#[derive(Clone)]
pub struct EcsClient {
    client: Client,
}

impl EcsClient {
    /// Build a client for the given region
    ///
    /// When static credentials are supplied they take precedence; otherwise
    /// the ambient AWS credential chain applies.
    pub async fn new(region: impl Into<String>, credentials: Option<StaticCredentials>) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.into()));

        if let Some(creds) = credentials {
            loader = loader.credentials_provider(Credentials::new(
                creds.access_key_id,
                creds.secret_access_key,
                None,
                None,
                "static",
            ));
        }

        let config = loader.load().await;
        Self {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl EcsFetch for EcsClient {
    async fn list_clusters(&self) -> Result<Vec<String>, ClusterError> {
        let response = self
            .client
            .list_clusters()
            .send()
            .await
            .map_err(|e| ClusterError::Fetch(e.into()))?;

        Ok(response
            .cluster_arns()
            .iter()
            .map(|arn| cluster_name_from_arn(arn).to_string())
            .collect())
    }

    async fn list_container_instance_arns(
        &self,
        cluster: &str,
    ) -> Result<Vec<String>, ClusterError> {
        let response = self
            .client
            .list_container_instances()
            .cluster(cluster)
            .send()
            .await
            .map_err(|e| ClusterError::Fetch(e.into()))?;

        Ok(response.container_instance_arns().to_vec())
    }

    async fn describe_container_instances(
        &self,
        cluster: &str,
        arns: &[String],
    ) -> Result<Vec<ContainerInstance>, ClusterError> {
        ensure_non_empty(cluster, RESOURCE_INSTANCES, arns)?;

        let response = self
            .client
            .describe_container_instances()
            .cluster(cluster)
            .set_container_instances(Some(arns.to_vec()))
            .send()
            .await
            .map_err(|e| ClusterError::Fetch(e.into()))?;

        response
            .container_instances()
            .iter()
            .map(map_instance)
            .collect()
    }

    async fn list_task_arns(&self, cluster: &str) -> Result<Vec<String>, ClusterError> {
        let response = self
            .client
            .list_tasks()
            .cluster(cluster)
            .send()
            .await
            .map_err(|e| ClusterError::Fetch(e.into()))?;

        Ok(response.task_arns().to_vec())
    }

    async fn describe_tasks(
        &self,
        cluster: &str,
        arns: &[String],
    ) -> Result<Vec<Task>, ClusterError> {
        ensure_non_empty(cluster, RESOURCE_TASKS, arns)?;

        let response = self
            .client
            .describe_tasks()
            .cluster(cluster)
            .set_tasks(Some(arns.to_vec()))
            .send()
            .await
            .map_err(|e| ClusterError::Fetch(e.into()))?;

        response.tasks().iter().map(map_task).collect()
    }
}

fn memory_of(resources: &[types::Resource]) -> Option<i32> {
    resources
        .iter()
        .find(|res| res.name() == Some(MEMORY_RESOURCE))
        .map(|res| res.integer_value())
}

/// Map a described container instance into the crate model
///
/// The zone comes from the instance attribute list; an instance without the
/// zone attribute must not silently default, it fails the run.
fn map_instance(item: &types::ContainerInstance) -> Result<ContainerInstance, ClusterError> {
    let arn = item
        .container_instance_arn()
        .ok_or_else(|| ClusterError::correlation("<unknown>", "described instance carries no ARN"))?;

    let status = item
        .status()
        .ok_or_else(|| ClusterError::correlation(arn, "described instance carries no status"))?
        .to_lowercase();

    let registered_memory = memory_of(item.registered_resources()).ok_or_else(|| {
        ClusterError::correlation(arn, "no MEMORY entry in registered resources")
    })?;
    let remaining_memory = memory_of(item.remaining_resources()).ok_or_else(|| {
        ClusterError::correlation(arn, "no MEMORY entry in remaining resources")
    })?;

    let zone = item
        .attributes()
        .iter()
        .find(|att| att.name() == ZONE_ATTRIBUTE)
        .and_then(|att| att.value())
        .ok_or_else(|| {
            ClusterError::correlation(arn, format!("missing {ZONE_ATTRIBUTE} attribute"))
        })?;

    Ok(ContainerInstance {
        arn: arn.to_string(),
        status,
        registered_memory,
        remaining_memory,
        zone: zone.to_string(),
    })
}

/// Map a described task into the crate model
///
/// The service name is the name of the task's first container definition.
fn map_task(task: &types::Task) -> Result<Task, ClusterError> {
    let arn = task.task_arn().unwrap_or("<unknown task>");

    let service_name = task
        .containers()
        .first()
        .and_then(|container| container.name())
        .ok_or_else(|| ClusterError::correlation(arn, "task has no container definitions"))?;

    let status = task
        .last_status()
        .ok_or_else(|| ClusterError::correlation(arn, "task carries no status"))?
        .to_lowercase();

    let container_instance_arn = task
        .container_instance_arn()
        .ok_or_else(|| ClusterError::correlation(arn, "task is not placed on an instance"))?;

    Ok(Task {
        service_name: service_name.to_string(),
        status,
        container_instance_arn: container_instance_arn.to_string(),
    })
}
