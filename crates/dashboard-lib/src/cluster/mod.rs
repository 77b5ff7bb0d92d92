//! Cluster aggregation pipeline
//!
//! Turns the three loosely-related result sets the control plane hands back
//! (container instances, tasks, zone attributes) into one coherent hierarchy:
//! cluster -> availability zones -> services. Each run is built fresh from a
//! single pipeline pass and fails fast; no partial result ever leaves this
//! module.

mod correlate;

use crate::error::ClusterError;
use crate::fetch::EcsFetch;
use crate::models::{ClusterInfo, ContainerInstance, Task};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Read-side entry point over the fetch boundary
///
/// Holds a shared fetch handle and no other state; concurrent requests each
/// run their own pipeline with their own accumulators.
#[derive(Clone)]
pub struct ClusterReader {
    fetch: Arc<dyn EcsFetch>,
}

impl ClusterReader {
    pub fn new(fetch: Arc<dyn EcsFetch>) -> Self {
        Self { fetch }
    }

    /// List the clusters the dashboard can show, as bare names
    pub async fn get_available_clusters(&self) -> Result<Vec<String>, ClusterError> {
        self.fetch.list_clusters().await
    }

    /// Build the aggregated view of one cluster
    ///
    /// Instance and task resolution only depend on the cluster name, so the
    /// two fetch legs run concurrently; correlation starts once both are in.
    pub async fn get_cluster_info(&self, cluster_name: &str) -> Result<ClusterInfo, ClusterError> {
        debug!(cluster = %cluster_name, "fetching cluster info");

        let mut info = ClusterInfo::empty(cluster_name);

        let (instances, tasks) = tokio::try_join!(
            self.resolve_instances(cluster_name),
            self.resolve_tasks(cluster_name),
        )
        .map_err(|err| {
            warn!(cluster = %cluster_name, error = %err, "cluster aggregation failed");
            err
        })?;

        // Instances are only correlation input; the result keeps zones only
        info.zones = correlate::correlate(&instances, &tasks).map_err(|err| {
            warn!(cluster = %cluster_name, error = %err, "cluster aggregation failed");
            err
        })?;

        info!(
            cluster = %cluster_name,
            zones = info.zones.len(),
            instances = instances.len(),
            tasks = tasks.len(),
            "cluster info assembled"
        );
        Ok(info)
    }

    async fn resolve_instances(
        &self,
        cluster_name: &str,
    ) -> Result<Vec<ContainerInstance>, ClusterError> {
        let arns = self.fetch.list_container_instance_arns(cluster_name).await?;
        self.fetch
            .describe_container_instances(cluster_name, &arns)
            .await
    }

    async fn resolve_tasks(&self, cluster_name: &str) -> Result<Vec<Task>, ClusterError> {
        let arns = self.fetch.list_task_arns(cluster_name).await?;
        self.fetch.describe_tasks(cluster_name, &arns).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RESOURCE_INSTANCES, RESOURCE_TASKS};
    use crate::fetch::{async_trait, ensure_non_empty};

    /// In-memory stand-in for the control plane
    #[derive(Default)]
    struct FixtureFetch {
        clusters: Vec<String>,
        instances: Vec<ContainerInstance>,
        tasks: Vec<Task>,
        fail_tasks: bool,
    }

    impl FixtureFetch {
        fn instance(mut self, arn: &str, zone: &str) -> Self {
            self.instances.push(ContainerInstance {
                arn: arn.to_string(),
                status: "active".to_string(),
                registered_memory: 7987,
                remaining_memory: 2048,
                zone: zone.to_string(),
            });
            self
        }

        fn task(mut self, service: &str, status: &str, instance_arn: &str) -> Self {
            self.tasks.push(Task {
                service_name: service.to_string(),
                status: status.to_string(),
                container_instance_arn: instance_arn.to_string(),
            });
            self
        }

        fn reader(self) -> ClusterReader {
            ClusterReader::new(Arc::new(self))
        }
    }

    #[async_trait]
    impl EcsFetch for FixtureFetch {
        async fn list_clusters(&self) -> Result<Vec<String>, ClusterError> {
            Ok(self.clusters.clone())
        }

        async fn list_container_instance_arns(
            &self,
            _cluster: &str,
        ) -> Result<Vec<String>, ClusterError> {
            Ok(self.instances.iter().map(|i| i.arn.clone()).collect())
        }

        async fn describe_container_instances(
            &self,
            cluster: &str,
            arns: &[String],
        ) -> Result<Vec<ContainerInstance>, ClusterError> {
            ensure_non_empty(cluster, RESOURCE_INSTANCES, arns)?;
            Ok(self.instances.clone())
        }

        async fn list_task_arns(&self, _cluster: &str) -> Result<Vec<String>, ClusterError> {
            if self.fail_tasks {
                return Err(ClusterError::Fetch(anyhow::anyhow!("connection reset")));
            }
            Ok((0..self.tasks.len()).map(|i| format!("task-{i}")).collect())
        }

        async fn describe_tasks(
            &self,
            cluster: &str,
            arns: &[String],
        ) -> Result<Vec<Task>, ClusterError> {
            ensure_non_empty(cluster, RESOURCE_TASKS, arns)?;
            Ok(self.tasks.clone())
        }
    }

    #[tokio::test]
    async fn aggregates_two_zones_with_per_zone_service_counts() {
        // Cluster "prod": instance A in eu-west-1a, instance B in eu-west-1b,
        // two web tasks on A and one on B.
        let reader = FixtureFetch::default()
            .instance("instance-a", "eu-west-1a")
            .instance("instance-b", "eu-west-1b")
            .task("web", "running", "instance-a")
            .task("web", "running", "instance-a")
            .task("web", "running", "instance-b")
            .reader();

        let info = reader.get_cluster_info("prod").await.unwrap();

        assert_eq!(info.cluster_name, "prod");
        assert_eq!(info.zones.len(), 2);

        assert_eq!(info.zones[0].name, "eu-west-1a");
        assert_eq!(info.zones[0].instance_count, 1);
        assert_eq!(info.zones[0].services[0].name, "web");
        assert_eq!(info.zones[0].services[0].count, 2);

        assert_eq!(info.zones[1].name, "eu-west-1b");
        assert_eq!(info.zones[1].instance_count, 1);
        assert_eq!(info.zones[1].services[0].count, 1);
    }

    #[tokio::test]
    async fn result_carries_zones_only() {
        let reader = FixtureFetch::default()
            .instance("instance-a", "eu-west-1a")
            .task("web", "running", "instance-a")
            .reader();

        let info = reader.get_cluster_info("prod").await.unwrap();
        let json = serde_json::to_value(&info).unwrap();

        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["clusterName", "zones"]);
    }

    #[tokio::test]
    async fn empty_instance_list_reports_the_cluster() {
        let reader = FixtureFetch::default()
            .task("web", "running", "instance-a")
            .reader();

        let err = reader.get_cluster_info("staging").await.unwrap_err();
        assert_eq!(err.to_string(), "no instances found in cluster staging");
    }

    #[tokio::test]
    async fn empty_task_list_reports_the_cluster() {
        let reader = FixtureFetch::default()
            .instance("instance-a", "eu-west-1a")
            .reader();

        let err = reader.get_cluster_info("staging").await.unwrap_err();
        assert_eq!(err.to_string(), "no tasks found in cluster staging");
    }

    #[tokio::test]
    async fn dangling_task_reference_aborts_the_run() {
        let reader = FixtureFetch::default()
            .instance("instance-a", "eu-west-1a")
            .task("web", "running", "instance-a")
            .task("web", "running", "instance-gone")
            .reader();

        let err = reader.get_cluster_info("prod").await.unwrap_err();
        assert!(matches!(err, ClusterError::Correlation { .. }));
        assert!(err.to_string().contains("instance-gone"));
    }

    #[tokio::test]
    async fn fetch_failure_propagates() {
        let reader = FixtureFetch {
            fail_tasks: true,
            ..FixtureFetch::default()
        }
        .instance("instance-a", "eu-west-1a")
        .reader();

        let err = reader.get_cluster_info("prod").await.unwrap_err();
        assert!(matches!(err, ClusterError::Fetch(_)));
    }

    #[tokio::test]
    async fn available_clusters_pass_through() {
        let fixture = FixtureFetch {
            clusters: vec!["prod".to_string(), "staging".to_string()],
            ..FixtureFetch::default()
        };

        let clusters = fixture.reader().get_available_clusters().await.unwrap();
        assert_eq!(clusters, ["prod", "staging"]);
    }
}
