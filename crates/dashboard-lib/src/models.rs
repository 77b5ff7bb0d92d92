//! Core data models for the cluster dashboard

use serde::{Deserialize, Serialize};

/// Zone aggregates always report this status; the control plane has no
/// per-zone health signal.
pub const ZONE_STATUS: &str = "active";

/// A compute node registered to a cluster, as described by the control plane
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerInstance {
    /// Unique ARN, the primary correlation key
    pub arn: String,
    /// Lower-cased instance status (active, draining, ...)
    pub status: String,
    /// MEMORY registered to the instance, in MiB
    pub registered_memory: i32,
    /// MEMORY still schedulable on the instance, in MiB
    pub remaining_memory: i32,
    /// Availability zone the instance runs in
    pub zone: String,
}

/// A running unit of work scheduled onto a container instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Logical service name, taken from the task's first container definition
    pub service_name: String,
    /// Lower-cased task status
    pub status: String,
    /// ARN of the instance the task runs on
    pub container_instance_arn: String,
}

/// Per-zone rollup of the tasks sharing one service name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAggregate {
    pub name: String,
    /// Status of the most recently seen task with this name in this zone
    pub status: String,
    /// Number of task records with this name seen in this zone
    pub count: u32,
}

/// One availability zone of a cluster with its instance and service rollups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneAggregate {
    pub name: String,
    pub status: String,
    /// Distinct container instances seen in this zone
    pub instance_count: u32,
    /// Unique service names, in first-seen order
    pub services: Vec<ServiceAggregate>,
}

impl ZoneAggregate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ZONE_STATUS.to_string(),
            instance_count: 0,
            services: Vec::new(),
        }
    }
}

/// The aggregated view of one cluster, the terminal artifact of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfo {
    pub cluster_name: String,
    /// Zones in first-seen order
    pub zones: Vec<ZoneAggregate>,
}

impl ClusterInfo {
    /// Empty shell used both as the pipeline seed and as the degraded view
    pub fn empty(cluster_name: impl Into<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            zones: Vec::new(),
        }
    }
}
