//! Core library for the ECS cluster dashboard
//!
//! This crate provides the core functionality for:
//! - Fetching cluster metadata from the ECS control plane
//! - Correlating instances, tasks and availability zones into one hierarchy
//! - Mapping results (or failures) into page view models
//! - Prometheus metrics

pub mod cluster;
pub mod error;
pub mod fetch;
pub mod models;
pub mod observability;
pub mod view;

pub use cluster::ClusterReader;
pub use error::ClusterError;
pub use fetch::{EcsClient, EcsFetch, StaticCredentials};
pub use models::*;
pub use observability::DashboardMetrics;
pub use view::{ClusterListPage, ClusterPage};
