//! Page view models for the dashboard
//!
//! Pure mapping from pipeline results to what the rendering layer consumes.
//! Errors never bubble past this point: a failed run renders as an empty
//! cluster plus a visible message, not as a crash.

use crate::error::ClusterError;
use crate::models::ClusterInfo;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// View model for the cluster overview page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterPage {
    /// Message to surface when the aggregation run failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub cluster: ClusterInfo,
    /// Time of the last successful fetch, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

impl ClusterPage {
    /// Map one pipeline result into the page model, degrading on error
    pub fn from_result(
        result: Result<ClusterInfo, ClusterError>,
        last_update: Option<DateTime<Utc>>,
    ) -> Self {
        match result {
            Ok(cluster) => Self {
                error: None,
                cluster,
                last_update,
            },
            Err(err) => Self {
                error: Some(err.to_string()),
                cluster: ClusterInfo::empty(""),
                last_update,
            },
        }
    }
}

/// View model for the cluster selection page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterListPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub clusters: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

impl ClusterListPage {
    pub fn from_result(
        result: Result<Vec<String>, ClusterError>,
        last_update: Option<DateTime<Utc>>,
    ) -> Self {
        match result {
            Ok(clusters) => Self {
                error: None,
                clusters,
                last_update,
            },
            Err(err) => Self {
                error: Some(err.to_string()),
                clusters: Vec::new(),
                last_update,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClusterError, RESOURCE_TASKS};
    use crate::models::ZoneAggregate;

    #[test]
    fn successful_run_renders_without_error_flag() {
        let mut info = ClusterInfo::empty("prod");
        info.zones.push(ZoneAggregate::new("eu-west-1a"));

        let page = ClusterPage::from_result(Ok(info), None);
        assert!(page.error.is_none());
        assert_eq!(page.cluster.cluster_name, "prod");
        assert_eq!(page.cluster.zones.len(), 1);
    }

    #[test]
    fn failed_run_renders_empty_cluster_with_message() {
        let err = ClusterError::empty("prod", RESOURCE_TASKS);
        let page = ClusterPage::from_result(Err(err), None);

        assert_eq!(page.error.as_deref(), Some("no tasks found in cluster prod"));
        assert_eq!(page.cluster.cluster_name, "");
        assert!(page.cluster.zones.is_empty());
    }

    #[test]
    fn cluster_list_degrades_to_empty_options() {
        let err = ClusterError::Fetch(anyhow::anyhow!("credentials expired"));
        let page = ClusterListPage::from_result(Err(err), None);

        assert!(page.clusters.is_empty());
        assert!(page.error.unwrap().contains("credentials expired"));
    }

    #[test]
    fn error_flag_is_omitted_from_json_on_success() {
        let page = ClusterListPage::from_result(Ok(vec!["prod".to_string()]), None);
        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["clusters"][0], "prod");
    }
}
