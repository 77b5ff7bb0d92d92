//! Dashboard configuration

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

/// Dashboard server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// HTTP listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// AWS region the monitored clusters live in
    #[serde(default = "default_region")]
    pub region: String,

    /// Challenge page requests with basic auth
    #[serde(default = "default_enable_basic_auth")]
    pub enable_basic_auth: bool,

    /// Basic auth user
    #[serde(default = "default_basic_auth_user")]
    pub basic_auth_user: String,

    /// Basic auth password
    #[serde(default = "default_basic_auth_password")]
    pub basic_auth_password: String,

    /// Upper bound on one aggregation run, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Optional static credential file
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,
}

fn default_port() -> u16 {
    8080
}

fn default_region() -> String {
    "eu-west-1".to_string()
}

fn default_enable_basic_auth() -> bool {
    true
}

fn default_basic_auth_user() -> String {
    "ecs".to_string()
}

fn default_basic_auth_password() -> String {
    "cluster".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_credentials_path() -> String {
    "credentials.json".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            region: default_region(),
            enable_basic_auth: default_enable_basic_auth(),
            basic_auth_user: default_basic_auth_user(),
            basic_auth_password: default_basic_auth_password(),
            request_timeout_secs: default_request_timeout(),
            credentials_path: default_credentials_path(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("DASHBOARD").try_parsing(true))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
