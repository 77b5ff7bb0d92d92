//! Static credential file loading
//!
//! The dashboard optionally reads an AWS key pair from a local JSON file
//! (`accessKeyId`/`secretAccessKey`). A missing or unreadable file is not an
//! error; the ambient AWS credential chain takes over.

use dashboard_lib::StaticCredentials;
use std::path::Path;
use tracing::{info, warn};

/// Load static credentials from `path`, if present and well-formed
pub fn load_credentials(path: &Path) -> Option<StaticCredentials> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => {
            info!(path = %path.display(), "no credentials file found, using ambient AWS credentials");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(credentials) => {
            info!(path = %path.display(), "loaded static credentials");
            Some(credentials)
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "could not parse credentials file, using ambient AWS credentials"
            );
            None
        }
    }
}
