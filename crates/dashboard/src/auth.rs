//! Basic-auth challenge for the dashboard pages

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;

const REALM: &str = "Basic realm=\"ecs-dashboard\"";

/// Static username/password pair the pages are protected with
#[derive(Clone)]
pub struct BasicAuth {
    user: String,
    password: String,
}

impl BasicAuth {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Check one `Authorization` header value against the configured pair
    fn is_authorized(&self, header_value: &str) -> bool {
        let encoded = match header_value.strip_prefix("Basic ") {
            Some(rest) => rest.trim(),
            None => return false,
        };
        let decoded = match STANDARD.decode(encoded) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        let decoded = match String::from_utf8(decoded) {
            Ok(text) => text,
            Err(_) => return false,
        };
        match decoded.split_once(':') {
            Some((user, password)) => user == self.user && password == self.password,
            None => false,
        }
    }
}

/// Middleware rejecting unauthenticated page requests with a 401 challenge
pub async fn require_basic_auth(
    State(auth): State<Arc<BasicAuth>>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| auth.is_authorized(value))
        .unwrap_or(false);

    if authorized {
        next.run(request).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, REALM)],
        )
            .into_response()
    }
}
