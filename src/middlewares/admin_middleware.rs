use axum::{http::Request, middleware::Next, response::Response, extract::State, body::Body};
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::warn;
use crate::config::AdminAuthConfig;

pub struct AdminAuthState {
    pub api_token: String,
}

impl AdminAuthState {
    pub fn new(config: &AdminAuthConfig) -> Self {
        AdminAuthState { api_token: config.api_token.clone() }
    }
}

/// Pulls the token out of a `Bearer <token>` header value.
fn extract_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Compares without short-circuiting on the first differing byte.
fn tokens_match(given: &str, expected: &str) -> bool {
    if given.len() != expected.len() {
        return false;
    }
    given
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

pub async fn admin_auth(
    State(state): State<Arc<AdminAuthState>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(auth_header) = req.headers().get("authorization").and_then(|v| v.to_str().ok()) else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let token = match extract_bearer(auth_header) {
        Some(t) => t,
        None => return Err(StatusCode::UNAUTHORIZED),
    };

    if !tokens_match(token, &state.api_token) {
        warn!(path = %req.uri().path(), "Rejected admin request with wrong token");
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(req).await)
}
