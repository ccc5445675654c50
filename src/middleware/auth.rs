//! Shared-secret authentication.
//!
//! The `Authorization` header must equal the configured token verbatim (the
//! browser client sends the raw secret, not a `Bearer` scheme). A matching
//! request gets a [`Principal`] extension so handlers never touch the token
//! themselves; swapping this middleware for real multi-user auth only has to
//! keep producing a `Principal`.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ServerError;
use crate::state::AppState;

/// The authenticated caller, resolved from the shared secret.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub user_id: i64,
}

/// Reject requests whose `Authorization` header does not equal the
/// configured shared secret. When no secret is configured the check is
/// skipped (a warning is logged at startup).
pub async fn require_shared_secret(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let expected = state.config.auth_token.as_str();
    if !expected.is_empty() {
        let provided = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        match provided {
            Some(token) if token == expected => {}
            _ => return ServerError::Unauthorized.into_response(),
        }
    }

    req.extensions_mut().insert(Principal {
        user_id: state.config.user_id,
    });
    next.run(req).await
}
