//! Routes under `/api`: shared-secret auth, then per-address rate limiting,
//! then the handler.

mod completions;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use utoipa::OpenApi;

use crate::middleware::{auth, rate_limit};
use crate::state::AppState;

/// Register the `/api` routes with their protection layers.
///
/// Layers run outermost-first on the way in: a request with a bad credential
/// is rejected before it spends any of its address's rate-limit quota.
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    completions::router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::fixed_window,
        ))
        .layer(middleware::from_fn_with_state(
            state,
            auth::require_shared_secret,
        ))
}

pub fn api_docs() -> utoipa::openapi::OpenApi {
    completions::CompletionsApi::openapi()
}
