//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::db::sqlite::SqliteStore;
use crate::middleware::rate_limit::RateLimiter;
use crate::upstream::OpenAiClient;

/// State shared across all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Persistent chat/message store.
    pub store: Arc<SqliteStore>,
    /// Fixed-window per-address request quota.
    pub limiter: Arc<RateLimiter>,
    /// Client for the upstream completions API.
    pub upstream: Arc<OpenAiClient>,
}
