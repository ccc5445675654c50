//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for parley-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set (the upstream API key being the one
/// value you will actually have to provide).
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:8000"`).
    pub bind_address: String,

    /// SQLite database URL (default: `"sqlite://parley.db"`).
    /// Any sqlx-compatible connection string works; tests use
    /// `"sqlite::memory:"`.
    pub database_url: String,

    /// Shared-secret value the `Authorization` header must equal.
    /// When empty, the auth check is skipped (a warning is logged at
    /// startup).
    pub auth_token: String,

    /// Bearer credential for the upstream completions API.
    pub upstream_api_key: String,

    /// Base URL of the upstream completions API
    /// (default: `"https://api.openai.com"`).
    pub upstream_url: String,

    /// Model name forwarded on every completion request.
    pub model: String,

    /// Identifier of the single authenticated principal. Recorded as both
    /// chat owner and message sender until real multi-user auth exists.
    pub user_id: i64,

    /// Maximum requests one client address may make per window (default 10).
    pub rate_limit_max: u32,

    /// Fixed rate-limit window length in seconds (default 600).
    pub rate_limit_window_secs: u64,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated list of allowed CORS origins; `None` means wildcard.
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI at `/swagger-ui` (default `true`; disable in
    /// production).
    pub enable_swagger: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("PARLEY_BIND", "0.0.0.0:8000"),
            database_url: env_or("PARLEY_DATABASE_URL", "sqlite://parley.db"),
            auth_token: env_or("PARLEY_AUTH_TOKEN", ""),
            upstream_api_key: env_or("PARLEY_OPENAI_API_KEY", ""),
            upstream_url: env_or("PARLEY_UPSTREAM_URL", "https://api.openai.com"),
            model: env_or("PARLEY_MODEL", "gpt-3.5-turbo"),
            user_id: parse_env("PARLEY_USER_ID", 1),
            rate_limit_max: parse_env("PARLEY_RATE_LIMIT_MAX", 10),
            rate_limit_window_secs: parse_env("PARLEY_RATE_LIMIT_WINDOW_SECS", 600),
            log_level: env_or("PARLEY_LOG", "info"),
            log_json: std::env::var("PARLEY_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            cors_allowed_origins: std::env::var("PARLEY_CORS_ORIGINS").ok(),
            enable_swagger: std::env::var("PARLEY_ENABLE_SWAGGER")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
