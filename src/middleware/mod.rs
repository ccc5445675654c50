//! HTTP middleware stack: shared-secret auth, per-address rate limiting,
//! request tracing, and CORS.

pub mod auth;
pub mod cors;
pub mod rate_limit;
pub mod trace;
