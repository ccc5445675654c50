//! Fixed-window per-address rate limiting.
//!
//! Each client IP gets a counter that resets when the window elapses. The
//! quota is checked (and counted) before the handler runs, so a rejected
//! request has no side effects: no chat or message rows are created and the
//! upstream API is never called.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ServerError;
use crate::state::AppState;

struct Window {
    started: Instant,
    count: u32,
}

/// Per-address fixed-window request counter.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    buckets: Mutex<HashMap<IpAddr, Window>>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tracked = self.buckets.lock().map(|b| b.len()).unwrap_or(0);
        write!(
            f,
            "RateLimiter({}/{:?}, {tracked} addresses)",
            self.max_requests, self.window
        )
    }
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request from `addr`. Returns `false` when the address has
    /// exhausted its quota for the current window.
    pub fn try_acquire(&self, addr: IpAddr) -> bool {
        let now = Instant::now();
        if let Ok(mut buckets) = self.buckets.lock() {
            let window = buckets.entry(addr).or_insert(Window {
                started: now,
                count: 0,
            });
            if now.duration_since(window.started) >= self.window {
                window.started = now;
                window.count = 0;
            }
            window.count += 1;
            window.count <= self.max_requests
        } else {
            // A poisoned lock should not take the endpoint down.
            true
        }
    }
}

/// Axum middleware enforcing the quota, keyed by the connecting address.
pub async fn fixed_window(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if !state.limiter.try_acquire(addr) {
        tracing::warn!(%addr, "rate limit exceeded");
        return ServerError::RateLimited.into_response();
    }
    next.run(req).await
}

// ── Tests ──────────────────────────────────────────────────────────────────────
