//! Login throttle
//!
//! Fixed-window counter per client address with two thresholds: requests
//! beyond `delay_after` are slowed down, requests beyond `max_attempts` are
//! rejected with 429. State is in-process only.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use tracing::warn;

use crate::config::RateLimitConfig;
use crate::interfaces::http::common::ApiError;

/// Bucket shared by requests whose address cannot be determined
pub const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Debug, Clone)]
pub struct LoginThrottleConfig {
    pub window: Duration,
    pub max_attempts: u32,
    pub delay_after: u32,
    pub delay_step: Duration,
}

impl Default for LoginThrottleConfig {
    fn default() -> Self {
        Self::from(&RateLimitConfig::default())
    }
}

impl From<&RateLimitConfig> for LoginThrottleConfig {
    fn from(cfg: &RateLimitConfig) -> Self {
        Self {
            window: Duration::from_secs(cfg.login_window_secs),
            max_attempts: cfg.login_max_attempts,
            delay_after: cfg.login_delay_after,
            delay_step: Duration::from_millis(cfg.login_delay_ms),
        }
    }
}

/// What to do with one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Handle now, or after the given delay
    Allow { delay: Duration },
    /// Over the cap for this window
    Reject { retry_after: Duration },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    hits: u32,
}

#[derive(Debug, Default)]
pub struct LoginThrottle {
    config: LoginThrottleConfig,
    windows: DashMap<String, Window>,
}

impl LoginThrottle {
    pub fn new(config: LoginThrottleConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
        }
    }

    pub fn shared(config: LoginThrottleConfig) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    /// Count one request from `client` at `now` and decide its fate.
    pub fn hit(&self, client: &str, now: Instant) -> ThrottleDecision {
        let mut entry = self.windows.entry(client.to_string()).or_insert(Window {
            started_at: now,
            hits: 0,
        });

        if now.duration_since(entry.started_at) >= self.config.window {
            *entry = Window {
                started_at: now,
                hits: 0,
            };
        }

        entry.hits = entry.hits.saturating_add(1);
        let hits = entry.hits;

        if hits > self.config.max_attempts {
            let elapsed = now.duration_since(entry.started_at);
            return ThrottleDecision::Reject {
                retry_after: self.config.window.saturating_sub(elapsed),
            };
        }

        let over = hits.saturating_sub(self.config.delay_after);
        ThrottleDecision::Allow {
            delay: self.config.delay_step * over,
        }
    }

    /// Drop windows that have fully elapsed
    pub fn purge_expired(&self, now: Instant) {
        let window = self.config.window;
        self.windows
            .retain(|_, w| now.duration_since(w.started_at) < window);
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

/// Peer address, else the first `X-Forwarded-For` hop, else [`UNKNOWN_CLIENT`]
pub fn client_key(peer: Option<SocketAddr>, headers: &HeaderMap) -> String {
    if let Some(addr) = peer {
        return addr.ip().to_string();
    }

    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Throttle middleware for the login route
pub async fn login_throttle_middleware(
    State(throttle): State<Arc<LoginThrottle>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0);
    let client = client_key(peer, request.headers());

    match throttle.hit(&client, Instant::now()) {
        ThrottleDecision::Allow { delay } => {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            next.run(request).await
        }
        ThrottleDecision::Reject { retry_after } => {
            metrics::counter!("login_throttled_total").increment(1);
            warn!(client = %client, retry_after_secs = retry_after.as_secs(), "Login attempts throttled");
            let minutes = throttle.config.window.as_secs().div_ceil(60);
            ApiError::TooManyRequests(format!(
                "Too many login attempts from this IP, please try again after {} minutes",
                minutes
            ))
            .into_response()
        }
    }
}
