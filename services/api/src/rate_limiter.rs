//! Fixed-window rate limiting for request throttling
//!
//! Each client key gets a counter that resets when its window elapses.
//! Bursts straddling a window boundary are accepted, a known imprecision of
//! the fixed-window strategy. Two independently configured buckets exist:
//! a strict one for the authentication endpoints and a looser one for
//! general API traffic.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of requests allowed per window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
}

impl RateLimiterConfig {
    /// Configuration for the strict authentication bucket
    ///
    /// # Environment Variables
    /// - `RATE_LIMIT_AUTH_MAX`: Requests per window (default: 5)
    /// - `RATE_LIMIT_AUTH_WINDOW`: Window length in seconds (default: 900)
    pub fn auth_from_env() -> Self {
        Self {
            max_requests: env_u32("RATE_LIMIT_AUTH_MAX", 5),
            window: Duration::from_secs(env_u64("RATE_LIMIT_AUTH_WINDOW", 900)),
        }
    }

    /// Configuration for the general API bucket
    ///
    /// # Environment Variables
    /// - `RATE_LIMIT_API_MAX`: Requests per window (default: 100)
    /// - `RATE_LIMIT_API_WINDOW`: Window length in seconds (default: 900)
    pub fn api_from_env() -> Self {
        Self {
            max_requests: env_u32("RATE_LIMIT_API_MAX", 100),
            window: Duration::from_secs(env_u64("RATE_LIMIT_API_WINDOW", 900)),
        }
    }
}

fn env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Per-client window state
#[derive(Debug)]
struct Window {
    /// Requests seen in the current window
    count: u32,
    /// When the current window opened
    started: Instant,
}

/// Fixed-window rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, Window>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check whether a request from the given client key is allowed
    ///
    /// Check-and-increment is atomic under the map lock, so concurrent
    /// requests from the same key cannot slip past the limit.
    pub async fn check(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        match entries.get_mut(key) {
            Some(window) if now.duration_since(window.started) < self.config.window => {
                window.count += 1;
                window.count <= self.config.max_requests
            }
            _ => {
                // No window yet, or the previous one has elapsed
                entries.insert(
                    key.to_string(),
                    Window {
                        count: 1,
                        started: now,
                    },
                );
                true
            }
        }
    }

    /// Drop entries whose window has elapsed
    ///
    /// Without this, every distinct client key ever seen would stay in the
    /// map forever. A background task calls this periodically.
    pub async fn evict_expired(&self) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let before = entries.len();

        entries.retain(|_, window| now.duration_since(window.started) < self.config.window);

        let evicted = before - entries.len();
        if evicted > 0 {
            debug!("Evicted {} stale rate limit entries", evicted);
        }
    }

    /// The configured window length
    pub fn window(&self) -> Duration {
        self.config.window
    }
}
