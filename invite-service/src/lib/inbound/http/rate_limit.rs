//! Admission control for unauthenticated probing endpoints.
//!
//! A fixed-window counter shared by every caller of the routes it guards.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::handlers::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests admitted per window.
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 30,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    window: Arc<Mutex<Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            window: Arc::new(Mutex::new(Window {
                started: Instant::now(),
                count: 0,
            })),
        }
    }

    /// Count one request against the current window.
    ///
    /// # Returns
    /// `Err` with the time left in the window once the budget is spent
    pub async fn check(&self) -> Result<(), Duration> {
        let mut window = self.window.lock().await;
        let now = Instant::now();

        if now.duration_since(window.started) >= self.config.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= self.config.max_requests {
            return Err(self.config.window - now.duration_since(window.started));
        }

        window.count += 1;
        Ok(())
    }
}

/// Reject with 429 before the handler runs once the window's budget is spent.
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    match limiter.check().await {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            tracing::warn!(
                path = %req.uri().path(),
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            ApiError::too_many_requests().into_response()
        }
    }
}
