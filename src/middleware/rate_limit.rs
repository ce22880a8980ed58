use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use redis::AsyncCommands;

use crate::config::Config;
use crate::error::AppError;

/// Fixed-window request counter per client IP, kept in Redis
#[derive(Clone)]
pub struct RateLimiter {
    redis: Arc<redis::Client>,
    window_secs: u64,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(redis: redis::Client, config: &Config) -> Self {
        Self {
            redis: Arc::new(redis),
            window_secs: config.rate_limit_window().as_secs(),
            max_requests: config.rate_limit_requests,
        }
    }

    /// Counts one hit for `client` and reports whether it is still within
    /// the window's budget.
    pub async fn hit(&self, client: &str) -> Result<bool, redis::RedisError> {
        let key = format!("rate_limit:{}", client);
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let count: u64 = conn.incr(&key, 1).await?;
        if count == 1 {
            let _: () = conn.expire(&key, self.window_secs as i64).await?;
        }
        Ok(count <= u64::from(self.max_requests))
    }
}

/// Proxy headers win over the socket address.
fn client_ip(req: &Request) -> String {
    let headers = req.headers();
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').map(str::trim).find(|ip| !ip.is_empty()))
                .map(str::to_string)
        })
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".into())
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&req);

    match limiter.hit(&ip).await {
        Ok(true) => next.run(req).await,
        Ok(false) => {
            tracing::info!("Rate limit exceeded for {}", ip);
            AppError::RateLimited {
                retry_after: limiter.window_secs,
            }
            .into_response()
        }
        Err(e) => {
            // fail open when Redis is unavailable
            tracing::warn!("Rate limiter unavailable: {}", e);
            next.run(req).await
        }
    }
}
