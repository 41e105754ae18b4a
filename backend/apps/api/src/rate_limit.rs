//! Global API Rate Limiting
//!
//! Fixed-window limiter keyed by client fingerprint, persisted in the
//! `rate_limits` table so the count survives restarts. Applied to every
//! `/api` route.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;

use kernel::error::app_error::AppError;
use platform::client::extract_client_ip;
use platform::crypto::sha256;
use platform::rate_limit::{RateLimitConfig, RateLimitResult, RateLimitStore};

/// Postgres-backed rate limit store
#[derive(Clone)]
pub struct PgRateLimitStore {
    pool: PgPool,
}

impl PgRateLimitStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Remove windows that ended before `now`
    pub async fn cleanup_expired(&self, config: &RateLimitConfig) -> Result<u64, sqlx::Error> {
        let cutoff = Utc::now().timestamp_millis() - config.window_ms();

        let deleted = sqlx::query("DELETE FROM rate_limits WHERE window_start_ms < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

impl RateLimitStore for PgRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &[u8],
        config: &RateLimitConfig,
        now_ms: i64,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        let window_start = config.window_start_ms(now_ms);

        let (count,) = sqlx::query_as::<_, (i32,)>(
            r#"
            INSERT INTO rate_limits (client_key, window_start_ms, request_count)
            VALUES ($1, $2, 1)
            ON CONFLICT (client_key, window_start_ms)
            DO UPDATE SET request_count = rate_limits.request_count + 1
            RETURNING request_count
            "#,
        )
        .bind(key)
        .bind(window_start)
        .fetch_one(&self.pool)
        .await?;

        Ok(RateLimitResult::from_count(
            count as u32,
            config,
            window_start,
        ))
    }
}

/// Middleware state
#[derive(Clone)]
pub struct RateLimitState {
    pub store: Arc<PgRateLimitStore>,
    pub config: Arc<RateLimitConfig>,
}

/// Key a client by User-Agent hash, falling back to the IP address
fn client_key(req: &Request<Body>) -> [u8; 32] {
    let headers = req.headers();

    if let Some(user_agent) = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
    {
        return sha256(user_agent.as_bytes());
    }

    let direct_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());

    match extract_client_ip(headers, direct_ip) {
        Some(ip) => sha256(ip.to_string().as_bytes()),
        None => sha256(b"anonymous"),
    }
}

/// Middleware enforcing the global `/api` rate limit
pub async fn enforce_rate_limit(
    state: RateLimitState,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let key = client_key(&req);
    let now_ms = Utc::now().timestamp_millis();

    match state
        .store
        .check_and_increment(&key, &state.config, now_ms)
        .await
    {
        Ok(result) if !result.allowed => {
            tracing::warn!(reset_at_ms = result.reset_at_ms, "Rate limit exceeded");
            Err(AppError::too_many_requests("Too many requests, try again later").into_response())
        }
        Ok(_) => Ok(next.run(req).await),
        Err(e) => {
            // Fail open: a broken limiter store must not take the API down
            tracing::warn!(error = %e, "Rate limit check failed");
            Ok(next.run(req).await)
        }
    }
}
