//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod rate_limit;

use auth::middleware::{AuthMiddlewareState, require_admin, require_auth};
use auth::{AuthConfig, PgAuthRepository, admin_user_router, auth_router};
use axum::{
    Json, Router, http,
    http::{Method, header},
    routing::get,
};
use base64::Engine;
use base64::engine::general_purpose;
use chrono::Utc;
use ledger::{
    LedgerConfig, PgLedgerRepository, ReferralBonusService, admin_ledger_router, ledger_router,
    withdrawal_resolution_router,
};
use platform::rate_limit::RateLimitConfig;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::rate_limit::{PgRateLimitStore, RateLimitState, enforce_rate_limit};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,ledger=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

    // Database connection; acquisition is bounded so a saturated pool
    // surfaces as a retryable 503 instead of hanging the request
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_repo = Arc::new(PgAuthRepository::new(pool.clone()));
    let ledger_repo = Arc::new(PgLedgerRepository::new(pool.clone()));

    let rate_limit_config = Arc::new(RateLimitConfig::default());
    let rate_limit_store = Arc::new(PgRateLimitStore::new(pool.clone()));

    // Startup cleanup: errors here should not prevent server startup
    match auth_repo.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
        }
    }

    match rate_limit_store.cleanup_expired(&rate_limit_config).await {
        Ok(windows) => {
            tracing::info!(windows_deleted = windows, "Rate limit cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rate limit cleanup failed, continuing anyway");
        }
    }

    // Auth configuration
    let auth_config = if app_env == "development" {
        Arc::new(AuthConfig::development())
    } else {
        // In production, load secret from environment
        let secret_b64 =
            env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in production");
        let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        anyhow::ensure!(
            secret_bytes.len() == 32,
            "SESSION_SECRET must decode to 32 bytes"
        );
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&secret_bytes);
        Arc::new(AuthConfig {
            session_secret: secret,
            ..AuthConfig::default()
        })
    };

    // Ledger configuration
    let ledger_config = match env::var("REFERRAL_BONUS") {
        Ok(raw) => {
            let bonus = ledger::Amount::new(raw.parse::<i64>()?)
                .map_err(|e| anyhow::anyhow!("Invalid REFERRAL_BONUS: {e}"))?;
            Arc::new(LedgerConfig::new(bonus))
        }
        Err(_) => Arc::new(LedgerConfig::development()),
    };

    let bonus_granter = Arc::new(ReferralBonusService::new(
        ledger_repo.clone(),
        ledger_config.clone(),
    ));

    // CORS configuration
    let frontend_origins =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Middleware states
    let auth_mw_state = AuthMiddlewareState {
        repo: auth_repo.clone(),
        config: auth_config.clone(),
    };
    let rate_limit_state = RateLimitState {
        store: rate_limit_store,
        config: rate_limit_config,
    };

    // Authenticated user routes
    let require_auth_mw = {
        let state = auth_mw_state.clone();
        axum::middleware::from_fn(
            move |req: axum::extract::Request, next: axum::middleware::Next| {
                require_auth(state.clone(), req, next)
            },
        )
    };

    let protected = ledger_router(ledger_repo.clone()).layer(require_auth_mw.clone());

    // PATCH /api/withdrawals/{id}: admin decision on a user-facing resource
    let resolution = withdrawal_resolution_router(ledger_repo.clone())
        .layer(axum::middleware::from_fn(require_admin))
        .layer(require_auth_mw.clone());

    // Admin routes: require_auth runs first (outer), then require_admin
    let admin = Router::new()
        .nest(
            "/users",
            admin_user_router(
                auth_repo.clone(),
                bonus_granter.clone(),
                auth_config.clone(),
            ),
        )
        .merge(admin_ledger_router(ledger_repo.clone()))
        .layer(axum::middleware::from_fn(require_admin))
        .layer(require_auth_mw);

    // Build router; the rate limiter covers every /api route
    let api = Router::new()
        .route("/health", get(health))
        .nest(
            "/auth",
            auth_router(auth_repo.clone(), bonus_granter, auth_config.clone()),
        )
        .merge(protected)
        .merge(resolution)
        .nest("/admin", admin)
        .layer({
            let state = rate_limit_state.clone();
            axum::middleware::from_fn(
                move |req: axum::extract::Request, next: axum::middleware::Next| {
                    enforce_rate_limit(state.clone(), req, next)
                },
            )
        });

    let app = Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// GET /api/health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "message": "Service is healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Resolve on SIGINT or SIGTERM so in-flight requests can drain
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
