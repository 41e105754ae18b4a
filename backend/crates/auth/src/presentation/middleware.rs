//! Auth Middleware
//!
//! Middleware for requiring authentication (and admin role) on protected
//! routes. On success the authenticated identity is inserted into request
//! extensions as [`AuthContext`] for downstream handlers.

use axum::body::Body;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use kernel::id::UserId;
use platform::client::{extract_client_ip, extract_fingerprint};
use std::sync::Arc;

use crate::application::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::entity::session::Session;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::{public_id::PublicId, user_role::UserRole};
use crate::error::AuthError;

/// Authenticated identity stored in request extensions
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub user_id: UserId,
    pub public_id: PublicId,
    pub user_role: UserRole,
}

impl From<&Session> for AuthContext {
    fn from(session: &Session) -> Self {
        Self {
            user_id: session.user_id,
            public_id: session.public_id,
            user_role: session.user_role,
        }
    }
}

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// Extract the session token from `Authorization: Bearer` or the cookie
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(value) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    platform::cookie::extract_cookie(headers, cookie_name)
}

/// Middleware that requires a valid session
pub async fn require_auth<R>(
    state: AuthMiddlewareState<R>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: SessionRepository + Clone + Send + Sync + 'static,
{
    let headers = req.headers();

    let client_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());

    let client_ip = extract_client_ip(headers, client_ip);

    let fingerprint = match extract_fingerprint(headers, client_ip) {
        Ok(fp) => fp,
        Err(e) => return Err(AuthError::from(e).into_response()),
    };

    let token = match extract_token(headers, &state.config.session_cookie_name) {
        Some(token) => token,
        None => return Err(AuthError::SessionInvalid.into_response()),
    };

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());

    let session = match use_case.get_session(&token, &fingerprint.hash).await {
        Ok(session) => session,
        Err(e) => return Err(e.into_response()),
    };

    req.extensions_mut().insert(AuthContext::from(&session));

    Ok(next.run(req).await)
}

/// Middleware that requires admin role
///
/// Must be layered after [`require_auth`]; without an `AuthContext` in the
/// extensions the request is rejected.
pub async fn require_admin(req: Request<Body>, next: Next) -> Result<Response, Response> {
    match req.extensions().get::<AuthContext>() {
        Some(ctx) if ctx.user_role.is_admin() => Ok(next.run(req).await),
        Some(ctx) => {
            tracing::warn!(public_id = %ctx.public_id, "Admin route denied");
            Err(AppError::forbidden("Admin privileges required").into_response())
        }
        None => Err(AuthError::SessionInvalid.into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_token_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def"),
        );

        assert_eq!(extract_token(&headers, "session"), Some("abc.def".to_string()));
    }

    #[test]
    fn test_extract_token_cookie_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("session=xyz.123"),
        );

        assert_eq!(extract_token(&headers, "session"), Some("xyz.123".to_string()));
    }

    #[test]
    fn test_extract_token_bearer_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("session=from-cookie"),
        );

        assert_eq!(
            extract_token(&headers, "session"),
            Some("from-header".to_string())
        );
    }

    #[test]
    fn test_extract_token_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_token(&headers, "session"), None);
    }
}
