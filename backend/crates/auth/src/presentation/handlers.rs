//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use kernel::response::ApiResponse;
use platform::client::{extract_client_ip, extract_fingerprint};
use platform::cookie::CookieConfig;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckSessionUseCase, ListUsersUseCase, LoginInput, LoginUseCase, LogoutUseCase, RegisterInput,
    RegisterUseCase, SetUserStatusUseCase,
};
use crate::domain::repository::{
    CredentialRepository, ReferralBonusGranter, SessionRepository, UserRepository,
};
use crate::domain::value_object::user_status::UserStatus;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ListUsersQuery, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserResponse,
};
use crate::presentation::middleware::extract_token;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R, G>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
    G: ReferralBonusGranter + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub bonus_granter: Arc<G>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R, G>(
    State(state): State<AuthAppState<R, G>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<Json<ApiResponse<RegisterResponse>>>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
    G: ReferralBonusGranter + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.bonus_granter.clone(),
        state.config.clone(),
    );

    let input = RegisterInput {
        user_name: req.user_name,
        password: req.password,
        referral_code: req.referral_code,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(ApiResponse::ok(RegisterResponse {
        public_id: output.public_id,
        referral_code: output.referral_code,
    })))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R, G>(
    State(state): State<AuthAppState<R, G>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
    G: ReferralBonusGranter + Clone + Send + Sync + 'static,
{
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));
    let fingerprint = extract_fingerprint(&headers, client_ip)?;

    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let input = LoginInput {
        user_name: req.user_name,
        password: req.password,
    };

    let output = use_case.execute(input, fingerprint).await?;

    let cookie = session_cookie(&state.config).build_set_cookie(&output.session_token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::ok(LoginResponse {
            public_id: output.public_id,
            user_role: output.user_role,
            token: output.session_token,
            expires_at_ms: output.expires_at_ms,
        })),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
pub async fn logout<R, G>(
    State(state): State<AuthAppState<R, G>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
    G: ReferralBonusGranter + Clone + Send + Sync + 'static,
{
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));

    // Best effort: delete the session when the token and fingerprint resolve
    if let (Some(token), Ok(fingerprint)) = (
        extract_token(&headers, &state.config.session_cookie_name),
        extract_fingerprint(&headers, client_ip),
    ) {
        let use_case = LogoutUseCase::new(state.repo.clone(), state.config.clone());
        let _ = use_case.execute(&token, &fingerprint.hash).await;
    }

    let cookie = session_cookie(&state.config).build_delete_cookie();

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::ok_empty()),
    ))
}

// ============================================================================
// Current user profile
// ============================================================================

/// GET /api/auth/me
pub async fn me<R, G>(
    State(state): State<AuthAppState<R, G>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
) -> AuthResult<Json<ApiResponse<UserResponse>>>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
    G: ReferralBonusGranter + Clone + Send + Sync + 'static,
{
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));
    let fingerprint = extract_fingerprint(&headers, client_ip)?;

    let token = extract_token(&headers, &state.config.session_cookie_name)
        .ok_or(AuthError::SessionInvalid)?;

    let check = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());
    let session = check.get_session(&token, &fingerprint.hash).await?;

    let user = UserRepository::find_by_id(state.repo.as_ref(), &session.user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(ApiResponse::ok(UserResponse::from(&user))))
}

// ============================================================================
// Admin: user management
// ============================================================================

/// GET /api/admin/users
pub async fn list_users<R, G>(
    State(state): State<AuthAppState<R, G>>,
    Query(query): Query<ListUsersQuery>,
) -> AuthResult<Json<ApiResponse<Vec<UserResponse>>>>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
    G: ReferralBonusGranter + Clone + Send + Sync + 'static,
{
    let use_case = ListUsersUseCase::new(state.repo.clone());
    let users = use_case.execute(query.limit, query.offset).await?;

    Ok(Json(ApiResponse::ok(
        users.iter().map(UserResponse::from).collect(),
    )))
}

/// POST /api/admin/users/{publicId}/suspend
pub async fn suspend_user<R, G>(
    State(state): State<AuthAppState<R, G>>,
    Path(public_id): Path<String>,
) -> AuthResult<Json<ApiResponse<UserResponse>>>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
    G: ReferralBonusGranter + Clone + Send + Sync + 'static,
{
    let use_case = SetUserStatusUseCase::new(state.repo.clone());
    let user = use_case.execute(&public_id, UserStatus::Suspended).await?;

    Ok(Json(ApiResponse::ok(UserResponse::from(&user))))
}

/// POST /api/admin/users/{publicId}/unsuspend
pub async fn unsuspend_user<R, G>(
    State(state): State<AuthAppState<R, G>>,
    Path(public_id): Path<String>,
) -> AuthResult<Json<ApiResponse<UserResponse>>>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
    G: ReferralBonusGranter + Clone + Send + Sync + 'static,
{
    let use_case = SetUserStatusUseCase::new(state.repo.clone());
    let user = use_case.execute(&public_id, UserStatus::Active).await?;

    Ok(Json(ApiResponse::ok(UserResponse::from(&user))))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn session_cookie(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        name: config.session_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.session_ttl.as_secs() as i64),
    }
}
