//! Auth Routers

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{
    CredentialRepository, ReferralBonusGranter, SessionRepository, UserRepository,
};
use crate::presentation::handlers::{self, AuthAppState};

/// Create the public auth router (`/api/auth`)
pub fn auth_router<R, G>(repo: Arc<R>, bonus_granter: Arc<G>, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
    G: ReferralBonusGranter + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo,
        bonus_granter,
        config,
    };

    Router::new()
        .route("/register", post(handlers::register::<R, G>))
        .route("/login", post(handlers::login::<R, G>))
        .route("/logout", post(handlers::logout::<R, G>))
        .route("/me", get(handlers::me::<R, G>))
        .with_state(state)
}

/// Create the admin user-management router (`/api/admin/users`)
///
/// Authorization (require_auth + require_admin) is layered by the caller.
pub fn admin_user_router<R, G>(
    repo: Arc<R>,
    bonus_granter: Arc<G>,
    config: Arc<AuthConfig>,
) -> Router
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
    G: ReferralBonusGranter + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo,
        bonus_granter,
        config,
    };

    Router::new()
        .route("/", get(handlers::list_users::<R, G>))
        .route("/{public_id}/suspend", post(handlers::suspend_user::<R, G>))
        .route(
            "/{public_id}/unsuspend",
            post(handlers::unsuspend_user::<R, G>),
        )
        .with_state(state)
}
