//! Logout Use Case
//!
//! Deletes the session referenced by a token. Idempotent: an invalid or
//! already-deleted token is not an error for the caller.

use std::sync::Arc;

use crate::application::check_session::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> LogoutUseCase<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, session_token: &str, fingerprint_hash: &[u8]) -> AuthResult<()> {
        let check = CheckSessionUseCase::new(self.session_repo.clone(), self.config.clone());

        if let Ok(session) = check.get_session(session_token, fingerprint_hash).await {
            self.session_repo.delete(session.session_id).await?;
            tracing::info!(session_id = %session.session_id, "Session deleted");
        }

        Ok(())
    }
}
