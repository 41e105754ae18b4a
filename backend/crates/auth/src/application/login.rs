//! Login Use Case
//!
//! Authenticates a user and creates a session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::session::Session;
use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Re-export ClientFingerprint from platform
pub use platform::client::ClientFingerprint;

/// Login input
pub struct LoginInput {
    /// User name
    pub user_name: String,
    /// Password
    pub password: String,
}

/// Login output
pub struct LoginOutput {
    /// Signed session token for cookie / Authorization header
    pub session_token: String,
    /// Public ID
    pub public_id: String,
    /// Role code ("user" / "admin")
    pub user_role: String,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
}

/// Login use case
pub struct LoginUseCase<U, C, S>
where
    U: UserRepository,
    C: CredentialRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, C, S> LoginUseCase<U, C, S>
where
    U: UserRepository,
    C: CredentialRepository,
    S: SessionRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        credential_repo: Arc<C>,
        session_repo: Arc<S>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            credential_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: LoginInput,
        fingerprint: ClientFingerprint,
    ) -> AuthResult<LoginOutput> {
        // Unknown names and wrong passwords answer identically
        let user_name =
            UserName::new(&input.user_name).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.can_login() {
            return Err(AuthError::AccountSuspended);
        }

        let mut credential = self
            .credential_repo
            .find_by_user_id(&user.user_id)
            .await?
            .ok_or(AuthError::Internal("Credential not found".to_string()))?;

        if credential.is_locked() {
            return Err(AuthError::AccountLocked);
        }

        // Verify password
        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let password_valid = credential
            .password_hash
            .verify(&raw_password, self.config.pepper());

        if !password_valid {
            credential.record_failure();
            self.credential_repo.update(&credential).await?;
            return Err(AuthError::InvalidCredentials);
        }

        // Reset failure count and update last login
        credential.reset_failures();
        self.credential_repo.update(&credential).await?;

        let mut user = user;
        user.record_login();
        self.user_repo.update(&user).await?;

        // Create session
        let session = Session::new(
            user.user_id,
            user.public_id,
            user.user_role,
            fingerprint.hash_vec(),
            fingerprint.ip_string(),
            fingerprint.user_agent.clone(),
            self.config.session_ttl_chrono(),
        );

        self.session_repo.create(&session).await?;

        let session_token = self.generate_session_token(&session);

        tracing::info!(
            public_id = %user.public_id,
            session_id = %session.session_id,
            "User logged in"
        );

        Ok(LoginOutput {
            session_token,
            public_id: user.public_id.to_string(),
            user_role: user.user_role.code().to_string(),
            expires_at_ms: session.expires_at_ms,
        })
    }

    /// Generate signed session token: `{session_id}.{base64url(hmac)}`
    fn generate_session_token(&self, session: &Session) -> String {
        use base64::Engine;
        use hmac::{Hmac, Mac};
        use sha2::Sha256;

        let session_id = session.session_id.to_string();

        let mut mac = Hmac::<Sha256>::new_from_slice(&self.config.session_secret)
            .expect("HMAC can take key of any size");
        mac.update(session_id.as_bytes());
        let signature = mac.finalize().into_bytes();

        format!(
            "{}.{}",
            session_id,
            base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature)
        )
    }
}
