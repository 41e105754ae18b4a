//! Register Use Case
//!
//! Creates a new user account, optionally linked to a referrer.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{credential::Credential, user::User};
use crate::domain::repository::{CredentialRepository, ReferralBonusGranter, UserRepository};
use crate::domain::value_object::{
    referral_code::ReferralCode,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub user_name: String,
    pub password: String,
    /// Referral code of an existing user, if the new user was referred
    pub referral_code: Option<String>,
}

/// Register output
pub struct RegisterOutput {
    pub public_id: String,
    /// The new user's own shareable referral code
    pub referral_code: String,
}

/// Register use case
pub struct RegisterUseCase<U, C, G>
where
    U: UserRepository,
    C: CredentialRepository,
    G: ReferralBonusGranter,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    bonus_granter: Arc<G>,
    config: Arc<AuthConfig>,
}

impl<U, C, G> RegisterUseCase<U, C, G>
where
    U: UserRepository,
    C: CredentialRepository,
    G: ReferralBonusGranter,
{
    pub fn new(
        user_repo: Arc<U>,
        credential_repo: Arc<C>,
        bonus_granter: Arc<G>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            credential_repo,
            bonus_granter,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        // Validate user name
        let user_name =
            UserName::new(input.user_name).map_err(|e| AuthError::Validation(e.to_string()))?;

        // Check if user name is taken
        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }

        // Resolve the referrer before creating anything
        let referrer = match &input.referral_code {
            Some(code) => {
                let code = ReferralCode::parse_str(code)?;
                let referrer = self
                    .user_repo
                    .find_by_referral_code(&code)
                    .await?
                    .ok_or(AuthError::InvalidReferralCode)?;
                Some(referrer)
            }
            None => None,
        };

        // Validate and hash password
        let raw_password = RawPassword::new(input.password)?;
        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        // Create user and credentials
        let user = User::new(user_name, referrer.as_ref().map(|r| r.user_id));
        let credential = Credential::new(user.user_id, password_hash);

        // Persist
        self.user_repo.create(&user).await?;
        self.credential_repo.create(&credential).await?;

        // Referral bonus goes through the ledger; a failed grant must not
        // undo the registration itself
        if let Some(referrer) = &referrer {
            match self
                .bonus_granter
                .grant(&referrer.user_id, &user.user_id)
                .await
            {
                Ok(new_balance) => {
                    tracing::info!(
                        referrer = %referrer.public_id,
                        referred = %user.public_id,
                        new_balance,
                        "Referral bonus granted"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        referrer = %referrer.public_id,
                        referred = %user.public_id,
                        error = %e,
                        "Referral bonus grant failed"
                    );
                }
            }
        }

        tracing::info!(
            public_id = %user.public_id,
            user_name = %user.user_name,
            referred = referrer.is_some(),
            "User registered"
        );

        Ok(RegisterOutput {
            public_id: user.public_id.to_string(),
            referral_code: user.referral_code.to_string(),
        })
    }
}
