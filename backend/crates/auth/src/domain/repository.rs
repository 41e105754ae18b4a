//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{credential::Credential, session::Session, user::User};
use crate::domain::value_object::{
    public_id::PublicId, referral_code::ReferralCode, user_name::UserName,
};
use crate::error::AuthResult;
use kernel::error::app_error::AppResult;
use kernel::id::UserId;
use uuid::Uuid;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by public ID
    async fn find_by_public_id(&self, public_id: &PublicId) -> AuthResult<Option<User>>;

    /// Find user by user name
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    /// Find user by referral code
    async fn find_by_referral_code(&self, code: &ReferralCode) -> AuthResult<Option<User>>;

    /// Check if user name exists
    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    /// Update user
    async fn update(&self, user: &User) -> AuthResult<()>;

    /// List users, newest first (admin)
    async fn list(&self, limit: i64, offset: i64) -> AuthResult<Vec<User>>;
}

/// Credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Create credentials
    async fn create(&self, credential: &Credential) -> AuthResult<()>;

    /// Find credentials by user ID
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credential>>;

    /// Update credentials
    async fn update(&self, credential: &Credential) -> AuthResult<()>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create(&self, session: &Session) -> AuthResult<()>;

    /// Find session by ID and verify fingerprint
    async fn find_by_id(
        &self,
        session_id: Uuid,
        fingerprint_hash: &[u8],
    ) -> AuthResult<Option<Session>>;

    /// Update session (e.g., last activity)
    async fn update(&self, session: &Session) -> AuthResult<()>;

    /// Delete a session
    async fn delete(&self, session_id: Uuid) -> AuthResult<()>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// Port into the ledger: one-time referral bonus for the referrer
///
/// Implemented by the ledger crate; registration calls it after the referred
/// user is persisted. Returns the referrer's new balance.
#[trait_variant::make(ReferralBonusGranter: Send)]
pub trait LocalReferralBonusGranter {
    async fn grant(&self, referrer_id: &UserId, referred_id: &UserId) -> AppResult<i64>;
}
