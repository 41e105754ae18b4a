//! User Management Use Cases (admin)
//!
//! Listing and suspension. Balance changes are out of scope here; they
//! belong to the ledger.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{public_id::PublicId, user_status::UserStatus};
use crate::error::{AuthError, AuthResult};

/// Default page size for user listings
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// List users use case
pub struct ListUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ListUsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, limit: Option<i64>, offset: Option<i64>) -> AuthResult<Vec<User>> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 200);
        let offset = offset.unwrap_or(0).max(0);
        self.user_repo.list(limit, offset).await
    }
}

/// Suspend / unsuspend use case
pub struct SetUserStatusUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> SetUserStatusUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, public_id: &str, status: UserStatus) -> AuthResult<User> {
        let public_id =
            PublicId::parse_str(public_id).map_err(|e| AuthError::Validation(e.to_string()))?;

        let mut user = self
            .user_repo
            .find_by_public_id(&public_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        user.set_status(status);
        self.user_repo.update(&user).await?;

        tracing::info!(
            public_id = %user.public_id,
            status = %status,
            "User status changed"
        );

        Ok(user)
    }
}
