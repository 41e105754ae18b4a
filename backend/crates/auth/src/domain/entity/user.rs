//! User Entity
//!
//! Core user profile entity. Sensitive auth data lives in the Credential
//! entity. The balance column is owned by the ledger: this entity carries it
//! for reads, but only ledger operations may change it.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    public_id::PublicId, referral_code::ReferralCode, user_name::UserName, user_role::UserRole,
    user_status::UserStatus,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Public-facing nanoid identifier (URL-safe)
    pub public_id: PublicId,
    /// User name (unique, for login and display)
    pub user_name: UserName,
    /// Role (User, Admin)
    pub user_role: UserRole,
    /// Status (Active, Suspended)
    pub user_status: UserStatus,
    /// Current balance in minor units (read-only here)
    pub balance: i64,
    /// Shareable referral code
    pub referral_code: ReferralCode,
    /// User who referred this account, if any
    pub referred_by: Option<UserId>,
    /// Last successful login time
    pub last_login_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(user_name: UserName, referred_by: Option<UserId>) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            public_id: PublicId::new(),
            user_name,
            user_role: UserRole::default(),
            user_status: UserStatus::default(),
            balance: 0,
            referral_code: ReferralCode::new(),
            referred_by,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record successful login
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Check if user can login
    pub fn can_login(&self) -> bool {
        self.user_status.can_login()
    }

    /// Check if user has admin privileges
    pub fn is_admin(&self) -> bool {
        self.user_role.is_admin()
    }

    /// Update user status
    pub fn set_status(&mut self, status: UserStatus) {
        self.user_status = status;
        self.updated_at = Utc::now();
    }

    /// Update user role
    pub fn set_role(&mut self, role: UserRole) {
        self.user_role = role;
        self.updated_at = Utc::now();
    }
}
