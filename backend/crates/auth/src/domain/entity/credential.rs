//! Credential Entity
//!
//! Authentication credentials for a user.
//! Separated from User entity to isolate sensitive data.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::user_password::UserPassword;

/// Credential entity
///
/// Contains sensitive authentication data:
/// - Password hash
/// - Login failure tracking
#[derive(Debug, Clone)]
pub struct Credential {
    /// Reference to User
    pub user_id: UserId,
    /// Hashed password
    pub password_hash: UserPassword,
    /// Consecutive login failure count
    pub login_failed_count: u16,
    /// Last login failure time
    pub last_failed_at: Option<DateTime<Utc>>,
    /// Account locked until (temporary lockout after failures)
    pub locked_until: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    /// Maximum login failures before temporary lockout
    pub const MAX_LOGIN_FAILURES: u16 = 5;
    /// Lockout duration in minutes
    pub const LOCKOUT_MINUTES: i64 = 15;

    /// Create new credentials
    pub fn new(user_id: UserId, password_hash: UserPassword) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            password_hash,
            login_failed_count: 0,
            last_failed_at: None,
            locked_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if account is currently locked
    pub fn is_locked(&self) -> bool {
        if let Some(locked_until) = self.locked_until {
            Utc::now() < locked_until
        } else {
            false
        }
    }

    /// Record a failed login attempt
    pub fn record_failure(&mut self) {
        let now = Utc::now();
        self.login_failed_count += 1;
        self.last_failed_at = Some(now);
        self.updated_at = now;

        // Lock account after too many failures
        if self.login_failed_count >= Self::MAX_LOGIN_FAILURES {
            self.locked_until = Some(now + chrono::Duration::minutes(Self::LOCKOUT_MINUTES));
        }
    }

    /// Reset login failure count on successful login
    pub fn reset_failures(&mut self) {
        self.login_failed_count = 0;
        self.last_failed_at = None;
        self.locked_until = None;
        self.updated_at = Utc::now();
    }

    /// Update password
    pub fn update_password(&mut self, new_password: UserPassword) {
        self.password_hash = new_password;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;

    fn credential() -> Credential {
        let raw = RawPassword::new("TestPassword474!".to_string()).unwrap();
        let hash = UserPassword::from_raw(&raw, None).unwrap();
        Credential::new(UserId::new(), hash)
    }

    #[test]
    fn test_lockout_after_max_failures() {
        let mut cred = credential();
        assert!(!cred.is_locked());

        for _ in 0..Credential::MAX_LOGIN_FAILURES {
            cred.record_failure();
        }
        assert!(cred.is_locked());
    }

    #[test]
    fn test_reset_clears_lockout() {
        let mut cred = credential();
        for _ in 0..Credential::MAX_LOGIN_FAILURES {
            cred.record_failure();
        }
        assert!(cred.is_locked());

        cred.reset_failures();
        assert!(!cred.is_locked());
        assert_eq!(cred.login_failed_count, 0);
    }

    #[test]
    fn test_below_threshold_not_locked() {
        let mut cred = credential();
        for _ in 0..(Credential::MAX_LOGIN_FAILURES - 1) {
            cred.record_failure();
        }
        assert!(!cred.is_locked());
    }
}
