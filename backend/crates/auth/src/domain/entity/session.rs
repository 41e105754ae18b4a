//! Session Entity
//!
//! Represents an authenticated user session.
//! Stored in database; clients hold an HMAC-signed token referencing it.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::value_object::{public_id::PublicId, user_role::UserRole};

/// Session entity
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID (UUID v4)
    pub session_id: Uuid,
    /// Reference to User
    pub user_id: UserId,
    /// Public ID for API responses
    pub public_id: PublicId,
    /// User role at session creation
    pub user_role: UserRole,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Client fingerprint hash (User-Agent based)
    pub client_fingerprint_hash: Vec<u8>,
    /// Client IP (optional, for logging)
    pub client_ip: Option<String>,
    /// User agent string
    pub user_agent: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp
    pub last_activity_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(
        user_id: UserId,
        public_id: PublicId,
        user_role: UserRole,
        fingerprint_hash: Vec<u8>,
        client_ip: Option<String>,
        user_agent: Option<String>,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            user_id,
            public_id,
            user_role,
            expires_at_ms: (now + ttl).timestamp_millis(),
            client_fingerprint_hash: fingerprint_hash,
            client_ip,
            user_agent,
            created_at: now,
            last_activity_at: now,
        }
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    /// Update last activity timestamp
    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }

    /// Get remaining time until expiration
    pub fn remaining_ms(&self) -> i64 {
        let now_ms = Utc::now().timestamp_millis();
        (self.expires_at_ms - now_ms).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(ttl: Duration) -> Session {
        Session::new(
            UserId::new(),
            PublicId::new(),
            UserRole::User,
            vec![0u8; 32],
            None,
            Some("test-agent".to_string()),
            ttl,
        )
    }

    #[test]
    fn test_fresh_session_not_expired() {
        let s = session(Duration::hours(12));
        assert!(!s.is_expired());
        assert!(s.remaining_ms() > 0);
    }

    #[test]
    fn test_negative_ttl_expired() {
        let s = session(Duration::seconds(-1));
        assert!(s.is_expired());
        assert_eq!(s.remaining_ms(), 0);
    }

    #[test]
    fn test_touch_updates_activity() {
        let mut s = session(Duration::hours(1));
        let before = s.last_activity_at;
        s.touch();
        assert!(s.last_activity_at >= before);
    }
}
