//! User Status Value Object
//!
//! Two states only: Active and Suspended. Suspension is an admin action;
//! there is no soft delete.

use serde::{Deserialize, Serialize};
use std::fmt;

/// User account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum UserStatus {
    /// Normal active account - can login and use all features
    #[default]
    Active = 0,

    /// Suspended by an administrator - cannot login
    Suspended = 1,
}

impl UserStatus {
    /// Get numeric ID for database storage
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    /// Get string code for serialization/API
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }

    /// Check if login is allowed
    #[inline]
    pub const fn can_login(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Create from numeric ID
    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Self::Active),
            1 => Some(Self::Suspended),
            _ => None,
        }
    }

    /// Create from string code
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id() {
        assert_eq!(UserStatus::from_id(0), Some(UserStatus::Active));
        assert_eq!(UserStatus::from_id(1), Some(UserStatus::Suspended));
        assert_eq!(UserStatus::from_id(99), None);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(UserStatus::from_code("active"), Some(UserStatus::Active));
        assert_eq!(
            UserStatus::from_code("suspended"),
            Some(UserStatus::Suspended)
        );
        assert_eq!(UserStatus::from_code("deleted"), None);
    }

    #[test]
    fn test_can_login() {
        assert!(UserStatus::Active.can_login());
        assert!(!UserStatus::Suspended.can_login());
    }

    #[test]
    fn test_default() {
        assert_eq!(UserStatus::default(), UserStatus::Active);
    }
}
