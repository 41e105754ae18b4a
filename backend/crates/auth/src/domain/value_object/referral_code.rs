//! Referral Code Value Object
//!
//! Short shareable code each user receives at registration. Another user
//! entering this code at sign-up becomes the referred party of the code's
//! owner.

use std::str::FromStr;

use nid::Nanoid;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Length of a referral code in characters
pub const REFERRAL_CODE_LENGTH: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferralCode(pub Nanoid<REFERRAL_CODE_LENGTH>);

impl ReferralCode {
    /// Generate a fresh code
    #[inline]
    pub fn new() -> Self {
        Self(Nanoid::new())
    }

    /// Parse a user-supplied code
    #[inline]
    pub fn parse_str(s: &str) -> Result<Self, AuthError> {
        Nanoid::from_str(s)
            .map(ReferralCode)
            .map_err(|_| AuthError::InvalidReferralCode)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for ReferralCode {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReferralCode::parse_str(s)
    }
}

impl Default for ReferralCode {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referral_code_length() {
        let code = ReferralCode::new();
        assert_eq!(code.as_str().len(), REFERRAL_CODE_LENGTH);
    }

    #[test]
    fn test_referral_code_roundtrip() {
        let code = ReferralCode::new();
        let parsed = ReferralCode::parse_str(code.as_str()).unwrap();
        assert_eq!(code, parsed);
    }

    #[test]
    fn test_referral_code_invalid() {
        assert!(ReferralCode::parse_str("").is_err());
        assert!(ReferralCode::parse_str("has spaces ab").is_err());
        // Wrong length
        assert!(ReferralCode::parse_str("abc").is_err());
    }
}
