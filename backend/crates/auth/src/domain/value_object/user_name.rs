//! User Name Value Object
//!
//! The user name is the public handle used for login, display, and admin
//! operations.
//!
//! ## Invariants
//! - Length: 3-30 characters after normalization
//! - ASCII only: a-z, 0-9, `_`, `.`, `-`
//! - Starts and ends with alphanumeric or `_`
//! - No consecutive dots (`..`)
//! - Contains at least one letter or digit
//! - Not a reserved word
//!
//! Input is processed NFKC normalization → validation → lowercase; the
//! canonical (lowercase) form backs the uniqueness check.

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// Constants
// ============================================================================

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 30;

/// Allowed special characters in user name
const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

/// Reserved words that cannot be used as user names
const RESERVED_WORDS: &[&str] = &[
    // System/Admin
    "admin",
    "administrator",
    "root",
    "system",
    "superuser",
    "moderator",
    "staff",
    "support",
    "help",
    // API/Routing
    "api",
    "auth",
    "login",
    "logout",
    "register",
    "signin",
    "signout",
    "signup",
    "password",
    "reset",
    "verify",
    "health",
    "tasks",
    "withdrawals",
    "referrals",
    // Resources
    "user",
    "users",
    "account",
    "accounts",
    "profile",
    "settings",
    "dashboard",
    // Common reserved
    "www",
    "mail",
    "test",
    "demo",
    "null",
    "undefined",
    "anonymous",
    "guest",
    // Special
    "me",
    "self",
    "new",
    "edit",
    "delete",
    "create",
    "update",
    "list",
    "all",
    "none",
    "true",
    "false",
    // Brand protection
    "official",
    "verified",
    "bot",
    "service",
];

// ============================================================================
// Error Types
// ============================================================================

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    /// User name is empty after normalization
    Empty,

    /// User name is too short (minimum: USER_NAME_MIN_LENGTH)
    TooShort { length: usize, min: usize },

    /// User name is too long (maximum: USER_NAME_MAX_LENGTH)
    TooLong { length: usize, max: usize },

    /// User name contains invalid character
    InvalidCharacter { char: char, position: usize },

    /// User name starts with invalid character (must be alphanumeric or _)
    InvalidStart { char: char },

    /// User name ends with invalid character (must be alphanumeric or _)
    InvalidEnd { char: char },

    /// User name contains consecutive dots (..)
    ConsecutiveDots,

    /// User name contains no alphanumeric characters
    NoAlphanumeric,

    /// User name contains whitespace in the middle
    ContainsWhitespace,

    /// User name is a reserved word
    Reserved { word: String },
}

impl fmt::Display for UserNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "User name cannot be empty"),
            Self::TooShort { length, min } => {
                write!(f, "User name is too short ({length} chars, minimum {min})")
            }
            Self::TooLong { length, max } => {
                write!(f, "User name is too long ({length} chars, maximum {max})")
            }
            Self::InvalidCharacter { char, position } => {
                write!(
                    f,
                    "Invalid character '{char}' at position {position}. Only a-z, 0-9, _, ., - are allowed"
                )
            }
            Self::InvalidStart { char } => {
                write!(
                    f,
                    "User name cannot start with '{char}'. Must start with a-z, 0-9, or _"
                )
            }
            Self::InvalidEnd { char } => {
                write!(
                    f,
                    "User name cannot end with '{char}'. Must end with a-z, 0-9, or _"
                )
            }
            Self::ConsecutiveDots => {
                write!(f, "User name cannot contain consecutive dots (..)")
            }
            Self::NoAlphanumeric => {
                write!(f, "User name must contain at least one letter or digit")
            }
            Self::ContainsWhitespace => {
                write!(f, "User name cannot contain whitespace")
            }
            Self::Reserved { word } => {
                write!(f, "'{word}' is a reserved user name")
            }
        }
    }
}

impl std::error::Error for UserNameError {}

// ============================================================================
// UserName Value Object
// ============================================================================

/// Validated, normalized user name
///
/// # Storage
/// - `original`: The user's input (trimmed, NFKC normalized, preserves case)
/// - `canonical`: Lowercase form for uniqueness checks
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName {
    /// Original user input (preserves case)
    original: String,
    /// Canonical form (lowercase) for uniqueness
    canonical: String,
}

impl UserName {
    /// Create a new UserName from raw input
    ///
    /// Applies normalization (NFKC, trim) and validates.
    /// Preserves case in original, stores lowercase in canonical.
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let original = Self::normalize_original(input.as_ref());
        let canonical = original.to_lowercase();
        Self::validate(&canonical)?;
        Ok(Self {
            original,
            canonical,
        })
    }

    /// Get the original user name (preserves case)
    #[inline]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Get the canonical (normalized, lowercase) user name
    #[inline]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Alias for canonical() for compatibility
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Create from database values (assumes already validated)
    pub fn from_db(original: &str) -> Result<Self, UserNameError> {
        let canonical = original.to_lowercase();
        Ok(Self {
            original: original.to_string(),
            canonical,
        })
    }

    /// Normalize input string (trim and NFKC, preserve case)
    fn normalize_original(input: &str) -> String {
        input.nfkc().collect::<String>().trim().to_string()
    }

    /// Validate the normalized user name
    fn validate(canonical: &str) -> Result<(), UserNameError> {
        if canonical.is_empty() {
            return Err(UserNameError::Empty);
        }

        let length = canonical.chars().count();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort {
                length,
                min: USER_NAME_MIN_LENGTH,
            });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        if canonical.chars().any(|c| c.is_whitespace()) {
            return Err(UserNameError::ContainsWhitespace);
        }

        for (pos, ch) in canonical.chars().enumerate() {
            if !Self::is_valid_char(ch) {
                return Err(UserNameError::InvalidCharacter {
                    char: ch,
                    position: pos,
                });
            }
        }

        let first_char = canonical.chars().next().unwrap();
        if !Self::is_valid_start_end_char(first_char) {
            return Err(UserNameError::InvalidStart { char: first_char });
        }

        let last_char = canonical.chars().next_back().unwrap();
        if !Self::is_valid_start_end_char(last_char) {
            return Err(UserNameError::InvalidEnd { char: last_char });
        }

        if canonical.contains("..") {
            return Err(UserNameError::ConsecutiveDots);
        }

        if !canonical.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(UserNameError::NoAlphanumeric);
        }

        if RESERVED_WORDS.iter().any(|&w| w == canonical) {
            return Err(UserNameError::Reserved {
                word: canonical.to_string(),
            });
        }

        Ok(())
    }

    /// Check if character is valid in a user name
    #[inline]
    fn is_valid_char(c: char) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || ALLOWED_SPECIAL_CHARS.contains(&c)
    }

    /// Check if character is valid at start or end of user name
    #[inline]
    fn is_valid_start_end_char(c: char) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserName")
            .field("original", &self.original)
            .field("canonical", &self.canonical)
            .finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for UserName {
    type Error = UserNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.original
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod normalization {
        use super::*;

        #[test]
        fn test_trim_whitespace() {
            let name = UserName::new("  alice  ").unwrap();
            assert_eq!(name.as_str(), "alice");
        }

        #[test]
        fn test_lowercase_canonical() {
            let name = UserName::new("AlIcE_123").unwrap();
            assert_eq!(name.as_str(), "alice_123");
            assert_eq!(name.original(), "AlIcE_123");
        }

        #[test]
        fn test_nfkc_normalization() {
            // Full-width 'Ａ' (U+FF21) becomes ASCII after NFKC
            let name = UserName::new("Ａlice").unwrap();
            assert_eq!(name.as_str(), "alice");
        }
    }

    mod length_validation {
        use super::*;

        #[test]
        fn test_empty_fails() {
            assert!(matches!(UserName::new(""), Err(UserNameError::Empty)));
            assert!(matches!(UserName::new("   "), Err(UserNameError::Empty)));
        }

        #[test]
        fn test_too_short() {
            assert!(matches!(
                UserName::new("ab"),
                Err(UserNameError::TooShort { length: 2, min: 3 })
            ));
        }

        #[test]
        fn test_length_bounds() {
            assert!(UserName::new("abc").is_ok());
            assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
            assert!(matches!(
                UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)),
                Err(UserNameError::TooLong { .. })
            ));
        }
    }

    mod character_validation {
        use super::*;

        #[test]
        fn test_valid_characters() {
            assert!(UserName::new("alice123").is_ok());
            assert!(UserName::new("alice_bob").is_ok());
            assert!(UserName::new("alice.bob").is_ok());
            assert!(UserName::new("alice-bob").is_ok());
        }

        #[test]
        fn test_invalid_special_char() {
            assert!(matches!(
                UserName::new("alice@bob"),
                Err(UserNameError::InvalidCharacter { char: '@', .. })
            ));
        }

        #[test]
        fn test_invalid_unicode() {
            assert!(matches!(
                UserName::new("日本語"),
                Err(UserNameError::InvalidCharacter { .. })
            ));
        }

        #[test]
        fn test_whitespace_in_middle_fails() {
            let result = UserName::new("alice bob");
            assert!(matches!(
                result,
                Err(UserNameError::ContainsWhitespace)
                    | Err(UserNameError::InvalidCharacter { .. })
            ));
        }
    }

    mod position_validation {
        use super::*;

        #[test]
        fn test_valid_start_end() {
            assert!(UserName::new("alice").is_ok());
            assert!(UserName::new("123alice").is_ok());
            assert!(UserName::new("_alice_").is_ok());
        }

        #[test]
        fn test_invalid_start() {
            assert!(matches!(
                UserName::new(".alice"),
                Err(UserNameError::InvalidStart { char: '.' })
            ));
            assert!(matches!(
                UserName::new("-alice"),
                Err(UserNameError::InvalidStart { char: '-' })
            ));
        }

        #[test]
        fn test_invalid_end() {
            assert!(matches!(
                UserName::new("alice."),
                Err(UserNameError::InvalidEnd { char: '.' })
            ));
            assert!(matches!(
                UserName::new("alice-"),
                Err(UserNameError::InvalidEnd { char: '-' })
            ));
        }
    }

    mod pattern_validation {
        use super::*;

        #[test]
        fn test_consecutive_dots_fails() {
            assert!(matches!(
                UserName::new("alice..bob"),
                Err(UserNameError::ConsecutiveDots)
            ));
            assert!(UserName::new("alice.bob.carol").is_ok());
        }

        #[test]
        fn test_symbols_only_fails() {
            assert!(matches!(
                UserName::new("___"),
                Err(UserNameError::NoAlphanumeric)
            ));
        }
    }

    mod reserved_words {
        use super::*;

        #[test]
        fn test_reserved() {
            assert!(matches!(
                UserName::new("admin"),
                Err(UserNameError::Reserved { word }) if word == "admin"
            ));
            assert!(matches!(
                UserName::new("ADMIN"),
                Err(UserNameError::Reserved { word }) if word == "admin"
            ));
            assert!(matches!(
                UserName::new("withdrawals"),
                Err(UserNameError::Reserved { .. })
            ));
        }

        #[test]
        fn test_not_reserved() {
            assert!(UserName::new("alice").is_ok());
            assert!(UserName::new("admin2").is_ok());
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn test_serialize() {
            let name = UserName::new("Alice").unwrap();
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, "\"Alice\"");
        }

        #[test]
        fn test_deserialize_with_normalization() {
            let name: UserName = serde_json::from_str("\"ALICE\"").unwrap();
            assert_eq!(name.as_str(), "alice");
        }

        #[test]
        fn test_deserialize_invalid() {
            let result: Result<UserName, _> = serde_json::from_str("\"ab\"");
            assert!(result.is_err());
        }
    }
}
