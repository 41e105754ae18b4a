//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_name: String,
    pub password: String,
    /// Referral code of an existing user
    pub referral_code: Option<String>,
}

/// Register response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub public_id: String,
    /// The new user's own shareable code
    pub referral_code: String,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

/// Login response
///
/// The token is also set as an HttpOnly cookie; API clients may instead
/// send it as `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub public_id: String,
    pub user_role: String,
    pub token: String,
    pub expires_at_ms: i64,
}

// ============================================================================
// User profile
// ============================================================================

/// User profile response (own profile and admin listings)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub public_id: String,
    pub user_name: String,
    pub user_role: String,
    pub user_status: String,
    pub balance: i64,
    pub referral_code: String,
    pub last_login_at_ms: Option<i64>,
    pub created_at_ms: i64,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            public_id: user.public_id.to_string(),
            user_name: user.user_name.original().to_string(),
            user_role: user.user_role.code().to_string(),
            user_status: user.user_status.code().to_string(),
            balance: user.balance,
            referral_code: user.referral_code.to_string(),
            last_login_at_ms: user.last_login_at.map(|t| t.timestamp_millis()),
            created_at_ms: user.created_at.timestamp_millis(),
        }
    }
}

// ============================================================================
// Admin
// ============================================================================

/// Query parameters for user listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_name::UserName;

    #[test]
    fn test_user_response_from_entity() {
        let user = User::new(UserName::new("alice").unwrap(), None);
        let resp = UserResponse::from(&user);

        assert_eq!(resp.user_name, "alice");
        assert_eq!(resp.user_role, "user");
        assert_eq!(resp.user_status, "active");
        assert_eq!(resp.balance, 0);
        assert!(resp.last_login_at_ms.is_none());
    }

    #[test]
    fn test_register_request_camel_case() {
        let json = r#"{"userName": "alice", "password": "pw", "referralCode": "abc"}"#;
        let req: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.user_name, "alice");
        assert_eq!(req.referral_code.as_deref(), Some("abc"));
    }
}
