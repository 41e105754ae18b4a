//! API Response Envelope
//!
//! All JSON endpoints answer with the same envelope:
//! - success: `{"success": true, "data": ...}`
//! - failure: `{"success": false, "error": {"code": "...", "message": "..."}}`
//!
//! Handlers wrap payloads with [`ApiResponse::ok`]; failures are rendered by
//! the `IntoResponse` impl for `AppError` (see `error::conversions`).

use serde::Serialize;

use crate::error::kind::ErrorKind;

/// Response envelope for successful and failed requests
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// Error payload inside the envelope
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Machine-readable code (SCREAMING_SNAKE_CASE of the error kind)
    pub code: &'static str,
    /// User-safe message
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a payload in a success envelope
    #[inline]
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success envelope without a payload
    #[inline]
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    /// Failure envelope from a kind and message
    #[inline]
    pub fn err(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: kind.code(),
                message: message.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let resp = ApiResponse::ok(serde_json::json!({"balance": 10}));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["balance"], 10);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_empty_success_shape() {
        let resp = ApiResponse::ok_empty();
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("data").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_error_shape() {
        let resp = ApiResponse::err(ErrorKind::Conflict, "Insufficient balance");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
        assert_eq!(json["error"]["code"], "CONFLICT");
        assert_eq!(json["error"]["message"], "Insufficient balance");
    }
}
