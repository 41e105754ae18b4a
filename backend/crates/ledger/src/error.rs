//! Ledger Error Types
//!
//! Ledger-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Ledger failures are never retried
//! automatically; they surface to the controller layer as typed failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Ledger-specific result type alias
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-specific error variants
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Amount failed validation (zero, negative, or out of range)
    #[error("Invalid amount")]
    InvalidAmount,

    /// Request shape validation error
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Balance cannot cover the requested debit
    #[error("Insufficient balance")]
    InsufficientBalance,

    /// Task does not exist or is not active
    #[error("Task not found")]
    TaskNotFound,

    /// Task was already completed by this user
    #[error("Task already completed")]
    TaskAlreadyCompleted,

    /// Withdrawal does not exist
    #[error("Withdrawal not found")]
    WithdrawalNotFound,

    /// Withdrawal is already in a terminal state
    #[error("Withdrawal already resolved")]
    AlreadyResolved,

    /// Users cannot refer themselves
    #[error("Self-referral is not allowed")]
    SelfReferral,

    /// Referral bonus was already granted for this pair
    #[error("Referral bonus already granted")]
    BonusAlreadyGranted,

    /// User does not exist
    #[error("User not found")]
    UserNotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::InvalidAmount
            | LedgerError::Validation(_)
            | LedgerError::SelfReferral => StatusCode::BAD_REQUEST,
            LedgerError::InsufficientBalance
            | LedgerError::TaskAlreadyCompleted
            | LedgerError::AlreadyResolved
            | LedgerError::BonusAlreadyGranted => StatusCode::CONFLICT,
            LedgerError::TaskNotFound
            | LedgerError::WithdrawalNotFound
            | LedgerError::UserNotFound => StatusCode::NOT_FOUND,
            LedgerError::Database(e) => {
                StatusCode::from_u16(self.kind_for_db(e).status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            LedgerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidAmount
            | LedgerError::Validation(_)
            | LedgerError::SelfReferral => ErrorKind::BadRequest,
            LedgerError::InsufficientBalance
            | LedgerError::TaskAlreadyCompleted
            | LedgerError::AlreadyResolved
            | LedgerError::BonusAlreadyGranted => ErrorKind::Conflict,
            LedgerError::TaskNotFound
            | LedgerError::WithdrawalNotFound
            | LedgerError::UserNotFound => ErrorKind::NotFound,
            LedgerError::Database(e) => self.kind_for_db(e),
            LedgerError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Pool exhaustion and connectivity loss stay retryable (503)
    fn kind_for_db(&self, err: &sqlx::Error) -> ErrorKind {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => ErrorKind::ServiceUnavailable,
            _ => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            // Internal detail stays in logs, not in the response body
            LedgerError::Database(_) => AppError::new(self.kind(), "Database error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            LedgerError::Database(e) => {
                tracing::error!(error = %e, "Ledger database error");
            }
            LedgerError::Internal(msg) => {
                tracing::error!(message = %msg, "Ledger internal error");
            }
            LedgerError::InsufficientBalance => {
                tracing::debug!("Withdrawal rejected: insufficient balance");
            }
            _ => {
                tracing::debug!(error = %self, "Ledger error");
            }
        }
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
