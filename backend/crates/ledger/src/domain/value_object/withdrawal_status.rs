//! Withdrawal Status Value Objects
//!
//! Lifecycle: Pending → Approved | Rejected. Approved and Rejected are
//! terminal; there are no further transitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Withdrawal lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum WithdrawalStatus {
    /// Awaiting admin decision; the amount is already debited
    #[default]
    Pending = 0,

    /// Approved for payout; balance stays debited
    Approved = 1,

    /// Rejected; the amount was credited back
    Rejected = 2,
}

impl WithdrawalStatus {
    /// Get numeric ID for database storage
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    /// Get string code for serialization/API
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Check if this is a terminal state
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Create from numeric ID
    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Self::Pending),
            1 => Some(Self::Approved),
            2 => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Admin decision on a pending withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// The terminal status this decision produces
    #[inline]
    pub const fn target_status(&self) -> WithdrawalStatus {
        match self {
            Decision::Approve => WithdrawalStatus::Approved,
            Decision::Reject => WithdrawalStatus::Rejected,
        }
    }

    /// Whether the debited amount is credited back
    #[inline]
    pub const fn refunds(&self) -> bool {
        matches!(self, Decision::Reject)
    }
}
