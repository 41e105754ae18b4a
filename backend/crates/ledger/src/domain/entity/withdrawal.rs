//! Withdrawal Entity
//!
//! The amount is debited from the balance when the request is created;
//! rejection credits it back, approval leaves it debited.

use chrono::{DateTime, Utc};
use kernel::id::{UserId, WithdrawalId};

use crate::domain::value_object::amount::Amount;
use crate::domain::value_object::withdrawal_status::{Decision, WithdrawalStatus};
use crate::error::{LedgerError, LedgerResult};

/// Withdrawal entity
#[derive(Debug, Clone)]
pub struct Withdrawal {
    /// Withdrawal ID (UUID v4)
    pub withdrawal_id: WithdrawalId,
    /// Requesting user
    pub user_id: UserId,
    /// Debited amount (minor units, > 0)
    pub amount: Amount,
    /// Lifecycle status
    pub status: WithdrawalStatus,
    /// Request timestamp
    pub requested_at: DateTime<Utc>,
    /// Resolution timestamp (terminal states only)
    pub resolved_at: Option<DateTime<Utc>>,
    /// Admin who resolved it
    pub resolved_by: Option<UserId>,
}

impl Withdrawal {
    /// Create a new pending withdrawal
    pub fn new(user_id: UserId, amount: Amount) -> Self {
        Self {
            withdrawal_id: WithdrawalId::new(),
            user_id,
            amount,
            status: WithdrawalStatus::Pending,
            requested_at: Utc::now(),
            resolved_at: None,
            resolved_by: None,
        }
    }

    /// Apply an admin decision
    ///
    /// Fails with `AlreadyResolved` when the withdrawal is terminal.
    pub fn resolve(&mut self, decision: Decision, resolved_by: UserId) -> LedgerResult<()> {
        if self.status.is_terminal() {
            return Err(LedgerError::AlreadyResolved);
        }

        self.status = decision.target_status();
        self.resolved_at = Some(Utc::now());
        self.resolved_by = Some(resolved_by);
        Ok(())
    }
}
