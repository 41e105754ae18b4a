//! Resolve Withdrawal Use Case (admin)
//!
//! Approves or rejects a pending withdrawal. Rejection restores the exact
//! debited amount; approval leaves the balance unchanged. Both outcomes are
//! terminal.

use std::sync::Arc;

use kernel::id::{UserId, WithdrawalId};

use crate::domain::entity::withdrawal::Withdrawal;
use crate::domain::repository::BalanceLedger;
use crate::domain::value_object::withdrawal_status::Decision;
use crate::error::LedgerResult;

/// Resolve withdrawal use case
pub struct ResolveWithdrawalUseCase<L>
where
    L: BalanceLedger,
{
    ledger: Arc<L>,
}

impl<L> ResolveWithdrawalUseCase<L>
where
    L: BalanceLedger,
{
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    pub async fn execute(
        &self,
        withdrawal_id: &WithdrawalId,
        decision: Decision,
        resolved_by: &UserId,
    ) -> LedgerResult<Withdrawal> {
        let withdrawal = self
            .ledger
            .resolve_withdrawal(withdrawal_id, decision, resolved_by)
            .await?;

        tracing::info!(
            withdrawal_id = %withdrawal.withdrawal_id,
            user_id = %withdrawal.user_id,
            status = %withdrawal.status,
            resolved_by = %resolved_by,
            "Withdrawal resolved"
        );

        Ok(withdrawal)
    }
}
