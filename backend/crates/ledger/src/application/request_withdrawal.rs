//! Request Withdrawal Use Case
//!
//! Validates the amount, then debits the balance and creates the pending
//! withdrawal in one atomic ledger operation.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::withdrawal::Withdrawal;
use crate::domain::repository::BalanceLedger;
use crate::domain::value_object::amount::Amount;
use crate::error::LedgerResult;

/// Request withdrawal use case
pub struct RequestWithdrawalUseCase<L>
where
    L: BalanceLedger,
{
    ledger: Arc<L>,
}

impl<L> RequestWithdrawalUseCase<L>
where
    L: BalanceLedger,
{
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    pub async fn execute(&self, user_id: &UserId, amount: i64) -> LedgerResult<Withdrawal> {
        // Amount must be strictly positive; the balance check happens
        // atomically inside the ledger operation
        let amount = Amount::positive(amount)?;

        let withdrawal = Withdrawal::new(*user_id, amount);
        let new_balance = self.ledger.debit_withdrawal(&withdrawal).await?;

        tracing::info!(
            user_id = %user_id,
            withdrawal_id = %withdrawal.withdrawal_id,
            amount = amount.as_i64(),
            new_balance,
            "Withdrawal requested"
        );

        Ok(withdrawal)
    }
}
