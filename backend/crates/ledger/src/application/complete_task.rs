//! Complete Task Use Case
//!
//! Credits the task's reward to the calling user, exactly once per
//! (user, task).

use std::sync::Arc;

use kernel::id::{TaskId, UserId};

use crate::domain::repository::{BalanceLedger, TaskRewardCredit};
use crate::error::LedgerResult;

/// Complete task use case
pub struct CompleteTaskUseCase<L>
where
    L: BalanceLedger,
{
    ledger: Arc<L>,
}

impl<L> CompleteTaskUseCase<L>
where
    L: BalanceLedger,
{
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        task_id: &TaskId,
    ) -> LedgerResult<TaskRewardCredit> {
        let credit = self.ledger.credit_task_reward(user_id, task_id).await?;

        tracing::info!(
            user_id = %user_id,
            task_id = %task_id,
            reward = credit.reward.as_i64(),
            new_balance = credit.new_balance,
            "Task reward credited"
        );

        Ok(credit)
    }
}
