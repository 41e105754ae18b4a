//! Query Use Cases
//!
//! Read-only listings; no balance mutation happens here.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::{task::Task, withdrawal::Withdrawal};
use crate::domain::repository::{
    ReferralListItem, ReferralRepository, TaskRepository, TaskWithCompletion,
    WithdrawalRepository,
};
use crate::domain::value_object::withdrawal_status::WithdrawalStatus;
use crate::error::LedgerResult;

/// List tasks use case
pub struct ListTasksUseCase<T>
where
    T: TaskRepository,
{
    task_repo: Arc<T>,
}

impl<T> ListTasksUseCase<T>
where
    T: TaskRepository,
{
    pub fn new(task_repo: Arc<T>) -> Self {
        Self { task_repo }
    }

    /// Active tasks with the caller's completion flag
    pub async fn for_user(&self, user_id: &UserId) -> LedgerResult<Vec<TaskWithCompletion>> {
        self.task_repo.list_for_user(user_id).await
    }

    /// All tasks including inactive (admin)
    pub async fn all(&self) -> LedgerResult<Vec<Task>> {
        self.task_repo.list_all().await
    }
}

/// List withdrawals use case
pub struct ListWithdrawalsUseCase<W>
where
    W: WithdrawalRepository,
{
    withdrawal_repo: Arc<W>,
}

impl<W> ListWithdrawalsUseCase<W>
where
    W: WithdrawalRepository,
{
    pub fn new(withdrawal_repo: Arc<W>) -> Self {
        Self { withdrawal_repo }
    }

    /// The caller's own withdrawals, newest first
    pub async fn for_user(&self, user_id: &UserId) -> LedgerResult<Vec<Withdrawal>> {
        self.withdrawal_repo.list_by_user(user_id).await
    }

    /// Withdrawals across all users (admin)
    pub async fn all(&self, status: Option<WithdrawalStatus>) -> LedgerResult<Vec<Withdrawal>> {
        self.withdrawal_repo.list(status).await
    }
}

/// List referrals use case
pub struct ListReferralsUseCase<R>
where
    R: ReferralRepository,
{
    referral_repo: Arc<R>,
}

impl<R> ListReferralsUseCase<R>
where
    R: ReferralRepository,
{
    pub fn new(referral_repo: Arc<R>) -> Self {
        Self { referral_repo }
    }

    pub async fn execute(&self, referrer_id: &UserId) -> LedgerResult<Vec<ReferralListItem>> {
        self.referral_repo.list_by_referrer(referrer_id).await
    }
}
