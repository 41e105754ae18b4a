//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure
//! layer. The [`BalanceLedger`] trait is the contract for the four atomic
//! balance operations: each implementation must execute the check and the
//! write as one atomic unit against storage, so that concurrent calls for
//! the same user cannot interleave between check and act.

use chrono::{DateTime, Utc};
use kernel::id::{TaskId, UserId, WithdrawalId};

use crate::domain::entity::{referral::Referral, task::Task, withdrawal::Withdrawal};
use crate::domain::value_object::amount::Amount;
use crate::domain::value_object::withdrawal_status::{Decision, WithdrawalStatus};
use crate::error::LedgerResult;

/// Result of crediting a task reward
#[derive(Debug, Clone)]
pub struct TaskRewardCredit {
    /// Reward that was credited
    pub reward: Amount,
    /// Balance after the credit
    pub new_balance: i64,
}

/// Task listing entry with the caller's completion flag
#[derive(Debug, Clone)]
pub struct TaskWithCompletion {
    pub task: Task,
    pub completed: bool,
}

/// Referral listing entry (joined with the referred user)
#[derive(Debug, Clone)]
pub struct ReferralListItem {
    pub referred_public_id: String,
    pub referred_user_name: String,
    pub bonus: Amount,
    pub granted_at: DateTime<Utc>,
}

/// The atomic balance operations
///
/// Invariants every implementation must uphold:
/// - `credit_task_reward`: completion record insert and balance credit are
///   one transaction; a duplicate (user, task) pair credits nothing.
/// - `debit_withdrawal`: the conditional debit (`balance >= amount`) and the
///   pending record insert are one transaction.
/// - `resolve_withdrawal`: only a pending withdrawal can flip to a terminal
///   status; a rejection credits the exact amount back in the same
///   transaction.
/// - `grant_referral_bonus`: the pair insert and the referrer credit are one
///   transaction; a duplicate pair credits nothing.
#[trait_variant::make(BalanceLedger: Send)]
pub trait LocalBalanceLedger {
    /// Credit a task's reward to a user, once per (user, task)
    async fn credit_task_reward(
        &self,
        user_id: &UserId,
        task_id: &TaskId,
    ) -> LedgerResult<TaskRewardCredit>;

    /// Debit the withdrawal amount and persist the pending record.
    /// Returns the balance after the debit.
    async fn debit_withdrawal(&self, withdrawal: &Withdrawal) -> LedgerResult<i64>;

    /// Apply an admin decision to a pending withdrawal
    async fn resolve_withdrawal(
        &self,
        withdrawal_id: &WithdrawalId,
        decision: Decision,
        resolved_by: &UserId,
    ) -> LedgerResult<Withdrawal>;

    /// Grant the referral bonus, once per (referrer, referred).
    /// Returns the referrer's balance after the credit.
    async fn grant_referral_bonus(&self, referral: &Referral) -> LedgerResult<i64>;

    /// Current balance of a user
    async fn balance(&self, user_id: &UserId) -> LedgerResult<i64>;
}

/// Task repository trait
#[trait_variant::make(TaskRepository: Send)]
pub trait LocalTaskRepository {
    /// Create a new task
    async fn create(&self, task: &Task) -> LedgerResult<()>;

    /// Find task by ID (active or not)
    async fn find_by_id(&self, task_id: &TaskId) -> LedgerResult<Option<Task>>;

    /// Update a task
    async fn update(&self, task: &Task) -> LedgerResult<()>;

    /// List active tasks with the caller's completion flag
    async fn list_for_user(&self, user_id: &UserId) -> LedgerResult<Vec<TaskWithCompletion>>;

    /// List all tasks including inactive (admin)
    async fn list_all(&self) -> LedgerResult<Vec<Task>>;
}

/// Withdrawal query repository trait (mutations go through [`BalanceLedger`])
#[trait_variant::make(WithdrawalRepository: Send)]
pub trait LocalWithdrawalRepository {
    /// List a user's withdrawals, newest first
    async fn list_by_user(&self, user_id: &UserId) -> LedgerResult<Vec<Withdrawal>>;

    /// List withdrawals across all users, optionally filtered by status (admin)
    async fn list(&self, status: Option<WithdrawalStatus>) -> LedgerResult<Vec<Withdrawal>>;
}

/// Referral query repository trait (grants go through [`BalanceLedger`])
#[trait_variant::make(ReferralRepository: Send)]
pub trait LocalReferralRepository {
    /// List bonuses granted to a referrer, newest first
    async fn list_by_referrer(&self, referrer_id: &UserId) -> LedgerResult<Vec<ReferralListItem>>;
}
