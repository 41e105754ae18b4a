//! Unit tests for the ledger crate
//!
//! The scenarios run against an in-memory [`BalanceLedger`] whose operations
//! are check-and-act under one lock, matching the atomicity contract the
//! Postgres implementation gets from transactions.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use kernel::id::{TaskId, UserId, WithdrawalId};
use uuid::Uuid;

use crate::application::{
    CompleteTaskUseCase, RequestWithdrawalUseCase, ResolveWithdrawalUseCase,
};
use crate::domain::entity::{referral::Referral, task::Task, withdrawal::Withdrawal};
use crate::domain::repository::{BalanceLedger, TaskRewardCredit};
use crate::domain::value_object::amount::Amount;
use crate::domain::value_object::withdrawal_status::{Decision, WithdrawalStatus};
use crate::error::{LedgerError, LedgerResult};

// ============================================================================
// In-memory ledger
// ============================================================================

#[derive(Default)]
struct MemState {
    balances: HashMap<Uuid, i64>,
    tasks: HashMap<Uuid, Task>,
    completions: HashSet<(Uuid, Uuid)>,
    withdrawals: HashMap<Uuid, Withdrawal>,
    referral_pairs: HashSet<(Uuid, Uuid)>,
}

#[derive(Clone, Default)]
struct MemLedger {
    state: Arc<Mutex<MemState>>,
}

impl MemLedger {
    fn add_user(&self, balance: i64) -> UserId {
        let user_id = UserId::new();
        self.state
            .lock()
            .unwrap()
            .balances
            .insert(*user_id.as_uuid(), balance);
        user_id
    }

    fn add_task(&self, reward: i64, active: bool) -> TaskId {
        let mut task = Task::new(
            "task".to_string(),
            "test task".to_string(),
            Amount::new(reward).unwrap(),
            UserId::new(),
        );
        task.active = active;
        let task_id = task.task_id;
        self.state
            .lock()
            .unwrap()
            .tasks
            .insert(*task_id.as_uuid(), task);
        task_id
    }

    fn balance_of(&self, user_id: &UserId) -> i64 {
        *self
            .state
            .lock()
            .unwrap()
            .balances
            .get(user_id.as_uuid())
            .unwrap()
    }
}

impl BalanceLedger for MemLedger {
    async fn credit_task_reward(
        &self,
        user_id: &UserId,
        task_id: &TaskId,
    ) -> LedgerResult<TaskRewardCredit> {
        let mut state = self.state.lock().unwrap();

        let reward = match state.tasks.get(task_id.as_uuid()) {
            Some(task) if task.active => task.reward,
            _ => return Err(LedgerError::TaskNotFound),
        };

        if !state.completions.insert((*user_id.as_uuid(), *task_id.as_uuid())) {
            return Err(LedgerError::TaskAlreadyCompleted);
        }

        let balance = state
            .balances
            .get_mut(user_id.as_uuid())
            .ok_or(LedgerError::UserNotFound)?;
        *balance += reward.as_i64();

        Ok(TaskRewardCredit {
            reward,
            new_balance: *balance,
        })
    }

    async fn debit_withdrawal(&self, withdrawal: &Withdrawal) -> LedgerResult<i64> {
        let mut state = self.state.lock().unwrap();

        let balance = state
            .balances
            .get_mut(withdrawal.user_id.as_uuid())
            .ok_or(LedgerError::UserNotFound)?;

        if *balance < withdrawal.amount.as_i64() {
            return Err(LedgerError::InsufficientBalance);
        }

        *balance -= withdrawal.amount.as_i64();
        let new_balance = *balance;

        state
            .withdrawals
            .insert(*withdrawal.withdrawal_id.as_uuid(), withdrawal.clone());

        Ok(new_balance)
    }

    async fn resolve_withdrawal(
        &self,
        withdrawal_id: &WithdrawalId,
        decision: Decision,
        resolved_by: &UserId,
    ) -> LedgerResult<Withdrawal> {
        let mut state = self.state.lock().unwrap();

        let withdrawal = state
            .withdrawals
            .get_mut(withdrawal_id.as_uuid())
            .ok_or(LedgerError::WithdrawalNotFound)?;

        if withdrawal.status.is_terminal() {
            return Err(LedgerError::AlreadyResolved);
        }

        withdrawal.status = decision.target_status();
        withdrawal.resolved_at = Some(Utc::now());
        withdrawal.resolved_by = Some(*resolved_by);
        let resolved = withdrawal.clone();

        if decision.refunds() {
            let balance = state
                .balances
                .get_mut(resolved.user_id.as_uuid())
                .ok_or(LedgerError::UserNotFound)?;
            *balance += resolved.amount.as_i64();
        }

        Ok(resolved)
    }

    async fn grant_referral_bonus(&self, referral: &Referral) -> LedgerResult<i64> {
        let mut state = self.state.lock().unwrap();

        let pair = (
            *referral.referrer_id.as_uuid(),
            *referral.referred_id.as_uuid(),
        );
        if !state.referral_pairs.insert(pair) {
            return Err(LedgerError::BonusAlreadyGranted);
        }

        let balance = state
            .balances
            .get_mut(referral.referrer_id.as_uuid())
            .ok_or(LedgerError::UserNotFound)?;
        *balance += referral.bonus.as_i64();

        Ok(*balance)
    }

    async fn balance(&self, user_id: &UserId) -> LedgerResult<i64> {
        self.state
            .lock()
            .unwrap()
            .balances
            .get(user_id.as_uuid())
            .copied()
            .ok_or(LedgerError::UserNotFound)
    }
}

// ============================================================================
// Task reward tests
// ============================================================================

mod task_rewards {
    use super::*;

    #[tokio::test]
    async fn test_completion_credits_reward() {
        let ledger = MemLedger::default();
        let user = ledger.add_user(0);
        let task = ledger.add_task(10, true);

        let use_case = CompleteTaskUseCase::new(Arc::new(ledger.clone()));
        let credit = use_case.execute(&user, &task).await.unwrap();

        assert_eq!(credit.reward.as_i64(), 10);
        assert_eq!(credit.new_balance, 10);
        assert_eq!(ledger.balance_of(&user), 10);
    }

    #[tokio::test]
    async fn test_duplicate_completion_credits_once() {
        let ledger = MemLedger::default();
        let user = ledger.add_user(0);
        let task = ledger.add_task(10, true);

        let use_case = CompleteTaskUseCase::new(Arc::new(ledger.clone()));
        use_case.execute(&user, &task).await.unwrap();

        let second = use_case.execute(&user, &task).await;
        assert!(matches!(second, Err(LedgerError::TaskAlreadyCompleted)));

        // Credited exactly once
        assert_eq!(ledger.balance_of(&user), 10);
    }

    #[tokio::test]
    async fn test_same_task_different_users() {
        let ledger = MemLedger::default();
        let alice = ledger.add_user(0);
        let bob = ledger.add_user(0);
        let task = ledger.add_task(10, true);

        let use_case = CompleteTaskUseCase::new(Arc::new(ledger.clone()));
        use_case.execute(&alice, &task).await.unwrap();
        use_case.execute(&bob, &task).await.unwrap();

        assert_eq!(ledger.balance_of(&alice), 10);
        assert_eq!(ledger.balance_of(&bob), 10);
    }

    #[tokio::test]
    async fn test_unknown_and_inactive_task() {
        let ledger = MemLedger::default();
        let user = ledger.add_user(0);
        let inactive = ledger.add_task(10, false);

        let use_case = CompleteTaskUseCase::new(Arc::new(ledger.clone()));

        let result = use_case.execute(&user, &TaskId::new()).await;
        assert!(matches!(result, Err(LedgerError::TaskNotFound)));

        let result = use_case.execute(&user, &inactive).await;
        assert!(matches!(result, Err(LedgerError::TaskNotFound)));

        assert_eq!(ledger.balance_of(&user), 0);
    }
}

// ============================================================================
// Withdrawal tests
// ============================================================================

mod withdrawals {
    use super::*;

    #[tokio::test]
    async fn test_withdrawal_debits_balance() {
        let ledger = MemLedger::default();
        let user = ledger.add_user(100);

        let use_case = RequestWithdrawalUseCase::new(Arc::new(ledger.clone()));
        let withdrawal = use_case.execute(&user, 40).await.unwrap();

        assert_eq!(withdrawal.status, WithdrawalStatus::Pending);
        assert_eq!(withdrawal.amount.as_i64(), 40);
        assert_eq!(ledger.balance_of(&user), 60);
    }

    #[tokio::test]
    async fn test_overdraw_fails_and_balance_unchanged() {
        let ledger = MemLedger::default();
        let user = ledger.add_user(10);

        let use_case = RequestWithdrawalUseCase::new(Arc::new(ledger.clone()));
        let result = use_case.execute(&user, 15).await;

        assert!(matches!(result, Err(LedgerError::InsufficientBalance)));
        assert_eq!(ledger.balance_of(&user), 10);
    }

    #[tokio::test]
    async fn test_invalid_amounts() {
        let ledger = MemLedger::default();
        let user = ledger.add_user(100);

        let use_case = RequestWithdrawalUseCase::new(Arc::new(ledger.clone()));

        assert!(matches!(
            use_case.execute(&user, 0).await,
            Err(LedgerError::InvalidAmount)
        ));
        assert!(matches!(
            use_case.execute(&user, -5).await,
            Err(LedgerError::InvalidAmount)
        ));
        assert_eq!(ledger.balance_of(&user), 100);
    }

    #[tokio::test]
    async fn test_jointly_overdrawing_requests_one_succeeds() {
        // Two requests that individually fit but jointly exceed the balance
        let ledger = MemLedger::default();
        let user = ledger.add_user(100);

        let use_case = Arc::new(RequestWithdrawalUseCase::new(Arc::new(ledger.clone())));

        let (a, b) = tokio::join!(use_case.execute(&user, 70), use_case.execute(&user, 70));

        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);

        let failure = if a.is_err() { a } else { b };
        assert!(matches!(failure, Err(LedgerError::InsufficientBalance)));

        assert_eq!(ledger.balance_of(&user), 30);
    }

    #[tokio::test]
    async fn test_reject_restores_exact_amount() {
        let ledger = MemLedger::default();
        let user = ledger.add_user(100);
        let admin = UserId::new();

        let request = RequestWithdrawalUseCase::new(Arc::new(ledger.clone()));
        let withdrawal = request.execute(&user, 40).await.unwrap();
        assert_eq!(ledger.balance_of(&user), 60);

        let resolve = ResolveWithdrawalUseCase::new(Arc::new(ledger.clone()));
        let resolved = resolve
            .execute(&withdrawal.withdrawal_id, Decision::Reject, &admin)
            .await
            .unwrap();

        assert_eq!(resolved.status, WithdrawalStatus::Rejected);
        assert_eq!(ledger.balance_of(&user), 100);
    }

    #[tokio::test]
    async fn test_approve_leaves_balance_debited() {
        let ledger = MemLedger::default();
        let user = ledger.add_user(100);
        let admin = UserId::new();

        let request = RequestWithdrawalUseCase::new(Arc::new(ledger.clone()));
        let withdrawal = request.execute(&user, 40).await.unwrap();

        let resolve = ResolveWithdrawalUseCase::new(Arc::new(ledger.clone()));
        let resolved = resolve
            .execute(&withdrawal.withdrawal_id, Decision::Approve, &admin)
            .await
            .unwrap();

        assert_eq!(resolved.status, WithdrawalStatus::Approved);
        assert_eq!(resolved.resolved_by, Some(admin));
        assert_eq!(ledger.balance_of(&user), 60);
    }

    #[tokio::test]
    async fn test_resolve_twice_fails() {
        let ledger = MemLedger::default();
        let user = ledger.add_user(100);
        let admin = UserId::new();

        let request = RequestWithdrawalUseCase::new(Arc::new(ledger.clone()));
        let withdrawal = request.execute(&user, 40).await.unwrap();

        let resolve = ResolveWithdrawalUseCase::new(Arc::new(ledger.clone()));
        resolve
            .execute(&withdrawal.withdrawal_id, Decision::Reject, &admin)
            .await
            .unwrap();

        // Approving after rejection must not debit again
        let second = resolve
            .execute(&withdrawal.withdrawal_id, Decision::Approve, &admin)
            .await;
        assert!(matches!(second, Err(LedgerError::AlreadyResolved)));
        assert_eq!(ledger.balance_of(&user), 100);
    }

    #[tokio::test]
    async fn test_resolve_unknown_withdrawal() {
        let ledger = MemLedger::default();
        let admin = UserId::new();

        let resolve = ResolveWithdrawalUseCase::new(Arc::new(ledger));
        let result = resolve
            .execute(&WithdrawalId::new(), Decision::Approve, &admin)
            .await;

        assert!(matches!(result, Err(LedgerError::WithdrawalNotFound)));
    }
}

// ============================================================================
// Referral tests
// ============================================================================

mod referrals {
    use super::*;
    use crate::application::config::LedgerConfig;
    use crate::application::grant_referral::ReferralBonusService;

    fn service(ledger: &MemLedger) -> ReferralBonusService<MemLedger> {
        ReferralBonusService::new(
            Arc::new(ledger.clone()),
            Arc::new(LedgerConfig::new(Amount::new(500).unwrap())),
        )
    }

    #[tokio::test]
    async fn test_bonus_granted_once() {
        let ledger = MemLedger::default();
        let referrer = ledger.add_user(0);
        let referred = ledger.add_user(0);

        let service = service(&ledger);

        let new_balance = service.grant_bonus(&referrer, &referred).await.unwrap();
        assert_eq!(new_balance, 500);

        let second = service.grant_bonus(&referrer, &referred).await;
        assert!(matches!(second, Err(LedgerError::BonusAlreadyGranted)));
        assert_eq!(ledger.balance_of(&referrer), 500);
    }

    #[tokio::test]
    async fn test_self_referral_rejected() {
        let ledger = MemLedger::default();
        let user = ledger.add_user(0);

        let service = service(&ledger);
        let result = service.grant_bonus(&user, &user).await;

        assert!(matches!(result, Err(LedgerError::SelfReferral)));
        assert_eq!(ledger.balance_of(&user), 0);
    }

    #[tokio::test]
    async fn test_distinct_pairs_grant_independently() {
        let ledger = MemLedger::default();
        let referrer = ledger.add_user(0);
        let first = ledger.add_user(0);
        let second = ledger.add_user(0);

        let service = service(&ledger);
        service.grant_bonus(&referrer, &first).await.unwrap();
        service.grant_bonus(&referrer, &second).await.unwrap();

        assert_eq!(ledger.balance_of(&referrer), 1000);
    }
}

// ============================================================================
// End-to-end ledger scenario
// ============================================================================

mod scenario {
    use super::*;

    #[tokio::test]
    async fn test_full_reward_withdrawal_cycle() {
        let ledger = MemLedger::default();
        let user = ledger.add_user(0);
        let admin = UserId::new();
        let task = ledger.add_task(10, true);

        let complete = CompleteTaskUseCase::new(Arc::new(ledger.clone()));
        let request = RequestWithdrawalUseCase::new(Arc::new(ledger.clone()));
        let resolve = ResolveWithdrawalUseCase::new(Arc::new(ledger.clone()));

        // Complete a task worth 10 -> balance 10
        let credit = complete.execute(&user, &task).await.unwrap();
        assert_eq!(credit.new_balance, 10);

        // Withdrawal of 15 fails, balance unchanged
        let overdraw = request.execute(&user, 15).await;
        assert!(matches!(overdraw, Err(LedgerError::InsufficientBalance)));
        assert_eq!(ledger.balance_of(&user), 10);

        // Withdrawal of 10 -> balance 0, status pending
        let withdrawal = request.execute(&user, 10).await.unwrap();
        assert_eq!(withdrawal.status, WithdrawalStatus::Pending);
        assert_eq!(ledger.balance_of(&user), 0);

        // Admin rejects -> balance back to 10
        let resolved = resolve
            .execute(&withdrawal.withdrawal_id, Decision::Reject, &admin)
            .await
            .unwrap();
        assert_eq!(resolved.status, WithdrawalStatus::Rejected);
        assert_eq!(ledger.balance_of(&user), 10);

        // Balance never went negative at any step
        assert!(ledger.balance_of(&user) >= 0);
    }
}
