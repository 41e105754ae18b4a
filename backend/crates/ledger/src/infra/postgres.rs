//! PostgreSQL Repository Implementations
//!
//! Every balance mutation runs as one transaction built from conditional
//! statements (`UPDATE ... WHERE balance >= $n RETURNING`, `INSERT ... ON
//! CONFLICT DO NOTHING`), never as read-then-write across statements. An
//! early return before `commit` drops the transaction and rolls back.

use chrono::{DateTime, Utc};
use kernel::id::{TaskId, UserId, WithdrawalId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{referral::Referral, task::Task, withdrawal::Withdrawal};
use crate::domain::repository::{
    BalanceLedger, ReferralListItem, ReferralRepository, TaskRepository, TaskRewardCredit,
    TaskWithCompletion, WithdrawalRepository,
};
use crate::domain::value_object::amount::Amount;
use crate::domain::value_object::withdrawal_status::{Decision, WithdrawalStatus};
use crate::error::{LedgerError, LedgerResult};

/// PostgreSQL-backed ledger repository
#[derive(Clone)]
pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Balance Ledger Implementation (atomic operations)
// ============================================================================

impl BalanceLedger for PgLedgerRepository {
    async fn credit_task_reward(
        &self,
        user_id: &UserId,
        task_id: &TaskId,
    ) -> LedgerResult<TaskRewardCredit> {
        let mut tx = self.pool.begin().await?;

        // Missing and inactive tasks answer identically
        let reward = sqlx::query_scalar::<_, i64>(
            "SELECT reward FROM tasks WHERE task_id = $1 AND active = TRUE",
        )
        .bind(task_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(LedgerError::TaskNotFound)?;

        // The unique (user_id, task_id) pair is the duplicate guard
        let inserted = sqlx::query(
            r#"
            INSERT INTO task_completions (user_id, task_id, reward, completed_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, task_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(task_id.as_uuid())
        .bind(reward)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(LedgerError::TaskAlreadyCompleted);
        }

        let new_balance = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE users
            SET balance = balance + $2, updated_at = $3
            WHERE user_id = $1
            RETURNING balance
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(reward)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(LedgerError::UserNotFound)?;

        tx.commit().await?;

        Ok(TaskRewardCredit {
            reward: Amount::from_db(reward),
            new_balance,
        })
    }

    async fn debit_withdrawal(&self, withdrawal: &Withdrawal) -> LedgerResult<i64> {
        let mut tx = self.pool.begin().await?;

        // Conditional debit: zero rows means the balance cannot cover it
        let new_balance = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE users
            SET balance = balance - $2, updated_at = $3
            WHERE user_id = $1 AND balance >= $2
            RETURNING balance
            "#,
        )
        .bind(withdrawal.user_id.as_uuid())
        .bind(withdrawal.amount.as_i64())
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        let new_balance = match new_balance {
            Some(balance) => balance,
            None => {
                let exists =
                    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
                        .bind(withdrawal.user_id.as_uuid())
                        .fetch_one(&mut *tx)
                        .await?;

                return Err(if exists {
                    LedgerError::InsufficientBalance
                } else {
                    LedgerError::UserNotFound
                });
            }
        };

        sqlx::query(
            r#"
            INSERT INTO withdrawals (
                withdrawal_id,
                user_id,
                amount,
                status,
                requested_at,
                resolved_at,
                resolved_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(withdrawal.withdrawal_id.as_uuid())
        .bind(withdrawal.user_id.as_uuid())
        .bind(withdrawal.amount.as_i64())
        .bind(withdrawal.status.id())
        .bind(withdrawal.requested_at)
        .bind(withdrawal.resolved_at)
        .bind(withdrawal.resolved_by.map(|id| *id.as_uuid()))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(new_balance)
    }

    async fn resolve_withdrawal(
        &self,
        withdrawal_id: &WithdrawalId,
        decision: Decision,
        resolved_by: &UserId,
    ) -> LedgerResult<Withdrawal> {
        let mut tx = self.pool.begin().await?;

        // Conditional status flip: only a pending row can be resolved
        let row = sqlx::query_as::<_, WithdrawalRow>(
            r#"
            UPDATE withdrawals
            SET status = $2, resolved_at = $3, resolved_by = $4
            WHERE withdrawal_id = $1 AND status = $5
            RETURNING
                withdrawal_id,
                user_id,
                amount,
                status,
                requested_at,
                resolved_at,
                resolved_by
            "#,
        )
        .bind(withdrawal_id.as_uuid())
        .bind(decision.target_status().id())
        .bind(Utc::now())
        .bind(resolved_by.as_uuid())
        .bind(WithdrawalStatus::Pending.id())
        .fetch_optional(&mut *tx)
        .await?;

        let row = match row {
            Some(row) => row,
            None => {
                let exists = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM withdrawals WHERE withdrawal_id = $1)",
                )
                .bind(withdrawal_id.as_uuid())
                .fetch_one(&mut *tx)
                .await?;

                return Err(if exists {
                    LedgerError::AlreadyResolved
                } else {
                    LedgerError::WithdrawalNotFound
                });
            }
        };

        // Rejection credits the exact debited amount back
        if decision.refunds() {
            sqlx::query(
                r#"
                UPDATE users
                SET balance = balance + $2, updated_at = $3
                WHERE user_id = $1
                "#,
            )
            .bind(row.user_id)
            .bind(row.amount)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        row.into_withdrawal()
    }

    async fn grant_referral_bonus(&self, referral: &Referral) -> LedgerResult<i64> {
        let mut tx = self.pool.begin().await?;

        // The unique (referrer_id, referred_id) pair is the granted-once guard
        let inserted = sqlx::query(
            r#"
            INSERT INTO referrals (referral_id, referrer_id, referred_id, bonus, granted_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (referrer_id, referred_id) DO NOTHING
            "#,
        )
        .bind(referral.referral_id.as_uuid())
        .bind(referral.referrer_id.as_uuid())
        .bind(referral.referred_id.as_uuid())
        .bind(referral.bonus.as_i64())
        .bind(referral.granted_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(LedgerError::BonusAlreadyGranted);
        }

        let new_balance = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE users
            SET balance = balance + $2, updated_at = $3
            WHERE user_id = $1
            RETURNING balance
            "#,
        )
        .bind(referral.referrer_id.as_uuid())
        .bind(referral.bonus.as_i64())
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(LedgerError::UserNotFound)?;

        tx.commit().await?;

        Ok(new_balance)
    }

    async fn balance(&self, user_id: &UserId) -> LedgerResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT balance FROM users WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(LedgerError::UserNotFound)
    }
}

// ============================================================================
// Task Repository Implementation
// ============================================================================

impl TaskRepository for PgLedgerRepository {
    async fn create(&self, task: &Task) -> LedgerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (
                task_id,
                title,
                description,
                reward,
                active,
                created_by,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(task.task_id.as_uuid())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.reward.as_i64())
        .bind(task.active)
        .bind(task.created_by.as_uuid())
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, task_id: &TaskId) -> LedgerResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT
                task_id,
                title,
                description,
                reward,
                active,
                created_by,
                created_at,
                updated_at
            FROM tasks
            WHERE task_id = $1
            "#,
        )
        .bind(task_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_task()))
    }

    async fn update(&self, task: &Task) -> LedgerResult<()> {
        sqlx::query(
            r#"
            UPDATE tasks SET
                title = $2,
                description = $3,
                reward = $4,
                active = $5,
                updated_at = $6
            WHERE task_id = $1
            "#,
        )
        .bind(task.task_id.as_uuid())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.reward.as_i64())
        .bind(task.active)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> LedgerResult<Vec<TaskWithCompletion>> {
        let rows = sqlx::query_as::<_, TaskWithCompletionRow>(
            r#"
            SELECT
                t.task_id,
                t.title,
                t.description,
                t.reward,
                t.active,
                t.created_by,
                t.created_at,
                t.updated_at,
                (tc.task_id IS NOT NULL) AS completed
            FROM tasks t
            LEFT JOIN task_completions tc
                ON tc.task_id = t.task_id AND tc.user_id = $1
            WHERE t.active = TRUE
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_entry()).collect())
    }

    async fn list_all(&self) -> LedgerResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT
                task_id,
                title,
                description,
                reward,
                active,
                created_by,
                created_at,
                updated_at
            FROM tasks
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_task()).collect())
    }
}

// ============================================================================
// Withdrawal Repository Implementation
// ============================================================================

const WITHDRAWAL_COLUMNS: &str = r#"
    withdrawal_id,
    user_id,
    amount,
    status,
    requested_at,
    resolved_at,
    resolved_by
"#;

impl WithdrawalRepository for PgLedgerRepository {
    async fn list_by_user(&self, user_id: &UserId) -> LedgerResult<Vec<Withdrawal>> {
        let rows = sqlx::query_as::<_, WithdrawalRow>(&format!(
            "SELECT {WITHDRAWAL_COLUMNS} FROM withdrawals WHERE user_id = $1 ORDER BY requested_at DESC"
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_withdrawal()).collect()
    }

    async fn list(&self, status: Option<WithdrawalStatus>) -> LedgerResult<Vec<Withdrawal>> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, WithdrawalRow>(&format!(
                    "SELECT {WITHDRAWAL_COLUMNS} FROM withdrawals WHERE status = $1 ORDER BY requested_at DESC"
                ))
                .bind(status.id())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, WithdrawalRow>(&format!(
                    "SELECT {WITHDRAWAL_COLUMNS} FROM withdrawals ORDER BY requested_at DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(|r| r.into_withdrawal()).collect()
    }
}

// ============================================================================
// Referral Repository Implementation
// ============================================================================

impl ReferralRepository for PgLedgerRepository {
    async fn list_by_referrer(&self, referrer_id: &UserId) -> LedgerResult<Vec<ReferralListItem>> {
        let rows = sqlx::query_as::<_, ReferralListRow>(
            r#"
            SELECT
                u.public_id AS referred_public_id,
                u.user_name AS referred_user_name,
                r.bonus,
                r.granted_at
            FROM referrals r
            JOIN users u ON u.user_id = r.referred_id
            WHERE r.referrer_id = $1
            ORDER BY r.granted_at DESC
            "#,
        )
        .bind(referrer_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_item()).collect())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct TaskRow {
    task_id: Uuid,
    title: String,
    description: String,
    reward: i64,
    active: bool,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskRow {
    fn into_task(self) -> Task {
        Task {
            task_id: TaskId::from_uuid(self.task_id),
            title: self.title,
            description: self.description,
            reward: Amount::from_db(self.reward),
            active: self.active,
            created_by: UserId::from_uuid(self.created_by),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TaskWithCompletionRow {
    task_id: Uuid,
    title: String,
    description: String,
    reward: i64,
    active: bool,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed: bool,
}

impl TaskWithCompletionRow {
    fn into_entry(self) -> TaskWithCompletion {
        TaskWithCompletion {
            task: Task {
                task_id: TaskId::from_uuid(self.task_id),
                title: self.title,
                description: self.description,
                reward: Amount::from_db(self.reward),
                active: self.active,
                created_by: UserId::from_uuid(self.created_by),
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            completed: self.completed,
        }
    }
}

#[derive(sqlx::FromRow)]
struct WithdrawalRow {
    withdrawal_id: Uuid,
    user_id: Uuid,
    amount: i64,
    status: i16,
    requested_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
    resolved_by: Option<Uuid>,
}

impl WithdrawalRow {
    fn into_withdrawal(self) -> LedgerResult<Withdrawal> {
        let status = WithdrawalStatus::from_id(self.status)
            .ok_or_else(|| LedgerError::Internal(format!("Invalid status: {}", self.status)))?;

        Ok(Withdrawal {
            withdrawal_id: WithdrawalId::from_uuid(self.withdrawal_id),
            user_id: UserId::from_uuid(self.user_id),
            amount: Amount::from_db(self.amount),
            status,
            requested_at: self.requested_at,
            resolved_at: self.resolved_at,
            resolved_by: self.resolved_by.map(UserId::from_uuid),
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReferralListRow {
    referred_public_id: String,
    referred_user_name: String,
    bonus: i64,
    granted_at: DateTime<Utc>,
}

impl ReferralListRow {
    fn into_item(self) -> ReferralListItem {
        ReferralListItem {
            referred_public_id: self.referred_public_id,
            referred_user_name: self.referred_user_name,
            bonus: Amount::from_db(self.bonus),
            granted_at: self.granted_at,
        }
    }
}
