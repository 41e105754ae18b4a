//! HTTP Handlers
//!
//! Identity comes from the `AuthContext` request extension inserted by the
//! auth middleware; these routes are never mounted without it.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;

use auth::AuthContext;
use kernel::id::{TaskId, WithdrawalId};
use kernel::response::ApiResponse;
use uuid::Uuid;

use crate::application::{
    CompleteTaskUseCase, CreateTaskInput, CreateTaskUseCase, ListReferralsUseCase,
    ListTasksUseCase, ListWithdrawalsUseCase, RequestWithdrawalUseCase, ResolveWithdrawalUseCase,
    UpdateTaskInput, UpdateTaskUseCase,
};
use crate::domain::repository::{
    BalanceLedger, ReferralRepository, TaskRepository, WithdrawalRepository,
};
use crate::domain::value_object::withdrawal_status::WithdrawalStatus;
use crate::error::{LedgerError, LedgerResult};
use crate::presentation::dto::{
    CompleteTaskResponse, CreateTaskRequest, CreateWithdrawalRequest, ListWithdrawalsQuery,
    ReferralResponse, ResolveWithdrawalRequest, TaskResponse, UpdateTaskRequest,
    WithdrawalResponse,
};

/// Shared state for ledger handlers
#[derive(Clone)]
pub struct LedgerAppState<L>
where
    L: BalanceLedger
        + TaskRepository
        + WithdrawalRepository
        + ReferralRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub repo: Arc<L>,
}

fn parse_task_id(raw: &str) -> LedgerResult<TaskId> {
    raw.parse::<Uuid>()
        .map(TaskId::from_uuid)
        .map_err(|_| LedgerError::TaskNotFound)
}

fn parse_withdrawal_id(raw: &str) -> LedgerResult<WithdrawalId> {
    raw.parse::<Uuid>()
        .map(WithdrawalId::from_uuid)
        .map_err(|_| LedgerError::WithdrawalNotFound)
}

// ============================================================================
// Tasks
// ============================================================================

/// GET /api/tasks
pub async fn list_tasks<L>(
    State(state): State<LedgerAppState<L>>,
    Extension(ctx): Extension<AuthContext>,
) -> LedgerResult<Json<ApiResponse<Vec<TaskResponse>>>>
where
    L: BalanceLedger
        + TaskRepository
        + WithdrawalRepository
        + ReferralRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = ListTasksUseCase::new(state.repo.clone());
    let tasks = use_case.for_user(&ctx.user_id).await?;

    Ok(Json(ApiResponse::ok(
        tasks.iter().map(TaskResponse::from).collect(),
    )))
}

/// POST /api/tasks/{id}/complete
pub async fn complete_task<L>(
    State(state): State<LedgerAppState<L>>,
    Extension(ctx): Extension<AuthContext>,
    Path(task_id): Path<String>,
) -> LedgerResult<Json<ApiResponse<CompleteTaskResponse>>>
where
    L: BalanceLedger
        + TaskRepository
        + WithdrawalRepository
        + ReferralRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let task_id = parse_task_id(&task_id)?;

    let use_case = CompleteTaskUseCase::new(state.repo.clone());
    let credit = use_case.execute(&ctx.user_id, &task_id).await?;

    Ok(Json(ApiResponse::ok(CompleteTaskResponse {
        reward: credit.reward.as_i64(),
        new_balance: credit.new_balance,
    })))
}

// ============================================================================
// Withdrawals
// ============================================================================

/// POST /api/withdrawals
pub async fn create_withdrawal<L>(
    State(state): State<LedgerAppState<L>>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<CreateWithdrawalRequest>,
) -> LedgerResult<impl IntoResponse>
where
    L: BalanceLedger
        + TaskRepository
        + WithdrawalRepository
        + ReferralRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = RequestWithdrawalUseCase::new(state.repo.clone());
    let withdrawal = use_case.execute(&ctx.user_id, req.amount).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(WithdrawalResponse::from(&withdrawal))),
    ))
}

/// GET /api/withdrawals
pub async fn list_withdrawals<L>(
    State(state): State<LedgerAppState<L>>,
    Extension(ctx): Extension<AuthContext>,
) -> LedgerResult<Json<ApiResponse<Vec<WithdrawalResponse>>>>
where
    L: BalanceLedger
        + TaskRepository
        + WithdrawalRepository
        + ReferralRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = ListWithdrawalsUseCase::new(state.repo.clone());
    let withdrawals = use_case.for_user(&ctx.user_id).await?;

    Ok(Json(ApiResponse::ok(
        withdrawals.iter().map(WithdrawalResponse::from).collect(),
    )))
}

// ============================================================================
// Referrals
// ============================================================================

/// GET /api/referrals
pub async fn list_referrals<L>(
    State(state): State<LedgerAppState<L>>,
    Extension(ctx): Extension<AuthContext>,
) -> LedgerResult<Json<ApiResponse<Vec<ReferralResponse>>>>
where
    L: BalanceLedger
        + TaskRepository
        + WithdrawalRepository
        + ReferralRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = ListReferralsUseCase::new(state.repo.clone());
    let referrals = use_case.execute(&ctx.user_id).await?;

    Ok(Json(ApiResponse::ok(
        referrals.iter().map(ReferralResponse::from).collect(),
    )))
}

// ============================================================================
// Admin: tasks
// ============================================================================

/// POST /api/admin/tasks
pub async fn create_task<L>(
    State(state): State<LedgerAppState<L>>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> LedgerResult<impl IntoResponse>
where
    L: BalanceLedger
        + TaskRepository
        + WithdrawalRepository
        + ReferralRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = CreateTaskUseCase::new(state.repo.clone());
    let task = use_case
        .execute(
            CreateTaskInput {
                title: req.title,
                description: req.description,
                reward: req.reward,
            },
            &ctx.user_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(TaskResponse::from(&task))),
    ))
}

/// GET /api/admin/tasks
pub async fn list_all_tasks<L>(
    State(state): State<LedgerAppState<L>>,
) -> LedgerResult<Json<ApiResponse<Vec<TaskResponse>>>>
where
    L: BalanceLedger
        + TaskRepository
        + WithdrawalRepository
        + ReferralRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = ListTasksUseCase::new(state.repo.clone());
    let tasks = use_case.all().await?;

    Ok(Json(ApiResponse::ok(
        tasks.iter().map(TaskResponse::from).collect(),
    )))
}

/// PATCH /api/admin/tasks/{id}
pub async fn update_task<L>(
    State(state): State<LedgerAppState<L>>,
    Path(task_id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> LedgerResult<Json<ApiResponse<TaskResponse>>>
where
    L: BalanceLedger
        + TaskRepository
        + WithdrawalRepository
        + ReferralRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let task_id = parse_task_id(&task_id)?;

    let use_case = UpdateTaskUseCase::new(state.repo.clone());
    let task = use_case
        .execute(
            &task_id,
            UpdateTaskInput {
                title: req.title,
                description: req.description,
                reward: req.reward,
                active: req.active,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(TaskResponse::from(&task))))
}

// ============================================================================
// Admin: withdrawals
// ============================================================================

/// GET /api/admin/withdrawals
pub async fn list_all_withdrawals<L>(
    State(state): State<LedgerAppState<L>>,
    Query(query): Query<ListWithdrawalsQuery>,
) -> LedgerResult<Json<ApiResponse<Vec<WithdrawalResponse>>>>
where
    L: BalanceLedger
        + TaskRepository
        + WithdrawalRepository
        + ReferralRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let status = match query.status.as_deref() {
        None => None,
        Some("pending") => Some(WithdrawalStatus::Pending),
        Some("approved") => Some(WithdrawalStatus::Approved),
        Some("rejected") => Some(WithdrawalStatus::Rejected),
        Some(other) => {
            return Err(LedgerError::Validation(format!(
                "Unknown status filter: {other}"
            )));
        }
    };

    let use_case = ListWithdrawalsUseCase::new(state.repo.clone());
    let withdrawals = use_case.all(status).await?;

    Ok(Json(ApiResponse::ok(
        withdrawals.iter().map(WithdrawalResponse::from).collect(),
    )))
}

/// PATCH /api/admin/withdrawals/{id}
pub async fn resolve_withdrawal<L>(
    State(state): State<LedgerAppState<L>>,
    Extension(ctx): Extension<AuthContext>,
    Path(withdrawal_id): Path<String>,
    Json(req): Json<ResolveWithdrawalRequest>,
) -> LedgerResult<Json<ApiResponse<WithdrawalResponse>>>
where
    L: BalanceLedger
        + TaskRepository
        + WithdrawalRepository
        + ReferralRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let withdrawal_id = parse_withdrawal_id(&withdrawal_id)?;

    let use_case = ResolveWithdrawalUseCase::new(state.repo.clone());
    let withdrawal = use_case
        .execute(&withdrawal_id, req.decision, &ctx.user_id)
        .await?;

    Ok(Json(ApiResponse::ok(WithdrawalResponse::from(&withdrawal))))
}
