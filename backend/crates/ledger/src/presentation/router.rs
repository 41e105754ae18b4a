//! Ledger Routers

use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;

use crate::domain::repository::{
    BalanceLedger, ReferralRepository, TaskRepository, WithdrawalRepository,
};
use crate::presentation::handlers::{self, LedgerAppState};

/// Create the user-facing ledger router (mounted under `/api`)
///
/// Authentication (require_auth) is layered by the caller.
pub fn ledger_router<L>(repo: Arc<L>) -> Router
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
    let state = LedgerAppState { repo };

    Router::new()
        .route("/tasks", get(handlers::list_tasks::<L>))
        .route("/tasks/{id}/complete", post(handlers::complete_task::<L>))
        .route(
            "/withdrawals",
            post(handlers::create_withdrawal::<L>).get(handlers::list_withdrawals::<L>),
        )
        .route("/referrals", get(handlers::list_referrals::<L>))
        .with_state(state)
}

/// Create the withdrawal resolution router (mounted under `/api`)
///
/// `PATCH /withdrawals/{id}` is an admin decision on a user-facing resource,
/// so it lives beside the user routes. Authorization (require_auth +
/// require_admin) is layered by the caller.
pub fn withdrawal_resolution_router<L>(repo: Arc<L>) -> Router
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
    let state = LedgerAppState { repo };

    Router::new()
        .route(
            "/withdrawals/{id}",
            patch(handlers::resolve_withdrawal::<L>),
        )
        .with_state(state)
}

/// Create the admin ledger router (mounted under `/api/admin`)
///
/// Authorization (require_auth + require_admin) is layered by the caller.
pub fn admin_ledger_router<L>(repo: Arc<L>) -> Router
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
    let state = LedgerAppState { repo };

    Router::new()
        .route(
            "/tasks",
            post(handlers::create_task::<L>).get(handlers::list_all_tasks::<L>),
        )
        .route("/tasks/{id}", patch(handlers::update_task::<L>))
        .route("/withdrawals", get(handlers::list_all_withdrawals::<L>))
        .with_state(state)
}
