//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::{task::Task, withdrawal::Withdrawal};
use crate::domain::repository::{ReferralListItem, TaskWithCompletion};
use crate::domain::value_object::withdrawal_status::Decision;

// ============================================================================
// Tasks
// ============================================================================

/// Task listing entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub reward: i64,
    pub active: bool,
    /// Whether the calling user already completed this task
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    pub created_at_ms: i64,
}

impl From<&TaskWithCompletion> for TaskResponse {
    fn from(entry: &TaskWithCompletion) -> Self {
        Self {
            completed: Some(entry.completed),
            ..TaskResponse::from(&entry.task)
        }
    }
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.task_id.to_string(),
            title: task.title.clone(),
            description: task.description.clone(),
            reward: task.reward.as_i64(),
            active: task.active,
            completed: None,
            created_at_ms: task.created_at.timestamp_millis(),
        }
    }
}

/// Completion result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTaskResponse {
    pub reward: i64,
    pub new_balance: i64,
}

/// Create task request (admin)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub reward: i64,
}

/// Update task request (admin); absent fields keep their current value
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub reward: Option<i64>,
    pub active: Option<bool>,
}

// ============================================================================
// Withdrawals
// ============================================================================

/// Create withdrawal request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWithdrawalRequest {
    pub amount: i64,
}

/// Withdrawal response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalResponse {
    pub id: String,
    pub amount: i64,
    pub status: String,
    pub requested_at_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at_ms: Option<i64>,
}

impl From<&Withdrawal> for WithdrawalResponse {
    fn from(w: &Withdrawal) -> Self {
        Self {
            id: w.withdrawal_id.to_string(),
            amount: w.amount.as_i64(),
            status: w.status.code().to_string(),
            requested_at_ms: w.requested_at.timestamp_millis(),
            resolved_at_ms: w.resolved_at.map(|t| t.timestamp_millis()),
        }
    }
}

/// Resolve withdrawal request (admin)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveWithdrawalRequest {
    pub decision: Decision,
}

/// Query parameters for the admin withdrawal listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWithdrawalsQuery {
    /// "pending" | "approved" | "rejected"
    pub status: Option<String>,
}

// ============================================================================
// Referrals
// ============================================================================

/// Referral listing entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralResponse {
    pub referred_public_id: String,
    pub referred_user_name: String,
    pub bonus: i64,
    pub granted_at_ms: i64,
}

impl From<&ReferralListItem> for ReferralResponse {
    fn from(item: &ReferralListItem) -> Self {
        Self {
            referred_public_id: item.referred_public_id.clone(),
            referred_user_name: item.referred_user_name.clone(),
            bonus: item.bonus.as_i64(),
            granted_at_ms: item.granted_at.timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::amount::Amount;
    use kernel::id::UserId;

    #[test]
    fn test_task_response_with_completion() {
        let task = Task::new(
            "Survey".to_string(),
            "desc".to_string(),
            Amount::new(10).unwrap(),
            UserId::new(),
        );
        let entry = TaskWithCompletion {
            task,
            completed: true,
        };

        let resp = TaskResponse::from(&entry);
        assert_eq!(resp.completed, Some(true));
        assert_eq!(resp.reward, 10);
    }

    #[test]
    fn test_withdrawal_response_status_code() {
        let w = Withdrawal::new(UserId::new(), Amount::positive(5).unwrap());
        let resp = WithdrawalResponse::from(&w);
        assert_eq!(resp.status, "pending");
        assert!(resp.resolved_at_ms.is_none());
    }

    #[test]
    fn test_resolve_request_deserialize() {
        let req: ResolveWithdrawalRequest =
            serde_json::from_str(r#"{"decision": "reject"}"#).unwrap();
        assert_eq!(req.decision, Decision::Reject);
    }
}
