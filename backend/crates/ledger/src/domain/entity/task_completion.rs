//! Task Completion Entity
//!
//! One row per (user, task); the unique pair is the no-duplicate-reward
//! guard. The reward is snapshotted at completion time so a later task edit
//! does not rewrite history.

use chrono::{DateTime, Utc};
use kernel::id::{TaskId, UserId};

use crate::domain::value_object::amount::Amount;

/// Task completion record
#[derive(Debug, Clone)]
pub struct TaskCompletion {
    pub user_id: UserId,
    pub task_id: TaskId,
    /// Reward credited at completion time
    pub reward: Amount,
    pub completed_at: DateTime<Utc>,
}

impl TaskCompletion {
    pub fn new(user_id: UserId, task_id: TaskId, reward: Amount) -> Self {
        Self {
            user_id,
            task_id,
            reward,
            completed_at: Utc::now(),
        }
    }
}
