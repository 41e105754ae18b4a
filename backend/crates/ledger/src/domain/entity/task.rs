//! Task Entity
//!
//! A task offers a fixed reward, credited once per user on completion.
//! Tasks are created and managed by admins.

use chrono::{DateTime, Utc};
use kernel::id::{TaskId, UserId};

use crate::domain::value_object::amount::Amount;

/// Task entity
#[derive(Debug, Clone)]
pub struct Task {
    /// Task ID (UUID v4)
    pub task_id: TaskId,
    /// Short title shown in listings
    pub title: String,
    /// Full description
    pub description: String,
    /// Reward credited on completion (minor units, >= 0)
    pub reward: Amount,
    /// Inactive tasks cannot be completed
    pub active: bool,
    /// Admin who created the task
    pub created_by: UserId,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new active task
    pub fn new(title: String, description: String, reward: Amount, created_by: UserId) -> Self {
        let now = Utc::now();
        Self {
            task_id: TaskId::new(),
            title,
            description,
            reward,
            active: true,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an admin edit; `None` fields keep their current value
    pub fn apply_update(
        &mut self,
        title: Option<String>,
        description: Option<String>,
        reward: Option<Amount>,
        active: Option<bool>,
    ) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(reward) = reward {
            self.reward = reward;
        }
        if let Some(active) = active {
            self.active = active;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_is_active() {
        let task = Task::new(
            "Survey".to_string(),
            "Fill out the survey".to_string(),
            Amount::new(10).unwrap(),
            UserId::new(),
        );
        assert!(task.active);
        assert_eq!(task.reward.as_i64(), 10);
    }

    #[test]
    fn test_apply_update_partial() {
        let mut task = Task::new(
            "Survey".to_string(),
            "Fill out the survey".to_string(),
            Amount::new(10).unwrap(),
            UserId::new(),
        );

        task.apply_update(None, None, Some(Amount::new(25).unwrap()), Some(false));

        assert_eq!(task.title, "Survey");
        assert_eq!(task.reward.as_i64(), 25);
        assert!(!task.active);
    }
}
