//! Task Management Use Cases (admin)

use std::sync::Arc;

use kernel::id::{TaskId, UserId};

use crate::domain::entity::task::Task;
use crate::domain::repository::TaskRepository;
use crate::domain::value_object::amount::Amount;
use crate::error::{LedgerError, LedgerResult};

/// Maximum title length in characters
pub const TASK_TITLE_MAX_LENGTH: usize = 120;

/// Create task input
pub struct CreateTaskInput {
    pub title: String,
    pub description: String,
    pub reward: i64,
}

/// Create task use case
pub struct CreateTaskUseCase<T>
where
    T: TaskRepository,
{
    task_repo: Arc<T>,
}

impl<T> CreateTaskUseCase<T>
where
    T: TaskRepository,
{
    pub fn new(task_repo: Arc<T>) -> Self {
        Self { task_repo }
    }

    pub async fn execute(&self, input: CreateTaskInput, created_by: &UserId) -> LedgerResult<Task> {
        let title = input.title.trim().to_string();
        if title.is_empty() || title.chars().count() > TASK_TITLE_MAX_LENGTH {
            return Err(LedgerError::Validation(format!(
                "Task title must be 1-{TASK_TITLE_MAX_LENGTH} characters"
            )));
        }

        let reward = Amount::new(input.reward)?;

        let task = Task::new(title, input.description, reward, *created_by);
        self.task_repo.create(&task).await?;

        tracing::info!(
            task_id = %task.task_id,
            reward = task.reward.as_i64(),
            created_by = %created_by,
            "Task created"
        );

        Ok(task)
    }
}

/// Update task input; `None` fields keep their current value
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub reward: Option<i64>,
    pub active: Option<bool>,
}

/// Update task use case
pub struct UpdateTaskUseCase<T>
where
    T: TaskRepository,
{
    task_repo: Arc<T>,
}

impl<T> UpdateTaskUseCase<T>
where
    T: TaskRepository,
{
    pub fn new(task_repo: Arc<T>) -> Self {
        Self { task_repo }
    }

    pub async fn execute(&self, task_id: &TaskId, input: UpdateTaskInput) -> LedgerResult<Task> {
        let mut task = self
            .task_repo
            .find_by_id(task_id)
            .await?
            .ok_or(LedgerError::TaskNotFound)?;

        let reward = input.reward.map(Amount::new).transpose()?;

        task.apply_update(input.title, input.description, reward, input.active);
        self.task_repo.update(&task).await?;

        tracing::info!(task_id = %task.task_id, "Task updated");

        Ok(task)
    }
}
