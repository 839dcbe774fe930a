use crate::domain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// DTO for creating a new task via the API
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct NewTask {
    /// A missing or null value is treated like empty text and rejected
    #[schema(example = "Buy milk")]
    pub text: Option<String>,
}

impl From<NewTask> for domain::todo::NewTask {
    fn from(value: NewTask) -> Self {
        domain::todo::NewTask {
            text: value.text.unwrap_or_default(),
        }
    }
}

/// DTO for a returned task on the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[schema(example = 10)]
    pub id: i64,
    #[schema(example = "Buy milk")]
    pub text: String,
    #[schema(example = false)]
    pub completed: bool,
    #[schema(example = "2024-06-01T12:30:00Z")]
    pub created_at: DateTime<Utc>,
}

impl From<domain::todo::Task> for Task {
    fn from(value: domain::todo::Task) -> Self {
        Task {
            id: value.id,
            text: value.text,
            completed: value.completed,
            created_at: value.created_at,
        }
    }
}

/// DTO for counts of tasks by completion status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    #[schema(example = 3)]
    pub total_tasks: i64,
    #[schema(example = 1)]
    pub completed_tasks: i64,
    #[schema(example = 2)]
    pub pending_tasks: i64,
}

impl From<domain::todo::TaskStats> for TaskStats {
    fn from(value: domain::todo::TaskStats) -> Self {
        TaskStats {
            total_tasks: value.total_tasks,
            completed_tasks: value.completed_tasks,
            pending_tasks: value.pending_tasks,
        }
    }
}
