use crate::domain::todo::driven_ports::{TaskReader, TaskWriter};
use crate::domain::todo::driving_ports::TaskError;
use crate::external_connections::ExternalConnectivity;
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use tracing::{error, info};
use validator::{Validate, ValidationError};

/// Message attached to the `text` field when a task is submitted without any content
pub const BLANK_TEXT_MESSAGE: &str = "Task text cannot be empty";
/// Message attached to the `text` field when the text contains a NUL character, which the
/// task store cannot hold
pub const NUL_TEXT_MESSAGE: &str = "Task text cannot contain NUL characters";

#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Validate)]
#[cfg_attr(test, derive(Clone, Debug))]
pub struct NewTask {
    #[validate(custom = "storable_text")]
    pub text: String,
}

impl NewTask {
    /// The task as it should be stored, with surrounding whitespace removed
    fn trimmed(&self) -> NewTask {
        NewTask {
            text: self.text.trim().to_owned(),
        }
    }
}

fn storable_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        let mut blank_err = ValidationError::new("blank");
        blank_err.message = Some(Cow::Borrowed(BLANK_TEXT_MESSAGE));
        return Err(blank_err);
    }
    if text.contains('\0') {
        let mut nul_err = ValidationError::new("nul_character");
        nul_err.message = Some(Cow::Borrowed(NUL_TEXT_MESSAGE));
        return Err(nul_err);
    }

    Ok(())
}

/// Raw counts reported by the task store
#[derive(PartialEq, Eq, Debug)]
pub struct TaskCounts {
    pub total: i64,
    pub completed: i64,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct TaskStats {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
}

impl From<TaskCounts> for TaskStats {
    fn from(value: TaskCounts) -> Self {
        TaskStats {
            total_tasks: value.total,
            completed_tasks: value.completed,
            pending_tasks: value.total - value.completed,
        }
    }
}

pub mod driven_ports {
    use super::*;

    pub trait TaskReader {
        /// All tasks, newest first
        async fn all_tasks(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<Task>, anyhow::Error>;
        async fn count_tasks(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<TaskCounts, anyhow::Error>;
    }

    pub trait TaskWriter {
        async fn create_task(
            &self,
            new_task: &NewTask,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Task, anyhow::Error>;

        /// Flips the completion flag of a task, returning the updated task or [None]
        /// if no task has the given ID
        async fn toggle_completion(
            &self,
            task_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<Task>, anyhow::Error>;

        /// Removes a task, returning whether a task with the given ID existed
        async fn delete_task(
            &self,
            task_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use thiserror::Error;
    use validator::ValidationErrors;

    #[derive(Debug, Error)]
    pub enum TaskError {
        #[error("task input was invalid: {0}")]
        Invalid(#[from] ValidationErrors),
        #[error("Task not found with id: {0}")]
        NotFound(i64),
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }


    pub trait TaskPort {
        async fn all_tasks(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            task_read: &impl driven_ports::TaskReader,
        ) -> Result<Vec<Task>, TaskError>;
        async fn create_task(
            &self,
            new_task: &NewTask,
            ext_cxn: &mut impl ExternalConnectivity,
            task_write: &impl driven_ports::TaskWriter,
        ) -> Result<Task, TaskError>;
        async fn toggle_task(
            &self,
            task_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
            task_write: &impl driven_ports::TaskWriter,
        ) -> Result<Task, TaskError>;
        async fn delete_task(
            &self,
            task_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
            task_write: &impl driven_ports::TaskWriter,
        ) -> Result<(), TaskError>;
        async fn task_stats(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            task_read: &impl driven_ports::TaskReader,
        ) -> Result<TaskStats, TaskError>;
    }
}

pub struct TaskService {}

impl driving_ports::TaskPort for TaskService {
    async fn all_tasks(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        task_read: &impl TaskReader,
    ) -> Result<Vec<Task>, TaskError> {
        let tasks = task_read.all_tasks(&mut *ext_cxn).await?;

        Ok(tasks)
    }

    async fn create_task(
        &self,
        new_task: &NewTask,
        ext_cxn: &mut impl ExternalConnectivity,
        task_write: &impl TaskWriter,
    ) -> Result<Task, TaskError> {
        new_task.validate()?;

        let created_task = task_write
            .create_task(&new_task.trimmed(), &mut *ext_cxn)
            .await?;
        info!(task_id = created_task.id, "Created task");

        Ok(created_task)
    }

    async fn toggle_task(
        &self,
        task_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
        task_write: &impl TaskWriter,
    ) -> Result<Task, TaskError> {
        let toggled_task = task_write.toggle_completion(task_id, &mut *ext_cxn).await?;

        match toggled_task {
            Some(task) => {
                info!(task_id, completed = task.completed, "Toggled task");
                Ok(task)
            }
            None => {
                error!("Task {task_id} didn't exist when toggling it.");
                Err(TaskError::NotFound(task_id))
            }
        }
    }

    async fn delete_task(
        &self,
        task_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
        task_write: &impl TaskWriter,
    ) -> Result<(), TaskError> {
        let existed = task_write.delete_task(task_id, &mut *ext_cxn).await?;
        if !existed {
            error!("Task {task_id} didn't exist when deleting it.");
            return Err(TaskError::NotFound(task_id));
        }

        info!(task_id, "Deleted task");
        Ok(())
    }

    async fn task_stats(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        task_read: &impl TaskReader,
    ) -> Result<TaskStats, TaskError> {
        let counts = task_read.count_tasks(&mut *ext_cxn).await?;

        Ok(TaskStats::from(counts))
    }
}
