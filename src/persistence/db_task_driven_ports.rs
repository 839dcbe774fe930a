use crate::domain;
use crate::domain::todo::{NewTask, Task, TaskCounts};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, query, query_as};

pub struct DbTaskReader {}

#[derive(FromRow)]
struct TaskRow {
    id: i64,
    text: String,
    completed: bool,
    created_at: DateTime<Utc>,
}

impl From<TaskRow> for domain::todo::Task {
    fn from(value: TaskRow) -> Self {
        Task {
            id: value.id,
            text: value.text,
            completed: value.completed,
            created_at: value.created_at,
        }
    }
}

/// Utility DTO for consuming the output of the PostgreSQL `count()` function
#[derive(FromRow)]
struct CountsRow {
    total: i64,
    completed: i64,
}

impl domain::todo::driven_ports::TaskReader for DbTaskReader {
    async fn all_tasks(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<Vec<Task>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let tasks: Vec<Task> = query_as::<_, TaskRow>(
            "SELECT t.id, t.text, t.completed, t.created_at FROM tasks t \
             ORDER BY t.created_at DESC, t.id DESC",
        )
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to fetch all tasks")?
        .into_iter()
        .map(domain::todo::Task::from)
        .collect();

        Ok(tasks)
    }

    async fn count_tasks(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<TaskCounts, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let counts = query_as::<_, CountsRow>(
            "SELECT count(*) AS total, count(*) FILTER (WHERE t.completed) AS completed FROM tasks t",
        )
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to count tasks")?;

        Ok(TaskCounts {
            total: counts.total,
            completed: counts.completed,
        })
    }
}

pub struct DbTaskWriter {}

impl domain::todo::driven_ports::TaskWriter for DbTaskWriter {
    async fn create_task(
        &self,
        new_task: &NewTask,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Task, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let created = query_as::<_, TaskRow>(
            "INSERT INTO tasks(text) VALUES ($1) RETURNING id, text, completed, created_at",
        )
        .bind(&new_task.text)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new task into the database")?;

        Ok(created.into())
    }

    async fn toggle_completion(
        &self,
        task_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<Task>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let toggled = query_as::<_, TaskRow>(
            "UPDATE tasks SET completed = NOT completed WHERE id = $1 \
             RETURNING id, text, completed, created_at",
        )
        .bind(task_id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to toggle a task's completion in the database")?
        .map(domain::todo::Task::from);

        Ok(toggled)
    }

    async fn delete_task(
        &self,
        task_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let delete_result = query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a task from the database")?;

        Ok(delete_result.rows_affected() > 0)
    }
}
