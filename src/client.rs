//! A client for the task API which mirrors server state into an in-memory task board,
//! suitable for driving a user interface.

pub mod board;
pub mod http;

pub use board::TaskBoard;
pub use http::HttpTaskApi;

use crate::dto;
use thiserror::Error;

/// Message shown when the server couldn't be reached at all
pub const UNREACHABLE_MESSAGE: &str =
    "Unable to reach the task server. Check your connection and try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never got an HTTP response (refused connection, DNS failure, timeout)
    #[error("{}", UNREACHABLE_MESSAGE)]
    Unreachable(#[source] anyhow::Error),
    /// The server answered with an error body
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("The task server sent a response that could not be read")]
    UnreadableResponse(#[source] anyhow::Error),
}


/// One call per route on the task API
pub trait TaskApi {
    async fn list_tasks(&self) -> Result<Vec<dto::Task>, ClientError>;
    async fn create_task(&self, text: &str) -> Result<dto::Task, ClientError>;
    async fn toggle_task(&self, task_id: i64) -> Result<dto::Task, ClientError>;
    async fn delete_task(&self, task_id: i64) -> Result<(), ClientError>;
    async fn task_stats(&self) -> Result<dto::TaskStats, ClientError>;
}
