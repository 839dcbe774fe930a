use crate::domain::todo::driving_ports::{TaskError, TaskPort};
use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{
    GenericErrorResponse, Json, NotFoundResponse, Path, ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{delete, get, patch};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(list_tasks, create_task, toggle_task, delete_task, task_stats))]
/// Defines the OpenAPI spec for task endpoints
pub struct TaskApi;

/// Used to group task endpoints together in the OpenAPI documentation
pub const TASK_API_GROUP: &str = "Tasks";

/// Adds routes under "/tasks" to the application router
pub fn task_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/tasks",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let task_service = domain::todo::TaskService {};

                list_tasks(&mut ext_cxn, &task_service).await
            })
            .post(
                |State(app_state): AppState, Json(new_task): Json<dto::NewTask>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let task_service = domain::todo::TaskService {};

                    create_task(new_task, &mut ext_cxn, &task_service).await
                },
            ),
        )
        .route(
            "/tasks/stats",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let task_service = domain::todo::TaskService {};

                task_stats(&mut ext_cxn, &task_service).await
            }),
        )
        .route(
            "/tasks/:task_id/toggle",
            patch(
                |State(app_state): AppState, Path(task_id): Path<i64>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let task_service = domain::todo::TaskService {};

                    toggle_task(task_id, &mut ext_cxn, &task_service).await
                },
            ),
        )
        .route(
            "/tasks/:task_id",
            delete(
                |State(app_state): AppState, Path(task_id): Path<i64>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let task_service = domain::todo::TaskService {};

                    delete_task(task_id, &mut ext_cxn, &task_service).await
                },
            ),
        )
}

/// Translates a domain failure into the matching HTTP error
fn task_error_response(task_err: TaskError) -> ErrorResponse {
    match task_err {
        TaskError::Invalid(validation_errs) => ValidationErrorResponse::from(validation_errs).into(),
        TaskError::NotFound(_) => NotFoundResponse(task_err.to_string()).into(),
        TaskError::PortError(cause) => GenericErrorResponse(cause).into(),
    }
}

#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = TASK_API_GROUP,
    responses(
        (status = 200, description = "All tasks, newest first", body = [dto::Task]),
        (status = 500, description = "The task store could not be reached", body = crate::routing_utils::ErrorBody),
    ),
)]
/// Lists every task, newest first
async fn list_tasks(
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<Json<Vec<dto::Task>>, ErrorResponse> {
    info!("Listing tasks");
    let task_reader = persistence::db_task_driven_ports::DbTaskReader {};

    let tasks = task_service
        .all_tasks(&mut *ext_cxn, &task_reader)
        .await
        .map_err(task_error_response)?;

    Ok(Json(tasks.into_iter().map(dto::Task::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = TASK_API_GROUP,
    request_body = dto::NewTask,
    responses(
        (status = 201, description = "The task was created", body = dto::Task),
        (status = 400, description = "The task text was missing, blank, or held a NUL character, or the body was malformed", body = crate::routing_utils::ErrorBody),
        (status = 500, description = "The task store could not be reached", body = crate::routing_utils::ErrorBody),
    ),
)]
/// Creates a new, incomplete task
async fn create_task(
    new_task: dto::NewTask,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<(StatusCode, Json<dto::Task>), ErrorResponse> {
    info!("Creating task");
    let domain_task = domain::todo::NewTask::from(new_task);
    let task_writer = persistence::db_task_driven_ports::DbTaskWriter {};

    let created_task = task_service
        .create_task(&domain_task, &mut *ext_cxn, &task_writer)
        .await
        .map_err(task_error_response)?;

    Ok((StatusCode::CREATED, Json(dto::Task::from(created_task))))
}

#[utoipa::path(
    patch,
    path = "/api/tasks/{task_id}/toggle",
    tag = TASK_API_GROUP,
    params(
        ("task_id" = i64, Path, description = "ID of the task to toggle"),
    ),
    responses(
        (status = 200, description = "The task with its completion flag flipped", body = dto::Task),
        (status = 404, description = "No task has the given ID", body = crate::routing_utils::ErrorBody),
        (status = 500, description = "The task store could not be reached", body = crate::routing_utils::ErrorBody),
    ),
)]
/// Flips the completion status of a task
async fn toggle_task(
    task_id: i64,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<Json<dto::Task>, ErrorResponse> {
    info!("Toggling task {task_id}");
    let task_writer = persistence::db_task_driven_ports::DbTaskWriter {};

    let toggled_task = task_service
        .toggle_task(task_id, &mut *ext_cxn, &task_writer)
        .await
        .map_err(task_error_response)?;

    Ok(Json(dto::Task::from(toggled_task)))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{task_id}",
    tag = TASK_API_GROUP,
    params(
        ("task_id" = i64, Path, description = "ID of the task to delete"),
    ),
    responses(
        (status = 204, description = "The task was deleted"),
        (status = 404, description = "No task has the given ID", body = crate::routing_utils::ErrorBody),
        (status = 500, description = "The task store could not be reached", body = crate::routing_utils::ErrorBody),
    ),
)]
/// Permanently removes a task
async fn delete_task(
    task_id: i64,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<StatusCode, ErrorResponse> {
    info!("Deleting task {task_id}");
    let task_writer = persistence::db_task_driven_ports::DbTaskWriter {};

    task_service
        .delete_task(task_id, &mut *ext_cxn, &task_writer)
        .await
        .map_err(task_error_response)?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/tasks/stats",
    tag = TASK_API_GROUP,
    responses(
        (status = 200, description = "Counts of tasks by completion status", body = dto::TaskStats),
        (status = 500, description = "The task store could not be reached", body = crate::routing_utils::ErrorBody),
    ),
)]
/// Counts total, completed, and pending tasks
async fn task_stats(
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<Json<dto::TaskStats>, ErrorResponse> {
    info!("Computing task stats");
    let task_reader = persistence::db_task_driven_ports::DbTaskReader {};

    let stats = task_service
        .task_stats(&mut *ext_cxn, &task_reader)
        .await
        .map_err(task_error_response)?;

    Ok(Json(dto::TaskStats::from(stats)))
}
