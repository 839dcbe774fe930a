use super::test_util;
use crate::api::test_util::deserialize_body;
use crate::client::{HttpTaskApi, TaskBoard};
use crate::routing_utils::ErrorBody;
use crate::{SharedData, api, dto, persistence};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use chrono::Utc;
use serde_json::json;
use speculoos::prelude::*;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;

fn app(db: PgPool) -> Router {
    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(db),
    });
    api::app_router(Vec::new()).with_state(shared_data)
}

async fn call(app: &Router, method: Method, uri: &str, json_body: Option<serde_json::Value>) -> Response {
    let request = Request::builder().method(method).uri(uri);
    let request = match json_body {
        Some(json_body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request should build");

    app.clone().oneshot(request).await.expect("router is infallible")
}

async fn create(app: &Router, text: &str) -> dto::Task {
    let response = call(app, Method::POST, "/api/tasks", Some(json!({ "text": text }))).await;
    assert_eq!(StatusCode::CREATED, response.status());
    deserialize_body(response.into_body()).await
}

async fn list(app: &Router) -> Vec<dto::Task> {
    let response = call(app, Method::GET, "/api/tasks", None).await;
    assert_eq!(StatusCode::OK, response.status());
    deserialize_body(response.into_body()).await
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn created_tasks_are_listed_newest_first() {
    test_util::prepare_db_and_test(|db| async move {
        let app = app(db);
        let before_create = Utc::now();

        let buy_milk = create(&app, "  Buy milk  ").await;
        let walk_dog = create(&app, "Walk the dog").await;

        assert_eq!("Buy milk", buy_milk.text);
        assert!(!buy_milk.completed);
        assert!(buy_milk.created_at >= before_create - chrono::Duration::seconds(1));

        let tasks = list(&app).await;
        assert_eq!(vec![walk_dog, buy_milk], tasks);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn blank_text_is_rejected_and_nothing_is_stored() {
    test_util::prepare_db_and_test(|db| async move {
        let app = app(db);

        for body in [json!({ "text": "" }), json!({ "text": "   " }), json!({ "text": null })] {
            let response = call(&app, Method::POST, "/api/tasks", Some(body)).await;
            assert_eq!(StatusCode::BAD_REQUEST, response.status());

            let error_body: ErrorBody = deserialize_body(response.into_body()).await;
            let field_errors = error_body.errors;
            assert_that!(field_errors).is_some().matches(|errors| {
                errors.get("text").map(String::as_str) == Some("Task text cannot be empty")
            });
        }

        let tasks = list(&app).await;
        assert_that!(tasks).is_empty();
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn text_with_nul_character_is_rejected() {
    test_util::prepare_db_and_test(|db| async move {
        let app = app(db);

        let response = call(&app, Method::POST, "/api/tasks", Some(json!({ "text": "a\u{0}b" }))).await;
        assert_eq!(StatusCode::BAD_REQUEST, response.status());

        let error_body: ErrorBody = deserialize_body(response.into_body()).await;
        let field_errors = error_body.errors;
        assert_that!(field_errors).is_some().matches(|errors| {
            errors.get("text").map(String::as_str) == Some("Task text cannot contain NUL characters")
        });

        let tasks = list(&app).await;
        assert_that!(tasks).is_empty();
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn toggling_twice_restores_the_task() {
    test_util::prepare_db_and_test(|db| async move {
        let app = app(db);
        let task = create(&app, "Buy milk").await;
        let toggle_uri = format!("/api/tasks/{}/toggle", task.id);

        let response = call(&app, Method::PATCH, &toggle_uri, None).await;
        assert_eq!(StatusCode::OK, response.status());
        let toggled: dto::Task = deserialize_body(response.into_body()).await;
        assert!(toggled.completed);

        let response = call(&app, Method::PATCH, &toggle_uri, None).await;
        let restored: dto::Task = deserialize_body(response.into_body()).await;
        assert_eq!(task, restored);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn unknown_ids_are_not_found() {
    test_util::prepare_db_and_test(|db| async move {
        let app = app(db);
        let task = create(&app, "Buy milk").await;
        let missing_id = task.id + 1000;

        let response = call(&app, Method::PATCH, &format!("/api/tasks/{missing_id}/toggle"), None).await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());
        let error_body: ErrorBody = deserialize_body(response.into_body()).await;
        assert_eq!(format!("Task not found with id: {missing_id}"), error_body.message);

        let response = call(&app, Method::DELETE, &format!("/api/tasks/{missing_id}"), None).await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());

        assert_eq!(vec![task], list(&app).await);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn deleted_tasks_are_gone() {
    test_util::prepare_db_and_test(|db| async move {
        let app = app(db);
        let keep = create(&app, "Keep me").await;
        let doomed = create(&app, "Delete me").await;
        let doomed_uri = format!("/api/tasks/{}", doomed.id);

        let response = call(&app, Method::DELETE, &doomed_uri, None).await;
        assert_eq!(StatusCode::NO_CONTENT, response.status());
        assert_eq!(vec![keep], list(&app).await);

        let response = call(&app, Method::DELETE, &doomed_uri, None).await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());
        let response = call(&app, Method::PATCH, &format!("{doomed_uri}/toggle"), None).await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn stats_count_completed_and_pending() {
    test_util::prepare_db_and_test(|db| async move {
        let app = app(db);
        let response = call(&app, Method::GET, "/api/tasks/stats", None).await;
        let empty_stats: serde_json::Value = deserialize_body(response.into_body()).await;
        assert_eq!(
            json!({"totalTasks": 0, "completedTasks": 0, "pendingTasks": 0}),
            empty_stats
        );

        create(&app, "One").await;
        let two = create(&app, "Two").await;
        create(&app, "Three").await;
        call(&app, Method::PATCH, &format!("/api/tasks/{}/toggle", two.id), None).await;

        let response = call(&app, Method::GET, "/api/tasks/stats", None).await;
        assert_eq!(StatusCode::OK, response.status());
        let stats: serde_json::Value = deserialize_body(response.into_body()).await;
        assert_eq!(
            json!({"totalTasks": 3, "completedTasks": 1, "pendingTasks": 2}),
            stats
        );
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn task_board_mirrors_the_server() {
    test_util::prepare_db_and_test(|db| async move {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("server should bind");
        let address = listener.local_addr().expect("server has an address");
        let server = tokio::spawn(async move {
            axum::serve(listener, app(db))
                .await
                .expect("server crashed");
        });

        let task_api = HttpTaskApi::new(&format!("http://{address}")).expect("client should build");
        let mut board = TaskBoard::new(task_api);
        board.refresh().await;
        assert!(board.tasks().is_empty());

        board.add_task("Buy milk").await;
        board.add_task("Walk the dog").await;
        let walk_dog_id = board.tasks()[0].id;
        board.toggle_task(walk_dog_id).await;
        board.add_task("   ").await;
        assert_eq!(Some("Task text cannot be empty"), board.error());

        let local_stats = board.stats();
        board.refresh().await;
        assert_eq!(None, board.error());
        assert_eq!(local_stats, board.stats());

        let buy_milk_id = board.tasks()[1].id;
        board.delete_task(buy_milk_id).await;
        board.refresh().await;
        let texts: Vec<&str> = board.tasks().iter().map(|task| task.text.as_str()).collect();
        assert_eq!(vec!["Walk the dog"], texts);

        server.abort();
    });
}
