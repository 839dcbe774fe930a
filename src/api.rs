pub mod swagger_main;
pub mod todo;


use crate::{SharedData, logging};
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// How long browsers may cache the answer to a CORS preflight request
const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(3600);

/// Builds the CORS policy letting the given frontend origins call the API with credentials
pub fn cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(PREFLIGHT_MAX_AGE)
}

/// Assembles every route the service exposes: the task API under "/api" plus the
/// swagger documentation, wrapped in request tracing and the CORS policy
pub fn app_router(allowed_origins: Vec<HeaderValue>) -> Router<Arc<SharedData>> {
    let router = Router::new()
        .nest("/api", todo::task_routes())
        .merge(swagger_main::build_documentation());

    logging::attach_tracing_http(router).layer(cors_layer(allowed_origins))
}
