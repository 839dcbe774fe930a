pub mod task;

pub use task::*;

use crate::routing_utils::ErrorBody;
use utoipa::OpenApi;

/// Collects the schemas of every DTO exposed on the API so they can be merged into
/// the OpenAPI document
#[derive(OpenApi)]
#[openapi(components(schemas(task::NewTask, task::Task, task::TaskStats, ErrorBody)))]
pub struct OpenApiSchemas;
