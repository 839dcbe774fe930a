use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_macros::{FromRequest, FromRequestParts};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Message returned for any failure the client can't do anything about. Details are only logged.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Contains diagnostic information about an API failure
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorBody {
    /// HTTP status code of the response, repeated for convenience
    #[schema(example = 404)]
    pub status: u16,
    #[schema(example = "Task not found with id: 12")]
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Per-field problems, only present on validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = json!({"text": "Task text cannot be empty"}))]
    pub errors: Option<BTreeMap<String, String>>,
}

impl ErrorBody {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ErrorBody {
            status: status.as_u16(),
            message: message.into(),
            timestamp: Utc::now(),
            errors: None,
        }
    }

    fn into_response_with(self, status: StatusCode) -> Response {
        (status, axum::Json(self)).into_response()
    }
}

/// Response type that wraps validation errors and turns them into [ErrorBody]s
pub struct ValidationErrorResponse(ValidationErrors);

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        let field_messages: BTreeMap<String, String> = self
            .0
            .field_errors()
            .into_iter()
            .filter_map(|(field, field_errs)| {
                let first_err = field_errs.first()?;
                let message = first_err
                    .message
                    .as_ref()
                    .unwrap_or(&first_err.code)
                    .to_string();
                Some((field.to_owned(), message))
            })
            .collect();

        let mut body = ErrorBody::new(StatusCode::BAD_REQUEST, "Validation failed");
        body.errors = Some(field_messages);
        body.into_response_with(StatusCode::BAD_REQUEST)
    }
}

impl From<ValidationErrors> for ValidationErrorResponse {
    fn from(value: ValidationErrors) -> Self {
        Self(value)
    }
}

/// Response type for requests referencing an entity that doesn't exist
pub struct NotFoundResponse(pub String);

impl IntoResponse for NotFoundResponse {
    fn into_response(self) -> Response {
        ErrorBody::new(StatusCode::NOT_FOUND, self.0).into_response_with(StatusCode::NOT_FOUND)
    }
}

/// Response type for unexpected failures. The wrapped error is logged but never sent to the client.
pub struct GenericErrorResponse(pub anyhow::Error);

impl IntoResponse for GenericErrorResponse {
    fn into_response(self) -> Response {
        error!("Unexpected failure while handling request: {:#}", self.0);

        ErrorBody::new(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR_MESSAGE)
            .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Wrapper for [axum::Json] which customizes the error response to use our
/// data structure for API errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Response type representing JSON parse errors
pub struct JsonErrorResponse {
    parse_problem: String,
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        JsonErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        ErrorBody::new(
            StatusCode::BAD_REQUEST,
            format!("Malformed request body: {}", self.parse_problem),
        )
        .into_response_with(StatusCode::BAD_REQUEST)
    }
}

/// Wrapper for [axum::extract::Path] which reports unparseable path segments with [ErrorBody]
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(PathErrorResponse))]
pub struct Path<T>(pub T);

/// Response type representing path parameters that couldn't be parsed
pub struct PathErrorResponse {
    parse_problem: String,
}

impl From<PathRejection> for PathErrorResponse {
    fn from(value: PathRejection) -> Self {
        PathErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for PathErrorResponse {
    fn into_response(self) -> Response {
        ErrorBody::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid path parameter: {}", self.parse_problem),
        )
        .into_response_with(StatusCode::BAD_REQUEST)
    }
}
