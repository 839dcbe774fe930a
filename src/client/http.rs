use super::{ClientError, TaskApi};
use crate::dto;
use crate::routing_utils::ErrorBody;
use anyhow::{Context, anyhow};
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// [TaskApi] implementation talking to a running task server over HTTP. Outgoing requests
/// carry the current trace context so server spans join the caller's trace.
#[derive(Clone)]
pub struct HttpTaskApi {
    base_url: String,
    http_client: ClientWithMiddleware,
}

impl HttpTaskApi {
    /// Creates a client for the server at `base_url`, i.e. "http://localhost:8080"
    pub fn new(base_url: &str) -> Result<Self, anyhow::Error> {
        let base_client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .context("building the HTTP client")?;
        let http_client = ClientBuilder::new(base_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(HttpTaskApi {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}

/// Sends the request, turning transport failures and non-2xx answers into [ClientError]s
async fn send(request: RequestBuilder) -> Result<reqwest::Response, ClientError> {
    let response = request.send().await.map_err(|transport_err| {
        warn!("Task server unreachable: {transport_err}");
        ClientError::Unreachable(anyhow!(transport_err))
    })?;

    if response.status().is_success() {
        return Ok(response);
    }

    Err(api_error(response).await)
}

async fn api_error(response: reqwest::Response) -> ClientError {
    let status = response.status();
    debug!("Task server answered with {status}");

    // Field messages say what to fix, so they win over the summary message
    let message = match response.json::<ErrorBody>().await {
        Ok(ErrorBody {
            errors: Some(field_errors),
            message,
            ..
        }) => field_errors.into_values().next().unwrap_or(message),
        Ok(error_body) => error_body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("The request failed")
            .to_owned(),
    };

    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    response
        .json::<T>()
        .await
        .map_err(|decode_err| ClientError::UnreadableResponse(anyhow!(decode_err)))
}

impl TaskApi for HttpTaskApi {
    #[tracing::instrument(skip(self))]
    async fn list_tasks(&self) -> Result<Vec<dto::Task>, ClientError> {
        let response = send(self.http_client.get(self.url("/tasks"))).await?;
        read_json(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn create_task(&self, text: &str) -> Result<dto::Task, ClientError> {
        let new_task = dto::NewTask {
            text: Some(text.to_owned()),
        };
        let response = send(self.http_client.post(self.url("/tasks")).json(&new_task)).await?;
        read_json(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn toggle_task(&self, task_id: i64) -> Result<dto::Task, ClientError> {
        let response = send(
            self.http_client
                .patch(self.url(&format!("/tasks/{task_id}/toggle"))),
        )
        .await?;
        read_json(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_task(&self, task_id: i64) -> Result<(), ClientError> {
        let response = send(
            self.http_client
                .delete(self.url(&format!("/tasks/{task_id}"))),
        )
        .await?;

        if response.status() != StatusCode::NO_CONTENT {
            debug!("Delete answered with {} instead of 204", response.status());
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn task_stats(&self) -> Result<dto::TaskStats, ClientError> {
        let response = send(self.http_client.get(self.url("/tasks/stats"))).await?;
        read_json(response).await
    }
}
