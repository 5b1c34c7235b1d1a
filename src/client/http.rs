//! HTTP [`TaskApi`] speaking the weekboard JSON protocol over `reqwest`.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use weekboard_tasks::{
    CreateTaskParams, DeleteTaskResult, ErrorBody, HealthStatus, ListTasksResult, Task,
    TaskResult, UpdateTaskParams,
};

use super::TaskApi;
use crate::config::ClientConfig;
use crate::error::ClientError;

/// HTTP client for a weekboard server.
///
/// Every request carries `Authorization: Bearer <token>` when a token is
/// configured. Non-2xx responses become [`ClientError::Api`].
#[derive(Debug, Clone)]
pub struct HttpTaskClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpTaskClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the TLS backend cannot be
    /// initialized.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self::with_client(config, client))
    }

    /// Uses a caller-built `reqwest::Client`. The config's timeout is
    /// ignored.
    pub fn with_client(config: ClientConfig, client: reqwest::Client) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
            client,
        }
    }

    /// The server URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends `segments` to the base URL, percent-encoding each one so an
    /// id containing `/`, `?` or `#` stays a single path segment.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidInput(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::InvalidInput(format!("base URL cannot have a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "sending request");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn check_status(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let (error, details) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => (body.error, body.details),
            Err(_) => (
                status.canonical_reason().unwrap_or("Request failed").to_string(),
                text,
            ),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            error,
            details,
        })
    }
}

#[async_trait]
impl TaskApi for HttpTaskClient {
    async fn health(&self) -> Result<HealthStatus, ClientError> {
        Self::send(self.request(Method::GET, self.url(&["health"])?)).await
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let body: ListTasksResult =
            Self::send(self.request(Method::GET, self.url(&["tasks"])?)).await?;
        Ok(body.tasks)
    }

    async fn create_task(&self, params: CreateTaskParams) -> Result<Task, ClientError> {
        let body: TaskResult =
            Self::send(self.request(Method::POST, self.url(&["tasks"])?).json(&params)).await?;
        Ok(body.task)
    }

    async fn update_task(
        &self,
        task_id: &str,
        params: UpdateTaskParams,
    ) -> Result<Task, ClientError> {
        let url = self.url(&["tasks", task_id])?;
        let body: TaskResult = Self::send(self.request(Method::PUT, url).json(&params)).await?;
        Ok(body.task)
    }

    async fn delete_task(&self, task_id: &str) -> Result<(), ClientError> {
        let url = self.url(&["tasks", task_id])?;
        let body: DeleteTaskResult = Self::send(self.request(Method::DELETE, url)).await?;
        if body.success {
            Ok(())
        } else {
            Err(ClientError::Decode(
                "delete response reported success=false".to_string(),
            ))
        }
    }
}
