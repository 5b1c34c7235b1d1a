//! Route handlers for the task API.
//!
//! Each handler maps to exactly one [`TaskStore`](weekboard_tasks::TaskStore)
//! call. Failures are rendered as `{error, details}` with the status from
//! [`TaskError::status_code`].

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use weekboard_tasks::{
    CreateTaskParams, DeleteTaskResult, ErrorBody, HealthStatus, ListTasksResult, TaskError,
    TaskResult, UpdateTaskParams, HEALTH_OK,
};

use super::AppState;

/// An error response: status plus `{error, details}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// Builds an error response.
    pub fn new(status: StatusCode, error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                details: details.into(),
            },
        }
    }

    /// 401 for a missing or wrong bearer token.
    pub fn unauthorized(details: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", details)
    }

    /// Returns the response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %err, "task store failure");
        }
        Self::new(status, err.summary(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "Invalid request body",
            rejection.body_text(),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// `GET /health`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: HEALTH_OK.to_string(),
    })
}

/// `GET /tasks`
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListTasksResult>, ApiError> {
    let tasks = state.store.list().await?;
    Ok(Json(ListTasksResult { tasks }))
}

/// `POST /tasks`
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateTaskParams>, JsonRejection>,
) -> Result<Json<TaskResult>, ApiError> {
    let Json(params) = payload?;
    let task = state.store.create(params).await?;
    tracing::info!(task_id = %task.id, day = %task.day_of_week, "task created");
    Ok(Json(TaskResult { task }))
}

/// `PUT /tasks/{id}`
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
    payload: Result<Json<UpdateTaskParams>, JsonRejection>,
) -> Result<Json<TaskResult>, ApiError> {
    let Json(params) = payload?;
    let task = state.store.update(&task_id, params).await?;
    Ok(Json(TaskResult { task }))
}

/// `DELETE /tasks/{id}`
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<DeleteTaskResult>, ApiError> {
    state.store.delete(&task_id).await?;
    Ok(Json(DeleteTaskResult { success: true }))
}
