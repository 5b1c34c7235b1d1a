//! Task client: the [`TaskApi`] seam, its HTTP and in-process
//! implementations, and the [`TaskBoard`] view-model built on it.

pub mod board;
pub mod http;
pub mod local;
pub mod views;

use std::sync::Arc;

use async_trait::async_trait;
use weekboard_tasks::{CreateTaskParams, HealthStatus, Task, UpdateTaskParams};

pub use board::{BoardError, BoardOp, TaskBoard};
pub use self::http::HttpTaskClient;
pub use local::LocalTaskApi;
pub use views::{BoardState, DayBucket, DayStats, WeekStats};

use crate::error::ClientError;

/// The five calls a client can make against the task store.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Liveness check.
    async fn health(&self) -> Result<HealthStatus, ClientError>;

    /// Fetches every stored task.
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError>;

    /// Creates a task and returns the stored record.
    async fn create_task(&self, params: CreateTaskParams) -> Result<Task, ClientError>;

    /// Applies a partial update and returns the merged record.
    async fn update_task(&self, task_id: &str, params: UpdateTaskParams)
        -> Result<Task, ClientError>;

    /// Deletes a task. Unknown ids succeed.
    async fn delete_task(&self, task_id: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl<A: TaskApi + ?Sized> TaskApi for Arc<A> {
    async fn health(&self) -> Result<HealthStatus, ClientError> {
        (**self).health().await
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        (**self).list_tasks().await
    }

    async fn create_task(&self, params: CreateTaskParams) -> Result<Task, ClientError> {
        (**self).create_task(params).await
    }

    async fn update_task(
        &self,
        task_id: &str,
        params: UpdateTaskParams,
    ) -> Result<Task, ClientError> {
        (**self).update_task(task_id, params).await
    }

    async fn delete_task(&self, task_id: &str) -> Result<(), ClientError> {
        (**self).delete_task(task_id).await
    }
}
