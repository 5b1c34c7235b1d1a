//! In-process [`TaskApi`] over any [`TaskStore`].

use std::sync::Arc;

use async_trait::async_trait;
use weekboard_tasks::{CreateTaskParams, HealthStatus, Task, TaskStore, UpdateTaskParams, HEALTH_OK};

use super::TaskApi;
use crate::error::ClientError;

/// Calls a [`TaskStore`] directly, without HTTP.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use weekboard::client::{LocalTaskApi, TaskBoard};
/// use weekboard_tasks::InMemoryTaskStore;
///
/// let board = TaskBoard::new(LocalTaskApi::new(Arc::new(InMemoryTaskStore::new())));
/// assert!(board.is_loading());
/// ```
#[derive(Clone)]
pub struct LocalTaskApi {
    store: Arc<dyn TaskStore>,
}

impl LocalTaskApi {
    /// Wraps a store.
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Returns the wrapped store.
    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }
}

impl std::fmt::Debug for LocalTaskApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTaskApi").finish_non_exhaustive()
    }
}

#[async_trait]
impl TaskApi for LocalTaskApi {
    async fn health(&self) -> Result<HealthStatus, ClientError> {
        Ok(HealthStatus {
            status: HEALTH_OK.to_string(),
        })
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        Ok(self.store.list().await?)
    }

    async fn create_task(&self, params: CreateTaskParams) -> Result<Task, ClientError> {
        Ok(self.store.create(params).await?)
    }

    async fn update_task(
        &self,
        task_id: &str,
        params: UpdateTaskParams,
    ) -> Result<Task, ClientError> {
        Ok(self.store.update(task_id, params).await?)
    }

    async fn delete_task(&self, task_id: &str) -> Result<(), ClientError> {
        Ok(self.store.delete(task_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use weekboard_tasks::{DayOfWeek, InMemoryTaskStore, TaskError};

    use super::*;

    #[tokio::test]
    async fn delegates_to_store() {
        let api = LocalTaskApi::new(Arc::new(InMemoryTaskStore::new()));
        assert_eq!(api.health().await.unwrap().status, "ok");

        let task = api
            .create_task(CreateTaskParams::new("Buy milk", DayOfWeek::Monday))
            .await
            .unwrap();
        assert_eq!(api.list_tasks().await.unwrap(), vec![task.clone()]);
        api.delete_task(&task.id).await.unwrap();
        assert!(api.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_errors_keep_their_status() {
        let api = LocalTaskApi::new(Arc::new(InMemoryTaskStore::new()));
        let err = api
            .update_task("missing", UpdateTaskParams::completion(true))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Task(TaskError::NotFound { .. })));
        assert!(err.is_not_found());
    }
}
