//! Task store trait, generic implementation, and supporting types.
//!
//! # Architecture
//!
//! Task storage has three layers:
//!
//! 1. **[`TaskStore`]** -- The object-safe interface the HTTP handlers and
//!    the in-process client adapter hold as `Arc<dyn TaskStore>`.
//!
//! 2. **[`GenericTaskStore<B>`](generic::GenericTaskStore)** -- All domain
//!    logic (validation, identity assignment, partial-update merge, CAS
//!    retry, JSON serialization). Has a blanket `TaskStore` impl.
//!
//! 3. **[`StorageBackend`]** -- Dumb KV trait that backends implement
//!    (in-memory, Redis). No domain logic.
//!
//! # Backends
//!
//! - [`InMemoryBackend`](crate::store::memory::InMemoryBackend) -- `DashMap`
//!   backed, used by [`InMemoryTaskStore`](crate::store::memory::InMemoryTaskStore).
//! - `RedisBackend` -- available behind the `redis` feature flag.

pub mod backend;
pub mod generic;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use backend::{StorageBackend, StorageError, VersionedRecord};

use crate::constants::DEFAULT_MAX_UPDATE_RETRIES;
use crate::error::TaskError;
use crate::types::{CreateTaskParams, Task, UpdateTaskParams};

/// Limits applied by the store on every write.
///
/// # Defaults
///
/// | Setting              | Default | Description                                   |
/// |----------------------|---------|-----------------------------------------------|
/// | `max_update_retries` | 5       | CAS attempts per update before reporting 409  |
/// | `max_title_length`   | `None`  | Optional limit on title length in characters  |
///
/// # Examples
///
/// ```
/// use weekboard_tasks::store::StoreConfig;
///
/// let config = StoreConfig::default();
/// assert_eq!(config.max_update_retries, 5);
/// assert_eq!(config.max_title_length, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of read-merge-write attempts an update makes before giving up
    /// with [`TaskError::ConcurrentModification`]. Values below 1 are
    /// treated as 1.
    pub max_update_retries: usize,

    /// Maximum title length in characters, after trimming.
    pub max_title_length: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_update_retries: DEFAULT_MAX_UPDATE_RETRIES,
            max_title_length: None,
        }
    }
}

/// Object-safe task store interface.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use weekboard_tasks::{CreateTaskParams, DayOfWeek, InMemoryTaskStore, TaskStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
/// let task = store
///     .create(CreateTaskParams::new("Water plants", DayOfWeek::Tuesday))
///     .await
///     .unwrap();
/// assert_eq!(task.version, 1);
/// # }
/// ```
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns every stored task, oldest first.
    async fn list(&self) -> Result<Vec<Task>, TaskError>;

    /// Validates and persists a new task.
    async fn create(&self, params: CreateTaskParams) -> Result<Task, TaskError>;

    /// Merges the supplied fields over the stored task.
    async fn update(&self, task_id: &str, params: UpdateTaskParams) -> Result<Task, TaskError>;

    /// Removes a task. Succeeds whether or not the task existed.
    async fn delete(&self, task_id: &str) -> Result<(), TaskError>;

    /// Returns the store configuration.
    fn config(&self) -> &StoreConfig;
}

#[async_trait]
impl<B: StorageBackend + 'static> TaskStore for generic::GenericTaskStore<B> {
    async fn list(&self) -> Result<Vec<Task>, TaskError> {
        self.list().await
    }

    async fn create(&self, params: CreateTaskParams) -> Result<Task, TaskError> {
        self.create(params).await
    }

    async fn update(&self, task_id: &str, params: UpdateTaskParams) -> Result<Task, TaskError> {
        self.update(task_id, params).await
    }

    async fn delete(&self, task_id: &str) -> Result<(), TaskError> {
        self.delete(task_id).await
    }

    fn config(&self) -> &StoreConfig {
        self.config()
    }
}
