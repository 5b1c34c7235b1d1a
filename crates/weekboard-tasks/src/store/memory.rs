//! In-memory storage backend and task store.
//!
//! [`InMemoryBackend`] is a thread-safe [`StorageBackend`] using
//! `DashMap<String, (Vec<u8>, u64)>`. It is a dumb KV store with no domain
//! logic.
//!
//! [`InMemoryTaskStore`] is a thin wrapper around
//! [`GenericTaskStore<InMemoryBackend>`](crate::store::generic::GenericTaskStore)
//! with a zero-argument constructor.
//!
//! # Concurrency
//!
//! `DashMap` locks per shard, so operations on different keys rarely
//! contend. `put_if_version` holds the entry's write guard across the
//! version check and the write, which makes it a true CAS.
//!
//! # Examples
//!
//! ```
//! use weekboard_tasks::store::memory::InMemoryTaskStore;
//! use weekboard_tasks::store::StoreConfig;
//!
//! let store = InMemoryTaskStore::new().with_config(StoreConfig {
//!     max_title_length: Some(200),
//!     ..StoreConfig::default()
//! });
//! ```

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::TaskError;
use crate::store::backend::{StorageBackend, StorageError, VersionedRecord};
use crate::store::generic::GenericTaskStore;
use crate::types::{CreateTaskParams, Task, UpdateTaskParams};

use super::{StoreConfig, TaskStore};

// ---- InMemoryBackend: dumb KV store using DashMap ----

/// Thread-safe in-memory storage backend using [`DashMap`].
///
/// # Examples
///
/// ```
/// use weekboard_tasks::store::memory::InMemoryBackend;
/// use weekboard_tasks::store::generic::GenericTaskStore;
///
/// let store = GenericTaskStore::new(InMemoryBackend::new());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: DashMap<String, (Vec<u8>, u64)>,
}

impl InMemoryBackend {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries stored.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the backend holds no entries.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> Result<VersionedRecord, StorageError> {
        let entry = self.data.get(key).ok_or_else(|| StorageError::NotFound {
            key: key.to_string(),
        })?;
        let (data, version) = entry.value();
        Ok(VersionedRecord {
            data: data.clone(),
            version: *version,
        })
    }

    async fn put(&self, key: &str, data: &[u8]) -> Result<u64, StorageError> {
        let mut entry = self.data.entry(key.to_string()).or_insert((Vec::new(), 0));
        let new_version = entry.value().1 + 1;
        *entry.value_mut() = (data.to_vec(), new_version);
        Ok(new_version)
    }

    async fn put_if_version(
        &self,
        key: &str,
        data: &[u8],
        expected_version: u64,
    ) -> Result<u64, StorageError> {
        let mut entry = self
            .data
            .get_mut(key)
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })?;
        let current_version = entry.value().1;
        if current_version != expected_version {
            return Err(StorageError::VersionConflict {
                key: key.to_string(),
                expected: expected_version,
                actual: current_version,
            });
        }
        let new_version = current_version + 1;
        *entry.value_mut() = (data.to_vec(), new_version);
        Ok(new_version)
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.data.remove(key).is_some())
    }

    async fn list_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<(String, VersionedRecord)>, StorageError> {
        Ok(self
            .data
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| {
                let (data, version) = entry.value();
                (
                    entry.key().clone(),
                    VersionedRecord {
                        data: data.clone(),
                        version: *version,
                    },
                )
            })
            .collect())
    }
}

// ---- InMemoryTaskStore: thin wrapper around GenericTaskStore<InMemoryBackend> ----

/// In-memory task store: [`GenericTaskStore`] over [`InMemoryBackend`].
#[derive(Debug)]
pub struct InMemoryTaskStore {
    inner: GenericTaskStore<InMemoryBackend>,
}

impl InMemoryTaskStore {
    /// Creates an empty store with default configuration.
    pub fn new() -> Self {
        Self {
            inner: GenericTaskStore::new(InMemoryBackend::new()),
        }
    }

    /// Sets the store configuration.
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.inner = self.inner.with_config(config);
        self
    }

    /// Returns a reference to the underlying backend.
    pub fn backend(&self) -> &InMemoryBackend {
        self.inner.backend()
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list(&self) -> Result<Vec<Task>, TaskError> {
        self.inner.list().await
    }

    async fn create(&self, params: CreateTaskParams) -> Result<Task, TaskError> {
        self.inner.create(params).await
    }

    async fn update(&self, task_id: &str, params: UpdateTaskParams) -> Result<Task, TaskError> {
        self.inner.update(task_id, params).await
    }

    async fn delete(&self, task_id: &str) -> Result<(), TaskError> {
        self.inner.delete(task_id).await
    }

    fn config(&self) -> &StoreConfig {
        self.inner.config()
    }
}
