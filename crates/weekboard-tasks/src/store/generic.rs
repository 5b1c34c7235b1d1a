//! Generic task store with all domain logic delegating to a [`StorageBackend`].
//!
//! [`GenericTaskStore`] implements every domain operation (validation,
//! identity assignment, partial-update merge, CAS-based updates, JSON
//! serialization) on top of any [`StorageBackend`] implementation.
//!
//! Backends remain dumb key-value stores; all intelligence lives here.
//!
//! # CAS Semantics
//!
//! `update` reads the record, merges the patch, and writes back with
//! [`StorageBackend::put_if_version`]. When another writer got there first
//! the merge is replayed against the fresh record, up to
//! [`StoreConfig::max_update_retries`] attempts. A caller-supplied
//! `expected_version` short-circuits this: a mismatch is reported as
//! [`TaskError::ConcurrentModification`] immediately.

use crate::constants::TASK_KEY_PREFIX;
use crate::domain::{NewTask, TaskPatch};
use crate::error::TaskError;
use crate::store::backend::{make_key, parse_key, StorageBackend, StorageError};
use crate::store::StoreConfig;
use crate::types::{CreateTaskParams, Task, UpdateTaskParams};

/// Generic task store that delegates all storage to a [`StorageBackend`].
///
/// # Type Parameters
///
/// * `B` - A [`StorageBackend`] implementation (in-memory, Redis, etc.)
#[derive(Debug)]
pub struct GenericTaskStore<B: StorageBackend> {
    backend: B,
    config: StoreConfig,
}

impl<B: StorageBackend> GenericTaskStore<B> {
    /// Creates a new generic task store with `StoreConfig::default()`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            config: StoreConfig::default(),
        }
    }

    /// Sets the storage configuration.
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    // ---- Serialization helpers (private) ----

    fn serialize_task(task: &Task) -> Result<Vec<u8>, TaskError> {
        serde_json::to_vec(task)
            .map_err(|e| TaskError::StoreError(format!("failed to serialize Task: {e}")))
    }

    fn deserialize_task(data: &[u8]) -> Result<Task, TaskError> {
        serde_json::from_slice(data)
            .map_err(|e| TaskError::StoreError(format!("failed to deserialize Task: {e}")))
    }

    fn map_storage_error(err: StorageError, task_id: &str) -> TaskError {
        match err {
            StorageError::NotFound { .. } => TaskError::NotFound {
                task_id: task_id.to_string(),
            },
            StorageError::VersionConflict {
                expected, actual, ..
            } => TaskError::ConcurrentModification {
                task_id: task_id.to_string(),
                expected_version: expected,
                actual_version: actual,
            },
            StorageError::Backend { message, .. } => {
                tracing::error!(task_id = task_id, error = %message, "storage backend failure");
                TaskError::StoreError(message)
            },
        }
    }

    /// Returns every stored task, ordered by `created_at` then `id`.
    ///
    /// Entries under the task prefix that fail to deserialize abort the
    /// listing with [`TaskError::StoreError`].
    pub async fn list(&self) -> Result<Vec<Task>, TaskError> {
        let entries = self
            .backend
            .list_by_prefix(TASK_KEY_PREFIX)
            .await
            .map_err(|e| Self::map_storage_error(e, "*"))?;

        let mut tasks = Vec::with_capacity(entries.len());
        for (key, versioned) in entries {
            let mut task = Self::deserialize_task(&versioned.data)?;
            task.version = versioned.version;
            if let Some(id) = parse_key(&key) {
                if task.id != id {
                    tracing::warn!(key = %key, stored_id = %task.id, "task id does not match its key");
                }
            }
            tasks.push(task);
        }

        tasks.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        tracing::debug!(count = tasks.len(), "listed tasks");
        Ok(tasks)
    }

    /// Validates and persists a new task.
    ///
    /// The returned record carries the version assigned by the backend,
    /// which is 1 for a fresh key.
    pub async fn create(&self, params: CreateTaskParams) -> Result<Task, TaskError> {
        let new = NewTask::from_params(params, self.config.max_title_length)?;
        let mut task = new.into_task();

        let key = make_key(&task.id);
        let bytes = Self::serialize_task(&task)?;
        task.version = self
            .backend
            .put(&key, &bytes)
            .await
            .map_err(|e| Self::map_storage_error(e, &task.id))?;

        tracing::debug!(task_id = %task.id, day = %task.day_of_week, "created task");
        Ok(task)
    }

    /// Merges the supplied fields over the stored task with CAS-based
    /// atomicity.
    ///
    /// # Errors
    ///
    /// - [`TaskError::Validation`] if a supplied title is blank or a supplied
    ///   day is unknown. Checked before any storage access.
    /// - [`TaskError::NotFound`] if no task is stored under `task_id`.
    /// - [`TaskError::ConcurrentModification`] if `expected_version` does not
    ///   match, or every CAS attempt lost a race.
    pub async fn update(&self, task_id: &str, params: UpdateTaskParams) -> Result<Task, TaskError> {
        let patch = TaskPatch::from_params(params, self.config.max_title_length)?;
        let key = make_key(task_id);
        let attempts = self.config.max_update_retries.max(1);

        let mut last_conflict = None;
        for attempt in 1..=attempts {
            let versioned = self
                .backend
                .get(&key)
                .await
                .map_err(|e| Self::map_storage_error(e, task_id))?;

            if let Some(expected) = patch.expected_version {
                if expected != versioned.version {
                    tracing::warn!(
                        task_id = task_id,
                        expected_version = expected,
                        actual_version = versioned.version,
                        "rejecting stale update"
                    );
                    return Err(TaskError::ConcurrentModification {
                        task_id: task_id.to_string(),
                        expected_version: expected,
                        actual_version: versioned.version,
                    });
                }
            }

            let mut task = Self::deserialize_task(&versioned.data)?;
            patch.apply(&mut task);
            // The path id is authoritative.
            task.id = task_id.to_string();

            let bytes = Self::serialize_task(&task)?;
            match self
                .backend
                .put_if_version(&key, &bytes, versioned.version)
                .await
            {
                Ok(new_version) => {
                    task.version = new_version;
                    tracing::debug!(task_id = task_id, version = new_version, "updated task");
                    return Ok(task);
                },
                Err(StorageError::VersionConflict {
                    expected, actual, ..
                }) => {
                    tracing::warn!(
                        task_id = task_id,
                        attempt = attempt,
                        expected_version = expected,
                        actual_version = actual,
                        "update lost a CAS race, retrying"
                    );
                    last_conflict = Some((expected, actual));
                },
                Err(e) => return Err(Self::map_storage_error(e, task_id)),
            }
        }

        let (expected_version, actual_version) = last_conflict.unwrap_or_default();
        Err(TaskError::ConcurrentModification {
            task_id: task_id.to_string(),
            expected_version,
            actual_version,
        })
    }

    /// Removes a task. Deleting an unknown id is not an error.
    pub async fn delete(&self, task_id: &str) -> Result<(), TaskError> {
        let existed = self
            .backend
            .delete(&make_key(task_id))
            .await
            .map_err(|e| Self::map_storage_error(e, task_id))?;
        tracing::debug!(task_id = task_id, existed = existed, "deleted task");
        Ok(())
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns a reference to the underlying storage backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
