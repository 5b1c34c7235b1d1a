//! Low-level key-value storage backend trait and supporting types.
//!
//! The [`StorageBackend`] trait defines the contract every storage engine
//! implements: [`get`](StorageBackend::get), [`put`](StorageBackend::put),
//! [`put_if_version`](StorageBackend::put_if_version),
//! [`delete`](StorageBackend::delete), and
//! [`list_by_prefix`](StorageBackend::list_by_prefix).
//!
//! Validation, defaults, and merge logic do **not** belong here. Backends
//! are dumb KV stores; domain logic lives in `GenericTaskStore`.
//!
//! # Key Structure
//!
//! Task keys are `task:{id}` (see [`TASK_KEY_PREFIX`]). Ids are `UUIDv4`
//! strings, so a prefix scan of `task:` never picks up anything but tasks.
//!
//! # Versioning
//!
//! Each stored value carries a monotonic `u64` version starting at 1,
//! incremented on every successful write. [`put_if_version`](StorageBackend::put_if_version)
//! provides compare-and-swap (CAS) semantics for atomic read-modify-write.

use std::fmt;

use async_trait::async_trait;

use crate::constants::TASK_KEY_PREFIX;

/// A stored value paired with its monotonic version number.
///
/// # Examples
///
/// ```
/// use weekboard_tasks::store::backend::VersionedRecord;
///
/// let record = VersionedRecord {
///     data: b"{}".to_vec(),
///     version: 1,
/// };
/// assert_eq!(record.version, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedRecord {
    /// The serialized task bytes (JSON).
    pub data: Vec<u8>,

    /// Monotonic version number. Starts at 1, increments on each write.
    pub version: u64,
}

/// Errors from raw storage operations.
///
/// `GenericTaskStore` maps these to [`TaskError`](crate::error::TaskError)
/// variants before they reach callers.
///
/// # Examples
///
/// ```
/// use weekboard_tasks::store::backend::StorageError;
///
/// let err = StorageError::NotFound { key: "task:123".to_string() };
/// assert!(err.to_string().contains("task:123"));
/// ```
#[derive(Debug)]
pub enum StorageError {
    /// The requested key was not found.
    NotFound {
        /// The key that was not found.
        key: String,
    },

    /// A [`put_if_version`](StorageBackend::put_if_version) call found a
    /// different version than expected.
    VersionConflict {
        /// The key where the conflict occurred.
        key: String,
        /// The version the caller expected.
        expected: u64,
        /// The version found in storage.
        actual: u64,
    },

    /// An I/O or backend-specific failure (network, database, ...).
    Backend {
        /// Human-readable description.
        message: String,
        /// The underlying error, if available.
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StorageError {
    /// Wraps an arbitrary error as [`StorageError::Backend`].
    pub fn backend<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { key } => write!(f, "key not found: {key}"),
            Self::VersionConflict {
                key,
                expected,
                actual,
            } => write!(
                f,
                "version conflict on key {key}: expected {expected}, found {actual}"
            ),
            Self::Backend { message, .. } => write!(f, "backend error: {message}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Backend {
                source: Some(src), ..
            } => Some(src.as_ref()),
            _ => None,
        }
    }
}

/// Key-value storage backend for task persistence.
///
/// Implementations must be `Send + Sync` and make every single-key operation
/// atomic. No operation spans more than one key, so multi-key transactions
/// are not required.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Retrieves a value by key.
    ///
    /// # Errors
    ///
    /// - [`StorageError::NotFound`] if no value exists for the key.
    /// - [`StorageError::Backend`] on backend failures.
    async fn get(&self, key: &str) -> Result<VersionedRecord, StorageError>;

    /// Stores a value unconditionally (create or overwrite).
    ///
    /// New keys get version 1; existing keys get their version incremented.
    /// Returns the assigned version.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Backend`] on backend failures.
    async fn put(&self, key: &str, data: &[u8]) -> Result<u64, StorageError>;

    /// Stores a value only if the current version equals `expected_version`.
    ///
    /// # Errors
    ///
    /// - [`StorageError::NotFound`] if the key does not exist.
    /// - [`StorageError::VersionConflict`] on version mismatch.
    /// - [`StorageError::Backend`] on backend failures.
    async fn put_if_version(
        &self,
        key: &str,
        data: &[u8],
        expected_version: u64,
    ) -> Result<u64, StorageError>;

    /// Deletes a value. Returns `true` if the key existed.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Backend`] on backend failures.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// Lists every entry whose key starts with `prefix`, in no particular
    /// order.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Backend`] on backend failures.
    async fn list_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<(String, VersionedRecord)>, StorageError>;
}

/// Builds the storage key for a task id.
///
/// # Examples
///
/// ```
/// use weekboard_tasks::store::backend::make_key;
///
/// assert_eq!(make_key("abc"), "task:abc");
/// ```
pub fn make_key(task_id: &str) -> String {
    format!("{TASK_KEY_PREFIX}{task_id}")
}

/// Extracts the task id from a storage key, or `None` if the key is outside
/// the task namespace.
///
/// # Examples
///
/// ```
/// use weekboard_tasks::store::backend::parse_key;
///
/// assert_eq!(parse_key("task:abc"), Some("abc"));
/// assert_eq!(parse_key("session:abc"), None);
/// ```
pub fn parse_key(key: &str) -> Option<&str> {
    key.strip_prefix(TASK_KEY_PREFIX)
}
