//! Error types for task operations.
//!
//! Provides [`TaskError`], the store-level error taxonomy, with a mapping to
//! the HTTP status the server answers with.

use std::fmt;

/// Errors that can occur during task store operations.
///
/// Use [`status_code`](TaskError::status_code) to map a variant to the HTTP
/// status returned on the wire, and [`summary`](TaskError::summary) for the
/// short `error` field of the response body.
///
/// # Examples
///
/// ```
/// use weekboard_tasks::TaskError;
///
/// let err = TaskError::NotFound {
///     task_id: "missing-task".to_string(),
/// };
/// assert_eq!(err.status_code(), 404);
/// assert!(err.to_string().contains("missing-task"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// A required field is missing or a supplied field is invalid.
    Validation {
        /// The wire name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// No task exists under the given ID.
    NotFound {
        /// The task ID that was not found.
        task_id: String,
    },

    /// The stored record changed underneath the write.
    ConcurrentModification {
        /// The task being written.
        task_id: String,
        /// The version the writer based its change on.
        expected_version: u64,
        /// The version actually found in storage.
        actual_version: u64,
    },

    /// Backend storage or serialization failure.
    StoreError(String),
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { field, reason } => write!(f, "invalid {field}: {reason}"),
            Self::NotFound { task_id } => write!(f, "task not found: {task_id}"),
            Self::ConcurrentModification {
                task_id,
                expected_version,
                actual_version,
            } => write!(
                f,
                "task {task_id} was modified concurrently: expected version {expected_version}, found {actual_version}"
            ),
            Self::StoreError(msg) => write!(f, "store error: {msg}"),
        }
    }
}

impl std::error::Error for TaskError {}

impl TaskError {
    /// Shorthand for a [`TaskError::Validation`].
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Maps this error to the HTTP status code used on the wire.
    ///
    /// - `400`: `Validation`
    /// - `404`: `NotFound`
    /// - `409`: `ConcurrentModification`
    /// - `500`: `StoreError`
    ///
    /// # Examples
    ///
    /// ```
    /// use weekboard_tasks::TaskError;
    ///
    /// assert_eq!(TaskError::validation("title", "required").status_code(), 400);
    /// assert_eq!(TaskError::StoreError("db timeout".to_string()).status_code(), 500);
    /// ```
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::ConcurrentModification { .. } => 409,
            Self::StoreError(_) => 500,
        }
    }

    /// Short, stable description used as the `error` field of a response body.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "Invalid task fields",
            Self::NotFound { .. } => "Task not found",
            Self::ConcurrentModification { .. } => "Task was modified concurrently",
            Self::StoreError(_) => "Storage failure",
        }
    }
}
