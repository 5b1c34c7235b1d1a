//! Request parameter and response body types for the HTTP API.
//!
//! Request types keep every field optional so that presence is checked by
//! the store, not by the JSON decoder: a missing `title` is a
//! [`TaskError::Validation`](crate::TaskError::Validation), not a decode
//! failure. Unknown fields (including `id` and `createdAt`) are ignored.

use serde::{Deserialize, Serialize};

use super::task::{DayOfWeek, Task};

/// Body of `POST /tasks`.
///
/// # Examples
///
/// ```
/// use weekboard_tasks::{CreateTaskParams, DayOfWeek};
///
/// let params = CreateTaskParams::new("Buy milk", DayOfWeek::Monday);
/// let json = serde_json::to_value(&params).unwrap();
/// assert_eq!(json["dayOfWeek"], "monday");
/// assert_eq!(json["completed"], false);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskParams {
    /// Task title. Required; trimmed by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Day symbol. Required; must be one of the seven days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<String>,

    /// Initial completion flag. Defaults to `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl CreateTaskParams {
    /// Params for a new, not-yet-completed task.
    pub fn new(title: impl Into<String>, day: DayOfWeek) -> Self {
        Self {
            title: Some(title.into()),
            day_of_week: Some(day.as_str().to_string()),
            completed: Some(false),
        }
    }
}

/// Body of `PUT /tasks/{id}`: a partial update.
///
/// Omitted fields (and explicit `null`s) leave the stored value unchanged.
/// `expected_version`, when present, makes the write conditional on the
/// record still being at that version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskParams {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New day symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<String>,

    /// New completion flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,

    /// Reject the write unless the stored record is at this version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
}

impl UpdateTaskParams {
    /// An update that changes only the title and day.
    pub fn edit(title: impl Into<String>, day: DayOfWeek) -> Self {
        Self {
            title: Some(title.into()),
            day_of_week: Some(day.as_str().to_string()),
            ..Self::default()
        }
    }

    /// An update that changes only the completion flag.
    pub fn completion(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// Makes this update conditional on `version`.
    pub fn with_expected_version(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }

    /// Returns `true` if no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.day_of_week.is_none() && self.completed.is_none()
    }
}

/// Body of `GET /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTasksResult {
    /// Every persisted task.
    pub tasks: Vec<Task>,
}

/// Body of a successful create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    /// The authoritative record after the write.
    pub task: Task,
}

/// Body of `DELETE /tasks/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTaskResult {
    /// Always `true` on a 2xx response.
    pub success: bool,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"ok"` when the service is up.
    pub status: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short description of the failure class.
    pub error: String,
    /// Stringified underlying error.
    #[serde(default)]
    pub details: String,
}
