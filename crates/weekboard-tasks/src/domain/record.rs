//! Validated inputs for the two write paths.
//!
//! [`NewTask`] is a create request that passed validation; turning it into a
//! [`Task`] assigns the identifier and creation timestamp. [`TaskPatch`] is a
//! validated partial update that merges over an existing record without
//! touching `id` or `created_at`.

use chrono::Utc;
use uuid::Uuid;

use crate::error::TaskError;
use crate::types::{CreateTaskParams, DayOfWeek, Task, UpdateTaskParams};

/// Trims a title and checks it is non-empty and within `max_chars`.
///
/// # Examples
///
/// ```
/// use weekboard_tasks::domain::validate_title;
///
/// assert_eq!(validate_title("  Buy milk \n", None).unwrap(), "Buy milk");
/// assert!(validate_title("   ", None).is_err());
/// assert!(validate_title("abcdef", Some(5)).is_err());
/// ```
pub fn validate_title(raw: &str, max_chars: Option<usize>) -> Result<String, TaskError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(TaskError::validation("title", "title is required"));
    }
    if let Some(max) = max_chars {
        let len = title.chars().count();
        if len > max {
            return Err(TaskError::validation(
                "title",
                format!("title is {len} characters, limit is {max}"),
            ));
        }
    }
    Ok(title.to_string())
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Trimmed title.
    pub title: String,
    /// Day bucket.
    pub day: DayOfWeek,
    /// Initial completion flag.
    pub completed: bool,
}

impl NewTask {
    /// Validates create params: title present and non-blank, day present and
    /// one of the seven symbols. `completed` defaults to `false`.
    pub fn from_params(
        params: CreateTaskParams,
        max_title_chars: Option<usize>,
    ) -> Result<Self, TaskError> {
        let title = params
            .title
            .as_deref()
            .ok_or_else(|| TaskError::validation("title", "title is required"))
            .and_then(|t| validate_title(t, max_title_chars))?;
        let day = params
            .day_of_week
            .as_deref()
            .ok_or_else(|| TaskError::validation("dayOfWeek", "dayOfWeek is required"))?
            .parse::<DayOfWeek>()?;

        Ok(Self {
            title,
            day,
            completed: params.completed.unwrap_or(false),
        })
    }

    /// Builds the record to persist: fresh UUID v4 id, current UTC time as
    /// `created_at`. The version is left at 0 for the backend to assign.
    pub fn into_task(self) -> Task {
        Task {
            id: Uuid::new_v4().to_string(),
            title: self.title,
            day_of_week: self.day.as_str().to_string(),
            completed: self.completed,
            created_at: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            version: 0,
        }
    }
}

/// A validated partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// Replacement title, already trimmed.
    pub title: Option<String>,
    /// Replacement day.
    pub day: Option<DayOfWeek>,
    /// Replacement completion flag.
    pub completed: Option<bool>,
    /// Required stored version, if the caller asked for a conditional write.
    pub expected_version: Option<u64>,
}

impl TaskPatch {
    /// Validates update params. Only supplied fields are checked.
    pub fn from_params(
        params: UpdateTaskParams,
        max_title_chars: Option<usize>,
    ) -> Result<Self, TaskError> {
        let title = params
            .title
            .as_deref()
            .map(|t| validate_title(t, max_title_chars))
            .transpose()?;
        let day = params
            .day_of_week
            .as_deref()
            .map(str::parse::<DayOfWeek>)
            .transpose()?;

        Ok(Self {
            title,
            day,
            completed: params.completed,
            expected_version: params.expected_version,
        })
    }

    /// Merges this patch over `task`. `id`, `created_at`, and `version` are
    /// never touched.
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(day) = self.day {
            task.day_of_week = day.as_str().to_string();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}
