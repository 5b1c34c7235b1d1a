//! Core task wire types: [`Task`] and [`DayOfWeek`].
//!
//! # Serialization
//!
//! All types use `#[serde(rename_all = "camelCase")]` to match the JSON the
//! HTTP API speaks. `dayOfWeek` is carried as a plain string on [`Task`] so
//! that a record holding an unrecognised day still deserializes; use
//! [`Task::day`] to get the typed value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TaskError;

/// One of the seven fixed day buckets of the board, Monday first.
///
/// # Examples
///
/// ```
/// use weekboard_tasks::DayOfWeek;
///
/// let day: DayOfWeek = "friday".parse().unwrap();
/// assert_eq!(day, DayOfWeek::Friday);
/// assert_eq!(day.as_str(), "friday");
/// assert!("Friday".parse::<DayOfWeek>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl DayOfWeek {
    /// All seven days in board order.
    pub const ALL: [DayOfWeek; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// The wire symbol for this day.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    /// Zero-based position in the week (Monday = 0).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = TaskError;

    /// Parses an exact lowercase wire symbol.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| {
                TaskError::validation("dayOfWeek", format!("unknown day '{s}'"))
            })
    }
}

/// A task record as it appears on the wire and in storage.
///
/// `id` and `created_at` are assigned by the store and never change.
/// `version` is the storage version of the record; it is overwritten from
/// the backend on every read, so the value inside persisted bytes is never
/// trusted.
///
/// # Examples
///
/// ```
/// use weekboard_tasks::{DayOfWeek, Task};
///
/// let json = serde_json::json!({
///     "id": "a1",
///     "title": "Buy milk",
///     "dayOfWeek": "monday",
///     "completed": false,
///     "createdAt": "2025-11-25T12:00:00.000Z"
/// });
/// let task: Task = serde_json::from_value(json).unwrap();
/// assert_eq!(task.day(), Some(DayOfWeek::Monday));
/// assert_eq!(task.version, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned unique identifier.
    pub id: String,

    /// Trimmed, non-empty title.
    pub title: String,

    /// Day symbol (`monday` … `sunday`).
    pub day_of_week: String,

    /// Completion flag.
    pub completed: bool,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// Storage version. Starts at 1 and increments on every write.
    #[serde(default)]
    pub version: u64,
}

impl Task {
    /// Returns the typed day, or `None` if the stored symbol is not one of
    /// the seven known days.
    pub fn day(&self) -> Option<DayOfWeek> {
        self.day_of_week.parse().ok()
    }
}
