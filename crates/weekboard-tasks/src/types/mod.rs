//! Wire types for the weekboard HTTP API.

pub mod params;
pub mod task;

pub use params::{
    CreateTaskParams, DeleteTaskResult, ErrorBody, HealthStatus, ListTasksResult, TaskResult,
    UpdateTaskParams,
};
pub use task::{DayOfWeek, Task};
