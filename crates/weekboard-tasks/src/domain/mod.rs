//! Domain rules for task records.
//!
//! These are separate from the wire types in [`crate::types`] so that every
//! write path goes through the same validation regardless of backend.

pub mod record;

pub use record::{validate_title, NewTask, TaskPatch};
