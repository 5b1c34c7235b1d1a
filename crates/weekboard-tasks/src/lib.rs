//! Task records and storage for the weekboard service.
//!
//! A weekboard task is a short to-do item bound to one day of a seven-day
//! week. This crate owns everything the server needs to hold tasks durably:
//! the wire types, the validation rules applied on create and update, the
//! error taxonomy, and a layered store built on a prefix-scannable
//! key-value backend.
//!
//! # Module Organization
//!
//! - [`types`] - Wire types (`Task`, `DayOfWeek`, request params, response bodies)
//! - [`domain`] - Record construction, validation, and partial-update merge
//! - [`store`] - `StorageBackend` trait, backends, and the generic task store
//! - [`error`] - [`TaskError`] with HTTP status mapping
//! - [`constants`] - Key namespace and wire constants

pub mod constants;
pub mod domain;
pub mod error;
pub mod store;
pub mod types;

pub use constants::*;
pub use error::TaskError;
pub use store::generic::GenericTaskStore;
pub use store::memory::{InMemoryBackend, InMemoryTaskStore};
pub use store::{StoreConfig, TaskStore};
pub use types::*;
