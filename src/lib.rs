//! # Weekboard
//!
//! A weekly task board: short tasks bound to one day of the week, with
//! per-day and whole-week completion statistics.
//!
//! The crate has two halves sharing the wire types from `weekboard-tasks`:
//!
//! - [`server`] - the task store served over HTTP (axum)
//! - [`client`] - an HTTP or in-process [`TaskApi`](client::TaskApi) and the
//!   [`TaskBoard`](client::TaskBoard) view-model that mirrors the store
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use weekboard::client::{HttpTaskClient, TaskBoard};
//! use weekboard::config::{ClientConfig, ServerConfig};
//! use weekboard::server::TaskServer;
//! use weekboard_tasks::{DayOfWeek, InMemoryTaskStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let server = TaskServer::new(ServerConfig::default(), Arc::new(InMemoryTaskStore::new()));
//! let (addr, _handle) = server.start().await?;
//!
//! let client = HttpTaskClient::new(ClientConfig::new(format!("http://{addr}")))?;
//! let board = TaskBoard::new(client);
//! board.load().await?;
//! board.save("Buy milk", DayOfWeek::Monday, None).await?;
//! println!("{}% done", board.week_stats().completion_rate);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod server;

pub use error::{ClientError, ConfigError};
pub use weekboard_tasks as tasks;
