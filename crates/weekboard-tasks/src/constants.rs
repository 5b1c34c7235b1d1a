//! Key namespace and wire constants.

/// Key prefix shared by every persisted task.
///
/// A task lives under `task:{id}`, so a prefix scan of this value yields
/// exactly the full task set.
pub const TASK_KEY_PREFIX: &str = "task:";

/// Body of a successful health check.
pub const HEALTH_OK: &str = "ok";

/// Number of update attempts the store makes when a concurrent writer wins
/// the compare-and-swap race.
pub const DEFAULT_MAX_UPDATE_RETRIES: usize = 5;
