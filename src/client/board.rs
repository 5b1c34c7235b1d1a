//! The task board view-model.
//!
//! [`TaskBoard`] owns the [`BoardState`] cache and is the only place it is
//! mutated. Every mutation is applied after the store confirms it; a failed
//! call leaves the cache as it was.
//!
//! The state lock is taken only to read the cache before a call or to apply
//! its response, never across the network await, so operations may be
//! issued concurrently. Responses are applied in arrival order: two updates
//! to the same task without version checks leave whichever landed last.

use parking_lot::RwLock;
use weekboard_tasks::{CreateTaskParams, DayOfWeek, Task, UpdateTaskParams};

use super::views::{BoardState, DayStats, WeekStats};
use super::TaskApi;
use crate::error::ClientError;

/// The operation a [`BoardError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardOp {
    /// Load or refresh.
    Load,
    /// Create or edit.
    Save,
    /// Completion toggle.
    Toggle,
    /// Delete.
    Delete,
}

impl BoardOp {
    /// Message shown to the user when this operation fails.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Load => "Could not load tasks",
            Self::Save => "Could not save task",
            Self::Toggle => "Could not update task status",
            Self::Delete => "Could not delete task",
        }
    }
}

/// A failed board operation. The cache is unchanged.
#[derive(Debug, thiserror::Error)]
#[error("{}: {source}", .op.user_message())]
pub struct BoardError {
    /// Which operation failed.
    pub op: BoardOp,
    /// The underlying client error.
    #[source]
    pub source: ClientError,
}

impl BoardError {
    fn new(op: BoardOp, source: ClientError) -> Self {
        tracing::error!(error = %source, "{}", op.user_message());
        Self { op, source }
    }

    /// Message shown to the user.
    pub fn user_message(&self) -> &'static str {
        self.op.user_message()
    }
}

// ---- Cache mutation ----

impl BoardState {
    fn finish_load(&mut self, result: Option<Vec<Task>>) {
        if let Some(tasks) = result {
            self.tasks = tasks;
        }
        self.loading = false;
    }

    fn append(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Replaces the cached record with the same id. A record that left the
    /// cache while the call was in flight is not reinserted.
    fn replace(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            },
            None => false,
        }
    }

    fn remove(&mut self, task_id: &str) {
        self.tasks.retain(|t| t.id != task_id);
    }
}

/// Client view-model over a [`TaskApi`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use weekboard::client::{LocalTaskApi, TaskBoard};
/// use weekboard_tasks::{DayOfWeek, InMemoryTaskStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let board = TaskBoard::new(LocalTaskApi::new(Arc::new(InMemoryTaskStore::new())));
/// board.load().await.unwrap();
/// let task = board.save("Buy milk", DayOfWeek::Monday, None).await.unwrap();
/// board.toggle(&task.id, true).await.unwrap();
/// assert_eq!(board.week_stats().completion_rate, 100);
/// # }
/// ```
#[derive(Debug)]
pub struct TaskBoard<A> {
    api: A,
    state: RwLock<BoardState>,
    version_checks: bool,
}

impl<A: TaskApi> TaskBoard<A> {
    /// Creates a board with an empty, loading cache.
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: RwLock::new(BoardState::default()),
            version_checks: false,
        }
    }

    /// When enabled, edits and toggles send the cached version as
    /// `expectedVersion`, so a write based on a stale cache is rejected
    /// with 409 instead of overwriting.
    pub fn with_version_checks(mut self, enabled: bool) -> Self {
        self.version_checks = enabled;
        self
    }

    /// The underlying API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// A copy of the current cache.
    pub fn snapshot(&self) -> BoardState {
        self.state.read().clone()
    }

    /// Runs `f` against the cache under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&BoardState) -> R) -> R {
        f(&*self.state.read())
    }

    /// Cached tasks.
    pub fn tasks(&self) -> Vec<Task> {
        self.state.read().tasks().to_vec()
    }

    /// `true` until the first load attempt finishes.
    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading()
    }

    /// Per-day completion counts, Monday first.
    pub fn day_stats(&self) -> Vec<DayStats> {
        self.state.read().day_stats()
    }

    /// Whole-board completion counts.
    pub fn week_stats(&self) -> WeekStats {
        self.state.read().week_stats()
    }

    /// Replaces the cache with the store's full task list.
    ///
    /// On failure the cache is unchanged. The loading flag clears either
    /// way.
    pub async fn load(&self) -> Result<(), BoardError> {
        let result = self.api.list_tasks().await;
        match result {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "loaded tasks");
                self.state.write().finish_load(Some(tasks));
                Ok(())
            },
            Err(e) => {
                self.state.write().finish_load(None);
                Err(BoardError::new(BoardOp::Load, e))
            },
        }
    }

    /// Alias for [`load`](Self::load).
    pub async fn refresh(&self) -> Result<(), BoardError> {
        self.load().await
    }

    /// Creates a task, or edits `editing` when given.
    ///
    /// The title is trimmed; a blank title fails locally with
    /// [`ClientError::InvalidInput`] and nothing is sent.
    pub async fn save(
        &self,
        title: &str,
        day: DayOfWeek,
        editing: Option<&Task>,
    ) -> Result<Task, BoardError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BoardError::new(
                BoardOp::Save,
                ClientError::InvalidInput("title is required".to_string()),
            ));
        }

        match editing {
            Some(existing) => {
                let mut params = UpdateTaskParams::edit(title, day);
                if self.version_checks {
                    params = params.with_expected_version(existing.version);
                }
                let task = self
                    .api
                    .update_task(&existing.id, params)
                    .await
                    .map_err(|e| BoardError::new(BoardOp::Save, e))?;
                self.state.write().replace(task.clone());
                Ok(task)
            },
            None => {
                let task = self
                    .api
                    .create_task(CreateTaskParams::new(title, day))
                    .await
                    .map_err(|e| BoardError::new(BoardOp::Save, e))?;
                self.state.write().append(task.clone());
                Ok(task)
            },
        }
    }

    /// Sets a task's completion flag.
    pub async fn toggle(&self, task_id: &str, completed: bool) -> Result<Task, BoardError> {
        let mut params = UpdateTaskParams::completion(completed);
        if self.version_checks {
            let cached = self.state.read().find(task_id).map(|t| t.version);
            if let Some(version) = cached {
                params = params.with_expected_version(version);
            }
        }

        let task = self
            .api
            .update_task(task_id, params)
            .await
            .map_err(|e| BoardError::new(BoardOp::Toggle, e))?;
        self.state.write().replace(task.clone());
        Ok(task)
    }

    /// Deletes a task and drops it from the cache once the store confirms.
    pub async fn delete(&self, task_id: &str) -> Result<(), BoardError> {
        self.api
            .delete_task(task_id)
            .await
            .map_err(|e| BoardError::new(BoardOp::Delete, e))?;
        self.state.write().remove(task_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            day_of_week: "monday".to_string(),
            completed: false,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            version: 1,
        }
    }

    #[test]
    fn replace_only_touches_matching_id() {
        let mut state = BoardState::default();
        state.finish_load(Some(vec![task("a"), task("b")]));
        let mut b = task("b");
        b.completed = true;
        assert!(state.replace(b.clone()));
        assert_eq!(state.tasks(), &[task("a"), b]);
        assert!(!state.replace(task("zzz")));
        assert_eq!(state.tasks().len(), 2);
    }

    #[test]
    fn failed_load_keeps_cache_and_clears_loading() {
        let mut state = BoardState::default();
        state.append(task("a"));
        state.finish_load(None);
        assert!(!state.is_loading());
        assert_eq!(state.tasks(), &[task("a")]);
    }

    #[test]
    fn remove_is_id_scoped() {
        let mut state = BoardState::default();
        state.finish_load(Some(vec![task("a"), task("b")]));
        state.remove("a");
        state.remove("missing");
        assert_eq!(state.tasks(), &[task("b")]);
    }

    #[test]
    fn board_error_messages() {
        let err = BoardError {
            op: BoardOp::Toggle,
            source: ClientError::InvalidInput("x".to_string()),
        };
        assert_eq!(err.user_message(), "Could not update task status");
        assert_eq!(
            err.to_string(),
            "Could not update task status: invalid input: x"
        );
        assert_eq!(BoardOp::Load.user_message(), "Could not load tasks");
        assert_eq!(BoardOp::Save.user_message(), "Could not save task");
        assert_eq!(BoardOp::Delete.user_message(), "Could not delete task");
    }
}
