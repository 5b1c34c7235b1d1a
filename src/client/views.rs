//! Board state and the pure derivations computed from it.
//!
//! [`BoardState`] is the client's mirror of the store: an ordered task list
//! plus a loading flag. Everything in this module only reads it; mutation
//! lives in [`board`](super::board).

use weekboard_tasks::{DayOfWeek, Task};

/// The client cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub(crate) tasks: Vec<Task>,
    pub(crate) loading: bool,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            loading: true,
        }
    }
}

impl BoardState {
    /// A loaded state holding `tasks`.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            loading: false,
        }
    }

    /// Cached tasks in cache order (server order after a load, then
    /// creations appended).
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// `true` until the first load attempt finishes.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Looks up a cached task by id.
    pub fn find(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Tasks grouped into the seven day buckets, Monday first.
    pub fn buckets(&self) -> Vec<DayBucket<'_>> {
        partition(&self.tasks)
    }

    /// Per-day completion counts, Monday first.
    pub fn day_stats(&self) -> Vec<DayStats> {
        self.buckets().iter().map(DayBucket::stats).collect()
    }

    /// Whole-board completion counts.
    pub fn week_stats(&self) -> WeekStats {
        WeekStats::from_tasks(&self.tasks)
    }
}

/// The tasks of one day, in cache order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket<'a> {
    /// The bucket's day.
    pub day: DayOfWeek,
    /// Tasks whose `dayOfWeek` is this day.
    pub tasks: Vec<&'a Task>,
}

impl DayBucket<'_> {
    /// Completion counts for this bucket.
    pub fn stats(&self) -> DayStats {
        DayStats {
            day: self.day,
            completed: self.tasks.iter().filter(|t| t.completed).count(),
            total: self.tasks.len(),
        }
    }
}

/// Partitions tasks into seven buckets in week order.
///
/// A task whose `dayOfWeek` is not one of the seven symbols lands in no
/// bucket.
///
/// # Examples
///
/// ```
/// use weekboard::client::views::partition;
/// use weekboard_tasks::{DayOfWeek, Task};
///
/// let task = |id: &str, day: &str| Task {
///     id: id.to_string(),
///     title: "t".to_string(),
///     day_of_week: day.to_string(),
///     completed: false,
///     created_at: String::new(),
///     version: 1,
/// };
/// let tasks = vec![task("a", "friday"), task("b", "someday"), task("c", "monday")];
/// let buckets = partition(&tasks);
/// assert_eq!(buckets.len(), 7);
/// assert_eq!(buckets[0].tasks[0].id, "c");
/// assert_eq!(buckets[DayOfWeek::Friday.index()].tasks[0].id, "a");
/// assert_eq!(buckets.iter().map(|b| b.tasks.len()).sum::<usize>(), 2);
/// ```
pub fn partition(tasks: &[Task]) -> Vec<DayBucket<'_>> {
    let mut buckets: Vec<DayBucket<'_>> = DayOfWeek::ALL
        .iter()
        .map(|&day| DayBucket {
            day,
            tasks: Vec::new(),
        })
        .collect();
    for task in tasks {
        if let Some(day) = task.day() {
            buckets[day.index()].tasks.push(task);
        }
    }
    buckets
}

/// Completion counts for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayStats {
    /// The day.
    pub day: DayOfWeek,
    /// Completed tasks on this day.
    pub completed: usize,
    /// All tasks on this day.
    pub total: usize,
}

impl DayStats {
    /// Percentage of this day's tasks that are complete.
    pub fn completion_rate(&self) -> u32 {
        completion_rate(self.completed, self.total)
    }
}

/// Completion counts across the whole board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekStats {
    /// All cached tasks, including any with an unknown day.
    pub total: usize,
    /// Completed cached tasks.
    pub completed: usize,
    /// `round(100 * completed / total)`, 0 for an empty board.
    pub completion_rate: u32,
}

impl WeekStats {
    /// Counts `tasks`.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total,
            completed,
            completion_rate: completion_rate(completed, total),
        }
    }
}

/// `round(100 * completed / total)` with halves rounded up; 0 when `total`
/// is 0.
///
/// # Examples
///
/// ```
/// use weekboard::client::views::completion_rate;
///
/// assert_eq!(completion_rate(0, 0), 0);
/// assert_eq!(completion_rate(1, 3), 33);
/// assert_eq!(completion_rate(2, 3), 67);
/// assert_eq!(completion_rate(1, 2), 50);
/// assert_eq!(completion_rate(1, 8), 13);
/// ```
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let (c, t) = (completed as u128, total as u128);
    // Integer form of floor(100c/t + 1/2).
    let rate = (200 * c + t) / (2 * t);
    u32::try_from(rate).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task(id: &str, day: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            day_of_week: day.to_string(),
            completed,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            version: 1,
        }
    }

    #[test]
    fn new_state_is_loading_and_empty() {
        let state = BoardState::default();
        assert!(state.is_loading());
        assert!(state.tasks().is_empty());
        assert_eq!(state.week_stats(), WeekStats::default());
    }

    #[test]
    fn partition_keeps_cache_order_within_a_day() {
        let tasks = vec![
            task("1", "monday", false),
            task("2", "tuesday", false),
            task("3", "monday", true),
        ];
        let buckets = partition(&tasks);
        let monday: Vec<&str> = buckets[0].tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(monday, vec!["1", "3"]);
        assert_eq!(buckets[1].tasks.len(), 1);
        assert!(buckets[2..].iter().all(|b| b.tasks.is_empty()));
    }

    #[test]
    fn day_stats_follow_week_order() {
        let state = BoardState {
            tasks: vec![
                task("1", "sunday", true),
                task("2", "monday", false),
                task("3", "monday", true),
            ],
            loading: false,
        };
        let stats = state.day_stats();
        assert_eq!(stats.len(), 7);
        assert_eq!(stats[0].day, DayOfWeek::Monday);
        assert_eq!((stats[0].completed, stats[0].total), (1, 2));
        assert_eq!(stats[0].completion_rate(), 50);
        assert_eq!(stats[6].day, DayOfWeek::Sunday);
        assert_eq!(stats[6].completion_rate(), 100);
        assert_eq!(stats[3].completion_rate(), 0);
    }

    #[test]
    fn unknown_day_counts_toward_week_but_no_bucket() {
        let state = BoardState {
            tasks: vec![task("1", "funday", true), task("2", "monday", false)],
            loading: false,
        };
        let week = state.week_stats();
        assert_eq!(week.total, 2);
        assert_eq!(week.completed, 1);
        assert_eq!(week.completion_rate, 50);
        let bucketed: usize = state.day_stats().iter().map(|s| s.total).sum();
        assert_eq!(bucketed, 1);
    }

    #[test]
    fn completion_rate_examples() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(completion_rate(0, 5), 0);
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(1, 2), 50);
        assert_eq!(completion_rate(3, 3), 100);
        assert_eq!(completion_rate(1, 200), 1);
        assert_eq!(completion_rate(1, 201), 0);
    }
}
