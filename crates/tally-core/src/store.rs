use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::datastore::StateStore;
use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub active: usize,
    pub completed: usize,
    pub total: usize,
}

/// The single source of truth for the task collection. Mutations go
/// through here and re-serialize the full collection afterwards.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    #[tracing::instrument(skip(state))]
    pub fn load(state: &StateStore) -> Self {
        let tasks = state.load_tasks();
        debug!(count = tasks.len(), "task store loaded");
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn next_id(&self) -> u64 {
        self.tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1
    }

    /// Adds a task with the trimmed text, newest first. Empty or
    /// whitespace-only input is ignored and returns `None`.
    #[tracing::instrument(skip(self, state, text, now))]
    pub fn add(&mut self, state: &StateStore, text: &str, now: DateTime<Utc>) -> Option<u64> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("rejected empty task text");
            return None;
        }

        let id = self.next_id();
        let task = Task::new(trimmed.to_string(), now, id);
        self.tasks.insert(0, task);
        self.persist(state);

        info!(id, count = self.tasks.len(), "task added");
        Some(id)
    }

    /// Flips completion on the matching task. Unknown ids are a no-op.
    #[tracing::instrument(skip(self, state))]
    pub fn toggle(&mut self, state: &StateStore, id: u64) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!(id, "toggle on unknown id ignored");
            return false;
        };

        task.completed = !task.completed;
        let completed = task.completed;
        self.persist(state);

        info!(id, completed, "task toggled");
        true
    }

    /// Removes the matching task. Unknown ids are a no-op.
    #[tracing::instrument(skip(self, state))]
    pub fn delete(&mut self, state: &StateStore, id: u64) -> bool {
        let Some(idx) = self.tasks.iter().position(|task| task.id == id) else {
            debug!(id, "delete on unknown id ignored");
            return false;
        };

        self.tasks.remove(idx);
        self.persist(state);

        info!(id, count = self.tasks.len(), "task deleted");
        true
    }

    /// Drops every completed task, keeping active tasks in order.
    /// Persists even when nothing was removed.
    #[tracing::instrument(skip(self, state))]
    pub fn clear_completed(&mut self, state: &StateStore) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        let removed = before - self.tasks.len();
        self.persist(state);

        info!(removed, remaining = self.tasks.len(), "cleared completed tasks");
        removed
    }

    pub fn stats(&self) -> Stats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|task| task.completed).count();

        Stats {
            active: total - completed,
            completed,
            total,
        }
    }

    /// Durability is best-effort: a failed write leaves the in-memory
    /// collection authoritative for the rest of the invocation.
    fn persist(&self, state: &StateStore) {
        if let Err(err) = state.save_tasks(&self.tasks) {
            warn!(error = %err, "failed to persist tasks; in-memory state kept");
        }
    }
}
