use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::task::Task;

pub const TASKS_KEY: &str = "todos";
pub const THEME_KEY: &str = "darkMode";

/// String-keyed store of serialized entries, one file per key under the
/// data directory.
#[derive(Debug)]
pub struct StateStore {
    pub data_dir: PathBuf,
}

impl StateStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        info!(data_dir = %data_dir.display(), "opened state store");

        Ok(Self { data_dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(key)
    }

    /// Reads an entry as text. Absent entries and read failures both come
    /// back as `None`; a read failure is logged.
    #[tracing::instrument(skip(self))]
    pub fn read_entry(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        if !path.exists() {
            debug!(key, "entry absent");
            return None;
        }

        match fs::read_to_string(&path) {
            Ok(raw) => Some(raw),
            Err(err) => {
                warn!(key, error = %err, "failed reading entry; treating as absent");
                None
            }
        }
    }

    /// Replaces an entry atomically: the payload lands in a temp file in
    /// the same directory and is renamed over the old entry.
    #[tracing::instrument(skip(self, payload))]
    pub fn write_entry(&self, key: &str, payload: &str) -> anyhow::Result<()> {
        debug!(key, bytes = payload.len(), "writing entry");

        let path = self.entry_path(key);
        let mut temp = NamedTempFile::new_in(&self.data_dir)?;
        temp.write_all(payload.as_bytes())?;
        temp.flush()?;

        temp.persist(&path)
            .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

        Ok(())
    }

    /// Loads the task collection from the `todos` entry. An absent or
    /// unparseable entry yields an empty collection, never an error.
    #[tracing::instrument(skip(self))]
    pub fn load_tasks(&self) -> Vec<Task> {
        let Some(raw) = self.read_entry(TASKS_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                debug!(count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(err) => {
                warn!(error = %err, "stored tasks failed to parse; starting empty");
                Vec::new()
            }
        }
    }

    #[tracing::instrument(skip(self, tasks))]
    pub fn save_tasks(&self, tasks: &[Task]) -> anyhow::Result<()> {
        let payload = serde_json::to_string(tasks)?;
        self.write_entry(TASKS_KEY, &payload)
            .context("failed to save tasks")
    }

    /// Loads the persisted theme flag; `None` when absent or unrecognized.
    #[tracing::instrument(skip(self))]
    pub fn load_theme(&self) -> Option<bool> {
        let raw = self.read_entry(THEME_KEY)?;
        match raw.trim() {
            "true" => Some(true),
            "false" => Some(false),
            other => {
                warn!(value = other, "stored theme flag unrecognized; ignoring");
                None
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn save_theme(&self, is_dark: bool) -> anyhow::Result<()> {
        let payload = if is_dark { "true" } else { "false" };
        self.write_entry(THEME_KEY, payload)
            .context("failed to save theme")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use super::{StateStore, TASKS_KEY};
    use crate::task::Task;

    fn sample_tasks() -> Vec<Task> {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 9, 30, 0).unwrap();
        let mut done = Task::new("Buy milk".to_string(), now, 1);
        done.completed = true;
        vec![Task::new("Walk dog".to_string(), now, 2), done]
    }

    #[test]
    fn tasks_round_trip_preserves_order_and_fields() {
        let temp = tempdir().expect("tempdir");
        let store = StateStore::open(temp.path()).expect("open store");

        let tasks = sample_tasks();
        store.save_tasks(&tasks).expect("save tasks");

        assert_eq!(store.load_tasks(), tasks);
    }

    #[test]
    fn persisted_layout_is_a_json_array_with_iso_timestamps() {
        let temp = tempdir().expect("tempdir");
        let store = StateStore::open(temp.path()).expect("open store");

        store.save_tasks(&sample_tasks()).expect("save tasks");

        let raw = store.read_entry(TASKS_KEY).expect("todos entry exists");
        assert!(raw.starts_with('['));
        assert!(raw.contains("\"createdAt\":\"2026-08-07T09:30:00Z\""));
        assert!(raw.contains("\"completed\":true"));
    }

    #[test]
    fn absent_and_corrupt_entries_load_as_empty() {
        let temp = tempdir().expect("tempdir");
        let store = StateStore::open(temp.path()).expect("open store");

        assert!(store.load_tasks().is_empty());

        store
            .write_entry(TASKS_KEY, "{not json")
            .expect("write corrupt entry");
        assert!(store.load_tasks().is_empty());
    }

    #[test]
    fn theme_flag_round_trips_and_rejects_junk() {
        let temp = tempdir().expect("tempdir");
        let store = StateStore::open(temp.path()).expect("open store");

        assert_eq!(store.load_theme(), None);

        store.save_theme(false).expect("save theme");
        assert_eq!(store.load_theme(), Some(false));

        store.save_theme(true).expect("save theme");
        assert_eq!(store.load_theme(), Some(true));

        store
            .write_entry(super::THEME_KEY, "maybe")
            .expect("write junk flag");
        assert_eq!(store.load_theme(), None);
    }
}
