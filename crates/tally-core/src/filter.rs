use anyhow::anyhow;

use crate::task::Task;

/// Which slice of the collection a view shows. Never mutates the
/// underlying tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

const FILTER_NAMES: [&str; 3] = ["all", "active", "completed"];

impl Filter {
    pub fn name(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    /// Derives the filtered view, preserving collection order.
    pub fn apply<'a>(self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}

impl std::str::FromStr for Filter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.to_ascii_lowercase();
        let mut matches = FILTER_NAMES
            .iter()
            .copied()
            .filter(|name| name.starts_with(token.as_str()));

        let first = matches
            .next()
            .ok_or_else(|| anyhow!("unknown filter: {s} (expected all, active, or completed)"))?;
        if matches.next().is_some() {
            return Err(anyhow!("ambiguous filter: {s}"));
        }

        match first {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            _ => Ok(Filter::Completed),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::Filter;
    use crate::task::Task;

    fn mixed_tasks() -> Vec<Task> {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 8, 0, 0).unwrap();
        let mut tasks = vec![
            Task::new("third".to_string(), now, 3),
            Task::new("second".to_string(), now, 2),
            Task::new("first".to_string(), now, 1),
        ];
        tasks[1].completed = true;
        tasks
    }

    #[test]
    fn all_returns_every_task_in_order() {
        let tasks = mixed_tasks();
        let view = Filter::All.apply(&tasks);

        let ids: Vec<u64> = view.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn active_and_completed_partition_the_collection() {
        let tasks = mixed_tasks();
        let active = Filter::Active.apply(&tasks);
        let completed = Filter::Completed.apply(&tasks);

        assert_eq!(active.len() + completed.len(), tasks.len());
        for task in &active {
            assert!(!completed.iter().any(|other| other.id == task.id));
        }

        // Together the two views account for every task exactly once.
        let mut merged: Vec<u64> = active
            .iter()
            .chain(completed.iter())
            .map(|task| task.id)
            .collect();
        merged.sort_unstable();
        let mut expected: Vec<u64> = tasks.iter().map(|task| task.id).collect();
        expected.sort_unstable();
        assert_eq!(merged, expected);
    }

    #[test]
    fn filtered_views_preserve_relative_order() {
        let tasks = mixed_tasks();
        let active: Vec<u64> = Filter::Active.apply(&tasks).iter().map(|t| t.id).collect();
        assert_eq!(active, vec![3, 1]);

        let completed: Vec<u64> = Filter::Completed
            .apply(&tasks)
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(completed, vec![2]);
    }

    #[test]
    fn parses_names_and_unambiguous_prefixes() {
        assert_eq!("all".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!("act".parse::<Filter>().unwrap(), Filter::Active);
        assert_eq!("c".parse::<Filter>().unwrap(), Filter::Completed);
        assert_eq!("COMPLETED".parse::<Filter>().unwrap(), Filter::Completed);

        assert!("a".parse::<Filter>().is_err());
        assert!("done".parse::<Filter>().is_err());
    }
}
