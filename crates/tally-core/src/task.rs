use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,

    pub text: String,

    #[serde(default)]
    pub completed: bool,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(text: String, now: DateTime<Utc>, id: u64) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::Task;

    #[test]
    fn new_task_starts_open() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        let task = Task::new("Buy milk".to_string(), now, 1);

        assert_eq!(task.id, 1);
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert_eq!(task.created_at, now);
    }

    #[test]
    fn serializes_with_camel_case_timestamp() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        let task = Task::new("Walk dog".to_string(), now, 2);

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"createdAt\":\"2026-08-07T12:00:00Z\""));
        assert!(!json.contains("created_at"));

        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }
}
