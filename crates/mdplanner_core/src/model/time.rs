//! Time tracking entries keyed by task id.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeEntry {
    pub id: String,
    pub date: String,
    pub hours: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub person: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Entries logged against one task, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskTimeLog {
    pub task_id: String,
    pub entries: Vec<TimeEntry>,
}

impl TaskTimeLog {
    pub fn total_hours(&self) -> f64 {
        self.entries.iter().map(|entry| entry.hours).sum()
    }
}

/// Finds the log of `task_id`.
pub fn log_for<'a>(logs: &'a [TaskTimeLog], task_id: &str) -> Option<&'a TaskTimeLog> {
    logs.iter().find(|log| log.task_id == task_id)
}
