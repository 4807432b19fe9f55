//! Time tracking operations.

use super::ProjectStore;
use crate::error::{StoreError, StoreResult};
use crate::markup::ids::random_hex_id;
use crate::markup::section::Document;
use crate::model::time::{log_for, TaskTimeLog, TimeEntry};
use crate::sections::time::{decode_time_logs, encode_time_logs, TIME_SECTION};

const LOG_KIND: &str = "time log";
const ENTRY_KIND: &str = "time entry";

impl ProjectStore {
    fn time_logs_of(&self, doc: &Document) -> Vec<TaskTimeLog> {
        doc.section(&self.registry, TIME_SECTION)
            .map(|lines| decode_time_logs(lines, &self.registry))
            .unwrap_or_default()
    }

    fn modify_time_logs<R>(
        &self,
        change: impl FnOnce(&mut Vec<TaskTimeLog>) -> StoreResult<R>,
    ) -> StoreResult<R> {
        self.edit_section(TIME_SECTION, |doc| {
            let mut logs = self.time_logs_of(doc);
            let value = change(&mut logs)?;
            logs.retain(|log| !log.entries.is_empty());
            Ok((encode_time_logs(&logs), value))
        })
    }

    /// All time logs, one per task with entries.
    pub fn read_time_entries(&self) -> StoreResult<Vec<TaskTimeLog>> {
        let (_, doc) = self.read_document()?;
        Ok(self.time_logs_of(&doc))
    }

    /// Entries logged against `task_id`; empty when none exist.
    pub fn time_entries_for_task(&self, task_id: &str) -> StoreResult<Vec<TimeEntry>> {
        let logs = self.read_time_entries()?;
        Ok(log_for(&logs, task_id)
            .map(|log| log.entries.clone())
            .unwrap_or_default())
    }

    pub fn total_hours_for_task(&self, task_id: &str) -> StoreResult<f64> {
        let logs = self.read_time_entries()?;
        Ok(log_for(&logs, task_id).map_or(0.0, TaskTimeLog::total_hours))
    }

    /// Appends an entry to the task's group, creating the group if needed.
    pub fn add_time_entry(&self, task_id: &str, mut entry: TimeEntry) -> StoreResult<TimeEntry> {
        let task_id = task_id.trim();
        if task_id.is_empty() {
            return Err(StoreError::InvalidInput("task id is empty".to_string()));
        }
        if entry.hours < 0.0 || !entry.hours.is_finite() {
            return Err(StoreError::InvalidInput(format!(
                "hours must be a non-negative number: {}",
                entry.hours
            )));
        }
        if entry.date.is_empty() {
            entry.date = self.clock.today();
        }
        self.modify_time_logs(|logs| {
            let pos = match logs.iter().position(|log| log.task_id == task_id) {
                Some(pos) => pos,
                None => {
                    logs.push(TaskTimeLog {
                        task_id: task_id.to_string(),
                        entries: Vec::new(),
                    });
                    logs.len() - 1
                }
            };
            let log = &mut logs[pos];
            if entry.id.is_empty() || log.entries.iter().any(|e| e.id == entry.id) {
                entry.id = loop {
                    let candidate = random_hex_id();
                    if !log.entries.iter().any(|e| e.id == candidate) {
                        break candidate;
                    }
                };
            }
            log.entries.push(entry.clone());
            Ok(entry)
        })
    }

    pub fn update_time_entry(
        &self,
        task_id: &str,
        entry_id: &str,
        mut entry: TimeEntry,
    ) -> StoreResult<TimeEntry> {
        self.modify_time_logs(|logs| {
            let slot = entry_slot(logs, task_id, entry_id)?;
            entry.id = entry_id.to_string();
            *slot = entry.clone();
            Ok(entry)
        })
    }

    /// Removes one entry; a group left empty disappears from the file.
    pub fn delete_time_entry(&self, task_id: &str, entry_id: &str) -> StoreResult<TimeEntry> {
        self.modify_time_logs(|logs| {
            let log = logs
                .iter_mut()
                .find(|log| log.task_id == task_id)
                .ok_or_else(|| StoreError::not_found(LOG_KIND, task_id))?;
            let pos = log
                .entries
                .iter()
                .position(|e| e.id == entry_id)
                .ok_or_else(|| StoreError::not_found(ENTRY_KIND, entry_id))?;
            Ok(log.entries.remove(pos))
        })
    }
}

fn entry_slot<'a>(
    logs: &'a mut [TaskTimeLog],
    task_id: &str,
    entry_id: &str,
) -> StoreResult<&'a mut TimeEntry> {
    logs.iter_mut()
        .find(|log| log.task_id == task_id)
        .ok_or_else(|| StoreError::not_found(LOG_KIND, task_id))?
        .entries
        .iter_mut()
        .find(|e| e.id == entry_id)
        .ok_or_else(|| StoreError::not_found(ENTRY_KIND, entry_id))
}
