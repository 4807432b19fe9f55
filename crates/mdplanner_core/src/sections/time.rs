//! Time Tracking section codec.
//!
//! # Responsibility
//! - Group time entries under one `## Task: <id>` heading per task.
//! - Encode each entry as a `- {id; date; hours; person; description}` bullet.
//!
//! # Invariants
//! - Groups and entries keep document order.
//! - Groups without entries are not rendered.
//! - The older `- 2026-01-20: 2h by Sam - text` entry line is still read.

use crate::entity::ledger::bullet_config;
use crate::markup::config::{format_amount, parse_float, ConfigMap};
use crate::markup::ids::random_hex_id;
use crate::markup::section::SectionRegistry;
use crate::model::time::{TaskTimeLog, TimeEntry};
use once_cell::sync::Lazy;
use regex::Regex;

pub const TIME_SECTION: &str = "Time Tracking";
const GROUP_PREFIX: &str = "Task:";

static LEGACY_ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^- (\d{4}-\d{2}-\d{2}): ([\d.]+)h(?: by ([^-]+))?(?: - (.+))?$")
        .expect("valid time entry regex")
});

pub fn decode_time_logs(lines: &[String], registry: &SectionRegistry) -> Vec<TaskTimeLog> {
    let mut logs: Vec<TaskTimeLog> = Vec::new();
    let mut current: Option<usize> = None;

    for line in lines {
        let trimmed = line.trim();
        if registry.is_boundary(trimmed) {
            break;
        }
        if let Some(heading) = trimmed.strip_prefix("## ") {
            let task_id = heading
                .trim()
                .strip_prefix(GROUP_PREFIX)
                .unwrap_or(heading)
                .trim()
                .to_string();
            current = Some(match logs.iter().position(|log| log.task_id == task_id) {
                Some(pos) => pos,
                None => {
                    logs.push(TaskTimeLog {
                        task_id,
                        entries: Vec::new(),
                    });
                    logs.len() - 1
                }
            });
            continue;
        }
        let Some(pos) = current else {
            continue;
        };
        if let Some(entry) = decode_entry(trimmed) {
            logs[pos].entries.push(entry);
        }
    }

    logs.retain(|log| !log.entries.is_empty());
    logs
}

fn decode_entry(trimmed: &str) -> Option<TimeEntry> {
    if let Some(config) = bullet_config(trimmed) {
        let id = match config.get("id") {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => random_hex_id(),
        };
        return Some(TimeEntry {
            id,
            date: config.text("date"),
            hours: config.float("hours", 0.0),
            person: config.text("person"),
            description: config.text("description"),
        });
    }
    let caps = LEGACY_ENTRY_RE.captures(trimmed)?;
    Some(TimeEntry {
        id: random_hex_id(),
        date: caps[1].to_string(),
        hours: parse_float(&caps[2], 0.0),
        person: caps.get(3).map_or("", |m| m.as_str()).trim().to_string(),
        description: caps.get(4).map_or("", |m| m.as_str()).trim().to_string(),
    })
}

pub fn encode_time_logs(logs: &[TaskTimeLog]) -> String {
    let mut out = format!("<!-- {TIME_SECTION} -->\n# {TIME_SECTION}\n\n");
    for log in logs.iter().filter(|log| !log.entries.is_empty()) {
        out.push_str(&format!("## {GROUP_PREFIX} {}\n\n", log.task_id));
        for entry in &log.entries {
            let config = ConfigMap::new()
                .with("id", &entry.id)
                .with_nonempty("date", &entry.date)
                .with("hours", format_amount(entry.hours))
                .with_text("person", &entry.person)
                .with_text("description", &entry.description);
            out.push_str(&format!("- {}\n", config.render()));
        }
        out.push('\n');
    }
    out
}
