//! Board section codec: indentation-driven task trees.
//!
//! # Responsibility
//! - Parse `## Column` groups of `- [ ] (id) Title {config}` checklist lines
//!   into task trees.
//! - Render the tree back with two spaces per depth level.
//!
//! # Invariants
//! - A line deeper than a task belongs to that task's subtree; checklist
//!   lines become children and other non-blank lines become description.
//! - A line at the same or lower depth, a `## ` heading, or a registered
//!   boundary ends the subtree.
//! - Tasks read without an id receive the next free integer id.

use crate::markup::config::{render_array, ConfigMap};
use crate::markup::ids::next_sequence_id;
use crate::markup::section::SectionRegistry;
use crate::model::task::{Board, BoardColumn, Task, TaskConfig, DEFAULT_COLUMNS};
use once_cell::sync::Lazy;
use regex::Regex;

pub const BOARD_SECTION: &str = "Board";

static TASK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)- \[([ xX])\] (?:\(([^)]+)\))?\s*(.+?)(?:\s*\{([^}]*)\})?\s*$")
        .expect("valid task line regex")
});
static CHECKBOX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*- \[[ xX]\]").expect("valid checkbox regex"));

/// Leading whitespace width; a tab counts as two columns.
fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|ch| ch.is_whitespace())
        .map(|ch| if ch == '\t' { 2 } else { 1 })
        .sum()
}

/// Decodes the Board section content lines.
pub fn decode_board(lines: &[String], registry: &SectionRegistry) -> Board {
    let mut board = Board::default();
    let mut current: Option<usize> = None;
    let mut idx = 0;

    while idx < lines.len() {
        let line = &lines[idx];
        let trimmed = line.trim();
        if registry.is_boundary(trimmed) {
            break;
        }
        if let Some(name) = trimmed.strip_prefix("## ") {
            let name = name.trim();
            current = Some(match board.columns.iter().position(|c| c.name == name) {
                Some(pos) => pos,
                None => {
                    board.columns.push(BoardColumn::new(name));
                    board.columns.len() - 1
                }
            });
            idx += 1;
            continue;
        }
        if CHECKBOX_RE.is_match(line) {
            let (task, next) = parse_task(lines, idx, registry);
            idx = next;
            if let Some(task) = task {
                let column = match current {
                    Some(pos) => pos,
                    None => {
                        board.columns.push(BoardColumn::new(DEFAULT_COLUMNS[0]));
                        let pos = board.columns.len() - 1;
                        current = Some(pos);
                        pos
                    }
                };
                board.columns[column].tasks.push(task);
            }
            continue;
        }
        idx += 1;
    }

    assign_missing_task_ids(&mut board);
    board.normalize();
    board
}

/// Parses the task at `start` and its subtree; returns the next unread line.
fn parse_task(lines: &[String], start: usize, registry: &SectionRegistry) -> (Option<Task>, usize) {
    let line = &lines[start];
    let mut idx = start + 1;
    let Some(caps) = TASK_RE.captures(line) else {
        return (None, idx);
    };
    let depth = indent_width(&caps[1]);
    let mut task = Task {
        id: caps.get(3).map_or("", |m| m.as_str()).trim().to_string(),
        title: caps[4].trim().to_string(),
        completed: caps[2].eq_ignore_ascii_case("x"),
        config: decode_config(&ConfigMap::parse(caps.get(5).map_or("", |m| m.as_str()))),
        ..Task::default()
    };

    while idx < lines.len() {
        let next = &lines[idx];
        let trimmed = next.trim();
        if trimmed.is_empty() {
            idx += 1;
            continue;
        }
        if indent_width(next) <= depth
            || trimmed.starts_with("## ")
            || registry.is_boundary(trimmed)
        {
            break;
        }
        if CHECKBOX_RE.is_match(next) {
            let (child, after) = parse_task(lines, idx, registry);
            if let Some(child) = child {
                task.children.push(child);
            }
            idx = after;
            continue;
        }
        task.description.push(trimmed.to_string());
        idx += 1;
    }

    (Some(task), idx)
}

fn decode_config(config: &ConfigMap) -> TaskConfig {
    TaskConfig {
        tag: config.array("tag"),
        due_date: config.text("due_date"),
        assignee: config.text("assignee"),
        priority: config.int("priority", 0),
        effort: config.int("effort", 0),
        blocked_by: config.array("blocked_by"),
        milestone: config.text("milestone"),
        planned_start: config.text("planned_start"),
        planned_end: config.text("planned_end"),
    }
}

fn encode_config(config: &TaskConfig) -> ConfigMap {
    let mut map = ConfigMap::new().with_array("tag", &config.tag);
    map = map
        .with_nonempty("due_date", &config.due_date)
        .with_text("assignee", &config.assignee);
    if config.priority > 0 {
        map.insert("priority", config.priority.to_string());
    }
    if config.effort > 0 {
        map.insert("effort", config.effort.to_string());
    }
    if !config.blocked_by.is_empty() {
        map.insert("blocked_by", render_array(&config.blocked_by));
    }
    map.with_text("milestone", &config.milestone)
        .with_nonempty("planned_start", &config.planned_start)
        .with_nonempty("planned_end", &config.planned_end)
}

fn assign_missing_task_ids(board: &mut Board) {
    fn visit(task: &mut Task, taken: &mut Vec<String>) {
        if task.id.is_empty() {
            task.id = next_sequence_id(taken.iter().map(String::as_str));
            taken.push(task.id.clone());
        }
        for child in &mut task.children {
            visit(child, taken);
        }
    }

    let mut taken = board
        .ids()
        .into_iter()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();
    for column in &mut board.columns {
        for task in &mut column.tasks {
            visit(task, &mut taken);
        }
    }
}

/// Renders the whole Board section.
pub fn encode_board(board: &Board) -> String {
    let mut out = format!("<!-- {BOARD_SECTION} -->\n# {BOARD_SECTION}\n\n");
    for column in &board.columns {
        out.push_str(&format!("## {}\n\n", column.name));
        for task in &column.tasks {
            encode_task(task, 0, &mut out);
        }
        out.push('\n');
    }
    out
}

fn encode_task(task: &Task, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let checkbox = if task.completed { "[x]" } else { "[ ]" };
    out.push_str(&format!("{indent}- {checkbox}"));
    if !task.id.is_empty() {
        out.push_str(&format!(" ({})", task.id));
    }
    out.push(' ');
    out.push_str(&task.title);
    let config = encode_config(&task.config).render();
    if !config.is_empty() {
        out.push(' ');
        out.push_str(&config);
    }
    out.push('\n');
    for line in &task.description {
        out.push_str(&format!("{indent}  {line}\n"));
    }
    for child in &task.children {
        encode_task(child, depth + 1, out);
    }
}
