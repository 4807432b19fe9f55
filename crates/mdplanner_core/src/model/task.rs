//! Task board domain model.
//!
//! # Responsibility
//! - Define tasks, board columns, and the inline task config.
//! - Provide tree helpers used by the store: lookup, flatten, detach.
//!
//! # Invariants
//! - Only root tasks are addressed by column; children travel with their
//!   parent and inherit its column on read.
//! - `parent_id` is empty for roots and names the direct parent otherwise.

use serde::{Deserialize, Serialize};

/// Inline `{...}` config on a checklist line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub due_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub assignee: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub priority: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub effort: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocked_by: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub milestone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub planned_start: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub planned_end: String,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// One checklist item, possibly with nested children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub section: String,
    pub config: TaskConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Task>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent_id: String,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Finds `id` in this task's subtree, including itself.
    pub fn find(&self, id: &str) -> Option<&Task> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Removes the descendant `id` together with its subtree.
    pub fn detach(&mut self, id: &str) -> Option<Task> {
        if let Some(pos) = self.children.iter().position(|child| child.id == id) {
            return Some(self.children.remove(pos));
        }
        self.children.iter_mut().find_map(|child| child.detach(id))
    }

    fn collect_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(&self.id);
        for child in &self.children {
            child.collect_ids(out);
        }
    }

    fn flatten_into(&self, out: &mut Vec<Task>) {
        let mut flat = self.clone();
        flat.children.clear();
        out.push(flat);
        for child in &self.children {
            child.flatten_into(out);
        }
    }

    /// Re-derives `section` and `parent_id` for every descendant.
    pub(crate) fn adopt_children(&mut self) {
        for child in &mut self.children {
            child.section = self.section.clone();
            child.parent_id = self.id.clone();
            child.adopt_children();
        }
    }
}

/// One named column of root tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardColumn {
    pub name: String,
    pub tasks: Vec<Task>,
}

impl BoardColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }
}

/// Column names used when a project has no board yet.
pub const DEFAULT_COLUMNS: [&str; 3] = ["Todo", "In Progress", "Done"];

/// Ordered board columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Board {
    pub columns: Vec<BoardColumn>,
}

impl Board {
    /// Board with the default empty columns.
    pub fn with_default_columns() -> Self {
        Self {
            columns: DEFAULT_COLUMNS.iter().map(|name| BoardColumn::new(*name)).collect(),
        }
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut BoardColumn> {
        self.columns.iter_mut().find(|column| column.name == name)
    }

    /// Column named `name`, appended when missing.
    pub fn ensure_column(&mut self, name: &str) -> &mut BoardColumn {
        let idx = match self.columns.iter().position(|column| column.name == name) {
            Some(idx) => idx,
            None => {
                self.columns.push(BoardColumn::new(name));
                self.columns.len() - 1
            }
        };
        &mut self.columns[idx]
    }

    pub fn roots(&self) -> impl Iterator<Item = &Task> {
        self.columns.iter().flat_map(|column| column.tasks.iter())
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.roots().find_map(|task| task.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.columns
            .iter_mut()
            .flat_map(|column| column.tasks.iter_mut())
            .find_map(|task| task.find_mut(id))
    }

    /// Every id in the board, pre-order.
    pub fn ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for task in self.roots() {
            task.collect_ids(&mut out);
        }
        out
    }

    /// Pre-order flat listing; children are cleared and `parent_id` is set.
    pub fn flatten(&self) -> Vec<Task> {
        let mut out = Vec::new();
        for task in self.roots() {
            task.flatten_into(&mut out);
        }
        out
    }

    /// Removes `id` wherever it sits in the tree.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        for column in &mut self.columns {
            if let Some(pos) = column.tasks.iter().position(|task| task.id == id) {
                return Some(column.tasks.remove(pos));
            }
        }
        self.columns
            .iter_mut()
            .flat_map(|column| column.tasks.iter_mut())
            .find_map(|task| task.detach(id))
    }

    /// Recomputes column and parent bookkeeping for the whole tree.
    pub(crate) fn normalize(&mut self) {
        for column in &mut self.columns {
            for task in &mut column.tasks {
                task.section = column.name.clone();
                task.parent_id.clear();
                task.adopt_children();
            }
        }
    }
}
