//! Board and task tree operations.

use super::ProjectStore;
use crate::error::{StoreError, StoreResult};
use crate::markup::ids::next_sequence_id;
use crate::markup::section::Document;
use crate::model::task::{Board, Task, DEFAULT_COLUMNS};
use crate::sections::board::{decode_board, encode_board, BOARD_SECTION};
use once_cell::sync::Lazy;
use regex::Regex;

const TASK_KIND: &str = "task";

static TRAILING_CONFIG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]*\}\s*$").expect("valid trailing config regex"));

/// A title must fit on its task line and must not end in a `{...}` group,
/// which would be read back as the task's config.
fn check_title(title: &str) -> StoreResult<()> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidInput("task title is empty".to_string()));
    }
    if trimmed.contains('\n') {
        return Err(StoreError::InvalidInput(
            "task title must be a single line".to_string(),
        ));
    }
    if TRAILING_CONFIG_RE.is_match(trimmed) {
        return Err(StoreError::InvalidInput(format!(
            "task title must not end with a {{...}} group: {trimmed}"
        )));
    }
    Ok(())
}

impl ProjectStore {
    fn board_of(&self, doc: &Document) -> Board {
        let board = doc
            .section(&self.registry, BOARD_SECTION)
            .map(|lines| decode_board(lines, &self.registry))
            .unwrap_or_default();
        if board.columns.is_empty() {
            return Board::with_default_columns();
        }
        board
    }

    fn modify_board<R>(&self, change: impl FnOnce(&mut Board) -> StoreResult<R>) -> StoreResult<R> {
        self.edit_section(BOARD_SECTION, |doc| {
            let mut board = self.board_of(doc);
            let value = change(&mut board)?;
            board.normalize();
            Ok((encode_board(&board), value))
        })
    }

    pub fn read_board(&self) -> StoreResult<Board> {
        let (_, doc) = self.read_document()?;
        Ok(self.board_of(&doc))
    }

    pub fn write_board(&self, board: &Board) -> StoreResult<()> {
        let mut board = board.clone();
        board.normalize();
        self.edit_section(BOARD_SECTION, |_| Ok((encode_board(&board), ())))
    }

    /// Column names in board order.
    pub fn board_sections(&self) -> StoreResult<Vec<String>> {
        Ok(self.read_board()?.column_names())
    }

    /// Every task, pre-order, with `parent_id` and `section` filled in.
    pub fn read_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(self.read_board()?.flatten())
    }

    /// Rebuilds the board from `tasks`, grouping roots by their `section`.
    ///
    /// Entries with a `parent_id` are attached under that parent, so the
    /// output of [`ProjectStore::read_tasks`] writes back unchanged. Entries
    /// already nested in a root's `children` are not attached twice, and an
    /// entry whose parent is missing becomes a root. Existing columns keep
    /// their order.
    pub fn write_tasks(&self, tasks: &[Task]) -> StoreResult<()> {
        self.modify_board(|board| {
            for column in &mut board.columns {
                column.tasks.clear();
            }
            let (roots, mut pending): (Vec<&Task>, Vec<&Task>) =
                tasks.iter().partition(|task| task.parent_id.is_empty());
            for task in roots {
                place_root(board, task.clone());
            }

            while !pending.is_empty() {
                let before = pending.len();
                pending.retain(|task| {
                    if board.find(&task.id).is_some() {
                        return false;
                    }
                    match board.find_mut(&task.parent_id) {
                        Some(parent) => {
                            parent.children.push((*task).clone());
                            false
                        }
                        None => true,
                    }
                });
                if pending.len() == before {
                    for task in pending.drain(..) {
                        let mut orphan = task.clone();
                        orphan.parent_id.clear();
                        place_root(board, orphan);
                    }
                }
            }
            Ok(())
        })
    }

    pub fn get_task(&self, id: &str) -> StoreResult<Task> {
        self.read_board()?
            .find(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(TASK_KIND, id))
    }

    /// Adds `task` under `parent_id` when set, otherwise as a root of
    /// `section` (default: the first column).
    pub fn create_task(&self, task: Task) -> StoreResult<Task> {
        check_title(&task.title)?;
        self.modify_board(|board| {
            let mut task = task;
            let taken = board.ids().into_iter().map(str::to_string).collect::<Vec<_>>();
            if task.id.is_empty() {
                task.id = next_sequence_id(taken.iter().map(String::as_str));
            } else if taken.contains(&task.id) {
                return Err(StoreError::InvalidInput(format!(
                    "task id already in use: {}",
                    task.id
                )));
            }

            let id = task.id.clone();
            if task.parent_id.is_empty() {
                let column = if task.section.is_empty() {
                    default_column(board)
                } else {
                    task.section.clone()
                };
                board.ensure_column(&column).tasks.push(task);
            } else {
                let parent_id = task.parent_id.clone();
                board
                    .find_mut(&parent_id)
                    .ok_or_else(|| StoreError::not_found(TASK_KIND, parent_id.clone()))?
                    .children
                    .push(task);
            }
            board.normalize();
            board
                .find(&id)
                .cloned()
                .ok_or_else(|| StoreError::not_found(TASK_KIND, id))
        })
    }

    /// Replaces the task's own fields; position in the tree is unchanged.
    pub fn update_task(&self, id: &str, task: Task) -> StoreResult<Task> {
        check_title(&task.title)?;
        self.modify_board(|board| {
            let slot = board
                .find_mut(id)
                .ok_or_else(|| StoreError::not_found(TASK_KIND, id))?;
            slot.title = task.title;
            slot.completed = task.completed;
            slot.config = task.config;
            slot.description = task.description;
            if !task.children.is_empty() {
                slot.children = task.children;
            }
            board.normalize();
            board
                .find(id)
                .cloned()
                .ok_or_else(|| StoreError::not_found(TASK_KIND, id))
        })
    }

    /// Removes the task and its whole subtree.
    pub fn delete_task(&self, id: &str) -> StoreResult<Task> {
        self.modify_board(|board| {
            board
                .remove(id)
                .ok_or_else(|| StoreError::not_found(TASK_KIND, id))
        })
    }

    /// Moves the task, with its subtree, to the end of `column` as a root.
    pub fn move_task(&self, id: &str, column: &str) -> StoreResult<Task> {
        let column = column.trim();
        if column.is_empty() {
            return Err(StoreError::InvalidInput("column name is empty".to_string()));
        }
        self.modify_board(|board| {
            let task = board
                .remove(id)
                .ok_or_else(|| StoreError::not_found(TASK_KIND, id))?;
            board.ensure_column(column).tasks.push(task);
            board.normalize();
            board
                .find(id)
                .cloned()
                .ok_or_else(|| StoreError::not_found(TASK_KIND, id))
        })
    }
}

fn place_root(board: &mut Board, task: Task) {
    let column = if task.section.is_empty() {
        default_column(board)
    } else {
        task.section.clone()
    };
    board.ensure_column(&column).tasks.push(task);
}

fn default_column(board: &Board) -> String {
    board
        .columns
        .first()
        .map(|column| column.name.clone())
        .unwrap_or_else(|| DEFAULT_COLUMNS[0].to_string())
}
