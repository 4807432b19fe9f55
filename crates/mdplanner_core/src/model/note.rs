//! Note domain model.
//!
//! # Invariants
//! - `revision` starts at 1 on create and increases by one on every update.
//! - `created_at` never changes after create.

use serde::{Deserialize, Serialize};

pub const NOTE_MODE_SIMPLE: &str = "simple";

/// Free-form markdown note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
    pub revision: u32,
    pub mode: String,
}

impl Default for Note {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            content: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
            revision: 0,
            mode: NOTE_MODE_SIMPLE.to_string(),
        }
    }
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Stamps a freshly created note.
    pub(crate) fn stamp_created(&mut self, now: &str) {
        self.created_at = now.to_string();
        self.updated_at = now.to_string();
        self.revision = 1;
    }

    /// Carries identity forward from `previous` and bumps the revision.
    pub(crate) fn stamp_updated(&mut self, previous: &Note, now: &str) {
        self.id = previous.id.clone();
        self.created_at = previous.created_at.clone();
        self.updated_at = now.to_string();
        self.revision = previous.revision.max(1) + 1;
    }
}
