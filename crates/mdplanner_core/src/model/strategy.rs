//! Strategic level builders.

use serde::{Deserialize, Serialize};

/// Level kinds from broadest to most concrete.
pub const STRATEGIC_LEVEL_ORDER: [&str; 6] = [
    "vision",
    "mission",
    "goals",
    "objectives",
    "strategies",
    "tactics",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrategicLevel {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// One of [`STRATEGIC_LEVEL_ORDER`].
    pub level: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent_id: String,
    /// Position within the builder.
    pub order: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked_tasks: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked_milestones: Vec<String>,
}

impl Default for StrategicLevel {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            description: String::new(),
            level: STRATEGIC_LEVEL_ORDER[0].to_string(),
            parent_id: String::new(),
            order: 0,
            linked_tasks: Vec::new(),
            linked_milestones: Vec::new(),
        }
    }
}

impl StrategicLevel {
    pub fn new(level: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrategicBuilder {
    pub id: String,
    pub title: String,
    pub date: String,
    pub levels: Vec<StrategicLevel>,
}

impl StrategicBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Rewrites `order` to match list position.
    pub(crate) fn renumber(&mut self) {
        for (idx, level) in self.levels.iter_mut().enumerate() {
            level.order = idx;
        }
    }
}
