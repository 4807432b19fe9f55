//! Project-level metadata and configuration.

use serde::{Deserialize, Serialize};

/// Directory listing entry for one project file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectMeta {
    pub filename: String,
    pub name: String,
    /// File modification time, RFC 3339.
    pub last_updated: String,
}

/// Title and intro text of a project file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectInfo {
    pub name: String,
    pub description: Vec<String>,
    pub last_updated: String,
}

/// Contents of the `Configurations` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub start_date: String,
    pub working_days_per_week: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_schedule: Vec<String>,
    pub assignees: Vec<String>,
    pub tags: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            start_date: String::new(),
            working_days_per_week: 5,
            custom_schedule: Vec::new(),
            assignees: Vec::new(),
            tags: Vec::new(),
        }
    }
}
