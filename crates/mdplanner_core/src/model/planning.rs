//! Goals, milestones, and ideas.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: String,
    /// `enterprise` or `project`.
    #[serde(rename = "type")]
    pub goal_type: String,
    pub kpi: String,
    pub start_date: String,
    pub end_date: String,
    /// `planning`, `on-track`, `at-risk`, `late`, `success`, or `failed`.
    pub status: String,
}

impl Default for Goal {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            description: String::new(),
            goal_type: "project".to_string(),
            kpi: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            status: "planning".to_string(),
        }
    }
}

impl Goal {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target: String,
    /// `open` or `completed`.
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Default for Milestone {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            target: String::new(),
            status: "open".to_string(),
            description: String::new(),
        }
    }
}

impl Milestone {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Idea {
    pub id: String,
    pub title: String,
    /// `new`, `considering`, `planned`, `approved`, or `rejected`.
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    pub created: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Ids of other ideas this one links to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
}

impl Default for Idea {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            status: "new".to_string(),
            category: String::new(),
            created: String::new(),
            description: String::new(),
            links: Vec::new(),
        }
    }
}

impl Idea {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Idea projection with the ids of ideas linking to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaWithBacklinks {
    #[serde(flatten)]
    pub idea: Idea,
    pub backlinks: Vec<String>,
}

/// Attaches backlinks to every idea, in collection order.
pub fn with_backlinks(ideas: Vec<Idea>) -> Vec<IdeaWithBacklinks> {
    let backlinks = ideas
        .iter()
        .map(|target| {
            ideas
                .iter()
                .filter(|source| source.id != target.id && source.links.contains(&target.id))
                .map(|source| source.id.clone())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    ideas
        .into_iter()
        .zip(backlinks)
        .map(|(idea, backlinks)| IdeaWithBacklinks { idea, backlinks })
        .collect()
}
