//! Fixed-shape analysis boards.
//!
//! Each board is a titled record whose content is a fixed set of named
//! bullet lists.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Retrospective {
    pub id: String,
    pub title: String,
    pub date: String,
    /// `open` or `closed`.
    pub status: String,
    #[serde(rename = "continue")]
    pub continue_items: Vec<String>,
    pub stop: Vec<String>,
    pub start: Vec<String>,
}

impl Default for Retrospective {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            date: String::new(),
            status: "open".to_string(),
            continue_items: Vec::new(),
            stop: Vec::new(),
            start: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwotAnalysis {
    pub id: String,
    pub title: String,
    pub date: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskAnalysis {
    pub id: String,
    pub title: String,
    pub date: String,
    pub high_impact_high_probability: Vec<String>,
    pub high_impact_low_probability: Vec<String>,
    pub low_impact_high_probability: Vec<String>,
    pub low_impact_low_probability: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeanCanvas {
    pub id: String,
    pub title: String,
    pub date: String,
    pub problem: Vec<String>,
    pub solution: Vec<String>,
    pub unique_value_prop: Vec<String>,
    pub unfair_advantage: Vec<String>,
    pub customer_segments: Vec<String>,
    pub existing_alternatives: Vec<String>,
    pub key_metrics: Vec<String>,
    pub high_level_concept: Vec<String>,
    pub channels: Vec<String>,
    pub early_adopters: Vec<String>,
    pub cost_structure: Vec<String>,
    pub revenue_streams: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessModelCanvas {
    pub id: String,
    pub title: String,
    pub date: String,
    pub key_partners: Vec<String>,
    pub key_activities: Vec<String>,
    pub key_resources: Vec<String>,
    pub value_proposition: Vec<String>,
    pub customer_relationships: Vec<String>,
    pub channels: Vec<String>,
    pub customer_segments: Vec<String>,
    pub cost_structure: Vec<String>,
    pub revenue_streams: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectValueBoard {
    pub id: String,
    pub title: String,
    pub date: String,
    pub customer_segments: Vec<String>,
    pub problem: Vec<String>,
    pub solution: Vec<String>,
    pub benefit: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Brief {
    pub id: String,
    pub title: String,
    pub date: String,
    pub summary: Vec<String>,
    pub mission: Vec<String>,
    pub responsible: Vec<String>,
    pub accountable: Vec<String>,
    pub consulted: Vec<String>,
    pub informed: Vec<String>,
    pub high_level_budget: Vec<String>,
    pub high_level_timeline: Vec<String>,
    pub culture: Vec<String>,
    pub change_capacity: Vec<String>,
    pub guiding_principles: Vec<String>,
}
