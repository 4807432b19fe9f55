//! Capacity planning records.
//!
//! # Invariants
//! - Member and allocation ids are unique within their plan.
//! - Allocations reference members by id; dangling references are kept.

use serde::{Deserialize, Serialize};

pub const DEFAULT_WORKING_DAYS: [&str; 5] = ["Mon", "Tue", "Wed", "Thu", "Fri"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub role: String,
    pub hours_per_day: f64,
    pub working_days: Vec<String>,
}

impl Default for TeamMember {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            role: String::new(),
            hours_per_day: 8.0,
            working_days: DEFAULT_WORKING_DAYS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl TeamMember {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeeklyAllocation {
    pub id: String,
    pub member_id: String,
    /// Monday of the allocated week, `YYYY-MM-DD`.
    pub week_start: String,
    pub allocated_hours: f64,
    /// `project`, `task`, or `milestone`.
    pub target_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl Default for WeeklyAllocation {
    fn default() -> Self {
        Self {
            id: String::new(),
            member_id: String::new(),
            week_start: String::new(),
            allocated_hours: 0.0,
            target_type: "project".to_string(),
            target_id: String::new(),
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapacityPlan {
    pub id: String,
    pub title: String,
    pub date: String,
    /// Zero means no budget was set.
    pub budget_hours: f64,
    pub team_members: Vec<TeamMember>,
    pub allocations: Vec<WeeklyAllocation>,
}

impl CapacityPlan {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}
