//! Project header, Configurations section, and the new-project template.
//!
//! # Responsibility
//! - Read the project title and intro text that precede the first section.
//! - Decode and encode the `Configurations` section.
//! - Produce the document written for a freshly created project.
//!
//! # Invariants
//! - Assignees and tags are written de-duplicated and sorted.
//! - A missing or partial Configurations section decodes to defaults.

use super::board::encode_board;
use crate::markup::section::{Document, SectionRegistry};
use crate::model::project::{ProjectConfig, ProjectInfo};
use crate::model::task::Board;
use std::collections::BTreeSet;

pub const CONFIG_SECTION: &str = "Configurations";
pub const DEFAULT_DESCRIPTION: &str = "Project description goes here.";

#[derive(Clone, Copy)]
enum ListField {
    Assignees,
    Tags,
}

pub fn decode_project_config(lines: &[String], registry: &SectionRegistry) -> ProjectConfig {
    let mut config = ProjectConfig::default();
    let mut list: Option<ListField> = None;

    for line in lines {
        let trimmed = line.trim();
        if registry.is_boundary(trimmed) {
            break;
        }
        if trimmed.is_empty() {
            list = None;
            continue;
        }
        if let Some(value) = trimmed.strip_prefix("Start Date:") {
            config.start_date = value.trim().to_string();
        } else if let Some(value) = trimmed.strip_prefix("Working Days:") {
            let value = value.trim();
            match value.parse::<i64>() {
                Ok(days) if days > 0 => config.working_days_per_week = days,
                Ok(_) => {}
                Err(_) => {
                    // Older files list the day names here.
                    config.custom_schedule = split_days(value);
                    if !config.custom_schedule.is_empty() {
                        config.working_days_per_week = config.custom_schedule.len() as i64;
                    }
                }
            }
        } else if let Some(value) = trimmed.strip_prefix("Custom Schedule:") {
            config.custom_schedule = split_days(value);
        } else if trimmed == "Assignees:" {
            list = Some(ListField::Assignees);
        } else if trimmed == "Tags:" {
            list = Some(ListField::Tags);
        } else if let (Some(field), Some(item)) = (list, trimmed.strip_prefix("- ")) {
            let item = item.trim().to_string();
            match field {
                ListField::Assignees => config.assignees.push(item),
                ListField::Tags => config.tags.push(item),
            }
        }
    }

    config
}

fn split_days(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|day| !day.is_empty())
        .map(str::to_string)
        .collect()
}

fn sorted_unique(items: &[String]) -> BTreeSet<&str> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect()
}

pub fn encode_project_config(config: &ProjectConfig) -> String {
    let mut out = format!("<!-- {CONFIG_SECTION} -->\n# {CONFIG_SECTION}\n\n");
    if !config.start_date.is_empty() {
        out.push_str(&format!("Start Date: {}\n", config.start_date));
    }
    out.push_str(&format!("Working Days: {}\n", config.working_days_per_week));
    if !config.custom_schedule.is_empty() {
        out.push_str(&format!("Custom Schedule: {}\n", config.custom_schedule.join(", ")));
    }
    out.push('\n');

    out.push_str("Assignees:\n");
    for assignee in sorted_unique(&config.assignees) {
        out.push_str(&format!("- {assignee}\n"));
    }
    out.push('\n');

    out.push_str("Tags:\n");
    for tag in sorted_unique(&config.tags) {
        out.push_str(&format!("- {tag}\n"));
    }
    out.push('\n');
    out
}

/// Title and intro lines; `last_updated` is left for the caller.
pub fn decode_project_info(doc: &Document, registry: &SectionRegistry) -> ProjectInfo {
    let mut info = ProjectInfo::default();
    let mut in_header = false;

    for line in doc.lines() {
        let trimmed = line.trim();
        if !in_header {
            if let Some(title) = trimmed.strip_prefix("# ") {
                if registry.is_boundary(trimmed) {
                    break;
                }
                info.name = title.trim().to_string();
                in_header = true;
            }
            continue;
        }
        if trimmed.starts_with("# ") || registry.is_boundary(trimmed) {
            break;
        }
        if !trimmed.is_empty() {
            info.description.push(trimmed.to_string());
        }
    }

    info
}

/// Full text of a new project document.
pub fn initial_document(name: &str, today: &str) -> String {
    let config = ProjectConfig {
        start_date: today.to_string(),
        ..ProjectConfig::default()
    };
    let mut out = format!("# {name}\n\n{DEFAULT_DESCRIPTION}\n\n");
    out.push_str(&encode_project_config(&config));
    out.push_str(&encode_board(&Board::with_default_columns()));
    out
}

#[cfg(test)]
mod tests {
    use super::{decode_project_config, decode_project_info, encode_project_config, initial_document};
    use crate::markup::section::{Document, SectionRegistry};
    use crate::model::project::ProjectConfig;

    fn config_of(text: &str) -> ProjectConfig {
        let registry = SectionRegistry::standard();
        let doc = Document::parse(text);
        decode_project_config(doc.section(&registry, "Configurations").unwrap_or(&[]), &registry)
    }

    #[test]
    fn config_lists_are_sorted_and_deduplicated() {
        let config = ProjectConfig {
            start_date: "2026-01-05".to_string(),
            working_days_per_week: 4,
            custom_schedule: vec!["Mon".to_string(), "Tue".to_string()],
            assignees: vec!["zoe".to_string(), "ada".to_string(), "zoe".to_string()],
            tags: vec!["web".to_string()],
        };
        let text = encode_project_config(&config);
        assert!(text.contains("Assignees:\n- ada\n- zoe\n\nTags:\n- web\n"));
        let decoded = config_of(&text);
        assert_eq!(decoded.assignees, vec!["ada", "zoe"]);
        assert_eq!(decoded.working_days_per_week, 4);
        assert_eq!(decoded.custom_schedule, vec!["Mon", "Tue"]);
    }

    #[test]
    fn day_name_list_sets_schedule_and_count() {
        let config = config_of("# Configurations\nWorking Days: Mon, Wed, Fri\n");
        assert_eq!(config.working_days_per_week, 3);
        assert_eq!(config.custom_schedule.len(), 3);
        assert_eq!(config_of("# Project\n"), ProjectConfig::default());
    }

    #[test]
    fn initial_document_has_header_config_and_board() {
        let text = initial_document("Apollo", "2026-10-19");
        let registry = SectionRegistry::standard();
        let doc = Document::parse(&text);
        let info = decode_project_info(&doc, &registry);
        assert_eq!(info.name, "Apollo");
        assert_eq!(info.description, vec!["Project description goes here."]);
        assert_eq!(config_of(&text).start_date, "2026-10-19");
        assert!(text.contains("<!-- Board -->\n# Board\n\n## Todo\n\n\n## In Progress\n\n\n## Done\n"));
    }
}
