//! Strategic Levels section codec.
//!
//! A builder is a `## Title {date}` record; each level is a nested
//! `### [kind] Title {parentId; linkedTasks; linkedMilestones}` sub-record
//! with its own identity comment and description. Descriptions are trimmed
//! body lines joined with `\n`, so blank lines inside them are not kept.

use crate::entity::{
    heading_codec, BodyStyle, BucketStyle, EntityLayout, HeadingEntity, IdScheme, RawRecord,
    Record,
};
use crate::markup::config::ConfigMap;
use crate::markup::ids::random_hex_id;
use crate::model::strategy::{StrategicBuilder, StrategicLevel, STRATEGIC_LEVEL_ORDER};
use once_cell::sync::Lazy;
use regex::Regex;

static LEVEL_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([^\]]+)\]\s*(.*)$").expect("valid level title regex"));

impl Record for StrategicBuilder {
    const KIND: &'static str = "strategic builder";
    const SECTION: &'static str = "Strategic Levels";
    const ID_SCHEME: IdScheme = IdScheme::Random;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl HeadingEntity for StrategicBuilder {
    const LAYOUT: EntityLayout = EntityLayout {
        body: BodyStyle::Trimmed,
        fields: &[],
        buckets: BucketStyle::Records,
    };

    fn from_raw(raw: RawRecord) -> Self {
        let levels = raw
            .children
            .iter()
            .enumerate()
            .map(|(order, child)| decode_level(child, order))
            .collect();
        Self {
            id: raw.id_text(),
            title: raw.title.clone(),
            date: raw.config.text("date"),
            levels,
        }
    }

    fn to_raw(&self) -> RawRecord {
        let mut raw = RawRecord::new(&self.title)
            .with_id(&self.id)
            .with_config(ConfigMap::new().with_nonempty("date", &self.date));
        raw.children = self.levels.iter().map(encode_level).collect();
        raw
    }
}

heading_codec!(StrategicBuilder);

fn decode_level(child: &RawRecord, order: usize) -> StrategicLevel {
    let (level, title) = match LEVEL_TITLE_RE.captures(&child.title) {
        Some(caps) => (caps[1].trim().to_ascii_lowercase(), caps[2].trim().to_string()),
        None => (STRATEGIC_LEVEL_ORDER[0].to_string(), child.title.clone()),
    };
    let id = match &child.id {
        Some(id) => id.clone(),
        None => random_hex_id(),
    };
    StrategicLevel {
        id,
        title,
        description: child.body_text(),
        level,
        parent_id: child.config.text("parentId"),
        order,
        linked_tasks: child.config.array("linkedTasks"),
        linked_milestones: child.config.array("linkedMilestones"),
    }
}

fn encode_level(level: &StrategicLevel) -> RawRecord {
    let config = ConfigMap::new()
        .with_nonempty("parentId", &level.parent_id)
        .with_array("linkedTasks", &level.linked_tasks)
        .with_array("linkedMilestones", &level.linked_milestones);
    RawRecord::new(format!("[{}] {}", level.level, level.title))
        .with_id(&level.id)
        .with_config(config)
        .with_body(&level.description)
}

#[cfg(test)]
mod tests {
    use crate::entity::SectionCodec;
    use crate::markup::section::{Document, SectionRegistry};
    use crate::model::strategy::{StrategicBuilder, StrategicLevel};

    fn decode(text: &str) -> Vec<StrategicBuilder> {
        let registry = SectionRegistry::standard();
        let doc = Document::parse(text);
        StrategicBuilder::decode(
            doc.section(&registry, "Strategic Levels").unwrap_or(&[]),
            &registry,
        )
    }

    #[test]
    fn levels_keep_order_parent_and_links() {
        let mut builder = StrategicBuilder {
            id: "b0b0b0b0".to_string(),
            date: "2026-01-01".to_string(),
            levels: vec![
                StrategicLevel {
                    id: "v1".to_string(),
                    description: "Be the default tool.".to_string(),
                    ..StrategicLevel::new("vision", "Default tool")
                },
                StrategicLevel {
                    id: "g1".to_string(),
                    parent_id: "v1".to_string(),
                    linked_tasks: vec!["4".to_string(), "9".to_string()],
                    linked_milestones: vec!["milestone_1".to_string()],
                    ..StrategicLevel::new("goals", "Grow usage")
                },
            ],
            ..StrategicBuilder::new("2026 strategy")
        };
        builder.renumber();
        let builders = vec![builder];

        let text = StrategicBuilder::encode(&builders);
        assert!(text.contains("### [goals] Grow usage {parentId: v1; linkedTasks: [4, 9]; linkedMilestones: [milestone_1]}"));
        let decoded = decode(&text);
        assert_eq!(decoded, builders);
        assert_eq!(decoded[0].levels[1].order, 1);
    }

    #[test]
    fn multi_line_level_description_keeps_its_lines() {
        let mut builder = StrategicBuilder {
            id: "c0c0c0c0".to_string(),
            levels: vec![StrategicLevel {
                id: "m1".to_string(),
                description: "Ship weekly.\nMeasure every release.".to_string(),
                ..StrategicLevel::new("mission", "Cadence")
            }],
            ..StrategicBuilder::new("Delivery")
        };
        builder.renumber();
        let builders = vec![builder];
        let decoded = decode(&StrategicBuilder::encode(&builders));
        assert_eq!(decoded[0].levels[0].description, "Ship weekly.\nMeasure every release.");
        assert_eq!(decoded, builders);
    }
}
