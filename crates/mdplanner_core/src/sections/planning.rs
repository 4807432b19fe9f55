//! Goals, Milestones, and Ideas section codecs.
//!
//! # Invariants
//! - Heading config renders in a fixed key order per kind.
//! - Descriptions are trimmed body lines joined with `\n`.

use crate::entity::{heading_codec, EntityLayout, HeadingEntity, IdScheme, RawRecord, Record};
use crate::markup::config::ConfigMap;
use crate::model::planning::{Goal, Idea, Milestone};

impl Record for Goal {
    const KIND: &'static str = "goal";
    const SECTION: &'static str = "Goals";
    const ID_SCHEME: IdScheme = IdScheme::Prefixed("goal_");

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl HeadingEntity for Goal {
    const LAYOUT: EntityLayout = EntityLayout::described();

    fn from_raw(raw: RawRecord) -> Self {
        let config = &raw.config;
        Self {
            id: raw.id_text(),
            title: raw.title.clone(),
            description: raw.body_text(),
            goal_type: config.text_or("type", "project"),
            kpi: config.text("kpi"),
            start_date: config.text("start"),
            end_date: config.text("end"),
            status: config.text_or("status", "planning"),
        }
    }

    fn to_raw(&self) -> RawRecord {
        let config = ConfigMap::new()
            .with("type", &self.goal_type)
            .with_text("kpi", &self.kpi)
            .with_nonempty("start", &self.start_date)
            .with_nonempty("end", &self.end_date)
            .with("status", &self.status);
        RawRecord::new(&self.title)
            .with_id(&self.id)
            .with_config(config)
            .with_body(&self.description)
    }
}

impl Record for Milestone {
    const KIND: &'static str = "milestone";
    const SECTION: &'static str = "Milestones";
    const ID_SCHEME: IdScheme = IdScheme::Prefixed("milestone_");

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl HeadingEntity for Milestone {
    const LAYOUT: EntityLayout = EntityLayout::described();

    fn from_raw(raw: RawRecord) -> Self {
        Self {
            id: raw.id_text(),
            title: raw.title.clone(),
            target: raw.config.text("target"),
            status: raw.config.text_or("status", "open"),
            description: raw.body_text(),
        }
    }

    fn to_raw(&self) -> RawRecord {
        let config = ConfigMap::new()
            .with_nonempty("target", &self.target)
            .with("status", &self.status);
        RawRecord::new(&self.title)
            .with_id(&self.id)
            .with_config(config)
            .with_body(&self.description)
    }
}

impl Record for Idea {
    const KIND: &'static str = "idea";
    const SECTION: &'static str = "Ideas";
    const ID_SCHEME: IdScheme = IdScheme::Prefixed("idea_");

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl HeadingEntity for Idea {
    const LAYOUT: EntityLayout = EntityLayout::described();

    fn from_raw(raw: RawRecord) -> Self {
        let config = &raw.config;
        Self {
            id: raw.id_text(),
            title: raw.title.clone(),
            status: config.text_or("status", "new"),
            category: config.text("category"),
            created: config.text("created"),
            description: raw.body_text(),
            links: config.array("links"),
        }
    }

    fn to_raw(&self) -> RawRecord {
        let config = ConfigMap::new()
            .with("status", &self.status)
            .with_text("category", &self.category)
            .with_nonempty("created", &self.created)
            .with_array("links", &self.links);
        RawRecord::new(&self.title)
            .with_id(&self.id)
            .with_config(config)
            .with_body(&self.description)
    }
}

heading_codec!(Goal, Milestone, Idea);

#[cfg(test)]
mod tests {
    use crate::entity::SectionCodec;
    use crate::markup::section::{Document, SectionRegistry};
    use crate::model::planning::{Goal, Idea, Milestone};

    fn decode<T: SectionCodec>(text: &str) -> Vec<T> {
        let registry = SectionRegistry::standard();
        let doc = Document::parse(text);
        let lines = doc.section(&registry, T::SECTION).unwrap_or(&[]);
        T::decode(lines, &registry)
    }

    #[test]
    fn goal_heading_parses_all_fields() {
        let text = "<!-- Goals -->\n# Goals\n\n## Launch MVP {type: project; kpi: Users > 100; start: 2026-01-01; end: 2026-06-01; status: active}\n\n<!-- id: goal_1 -->\nDescription of the goal.\n";
        let goals = decode::<Goal>(text);
        assert_eq!(goals.len(), 1);
        let goal = &goals[0];
        assert_eq!(goal.id, "goal_1");
        assert_eq!(goal.title, "Launch MVP");
        assert_eq!(goal.goal_type, "project");
        assert_eq!(goal.kpi, "Users > 100");
        assert_eq!(goal.start_date, "2026-01-01");
        assert_eq!(goal.end_date, "2026-06-01");
        assert_eq!(goal.status, "active");
        assert_eq!(goal.description, "Description of the goal.");
    }

    #[test]
    fn goal_without_id_gets_next_prefixed_id() {
        let text = "# Goals\n## B\n## A {}\n<!-- id: goal_4 -->\n";
        let goals = decode::<Goal>(text);
        assert_eq!(goals[0].id, "goal_5");
        assert_eq!(goals[0].status, "planning");
    }

    #[test]
    fn milestones_and_ideas_round_trip() {
        let milestones = vec![Milestone {
            id: "milestone_2".to_string(),
            target: "2026-04-01".to_string(),
            description: "Beta out.\nPress kit.".to_string(),
            ..Milestone::new("Beta")
        }];
        assert_eq!(decode::<Milestone>(&Milestone::encode(&milestones)), milestones);

        let ideas = vec![Idea {
            id: "idea_1".to_string(),
            category: "growth".to_string(),
            created: "2026-02-02".to_string(),
            links: vec!["idea_3".to_string()],
            ..Idea::new("Referral program")
        }];
        assert_eq!(decode::<Idea>(&Idea::encode(&ideas)), ideas);
    }

    #[test]
    fn goal_description_may_contain_a_heading() {
        let goals = vec![
            Goal {
                id: "goal_1".to_string(),
                description: "## Plan\nstep".to_string(),
                ..Goal::new("Launch")
            },
            Goal {
                id: "goal_2".to_string(),
                ..Goal::new("Grow")
            },
        ];
        assert_eq!(decode::<Goal>(&Goal::encode(&goals)), goals);
    }
}
