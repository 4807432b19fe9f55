//! Capacity Planning section codec.
//!
//! # Responsibility
//! - Map plans to `## Title {date; budget}` records.
//! - Encode members as `- Name {id; role; hoursPerDay; workingDays}` and
//!   allocations as `- {id; memberId; weekStart; ...}` bullets.
//!
//! # Invariants
//! - Member and allocation ids live in their inline config; entries read
//!   without one receive a random id.

use crate::entity::heading::split_heading;
use crate::entity::{
    heading_codec, BodyStyle, BucketStyle, EntityLayout, HeadingEntity, IdScheme, RawRecord,
    Record,
};
use crate::markup::config::{format_number, ConfigMap};
use crate::markup::ids::random_hex_id;
use crate::model::capacity::{CapacityPlan, TeamMember, WeeklyAllocation, DEFAULT_WORKING_DAYS};

const MEMBERS: &str = "Team Members";
const ALLOCATIONS: &str = "Allocations";

impl Record for CapacityPlan {
    const KIND: &'static str = "capacity plan";
    const SECTION: &'static str = "Capacity Planning";
    const ID_SCHEME: IdScheme = IdScheme::Random;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl HeadingEntity for CapacityPlan {
    const LAYOUT: EntityLayout = EntityLayout {
        body: BodyStyle::Trimmed,
        fields: &[],
        buckets: BucketStyle::Lists(&[MEMBERS, ALLOCATIONS]),
    };

    fn from_raw(raw: RawRecord) -> Self {
        Self {
            id: raw.id_text(),
            title: raw.title.clone(),
            date: raw.config.text("date"),
            budget_hours: raw.config.float("budget", 0.0),
            team_members: raw.bucket(MEMBERS).iter().map(|item| decode_member(item)).collect(),
            allocations: raw
                .bucket(ALLOCATIONS)
                .iter()
                .map(|item| decode_allocation(item))
                .collect(),
        }
    }

    fn to_raw(&self) -> RawRecord {
        let mut config = ConfigMap::new().with_nonempty("date", &self.date);
        if self.budget_hours > 0.0 {
            config.insert("budget", format_number(self.budget_hours));
        }
        let members = self.team_members.iter().map(encode_member).collect::<Vec<_>>();
        let allocations = self.allocations.iter().map(encode_allocation).collect::<Vec<_>>();
        RawRecord::new(&self.title)
            .with_id(&self.id)
            .with_config(config)
            .with_bucket(MEMBERS, &members)
            .with_bucket(ALLOCATIONS, &allocations)
    }
}

heading_codec!(CapacityPlan);

fn id_or_random(config: &ConfigMap) -> String {
    match config.get("id") {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => random_hex_id(),
    }
}

fn decode_member(item: &str) -> TeamMember {
    let (name, config) = split_heading(item);
    let mut working_days = config.array("workingDays");
    if working_days.is_empty() {
        working_days = DEFAULT_WORKING_DAYS.iter().map(|d| d.to_string()).collect();
    }
    TeamMember {
        id: id_or_random(&config),
        name,
        role: config.text("role"),
        hours_per_day: config.float("hoursPerDay", 8.0),
        working_days,
    }
}

fn encode_member(member: &TeamMember) -> String {
    let config = ConfigMap::new()
        .with("id", &member.id)
        .with_text("role", &member.role)
        .with("hoursPerDay", format_number(member.hours_per_day))
        .with_array("workingDays", &member.working_days);
    format!("{} {}", member.name, config.render())
}

fn decode_allocation(item: &str) -> WeeklyAllocation {
    let config = ConfigMap::parse(item);
    WeeklyAllocation {
        id: id_or_random(&config),
        member_id: config.text("memberId"),
        week_start: config.text("weekStart"),
        allocated_hours: config.float("allocatedHours", 0.0),
        target_type: config.text_or("targetType", "project"),
        target_id: config.text("targetId"),
        notes: config.text("notes"),
    }
}

fn encode_allocation(allocation: &WeeklyAllocation) -> String {
    ConfigMap::new()
        .with("id", &allocation.id)
        .with("memberId", &allocation.member_id)
        .with("weekStart", &allocation.week_start)
        .with("allocatedHours", format_number(allocation.allocated_hours))
        .with("targetType", &allocation.target_type)
        .with_nonempty("targetId", &allocation.target_id)
        .with_text("notes", &allocation.notes)
        .render()
}

#[cfg(test)]
mod tests {
    use crate::entity::SectionCodec;
    use crate::markup::section::{Document, SectionRegistry};
    use crate::model::capacity::{CapacityPlan, TeamMember, WeeklyAllocation};

    fn decode(text: &str) -> Vec<CapacityPlan> {
        let registry = SectionRegistry::standard();
        let doc = Document::parse(text);
        CapacityPlan::decode(
            doc.section(&registry, "Capacity Planning").unwrap_or(&[]),
            &registry,
        )
    }

    #[test]
    fn plan_round_trips_members_and_allocations() {
        let plans = vec![CapacityPlan {
            id: "cafe0001".to_string(),
            date: "2026-01-05".to_string(),
            budget_hours: 320.0,
            team_members: vec![TeamMember {
                id: "m1".to_string(),
                role: "Engineer".to_string(),
                hours_per_day: 7.5,
                working_days: vec!["Mon".to_string(), "Wed".to_string()],
                ..TeamMember::new("Ada")
            }],
            allocations: vec![WeeklyAllocation {
                id: "a1".to_string(),
                member_id: "m1".to_string(),
                week_start: "2026-01-05".to_string(),
                allocated_hours: 20.0,
                target_type: "task".to_string(),
                target_id: "12".to_string(),
                notes: "API work".to_string(),
            }],
            ..CapacityPlan::new("Q1")
        }];
        let text = CapacityPlan::encode(&plans);
        assert!(text.contains("- Ada {id: m1; role: Engineer; hoursPerDay: 7.5; workingDays: [Mon, Wed]}"));
        assert_eq!(decode(&text), plans);
    }

    #[test]
    fn member_without_config_gets_defaults() {
        let text = "# Capacity Planning\n## Plan\n### Team Members\n- Grace\n";
        let plans = decode(text);
        let member = &plans[0].team_members[0];
        assert_eq!(member.name, "Grace");
        assert_eq!(member.hours_per_day, 8.0);
        assert_eq!(member.working_days.len(), 5);
        assert_eq!(member.id.len(), 8);
    }
}
