//! Analysis board codecs: retrospectives, SWOT, risk, canvases, brief.
//!
//! Every board is a `## Title` record with a `Date:` line and a fixed set
//! of `### Bucket` bullet lists. The bucket table of each kind is its whole
//! codec.

use crate::entity::{
    heading_codec, BodyStyle, BucketStyle, EntityLayout, HeadingEntity, IdScheme, RawRecord,
    Record,
};
use crate::model::analysis::{
    BusinessModelCanvas, Brief, LeanCanvas, ProjectValueBoard, Retrospective, RiskAnalysis,
    SwotAnalysis,
};

macro_rules! bucket_board {
    ($kind:ty, $kind_name:literal, $section:literal, { $($field:ident => $label:literal),+ $(,)? }) => {
        impl Record for $kind {
            const KIND: &'static str = $kind_name;
            const SECTION: &'static str = $section;
            const ID_SCHEME: IdScheme = IdScheme::Random;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        }

        impl HeadingEntity for $kind {
            const LAYOUT: EntityLayout = EntityLayout {
                body: BodyStyle::Trimmed,
                fields: &["Date"],
                buckets: BucketStyle::Lists(&[$($label),+]),
            };

            fn from_raw(raw: RawRecord) -> Self {
                Self {
                    id: raw.id_text(),
                    title: raw.title.clone(),
                    date: raw.fields.text("Date"),
                    $($field: raw.bucket($label),)+
                }
            }

            fn to_raw(&self) -> RawRecord {
                RawRecord::new(&self.title)
                    .with_id(&self.id)
                    .with_field("Date", &self.date)
                    $(.with_bucket($label, &self.$field))+
            }
        }

        heading_codec!($kind);
    };
}

bucket_board!(SwotAnalysis, "swot analysis", "SWOT Analysis", {
    strengths => "Strengths",
    weaknesses => "Weaknesses",
    opportunities => "Opportunities",
    threats => "Threats",
});

bucket_board!(RiskAnalysis, "risk analysis", "Risk Analysis", {
    high_impact_high_probability => "High Impact / High Probability",
    high_impact_low_probability => "High Impact / Low Probability",
    low_impact_high_probability => "Low Impact / High Probability",
    low_impact_low_probability => "Low Impact / Low Probability",
});

bucket_board!(LeanCanvas, "lean canvas", "Lean Canvas", {
    problem => "Problem",
    solution => "Solution",
    unique_value_prop => "Unique Value Proposition",
    unfair_advantage => "Unfair Advantage",
    customer_segments => "Customer Segments",
    existing_alternatives => "Existing Alternatives",
    key_metrics => "Key Metrics",
    high_level_concept => "High-Level Concept",
    channels => "Channels",
    early_adopters => "Early Adopters",
    cost_structure => "Cost Structure",
    revenue_streams => "Revenue Streams",
});

bucket_board!(BusinessModelCanvas, "business model canvas", "Business Model Canvas", {
    key_partners => "Key Partners",
    key_activities => "Key Activities",
    key_resources => "Key Resources",
    value_proposition => "Value Proposition",
    customer_relationships => "Customer Relationships",
    channels => "Channels",
    customer_segments => "Customer Segments",
    cost_structure => "Cost Structure",
    revenue_streams => "Revenue Streams",
});

bucket_board!(ProjectValueBoard, "project value board", "Project Value Board", {
    customer_segments => "Customer Segments",
    problem => "Problem",
    solution => "Solution",
    benefit => "Benefit",
});

bucket_board!(Brief, "brief", "Brief", {
    summary => "Summary",
    mission => "Mission",
    responsible => "Responsible",
    accountable => "Accountable",
    consulted => "Consulted",
    informed => "Informed",
    high_level_budget => "High Level Budget",
    high_level_timeline => "High Level Timeline",
    culture => "Culture",
    change_capacity => "Change Capacity",
    guiding_principles => "Guiding Principles",
});

impl Record for Retrospective {
    const KIND: &'static str = "retrospective";
    const SECTION: &'static str = "Retrospectives";
    const ID_SCHEME: IdScheme = IdScheme::Random;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl HeadingEntity for Retrospective {
    const LAYOUT: EntityLayout = EntityLayout {
        body: BodyStyle::Trimmed,
        fields: &["Date", "Status"],
        buckets: BucketStyle::Lists(&["Continue", "Stop", "Start"]),
    };

    fn from_raw(raw: RawRecord) -> Self {
        Self {
            id: raw.id_text(),
            title: raw.title.clone(),
            date: raw.fields.text("Date"),
            status: raw.fields.text_or("Status", "open"),
            continue_items: raw.bucket("Continue"),
            stop: raw.bucket("Stop"),
            start: raw.bucket("Start"),
        }
    }

    fn to_raw(&self) -> RawRecord {
        RawRecord::new(&self.title)
            .with_id(&self.id)
            .with_field("Date", &self.date)
            .with_field("Status", &self.status)
            .with_bucket("Continue", &self.continue_items)
            .with_bucket("Stop", &self.stop)
            .with_bucket("Start", &self.start)
    }
}

heading_codec!(Retrospective);

#[cfg(test)]
mod tests {
    use crate::entity::SectionCodec;
    use crate::markup::section::{Document, SectionRegistry};
    use crate::model::analysis::{
        BusinessModelCanvas, Brief, LeanCanvas, ProjectValueBoard, Retrospective, RiskAnalysis,
        SwotAnalysis,
    };

    fn decode<T: SectionCodec>(text: &str) -> Vec<T> {
        let registry = SectionRegistry::standard();
        let doc = Document::parse(text);
        let lines = doc.section(&registry, T::SECTION).unwrap_or(&[]);
        T::decode(lines, &registry)
    }

    fn items(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn swot_reads_quadrants_in_any_order() {
        let text = "<!-- SWOT Analysis -->\n# SWOT Analysis\n\n## Q1 Review\n<!-- id: 0a1b2c3d -->\nDate: 2026-01-15\n\n### Threats\n- new entrant\n### Strengths\n- team\n- brand\n";
        let boards = decode::<SwotAnalysis>(text);
        assert_eq!(boards[0].id, "0a1b2c3d");
        assert_eq!(boards[0].date, "2026-01-15");
        assert_eq!(boards[0].strengths, items(&["team", "brand"]));
        assert_eq!(boards[0].threats, items(&["new entrant"]));
        assert!(boards[0].weaknesses.is_empty());

        let rendered = SwotAnalysis::encode(&boards);
        let strengths = rendered.find("### Strengths").unwrap();
        let threats = rendered.find("### Threats").unwrap();
        assert!(strengths < threats);
    }

    #[test]
    fn retrospective_keeps_status_and_round_trips() {
        let retros = vec![Retrospective {
            id: "feedbeef".to_string(),
            title: "Sprint 9".to_string(),
            date: "2026-02-20".to_string(),
            status: "closed".to_string(),
            continue_items: items(&["demos"]),
            stop: items(&["late merges"]),
            start: Vec::new(),
        }];
        assert_eq!(decode::<Retrospective>(&Retrospective::encode(&retros)), retros);
    }

    #[test]
    fn risk_and_brief_round_trip() {
        let risks = vec![RiskAnalysis {
            id: "11112222".to_string(),
            title: "Launch risks".to_string(),
            high_impact_low_probability: items(&["data loss"]),
            ..RiskAnalysis::default()
        }];
        assert_eq!(decode::<RiskAnalysis>(&RiskAnalysis::encode(&risks)), risks);

        let briefs = vec![Brief {
            id: "33334444".to_string(),
            title: "Platform".to_string(),
            date: "2026-03-01".to_string(),
            summary: items(&["Rebuild billing"]),
            guiding_principles: items(&["Small steps", "Measure"]),
            ..Brief::default()
        }];
        assert_eq!(decode::<Brief>(&Brief::encode(&briefs)), briefs);
    }

    #[test]
    fn canvases_round_trip() {
        let lean = vec![
            LeanCanvas {
                id: "55556666".to_string(),
                title: "Planner SaaS".to_string(),
                date: "2026-04-01".to_string(),
                problem: items(&["Plans drift from code", "Too many tools"]),
                unique_value_prop: items(&["Plans in plain files"]),
                high_level_concept: items(&["Git for roadmaps"]),
                revenue_streams: items(&["Seats"]),
                ..LeanCanvas::default()
            },
            LeanCanvas {
                id: "77778888".to_string(),
                title: "Consulting".to_string(),
                early_adopters: items(&["Agencies"]),
                ..LeanCanvas::default()
            },
        ];
        assert_eq!(decode::<LeanCanvas>(&LeanCanvas::encode(&lean)), lean);

        let models = vec![BusinessModelCanvas {
            id: "9999aaaa".to_string(),
            title: "2026 model".to_string(),
            date: "2026-05-01".to_string(),
            key_partners: items(&["Hosting provider"]),
            value_proposition: items(&["Offline first"]),
            customer_relationships: items(&["Self-serve"]),
            cost_structure: items(&["Support", "Infrastructure"]),
            ..BusinessModelCanvas::default()
        }];
        assert_eq!(
            decode::<BusinessModelCanvas>(&BusinessModelCanvas::encode(&models)),
            models
        );

        let boards = vec![ProjectValueBoard {
            id: "bbbbcccc".to_string(),
            title: "Migration".to_string(),
            date: "2026-06-01".to_string(),
            customer_segments: items(&["Ops teams"]),
            problem: items(&["Manual exports"]),
            solution: items(&["Scheduled sync"]),
            benefit: items(&["Hours saved weekly"]),
        }];
        assert_eq!(
            decode::<ProjectValueBoard>(&ProjectValueBoard::encode(&boards)),
            boards
        );
    }

    #[test]
    fn missing_section_decodes_to_empty() {
        assert!(decode::<SwotAnalysis>("# Project\n").is_empty());
    }
}
