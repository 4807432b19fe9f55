//! Canvas, Mindmap, and C4 Architecture section codecs.
//!
//! # Responsibility
//! - Map sticky notes, mindmaps, and C4 components to heading records.
//! - Parse nested structures carried inside config values (positions,
//!   connection lists) and indented mindmap bullets.
//!
//! # Invariants
//! - Mindmap node ids are derived from list position on every read.
//! - A sticky note without heading config may carry it on a content line.

use crate::entity::{
    heading_codec, BodyStyle, BucketStyle, EntityLayout, HeadingEntity, IdScheme, RawRecord,
    Record,
};
use crate::markup::config::{inline_text, render_array, render_pair, ConfigMap};
use crate::model::canvas::{
    C4Component, C4Connection, Mindmap, MindmapNode, Position, Size, StickyNote,
};
use once_cell::sync::Lazy;
use regex::Regex;

const STICKY_NOTE_TITLE: &str = "Sticky note";

static TRAILING_CONFIG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s*\{(.+)\}\s*$").expect("valid trailing config regex"));
static CONNECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]*)\}").expect("valid connection regex"));
static MINDMAP_NODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ \t]*)- (.+)$").expect("valid mindmap node regex"));

const RAW_BODY: EntityLayout = EntityLayout {
    body: BodyStyle::Raw,
    fields: &[],
    buckets: BucketStyle::None,
};

impl Record for StickyNote {
    const KIND: &'static str = "sticky note";
    const SECTION: &'static str = "Canvas";
    const ID_SCHEME: IdScheme = IdScheme::Prefixed("sticky_note_");

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl HeadingEntity for StickyNote {
    const LAYOUT: EntityLayout = RAW_BODY;

    fn from_raw(mut raw: RawRecord) -> Self {
        if raw.config.is_empty() {
            absorb_inline_config(&mut raw);
        }
        let mut content = raw.body_text().trim().to_string();
        if content.is_empty() && raw.title != STICKY_NOTE_TITLE {
            content = raw.title.clone();
        }

        let defaults = Size::default();
        let (x, y) = raw.config.position("position", (0.0, 0.0));
        let (width, height) = raw
            .config
            .size("size", (defaults.width, defaults.height));
        Self {
            id: raw.id_text(),
            content,
            color: raw.config.text_or("color", "yellow"),
            position: Position { x, y },
            size: Size { width, height },
        }
    }

    fn to_raw(&self) -> RawRecord {
        let config = ConfigMap::new()
            .with("color", &self.color)
            .with(
                "position",
                render_pair(("x", "y"), (self.position.x, self.position.y)),
            )
            .with(
                "size",
                render_pair(("width", "height"), (self.size.width, self.size.height)),
            );
        RawRecord::new(STICKY_NOTE_TITLE)
            .with_id(&self.id)
            .with_config(config)
            .with_body(&self.content)
    }
}

/// Moves the first `text {config}` content line's config onto the record.
fn absorb_inline_config(raw: &mut RawRecord) {
    for line in raw.body.iter_mut() {
        let Some(caps) = TRAILING_CONFIG_RE.captures(line.as_str()) else {
            continue;
        };
        raw.config = ConfigMap::parse(&caps[2]);
        let rest = caps[1].trim().to_string();
        *line = rest;
        break;
    }
}

impl Record for Mindmap {
    const KIND: &'static str = "mindmap";
    const SECTION: &'static str = "Mindmap";
    const ID_SCHEME: IdScheme = IdScheme::Prefixed("mindmap_");

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl HeadingEntity for Mindmap {
    const LAYOUT: EntityLayout = RAW_BODY;

    fn from_raw(raw: RawRecord) -> Self {
        let id = raw.id_text();
        let mut nodes: Vec<MindmapNode> = Vec::new();
        for line in &raw.body {
            let Some(caps) = MINDMAP_NODE_RE.captures(line) else {
                continue;
            };
            let level = indent_width(&caps[1]) / 2;
            let parent = match level {
                0 => String::new(),
                _ => nodes
                    .iter()
                    .rev()
                    .find(|node| node.level + 1 == level)
                    .map(|node| node.id.clone())
                    .unwrap_or_default(),
            };
            nodes.push(MindmapNode {
                id: format!("{id}_node_{}", nodes.len() + 1),
                text: caps[2].trim().to_string(),
                level,
                parent,
            });
        }
        Self {
            id,
            title: raw.title.clone(),
            nodes,
        }
    }

    fn to_raw(&self) -> RawRecord {
        let mut body = Vec::new();
        for root in self.nodes.iter().filter(|node| node.parent.is_empty()) {
            push_mindmap_node(self, root, 0, &mut body);
        }
        let mut raw = RawRecord::new(&self.title).with_id(&self.id);
        raw.body = body;
        raw
    }
}

fn indent_width(indent: &str) -> usize {
    indent
        .chars()
        .map(|ch| if ch == '\t' { 2 } else { 1 })
        .sum()
}

fn push_mindmap_node(map: &Mindmap, node: &MindmapNode, depth: usize, out: &mut Vec<String>) {
    out.push(format!("{}- {}", "  ".repeat(depth), node.text));
    if node.id.is_empty() {
        return;
    }
    for child in map.children_of(&node.id) {
        push_mindmap_node(map, child, depth + 1, out);
    }
}

impl Record for C4Component {
    const KIND: &'static str = "c4 component";
    const SECTION: &'static str = "C4 Architecture";
    const ID_SCHEME: IdScheme = IdScheme::Random;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl HeadingEntity for C4Component {
    const LAYOUT: EntityLayout = EntityLayout::described();

    fn from_raw(raw: RawRecord) -> Self {
        let config = &raw.config;
        let (x, y) = config.position("position", (0.0, 0.0));
        Self {
            id: raw.id_text(),
            name: raw.title.clone(),
            level: config.text_or("level", "context"),
            component_type: config.text_or("type", "System"),
            technology: config.text("technology"),
            description: raw.body_text(),
            position: Position { x, y },
            connections: config.get("connections").map(parse_connections).unwrap_or_default(),
            children: config.array("children"),
            parent: config.text("parent"),
        }
    }

    fn to_raw(&self) -> RawRecord {
        let mut config = ConfigMap::new()
            .with("level", &self.level)
            .with("type", &self.component_type)
            .with_text("technology", &self.technology)
            .with(
                "position",
                render_pair(("x", "y"), (self.position.x, self.position.y)),
            );
        if !self.connections.is_empty() {
            config.insert("connections", render_connections(&self.connections));
        }
        let config = config
            .with_array("children", &self.children)
            .with_nonempty("parent", &self.parent);
        RawRecord::new(&self.name)
            .with_id(&self.id)
            .with_config(config)
            .with_body(&self.description)
    }
}

/// Parses `[{target: a, label: b}, ...]`.
fn parse_connections(raw: &str) -> Vec<C4Connection> {
    CONNECTION_RE
        .captures_iter(raw)
        .map(|caps| {
            let mut connection = C4Connection::default();
            for part in caps[1].split(',') {
                let Some((key, value)) = part.split_once(':') else {
                    continue;
                };
                match key.trim() {
                    "target" => connection.target = value.trim().to_string(),
                    "label" => connection.label = value.trim().to_string(),
                    _ => {}
                }
            }
            connection
        })
        .filter(|connection| !connection.target.is_empty())
        .collect()
}

fn render_connections(connections: &[C4Connection]) -> String {
    let items = connections
        .iter()
        .map(|connection| {
            format!(
                "{{target: {}, label: {}}}",
                connection.target,
                inline_text(&connection.label).replace(',', " ")
            )
        })
        .collect::<Vec<_>>();
    render_array(&items)
}

heading_codec!(StickyNote, Mindmap, C4Component);

#[cfg(test)]
mod tests {
    use crate::entity::SectionCodec;
    use crate::markup::section::{Document, SectionRegistry};
    use crate::model::canvas::{
        C4Component, C4Connection, Mindmap, MindmapNode, Position, Size, StickyNote,
    };

    fn decode<T: SectionCodec>(text: &str) -> Vec<T> {
        let registry = SectionRegistry::standard();
        let doc = Document::parse(text);
        let lines = doc.section(&registry, T::SECTION).unwrap_or(&[]);
        T::decode(lines, &registry)
    }

    #[test]
    fn sticky_note_reads_nested_position_and_size() {
        let text = "<!-- Canvas -->\n# Canvas\n\n## Sticky note {color: pink; position: {x: 120, y: 45.5}; size: {width: 300, height: 90}}\n\n<!-- id: sticky_note_2 -->\nCall the vendor\n";
        let notes = decode::<StickyNote>(text);
        assert_eq!(notes[0].id, "sticky_note_2");
        assert_eq!(notes[0].color, "pink");
        assert_eq!(notes[0].position, Position { x: 120.0, y: 45.5 });
        assert_eq!(notes[0].size.width, 300.0);
        assert_eq!(notes[0].content, "Call the vendor");
    }

    #[test]
    fn sticky_note_absorbs_legacy_content_config() {
        let text = "# Canvas\n## Old idea\n<!-- id: sticky_1 -->\nRemember this {color: blue; position: {x: 5, y: 6}}\n";
        let notes = decode::<StickyNote>(text);
        assert_eq!(notes[0].id, "sticky_1");
        assert_eq!(notes[0].content, "Remember this");
        assert_eq!(notes[0].color, "blue");
        assert_eq!(notes[0].position, Position { x: 5.0, y: 6.0 });
        assert_eq!(notes[0].size.height, 150.0);
    }

    #[test]
    fn mindmap_nesting_follows_indentation() {
        let text = "<!-- Mindmap -->\n# Mindmap\n\n## Product\n\n<!-- id: mindmap_1 -->\n- Root\n  - Branch A\n    - Leaf\n  - Branch B\n";
        let maps = decode::<Mindmap>(text);
        let nodes = &maps[0].nodes;
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[2].id, "mindmap_1_node_3");
        assert_eq!(nodes[2].parent, "mindmap_1_node_2");
        assert_eq!(nodes[3].parent, "mindmap_1_node_1");
        assert_eq!(nodes[3].level, 1);
        assert_eq!(decode::<Mindmap>(&Mindmap::encode(&maps)), maps);
    }

    #[test]
    fn c4_connections_round_trip() {
        let components = vec![C4Component {
            id: "ab12cd34".to_string(),
            level: "container".to_string(),
            component_type: "Service".to_string(),
            technology: "Rust".to_string(),
            position: Position { x: 10.0, y: 20.0 },
            connections: vec![
                C4Connection {
                    target: "db".to_string(),
                    label: "reads".to_string(),
                },
                C4Connection {
                    target: "queue".to_string(),
                    label: "publishes".to_string(),
                },
            ],
            children: vec!["worker".to_string()],
            description: "Handles requests.".to_string(),
            ..C4Component::new("API")
        }];
        let text = C4Component::encode(&components);
        assert!(text.contains("connections: [{target: db, label: reads}, {target: queue, label: publishes}]"));
        assert_eq!(decode::<C4Component>(&text), components);
    }

    #[test]
    fn sticky_notes_round_trip() {
        let notes = vec![
            StickyNote {
                id: "sticky_note_1".to_string(),
                color: "green".to_string(),
                position: Position { x: 12.5, y: -40.0 },
                size: Size {
                    width: 320.0,
                    height: 80.0,
                },
                ..StickyNote::new("Ask about budget\n\n- travel\n- hardware")
            },
            StickyNote {
                id: "sticky_note_2".to_string(),
                ..StickyNote::new("Plain")
            },
        ];
        assert_eq!(decode::<StickyNote>(&StickyNote::encode(&notes)), notes);
    }

    #[test]
    fn mindmap_nodes_round_trip() {
        let node = |n: usize, text: &str, level: usize, parent: &str| MindmapNode {
            id: format!("mindmap_3_node_{n}"),
            text: text.to_string(),
            level,
            parent: parent.to_string(),
        };
        let maps = vec![Mindmap {
            id: "mindmap_3".to_string(),
            nodes: vec![
                node(1, "Launch", 0, ""),
                node(2, "Marketing", 1, "mindmap_3_node_1"),
                node(3, "Blog post", 2, "mindmap_3_node_2"),
                node(4, "Engineering", 1, "mindmap_3_node_1"),
                node(5, "Follow-ups", 0, ""),
            ],
            ..Mindmap::new("Release")
        }];
        let text = Mindmap::encode(&maps);
        assert!(text.contains("- Launch\n  - Marketing\n    - Blog post\n  - Engineering\n- Follow-ups\n"));
        assert_eq!(decode::<Mindmap>(&text), maps);
    }

    #[test]
    fn c4_hierarchy_round_trips() {
        let components = vec![
            C4Component {
                id: "11aa22bb".to_string(),
                level: "context".to_string(),
                component_type: "System".to_string(),
                position: Position { x: 0.0, y: 0.0 },
                children: vec!["33cc44dd".to_string()],
                description: "Planning platform.\nServes teams.".to_string(),
                ..C4Component::new("Planner")
            },
            C4Component {
                id: "33cc44dd".to_string(),
                level: "container".to_string(),
                component_type: "Database".to_string(),
                technology: "Markdown files".to_string(),
                position: Position { x: 250.0, y: 125.5 },
                connections: vec![C4Connection {
                    target: "11aa22bb".to_string(),
                    label: "stores".to_string(),
                }],
                parent: "11aa22bb".to_string(),
                ..C4Component::new("Project files")
            },
        ];
        let text = C4Component::encode(&components);
        assert!(text.contains("parent: 11aa22bb"));
        assert_eq!(decode::<C4Component>(&text), components);
    }
}
