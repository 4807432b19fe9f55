//! Heading-record engine.
//!
//! # Responsibility
//! - Decode `## Title {config}` records with their identity comment, field
//!   lines, free-text body, named `###` buckets, or `###` sub-records.
//! - Render the same shape back in a fixed layout.
//!
//! # Invariants
//! - A `## ` line opens a record unless it sits in the free text of a record
//!   that already has an id and is neither configured nor followed by an
//!   identity comment within [`ID_LOOKAHEAD`] lines; a registered boundary
//!   ends the pass.
//! - Records with an empty title are dropped.
//! - Bucket order on render follows the kind's layout, not input order.

use super::{assign_missing_ids, Record};
use crate::markup::config::ConfigMap;
use crate::markup::section::SectionRegistry;
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s*\{(.*)\}$").expect("valid heading regex"));
static ID_COMMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<!--\s*id:\s*([^\s|]+)\s*(?:\|(.*?))?\s*-->$").expect("valid id comment regex")
});

/// Lines scanned after a `## ` line for the identity comment of a new record.
pub const ID_LOOKAHEAD: usize = 4;

/// How free-text lines are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyStyle {
    /// Non-empty lines, trimmed.
    Trimmed,
    /// Lines verbatim; leading and trailing blank lines are dropped.
    Raw,
}

/// What `### ` lines mean inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketStyle {
    /// `###` lines are ordinary body text.
    None,
    /// Fixed named lists of `- item` bullets.
    Lists(&'static [&'static str]),
    /// Each `###` line opens a nested sub-record.
    Records,
}

/// Per-kind description of the record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityLayout {
    pub body: BodyStyle,
    /// `Name: value` lines captured into [`RawRecord::fields`].
    pub fields: &'static [&'static str],
    pub buckets: BucketStyle,
}

impl EntityLayout {
    pub const fn described() -> Self {
        Self {
            body: BodyStyle::Trimmed,
            fields: &[],
            buckets: BucketStyle::None,
        }
    }
}

/// Untyped record as it appears in the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub title: String,
    pub config: ConfigMap,
    pub id: Option<String>,
    /// `| key: value` parts of the identity comment.
    pub meta: ConfigMap,
    pub fields: ConfigMap,
    pub body: Vec<String>,
    pub buckets: Vec<(String, Vec<String>)>,
    pub children: Vec<RawRecord>,
}

impl RawRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Builds a record from a heading's text (without the `#` prefix).
    pub fn from_heading(text: &str) -> Self {
        let (title, config) = split_heading(text);
        Self {
            title,
            config,
            ..Self::default()
        }
    }

    /// Id or empty string.
    pub fn id_text(&self) -> String {
        self.id.clone().unwrap_or_default()
    }

    /// Trimmed body joined with newlines.
    pub fn body_text(&self) -> String {
        self.body.join("\n")
    }

    /// Items of bucket `name`, empty when absent.
    pub fn bucket(&self, name: &str) -> Vec<String> {
        self.buckets
            .iter()
            .find(|(bucket, _)| bucket == name)
            .map(|(_, items)| items.clone())
            .unwrap_or_default()
    }

    pub fn with_id(mut self, id: &str) -> Self {
        if !id.is_empty() {
            self.id = Some(id.to_string());
        }
        self
    }

    pub fn with_config(mut self, config: ConfigMap) -> Self {
        self.config = config;
        self
    }

    /// Splits `text` into body lines; empty text yields no lines.
    pub fn with_body(mut self, text: &str) -> Self {
        if !text.is_empty() {
            self.body = text.split('\n').map(str::to_string).collect();
        }
        self
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        if !value.is_empty() {
            self.fields.insert(name, value);
        }
        self
    }

    pub fn with_bucket(mut self, name: &str, items: &[String]) -> Self {
        self.buckets.push((name.to_string(), items.to_vec()));
        self
    }
}

/// Record kind rendered as `## Title {config}` blocks.
pub trait HeadingEntity: Record {
    const LAYOUT: EntityLayout;

    fn from_raw(raw: RawRecord) -> Self;
    fn to_raw(&self) -> RawRecord;
}

/// Splits `Title {config}` into its parts.
pub fn split_heading(text: &str) -> (String, ConfigMap) {
    let text = text.trim();
    match HEADING_RE.captures(text) {
        Some(caps) => (
            caps[1].trim().to_string(),
            ConfigMap::parse(caps.get(2).map_or("", |m| m.as_str())),
        ),
        None => (text.to_string(), ConfigMap::new()),
    }
}

/// Parses `<!-- id: X | key: value -->` into the id and its metadata.
pub fn parse_id_comment(trimmed: &str) -> Option<(String, ConfigMap)> {
    let caps = ID_COMMENT_RE.captures(trimmed)?;
    let id = caps[1].to_string();
    let mut meta = ConfigMap::new();
    if let Some(rest) = caps.get(2) {
        for part in rest.as_str().split('|') {
            if let Some((key, value)) = part.split_once(':') {
                let key = key.trim();
                if !key.is_empty() {
                    meta.insert(key, value.trim());
                }
            }
        }
    }
    Some((id, meta))
}

/// Renders an identity comment, including metadata when present.
pub fn render_id_comment(id: &str, meta: &ConfigMap) -> String {
    let mut out = format!("<!-- id: {id}");
    for (key, value) in meta.iter() {
        out.push_str(&format!(" | {key}: {value}"));
    }
    out.push_str(" -->");
    out
}

enum Slot {
    Body,
    Bucket(usize),
    Ignored,
    Child,
}

struct Pending {
    record: RawRecord,
    slot: Slot,
    child: Option<RawRecord>,
}

impl Pending {
    fn open(text: &str, layout: &EntityLayout) -> Self {
        let mut record = RawRecord::from_heading(text);
        if let BucketStyle::Lists(names) = layout.buckets {
            record.buckets = names
                .iter()
                .map(|name| (name.to_string(), Vec::new()))
                .collect();
        }
        Self {
            record,
            slot: Slot::Body,
            child: None,
        }
    }

    /// Body text of a record whose identity is already known.
    fn in_free_text(&self) -> bool {
        match self.slot {
            Slot::Body => self.record.id.is_some(),
            Slot::Child => self.child.as_ref().is_some_and(|child| child.id.is_some()),
            _ => false,
        }
    }

    fn close_child(&mut self, layout: &EntityLayout) {
        if let Some(mut child) = self.child.take() {
            finish_body(&mut child.body, layout.body);
            if !child.title.is_empty() {
                self.record.children.push(child);
            }
        }
    }

    fn finish(mut self, layout: &EntityLayout) -> Option<RawRecord> {
        self.close_child(layout);
        finish_body(&mut self.record.body, layout.body);
        if self.record.title.is_empty() {
            return None;
        }
        Some(self.record)
    }
}

fn finish_body(body: &mut Vec<String>, style: BodyStyle) {
    if style == BodyStyle::Raw {
        while body.last().is_some_and(|line| line.trim().is_empty()) {
            body.pop();
        }
        let leading = body.iter().take_while(|line| line.trim().is_empty()).count();
        body.drain(..leading);
    }
}

fn id_comment_follows(rest: &[String], registry: &SectionRegistry) -> bool {
    for line in rest.iter().take(ID_LOOKAHEAD) {
        let trimmed = line.trim();
        if registry.is_boundary(trimmed) || trimmed == "##" || trimmed.starts_with("## ") {
            return false;
        }
        if parse_id_comment(trimmed).is_some() {
            return true;
        }
    }
    false
}

/// Decodes untyped records from section content lines.
pub fn decode_raw(
    lines: &[String],
    layout: &EntityLayout,
    registry: &SectionRegistry,
) -> Vec<RawRecord> {
    let mut records = Vec::new();
    let mut pending: Option<Pending> = None;

    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if registry.is_boundary(trimmed) {
            break;
        }
        let heading = match trimmed {
            "##" => Some(""),
            _ => trimmed.strip_prefix("## "),
        };
        let heading = heading.filter(|text| {
            pending.as_ref().map_or(true, |current| {
                !current.in_free_text()
                    || HEADING_RE.is_match(text.trim())
                    || id_comment_follows(&lines[idx + 1..], registry)
            })
        });
        if let Some(text) = heading {
            if let Some(done) = pending.take().and_then(|p| p.finish(layout)) {
                records.push(done);
            }
            pending = Some(Pending::open(text, layout));
            continue;
        }
        let Some(current) = pending.as_mut() else {
            continue;
        };

        if let Some((id, meta)) = parse_id_comment(trimmed) {
            match current.child.as_mut() {
                Some(child) => {
                    child.id = Some(id);
                    child.meta = meta;
                }
                None => {
                    current.record.id = Some(id);
                    current.record.meta = meta;
                }
            }
            continue;
        }

        if let Some(name) = trimmed.strip_prefix("### ") {
            match layout.buckets {
                BucketStyle::Lists(names) => {
                    let name = name.trim();
                    current.slot = match names.iter().position(|known| *known == name) {
                        Some(idx) => Slot::Bucket(idx),
                        None => Slot::Ignored,
                    };
                    continue;
                }
                BucketStyle::Records => {
                    current.close_child(layout);
                    current.child = Some(RawRecord::from_heading(name));
                    current.slot = Slot::Child;
                    continue;
                }
                BucketStyle::None => {}
            }
        }

        if matches!(current.slot, Slot::Body) && current.child.is_none() {
            if let Some((name, value)) = field_line(trimmed, layout.fields) {
                current.record.fields.insert(name, value);
                continue;
            }
        }

        match current.slot {
            Slot::Bucket(idx) => {
                if let Some(item) = trimmed.strip_prefix("- ") {
                    let item = item.trim();
                    if !item.is_empty() {
                        current.record.buckets[idx].1.push(item.to_string());
                    }
                }
            }
            Slot::Ignored => {}
            Slot::Child => {
                if let Some(child) = current.child.as_mut() {
                    push_body(&mut child.body, line, layout.body);
                }
            }
            Slot::Body => push_body(&mut current.record.body, line, layout.body),
        }
    }

    if let Some(done) = pending.and_then(|p| p.finish(layout)) {
        records.push(done);
    }
    records
}

fn field_line<'a>(trimmed: &'a str, fields: &[&'static str]) -> Option<(&'static str, &'a str)> {
    fields.iter().find_map(|name| {
        trimmed
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(|value| (*name, value.trim()))
    })
}

fn push_body(body: &mut Vec<String>, line: &str, style: BodyStyle) {
    match style {
        BodyStyle::Raw => body.push(line.to_string()),
        BodyStyle::Trimmed => {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                body.push(trimmed.to_string());
            }
        }
    }
}

/// Renders one record in the canonical layout.
pub fn render_raw(record: &RawRecord, out: &mut String) {
    out.push_str("## ");
    out.push_str(&record.title);
    let config = record.config.render();
    if !config.is_empty() {
        out.push(' ');
        out.push_str(&config);
    }
    out.push_str("\n\n");
    if let Some(id) = &record.id {
        out.push_str(&render_id_comment(id, &record.meta));
        out.push('\n');
    }
    for (name, value) in record.fields.iter() {
        out.push_str(&format!("{name}: {value}\n"));
    }
    for line in &record.body {
        out.push_str(line);
        out.push('\n');
    }

    if !record.buckets.is_empty() {
        out.push('\n');
        for (name, items) in &record.buckets {
            out.push_str(&format!("### {name}\n"));
            for item in items {
                out.push_str(&format!("- {item}\n"));
            }
            out.push('\n');
        }
    } else if !record.children.is_empty() {
        out.push('\n');
        for child in &record.children {
            render_child(child, out);
        }
    } else {
        out.push('\n');
    }
}

fn render_child(child: &RawRecord, out: &mut String) {
    out.push_str("### ");
    out.push_str(&child.title);
    let config = child.config.render();
    if !config.is_empty() {
        out.push(' ');
        out.push_str(&config);
    }
    out.push('\n');
    if let Some(id) = &child.id {
        out.push_str(&render_id_comment(id, &child.meta));
        out.push('\n');
    }
    for line in &child.body {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
}

/// Renders a whole section from untyped records.
pub fn render_section(section: &str, records: &[RawRecord]) -> String {
    let mut out = format!("<!-- {section} -->\n# {section}\n\n");
    for record in records {
        render_raw(record, &mut out);
    }
    out
}

/// Typed decode through the kind's layout, followed by id assignment.
pub fn decode_records<T: HeadingEntity>(lines: &[String], registry: &SectionRegistry) -> Vec<T> {
    let mut records = decode_raw(lines, &T::LAYOUT, registry)
        .into_iter()
        .map(T::from_raw)
        .collect::<Vec<_>>();
    assign_missing_ids(&mut records);
    records
}

pub fn encode_records<T: HeadingEntity>(records: &[T]) -> String {
    let raws = records.iter().map(T::to_raw).collect::<Vec<_>>();
    render_section(T::SECTION, &raws)
}

#[cfg(test)]
mod tests {
    use super::{
        decode_raw, parse_id_comment, render_section, split_heading, BodyStyle, BucketStyle,
        EntityLayout, RawRecord,
    };
    use crate::markup::section::{Document, SectionRegistry};

    const BOARD: EntityLayout = EntityLayout {
        body: BodyStyle::Trimmed,
        fields: &["Date", "Status"],
        buckets: BucketStyle::Lists(&["Keep", "Drop"]),
    };

    fn lines(text: &str) -> Vec<String> {
        Document::parse(text).lines().to_vec()
    }

    #[test]
    fn split_heading_handles_missing_config() {
        let (title, config) = split_heading("Plain title");
        assert_eq!(title, "Plain title");
        assert!(config.is_empty());

        let (title, config) = split_heading("Launch {status: active; kpi: a > b}");
        assert_eq!(title, "Launch");
        assert_eq!(config.get("kpi"), Some("a > b"));
    }

    #[test]
    fn id_comment_carries_metadata() {
        let (id, meta) =
            parse_id_comment("<!-- id: note_2 | created: 2026-01-01T00:00:00Z | rev: 3 -->")
                .unwrap();
        assert_eq!(id, "note_2");
        assert_eq!(meta.get("created"), Some("2026-01-01T00:00:00Z"));
        assert_eq!(meta.get("rev"), Some("3"));

        let (id, meta) = parse_id_comment("<!-- id: abc123 -->").unwrap();
        assert_eq!(id, "abc123");
        assert!(meta.is_empty());
        assert!(parse_id_comment("<!-- Goals -->").is_none());
    }

    #[test]
    fn decode_collects_fields_buckets_and_drops_untitled() {
        let registry = SectionRegistry::standard();
        let input = lines(
            "## Sprint 1\n<!-- id: r1 -->\nDate: 2026-02-01\nStatus: closed\n\n### Keep\n- pairing\n-  \n### Unknown\n- lost\n### Drop\n- long meetings\n\n## \n- orphan\n",
        );
        let records = decode_raw(&input, &BOARD, &registry);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id.as_deref(), Some("r1"));
        assert_eq!(record.fields.get("Date"), Some("2026-02-01"));
        assert_eq!(record.fields.get("Status"), Some("closed"));
        assert_eq!(record.bucket("Keep"), vec!["pairing"]);
        assert_eq!(record.bucket("Drop"), vec!["long meetings"]);
    }

    #[test]
    fn decode_stops_at_registered_boundary() {
        let registry = SectionRegistry::standard();
        let input = lines("## A\nbody a\n<!-- Board -->\n## B\n");
        let records = decode_raw(&input, &EntityLayout::described(), &registry);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body, vec!["body a"]);
    }

    #[test]
    fn raw_body_keeps_inner_blank_lines() {
        let registry = SectionRegistry::standard();
        let layout = EntityLayout {
            body: BodyStyle::Raw,
            ..EntityLayout::described()
        };
        let input = lines(
            "## Note\n\n<!-- id: note_1 -->\n  indented\n\nsecond\n\n\n## Next\n\n<!-- id: note_2 -->\n",
        );
        let records = decode_raw(&input, &layout, &registry);
        assert_eq!(records[0].body, vec!["  indented", "", "second"]);
        assert_eq!(records[1].id.as_deref(), Some("note_2"));
        assert!(records[1].body.is_empty());
    }

    #[test]
    fn heading_in_identified_body_stays_text() {
        let registry = SectionRegistry::standard();
        let layout = EntityLayout {
            body: BodyStyle::Raw,
            ..EntityLayout::described()
        };
        let input = lines(
            "## Note\n\n<!-- id: note_1 -->\nIntro\n\n## Details\n\nMore text\n\n## Next {mode: enhanced}\n## Last\n\n<!-- id: note_3 -->\n",
        );
        let records = decode_raw(&input, &layout, &registry);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].body, vec!["Intro", "", "## Details", "", "More text"]);
        assert_eq!(records[1].title, "Next");
        assert_eq!(records[2].id.as_deref(), Some("note_3"));
    }

    #[test]
    fn id_less_headings_still_open_records() {
        let registry = SectionRegistry::standard();
        let input = lines("## A\nfirst\n## B\nsecond\n");
        let records = decode_raw(&input, &EntityLayout::described(), &registry);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].body, vec!["second"]);
    }

    #[test]
    fn sub_records_own_id_and_body() {
        let registry = SectionRegistry::standard();
        let layout = EntityLayout {
            buckets: BucketStyle::Records,
            ..EntityLayout::described()
        };
        let input = lines(
            "## Plan {date: 2026-01-01}\n<!-- id: p1 -->\n\n### [vision] Lead {parentId: x}\n<!-- id: l1 -->\nBe first.\n\n### [mission] Ship\nWeekly.\n",
        );
        let records = decode_raw(&input, &layout, &registry);
        let children = &records[0].children;
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].title, "[vision] Lead");
        assert_eq!(children[0].config.get("parentId"), Some("x"));
        assert_eq!(children[0].id.as_deref(), Some("l1"));
        assert_eq!(children[0].body, vec!["Be first."]);
        assert_eq!(children[1].id, None);
        assert_eq!(records[0].id.as_deref(), Some("p1"));
    }

    #[test]
    fn rendered_section_decodes_to_same_records() {
        let registry = SectionRegistry::standard();
        let record = RawRecord::new("Sprint 2")
            .with_id("r2")
            .with_field("Date", "2026-03-01")
            .with_bucket("Keep", &["demos".to_string()])
            .with_bucket("Drop", &[]);
        let text = render_section("Retrospectives", &[record.clone()]);
        let doc = Document::parse(&text);
        let content = doc.section(&registry, "Retrospectives").unwrap();
        let decoded = decode_raw(content, &BOARD, &registry);
        assert_eq!(decoded, vec![record]);
    }
}
