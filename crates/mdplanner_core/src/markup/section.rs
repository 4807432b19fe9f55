//! Section registry and boundary locator.
//!
//! # Responsibility
//! - Hold the ordered catalog of section sentinels (`<!-- Name -->`).
//! - Compute the half-open line range owned by one section.
//! - Splice a freshly rendered section back into a document.
//!
//! # Invariants
//! - A section ends at the next registered sentinel or registered top-level
//!   heading (`# Name`, never `## Name`), otherwise at end of document.
//! - Splicing never alters a line outside the computed range.
//! - Only the first occurrence of a sentinel is addressable.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Sentinel names of the standard catalog, in document order.
pub const STANDARD_SECTIONS: [&str; 24] = [
    "Configurations",
    "Notes",
    "Goals",
    "Milestones",
    "Ideas",
    "Retrospectives",
    "Canvas",
    "Mindmap",
    "C4 Architecture",
    "SWOT Analysis",
    "Risk Analysis",
    "Lean Canvas",
    "Business Model Canvas",
    "Project Value Board",
    "Brief",
    "Capacity Planning",
    "Strategic Levels",
    "Customers",
    "Billing Rates",
    "Quotes",
    "Invoices",
    "Payments",
    "Time Tracking",
    "Board",
];

/// Registration errors for section markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    InvalidName(String),
    DuplicateName(String),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(value) => write!(f, "section name is invalid: `{value}`"),
            Self::DuplicateName(value) => write!(f, "section already registered: {value}"),
        }
    }
}

impl Error for RegistryError {}

/// One registered section with its derived marker forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMarker {
    name: String,
    sentinel: String,
    heading: String,
}

impl SectionMarker {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            sentinel: format!("<!-- {name} -->"),
            heading: format!("# {name}"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Comment token, e.g. `<!-- Goals -->`.
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Heading form, e.g. `# Goals`.
    pub fn heading(&self) -> &str {
        &self.heading
    }

    /// Sentinel and heading lines that open a rendered section.
    pub fn preamble(&self) -> String {
        format!("{}\n{}\n\n", self.sentinel, self.heading)
    }
}

/// Ordered catalog of known sections.
///
/// Passed explicitly to the locator so new kinds can be added without
/// touching boundary detection.
#[derive(Debug, Clone, Default)]
pub struct SectionRegistry {
    markers: Vec<SectionMarker>,
}

impl SectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with [`STANDARD_SECTIONS`].
    pub fn standard() -> Self {
        Self {
            markers: STANDARD_SECTIONS
                .iter()
                .map(|name| SectionMarker::new(name))
                .collect(),
        }
    }

    /// Appends one section name to the catalog.
    pub fn register(&mut self, name: &str) -> Result<(), RegistryError> {
        let name = name.trim();
        if !is_valid_section_name(name) {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        if self.get(name).is_some() {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        self.markers.push(SectionMarker::new(name));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Section names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(SectionMarker::name)
    }

    pub fn get(&self, name: &str) -> Option<&SectionMarker> {
        self.markers.iter().find(|marker| marker.name == name)
    }

    /// Returns whether a trimmed line opens any registered section.
    pub fn is_boundary(&self, trimmed: &str) -> bool {
        if trimmed.starts_with("<!-- ") && trimmed.ends_with(" -->") {
            if self.markers.iter().any(|m| m.sentinel == trimmed) {
                return true;
            }
        }
        if trimmed.starts_with("# ") {
            return self.markers.iter().any(|m| m.heading == trimmed);
        }
        false
    }

    /// Locates `name` inside `lines`.
    ///
    /// Unregistered names are still located by their derived sentinel and
    /// heading; only the closing boundary depends on the catalog.
    pub fn find_bounds(&self, lines: &[String], name: &str) -> Option<SectionBounds> {
        let own = self
            .get(name)
            .cloned()
            .unwrap_or_else(|| SectionMarker::new(name));

        let mut bounds: Option<SectionBounds> = None;
        for (idx, line) in lines.iter().enumerate() {
            let trimmed = line.trim();
            match bounds.as_mut() {
                None => {
                    if trimmed == own.sentinel || trimmed == own.heading {
                        bounds = Some(SectionBounds {
                            marker: idx,
                            start: idx + 1,
                            end: lines.len(),
                        });
                    }
                }
                Some(found) => {
                    // Heading right after the sentinel belongs to the preamble.
                    if trimmed == own.heading && idx <= found.marker + 2 {
                        found.start = idx + 1;
                        continue;
                    }
                    if self.is_boundary(trimmed) {
                        found.end = idx;
                        break;
                    }
                }
            }
        }
        bounds
    }
}

fn is_valid_section_name(value: &str) -> bool {
    !value.is_empty()
        && !value.contains("-->")
        && !value.contains('\n')
        && !value.starts_with('#')
}

/// Line range of one located section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBounds {
    /// Line holding the sentinel (or heading when no sentinel exists).
    pub marker: usize,
    /// First content line after the sentinel/heading preamble.
    pub start: usize,
    /// Exclusive end of the section.
    pub end: usize,
}

impl SectionBounds {
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Whole project file as an ordered line sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Splits on `\n`; a trailing newline yields a final empty line.
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Rejoins lines with `\n`; the inverse of [`Document::parse`].
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Content lines of a section.
    ///
    /// `None` means the section never existed; an empty slice means it exists
    /// but owns no lines.
    pub fn section(&self, registry: &SectionRegistry, name: &str) -> Option<&[String]> {
        let bounds = registry.find_bounds(&self.lines, name)?;
        if bounds.is_empty() {
            return Some(&[]);
        }
        Some(&self.lines[bounds.start..bounds.end])
    }

    /// Verbatim text of a section including its sentinel and heading, shaped
    /// so that splicing it back reproduces the document byte for byte.
    pub fn section_block(&self, registry: &SectionRegistry, name: &str) -> Option<String> {
        let bounds = registry.find_bounds(&self.lines, name)?;
        let mut block = self.lines[bounds.marker..bounds.end].join("\n");
        if bounds.end < self.lines.len() {
            block.push('\n');
        }
        Some(block)
    }

    /// Replaces the section with `rendered` and returns the new full text.
    ///
    /// `rendered` must carry its own sentinel and heading. A missing section
    /// is appended after two newlines at the end of the document.
    pub fn replace_section(&self, registry: &SectionRegistry, name: &str, rendered: &str) -> String {
        let Some(bounds) = registry.find_bounds(&self.lines, name) else {
            let mut out = self.to_text();
            out.push_str("\n\n");
            out.push_str(rendered);
            return out;
        };

        let mut out = String::new();
        for line in &self.lines[..bounds.marker] {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(rendered);
        out.push_str(&self.lines[bounds.end..].join("\n"));
        out
    }
}
