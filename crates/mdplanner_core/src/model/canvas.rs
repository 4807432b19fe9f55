//! Visual records: sticky notes, mindmaps, and C4 components.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 150.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StickyNote {
    pub id: String,
    pub content: String,
    /// `yellow`, `pink`, `blue`, `green`, `purple`, or `orange`.
    pub color: String,
    pub position: Position,
    pub size: Size,
}

impl Default for StickyNote {
    fn default() -> Self {
        Self {
            id: String::new(),
            content: String::new(),
            color: "yellow".to_string(),
            position: Position::default(),
            size: Size::default(),
        }
    }
}

impl StickyNote {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MindmapNode {
    pub id: String,
    pub text: String,
    pub level: usize,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Mindmap {
    pub id: String,
    pub title: String,
    /// Pre-order node list; nesting is carried by `level` and `parent`.
    pub nodes: Vec<MindmapNode>,
}

impl Mindmap {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Direct children of `parent`, in list order.
    pub fn children_of<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a MindmapNode> {
        self.nodes.iter().filter(move |node| node.parent == parent)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct C4Connection {
    pub target: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct C4Component {
    pub id: String,
    pub name: String,
    /// `context`, `container`, `component`, or `code`.
    pub level: String,
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub technology: String,
    pub description: String,
    pub position: Position,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<C4Connection>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent: String,
}

impl Default for C4Component {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            level: "context".to_string(),
            component_type: "System".to_string(),
            technology: String::new(),
            description: String::new(),
            position: Position::default(),
            connections: Vec::new(),
            children: Vec::new(),
            parent: String::new(),
        }
    }
}

impl C4Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
