//! Org-chart nodes.
//!
//! Nodes are positioned on the canvas like any other item. Edges (reporting
//! lines) are stored next to them and kept exactly as loaded.

use std::fmt;

use canvas::codec::{self, CodecError};
use canvas::doc::{CanvasDocument, Payload};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::format::LayoutFormat;

pub const NODE_WIDTH: i64 = 180;
pub const NODE_HEIGHT: i64 = 64;

/// One box on the org chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrgNode {
    /// Text shown in the box, typically a name or role.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// Anything else the editor stored (photo URL, department, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrgNode {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), extra: Map::new() }
    }
}

impl fmt::Display for OrgNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl Payload for OrgNode {
    fn default_width(&self) -> i64 {
        NODE_WIDTH
    }

    fn default_height(&self) -> i64 {
        NODE_HEIGHT
    }

    fn label(&self) -> Option<&str> {
        Some(self.label.as_str()).filter(|s| !s.is_empty())
    }
}

/// `{ "nodes": [...], "edges": [...] }` org-chart layouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrgChartFormat;

impl LayoutFormat for OrgChartFormat {
    type Payload = OrgNode;
    /// Edge records, opaque.
    type Extra = Vec<Value>;

    const NAME: &'static str = "org-chart";

    fn decode(stored: &Value) -> Result<(CanvasDocument<OrgNode>, Vec<Value>), CodecError> {
        let graph = codec::decode_graph(stored)?;
        Ok((graph.nodes, graph.edges))
    }

    fn encode(doc: &CanvasDocument<OrgNode>, edges: &Vec<Value>) -> Result<Value, CodecError> {
        codec::encode_graph(doc, edges)
    }
}

#[cfg(test)]
#[path = "orgchart_test.rs"]
mod tests;
