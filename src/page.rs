//! Page-builder blocks.
//!
//! A block is a `type` tag plus whatever content fields that type needs
//! (text, image URL, button target, ...). The canvas only cares about the
//! tag, which picks the block's default size when a stored layout has none.

use std::fmt;
use std::str::FromStr;

use canvas::codec::{self, CodecError};
use canvas::doc::{CanvasDocument, Payload};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::format::LayoutFormat;

/// Fields tried, in order, for a block's canvas caption.
const LABEL_FIELDS: [&str; 5] = ["title", "text", "label", "alt", "url"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    Text,
    Image,
    Button,
    Video,
    Divider,
    Spacer,
    Gallery,
    Html,
    Other,
}

impl BlockKind {
    /// `(width, height)` for a freshly placed or migrated block.
    #[must_use]
    pub fn default_size(self) -> (i64, i64) {
        match self {
            Self::Heading => (600, 60),
            Self::Text => (600, 120),
            Self::Image => (400, 300),
            Self::Button => (160, 48),
            Self::Video => (640, 360),
            Self::Divider => (600, 30),
            Self::Spacer => (600, 40),
            Self::Gallery => (600, 300),
            Self::Html => (600, 200),
            Self::Other => (300, 120),
        }
    }
}

impl FromStr for BlockKind {
    type Err = std::convert::Infallible;

    /// Unknown tags map to [`BlockKind::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "heading" | "title" => Self::Heading,
            "text" | "paragraph" | "richtext" => Self::Text,
            "image" => Self::Image,
            "button" => Self::Button,
            "video" => Self::Video,
            "divider" => Self::Divider,
            "spacer" => Self::Spacer,
            "gallery" => Self::Gallery,
            "html" => Self::Html,
            _ => Self::Other,
        })
    }
}

/// One page-builder block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block type tag as stored; may be empty on very old layouts.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Type-specific content, passed through untouched.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Block {
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), fields: Map::new() }
    }

    /// Add a content field.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_owned(), value.into());
        self
    }

    #[must_use]
    pub fn block_kind(&self) -> BlockKind {
        match self.kind.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => write!(f, "{} \"{label}\"", self.kind),
            None => f.write_str(&self.kind),
        }
    }
}

impl Payload for Block {
    fn default_width(&self) -> i64 {
        self.block_kind().default_size().0
    }

    fn default_height(&self) -> i64 {
        self.block_kind().default_size().1
    }

    fn label(&self) -> Option<&str> {
        LABEL_FIELDS
            .iter()
            .find_map(|key| self.fields.get(*key).and_then(Value::as_str))
            .filter(|s| !s.trim().is_empty())
    }
}

/// `{ "items": [...] }` page layouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageFormat;

impl LayoutFormat for PageFormat {
    type Payload = Block;
    type Extra = ();

    const NAME: &'static str = "page";

    fn decode(stored: &Value) -> Result<(CanvasDocument<Block>, ()), CodecError> {
        Ok((codec::decode_items(stored)?, ()))
    }

    fn encode(doc: &CanvasDocument<Block>, _extra: &()) -> Result<Value, CodecError> {
        codec::encode_items(doc)
    }
}

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;
