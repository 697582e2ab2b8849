//! JSON layout documents: saving a canvas and loading it back.
//!
//! On the wire each item is its payload object with the geometry fields
//! (`id`, `x`, `y`, `width`, `height`, `zIndex`) merged in alongside. Two
//! document shapes exist: `{ "items": [...] }` for the page builder and
//! `{ "nodes": [...], "edges": [...] }` for the org chart, whose edges are
//! carried through untouched.
//!
//! Loading is deliberately forgiving. Layouts saved before items could be
//! positioned have no geometry at all, and hand-edited ones may hold strings
//! where numbers belong. Any geometry field that cannot be read is replaced by
//! a default: `x = 0`, `y` stacked below the previous items, the payload's
//! default width and height, and a `zIndex` following document order. Only a
//! payload the consuming screen cannot read is an error.

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::{LEGACY_STACK_GAP_PX, MAX_STORED_PX};
use crate::doc::{CanvasDocument, DocError, Geometry, ItemId, Payload, PositionedItem};

/// Key holding the item list of a page layout.
pub const ITEMS_KEY: &str = "items";
/// Key holding the node list of a graph layout.
pub const NODES_KEY: &str = "nodes";
/// Key holding the edge list of a graph layout.
pub const EDGES_KEY: &str = "edges";

const ID_KEY: &str = "id";
const X_KEY: &str = "x";
const Y_KEY: &str = "y";
const WIDTH_KEY: &str = "width";
const HEIGHT_KEY: &str = "height";
const Z_INDEX_KEY: &str = "zIndex";

/// Errors from encoding or decoding layout documents.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The stored text is not valid JSON.
    #[error("invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The document is valid JSON but not a layout.
    #[error("unexpected layout shape: {0}")]
    UnexpectedShape(String),
    /// A payload serialized to something other than a JSON object.
    #[error("payload of item {id} must serialize to a JSON object")]
    PayloadNotObject { id: ItemId },
    /// A stored payload could not be read by the consuming screen.
    #[error("item {index} has an unreadable payload: {source}")]
    Payload {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    /// The decoded items violate a document invariant.
    #[error(transparent)]
    Doc(#[from] DocError),
}

/// A node/edge layout such as the org chart.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphDocument<T> {
    /// Positioned nodes.
    pub nodes: CanvasDocument<T>,
    /// Edge records, opaque to the canvas.
    pub edges: Vec<Value>,
}

impl<T> Default for GraphDocument<T> {
    fn default() -> Self {
        Self { nodes: CanvasDocument::new(), edges: Vec::new() }
    }
}

/// Serialize one item: its payload object plus the geometry fields.
///
/// # Errors
///
/// Returns [`CodecError::PayloadNotObject`] if the payload does not
/// serialize to a JSON object (or null).
pub fn encode_item<T: Serialize>(item: &PositionedItem<T>) -> Result<Value, CodecError> {
    let mut fields = match serde_json::to_value(&item.payload)? {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        _ => return Err(CodecError::PayloadNotObject { id: item.id.clone() }),
    };
    let g = item.geometry();
    fields.insert(ID_KEY.to_owned(), Value::String(item.id.as_str().to_owned()));
    fields.insert(X_KEY.to_owned(), g.x.into());
    fields.insert(Y_KEY.to_owned(), g.y.into());
    fields.insert(WIDTH_KEY.to_owned(), g.width.into());
    fields.insert(HEIGHT_KEY.to_owned(), g.height.into());
    fields.insert(Z_INDEX_KEY.to_owned(), g.z_index.into());
    Ok(Value::Object(fields))
}

/// Serialize a page layout as `{ "items": [...] }` in document order.
///
/// # Errors
///
/// Propagates [`encode_item`] failures.
pub fn encode_items<T: Serialize>(doc: &CanvasDocument<T>) -> Result<Value, CodecError> {
    let items = encode_list(doc)?;
    let mut root = Map::new();
    root.insert(ITEMS_KEY.to_owned(), Value::Array(items));
    Ok(Value::Object(root))
}

/// Serialize a graph layout as `{ "nodes": [...], "edges": [...] }`.
///
/// # Errors
///
/// Propagates [`encode_item`] failures.
pub fn encode_graph<T: Serialize>(nodes: &CanvasDocument<T>, edges: &[Value]) -> Result<Value, CodecError> {
    let nodes = encode_list(nodes)?;
    let mut root = Map::new();
    root.insert(NODES_KEY.to_owned(), Value::Array(nodes));
    root.insert(EDGES_KEY.to_owned(), Value::Array(edges.to_vec()));
    Ok(Value::Object(root))
}

/// Load a page layout from its stored form.
///
/// Accepts the native `{ "items": [...] }` object, the same object encoded
/// as a JSON string, a bare item array, or `null` / an empty string (an
/// empty document).
///
/// # Errors
///
/// Returns [`CodecError::Json`] for unparseable string content,
/// [`CodecError::UnexpectedShape`] when the value is not a layout, and
/// [`CodecError::Payload`] when an item's payload cannot be read as `T`.
pub fn decode_items<T>(stored: &Value) -> Result<CanvasDocument<T>, CodecError>
where
    T: DeserializeOwned + Payload,
{
    let stored = unwrap_stored(stored)?;
    match stored.as_ref() {
        Value::Null => Ok(CanvasDocument::new()),
        Value::Array(entries) => decode_list(entries),
        Value::Object(root) => match root.get(ITEMS_KEY) {
            None | Some(Value::Null) => Ok(CanvasDocument::new()),
            Some(Value::Array(entries)) => decode_list(entries),
            Some(_) => Err(CodecError::UnexpectedShape(format!("`{ITEMS_KEY}` is not an array"))),
        },
        _ => Err(CodecError::UnexpectedShape("expected an object or an array".to_owned())),
    }
}

/// Load a graph layout from its stored form.
///
/// # Errors
///
/// Same conditions as [`decode_items`], applied to `nodes`; `edges` must be
/// an array when present.
pub fn decode_graph<T>(stored: &Value) -> Result<GraphDocument<T>, CodecError>
where
    T: DeserializeOwned + Payload,
{
    let stored = unwrap_stored(stored)?;
    let root = match stored.as_ref() {
        Value::Null => return Ok(GraphDocument::default()),
        Value::Object(root) => root,
        _ => return Err(CodecError::UnexpectedShape("expected an object".to_owned())),
    };

    let nodes = match root.get(NODES_KEY) {
        None | Some(Value::Null) => CanvasDocument::new(),
        Some(Value::Array(entries)) => decode_list(entries)?,
        Some(_) => return Err(CodecError::UnexpectedShape(format!("`{NODES_KEY}` is not an array"))),
    };
    let edges = match root.get(EDGES_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(edges)) => edges.clone(),
        Some(_) => return Err(CodecError::UnexpectedShape(format!("`{EDGES_KEY}` is not an array"))),
    };

    Ok(GraphDocument { nodes, edges })
}

fn encode_list<T: Serialize>(doc: &CanvasDocument<T>) -> Result<Vec<Value>, CodecError> {
    doc.iter().map(encode_item).collect()
}

fn unwrap_stored(value: &Value) -> Result<Cow<'_, Value>, CodecError> {
    match value {
        Value::String(text) if text.trim().is_empty() => Ok(Cow::Owned(Value::Null)),
        Value::String(text) => Ok(Cow::Owned(serde_json::from_str(text)?)),
        other => Ok(Cow::Borrowed(other)),
    }
}

fn decode_list<T>(entries: &[Value]) -> Result<CanvasDocument<T>, CodecError>
where
    T: DeserializeOwned + Payload,
{
    let mut doc = CanvasDocument::new();
    // Legacy items without a y are stacked below everything placed so far.
    let mut next_y = 0;

    for (index, entry) in entries.iter().enumerate() {
        let Value::Object(fields) = entry else {
            log::warn!("skipping layout entry {index}: not an object");
            continue;
        };

        let mut fields = fields.clone();
        let raw_id = fields.remove(ID_KEY);
        let x = take_int(&mut fields, X_KEY);
        let y = take_int(&mut fields, Y_KEY);
        let width = take_int(&mut fields, WIDTH_KEY);
        let height = take_int(&mut fields, HEIGHT_KEY);
        let z_index = take_int(&mut fields, Z_INDEX_KEY);

        let payload: T =
            serde_json::from_value(Value::Object(fields)).map_err(|source| CodecError::Payload { index, source })?;

        // 1-based position among the items kept so far; skipped entries don't count.
        let order = i64::try_from(doc.len() + 1).unwrap_or(i64::MAX);
        let geometry = Geometry::new(
            x.unwrap_or(0),
            y.unwrap_or(next_y),
            width.unwrap_or_else(|| payload.default_width()),
            height.unwrap_or_else(|| payload.default_height()),
            z_index.unwrap_or(order),
        )
        .normalized();
        next_y = next_y.max(geometry.bottom().saturating_add(LEGACY_STACK_GAP_PX));

        let id = resolve_id(raw_id, &doc, index);
        doc.insert(PositionedItem::new(id, geometry, payload))?;
    }

    Ok(doc)
}

fn take_int(fields: &mut Map<String, Value>, key: &str) -> Option<i64> {
    fields.remove(key).as_ref().and_then(read_int)
}

/// Read a pixel value from a number or a numeric string such as `"120px"`.
/// Values outside `±MAX_STORED_PX` count as unreadable.
fn read_int(value: &Value) -> Option<i64> {
    let px = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(round_finite)),
        Value::String(text) => {
            let text = text.trim();
            let text = text.strip_suffix("px").unwrap_or(text).trim_end();
            match text.parse::<f64>() {
                Ok(v) => round_finite(v),
                Err(_) => None,
            }
        }
        _ => None,
    };
    px.filter(|v| (-MAX_STORED_PX..=MAX_STORED_PX).contains(v))
}

#[allow(clippy::cast_possible_truncation)]
fn round_finite(v: f64) -> Option<i64> {
    v.is_finite().then(|| v.round() as i64)
}

fn resolve_id<T>(raw: Option<Value>, doc: &CanvasDocument<T>, index: usize) -> ItemId {
    let stored = match raw {
        None | Some(Value::Null) => None,
        Some(raw) => match ItemId::deserialize(raw) {
            Ok(id) if !id.as_str().trim().is_empty() => Some(id),
            Ok(_) => None,
            Err(e) => {
                log::warn!("layout entry {index}: unusable id ({e}), assigning a fresh one");
                None
            }
        },
    };
    match stored {
        Some(id) if !doc.contains(&id) => id,
        Some(id) => {
            log::warn!("layout entry {index}: duplicate id {id}, assigning a fresh one");
            ItemId::generate()
        }
        None => ItemId::generate(),
    }
}
