//! Document model: positioned items, their geometry, and the in-memory store.
//!
//! This module defines what sits on the canvas. A [`PositionedItem`] pairs an
//! opaque payload with the geometry the canvas manipulates (`x`, `y`, `width`,
//! `height`, `z_index`). Geometry is only reachable through clamping setters,
//! so the minimum-size and non-negative-position invariants hold after every
//! mutation. [`CanvasDocument`] owns the items in document order and enforces
//! id uniqueness.
//!
//! Payloads are defined by the consuming screen (page-builder blocks, org-chart
//! nodes). The [`Payload`] trait is the only window the canvas has into them.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_ITEM_HEIGHT, DEFAULT_ITEM_WIDTH, MIN_ITEM_HEIGHT, MIN_ITEM_WIDTH};
use crate::viewport::Point;

/// Stable identifier of an item, unique within one document.
///
/// Stored layouts carry ids as strings or numbers; both are accepted and
/// kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh identifier for a newly created item.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identifier as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Int(n) => Self(n.to_string()),
            Raw::Float(n) => Self(n.to_string()),
        })
    }
}

/// Position, size, and stacking order of one item, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    /// Left edge, measured from the canvas origin.
    pub x: i64,
    /// Top edge, measured from the canvas origin.
    pub y: i64,
    /// Width of the bounding box.
    pub width: i64,
    /// Height of the bounding box.
    pub height: i64,
    /// Stacking order; higher values draw on top. Not required to be unique.
    pub z_index: i64,
}

impl Geometry {
    /// Build a geometry from its parts.
    #[must_use]
    pub fn new(x: i64, y: i64, width: i64, height: i64, z_index: i64) -> Self {
        Self { x, y, width, height, z_index }
    }

    /// Clamp to the canvas invariants: non-negative origin, minimum size.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            x: self.x.max(0),
            y: self.y.max(0),
            width: self.width.max(MIN_ITEM_WIDTH),
            height: self.height.max(MIN_ITEM_HEIGHT),
            z_index: self.z_index,
        }
    }

    /// Right edge (`x + width`).
    #[must_use]
    pub fn right(&self) -> i64 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> i64 {
        self.y.saturating_add(self.height)
    }

    /// Whether `pt` lies inside the bounding box. The right and bottom
    /// edges are exclusive.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x < self.right() && pt.y >= self.y && pt.y < self.bottom()
    }
}

/// Hooks a consuming screen provides for its item payloads.
///
/// Every method has a default, so a payload type that does not care about
/// sizing or labels can implement the trait with an empty block.
pub trait Payload {
    /// Width to use when a stored item carries none.
    fn default_width(&self) -> i64 {
        DEFAULT_ITEM_WIDTH
    }

    /// Height to use when a stored item carries none (the "auto" height).
    fn default_height(&self) -> i64 {
        DEFAULT_ITEM_HEIGHT
    }

    /// Short caption drawn inside the item by the renderer, if any.
    fn label(&self) -> Option<&str> {
        None
    }
}

impl Payload for serde_json::Value {
    fn label(&self) -> Option<&str> {
        self.get("label").and_then(serde_json::Value::as_str)
    }
}

/// One draggable, resizable unit on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedItem<T> {
    /// Identifier, unique within the owning document.
    pub id: ItemId,
    geometry: Geometry,
    /// Screen-defined data; never interpreted by the canvas.
    pub payload: T,
}

impl<T> PositionedItem<T> {
    /// Create an item. The geometry is clamped to the canvas invariants.
    #[must_use]
    pub fn new(id: ItemId, geometry: Geometry, payload: T) -> Self {
        Self { id, geometry: geometry.normalized(), payload }
    }

    /// Current geometry.
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Left edge.
    #[must_use]
    pub fn x(&self) -> i64 {
        self.geometry.x
    }

    /// Top edge.
    #[must_use]
    pub fn y(&self) -> i64 {
        self.geometry.y
    }

    /// Width.
    #[must_use]
    pub fn width(&self) -> i64 {
        self.geometry.width
    }

    /// Height.
    #[must_use]
    pub fn height(&self) -> i64 {
        self.geometry.height
    }

    /// Stacking order.
    #[must_use]
    pub fn z_index(&self) -> i64 {
        self.geometry.z_index
    }

    /// Replace the whole geometry, clamped.
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry.normalized();
    }

    /// Move the item. Negative coordinates clamp to zero.
    pub fn set_position(&mut self, x: i64, y: i64) {
        self.geometry.x = x.max(0);
        self.geometry.y = y.max(0);
    }

    /// Resize the item. Sizes below the minimum clamp up.
    pub fn set_size(&mut self, width: i64, height: i64) {
        self.geometry.width = width.max(MIN_ITEM_WIDTH);
        self.geometry.height = height.max(MIN_ITEM_HEIGHT);
    }

    /// Change the stacking order.
    pub fn set_z_index(&mut self, z_index: i64) {
        self.geometry.z_index = z_index;
    }
}

/// Errors from structural document edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocError {
    /// An item with this id is already present.
    #[error("duplicate item id: {0}")]
    DuplicateId(ItemId),
}

/// Ordered collection of positioned items.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasDocument<T> {
    items: Vec<PositionedItem<T>>,
}

impl<T> CanvasDocument<T> {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a document from items in document order.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::DuplicateId`] if two items share an id.
    pub fn from_items(items: Vec<PositionedItem<T>>) -> Result<Self, DocError> {
        let mut doc = Self::new();
        for item in items {
            doc.insert(item)?;
        }
        Ok(doc)
    }

    /// Append an item at the end of document order.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::DuplicateId`] if the id is already taken.
    pub fn insert(&mut self, item: PositionedItem<T>) -> Result<(), DocError> {
        if self.contains(&item.id) {
            return Err(DocError::DuplicateId(item.id));
        }
        self.items.push(item);
        Ok(())
    }

    /// Remove an item by id, returning it if it was present.
    pub fn remove(&mut self, id: &ItemId) -> Option<PositionedItem<T>> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&PositionedItem<T>> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Look up an item by id for mutation.
    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut PositionedItem<T>> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    /// Whether an item with this id exists.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.position(id).is_some()
    }

    /// Items in document order.
    #[must_use]
    pub fn items(&self) -> &[PositionedItem<T>] {
        &self.items
    }

    /// Iterate items in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, PositionedItem<T>> {
        self.items.iter()
    }

    /// Consume the document, yielding its items in document order.
    #[must_use]
    pub fn into_items(self) -> Vec<PositionedItem<T>> {
        self.items
    }

    /// Items sorted bottom-first for drawing: by `z_index`, then document
    /// order for equal stacking values.
    #[must_use]
    pub fn sorted_for_draw(&self) -> Vec<&PositionedItem<T>> {
        let mut items: Vec<&PositionedItem<T>> = self.items.iter().collect();
        // Stable sort keeps document order among equal z-indices.
        items.sort_by_key(|item| item.z_index());
        items
    }

    /// One above the highest `z_index` in use, or 1 for an empty document.
    #[must_use]
    pub fn next_z_index(&self) -> i64 {
        self.items.iter().map(PositionedItem::z_index).max().map_or(1, |z| z + 1)
    }

    /// Lift an item above every other. Returns false if the id is unknown.
    pub fn bring_to_front(&mut self, id: &ItemId) -> bool {
        let top = self
            .items
            .iter()
            .filter(|item| &item.id != id)
            .map(PositionedItem::z_index)
            .max();
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        if let Some(top) = top {
            if item.z_index() <= top {
                item.set_z_index(top + 1);
            }
        }
        true
    }

    /// Drop an item below every other. Returns false if the id is unknown.
    pub fn send_to_back(&mut self, id: &ItemId) -> bool {
        let bottom = self
            .items
            .iter()
            .filter(|item| &item.id != id)
            .map(PositionedItem::z_index)
            .min();
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        if let Some(bottom) = bottom {
            if item.z_index() >= bottom {
                item.set_z_index(bottom - 1);
            }
        }
        true
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the document holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}

impl<T> Default for CanvasDocument<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a CanvasDocument<T> {
    type Item = &'a PositionedItem<T>;
    type IntoIter = std::slice::Iter<'a, PositionedItem<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
