//! Drag controller: repositions one item by following the pointer.
//!
//! A drag remembers where inside the item the pointer grabbed it, so the item
//! does not jump to put its corner under the cursor. Positions clamp at the
//! canvas origin; there is no right or bottom bound because the canvas grows
//! to fit its content.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use crate::doc::{CanvasDocument, ItemId};
use crate::viewport::Point;

/// An active drag of a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragState {
    /// Item being dragged.
    pub id: ItemId,
    /// Pointer x minus item x at grab time.
    pub offset_x: i64,
    /// Pointer y minus item y at grab time.
    pub offset_y: i64,
    /// Item x when the drag began.
    pub start_x: i64,
    /// Item y when the drag began.
    pub start_y: i64,
}

impl DragState {
    /// Capture the grab offset for `id` at `pointer`.
    ///
    /// Returns `None` when the document has no such item.
    #[must_use]
    pub fn begin<T>(doc: &CanvasDocument<T>, id: &ItemId, pointer: Point) -> Option<Self> {
        let item = doc.get(id)?;
        Some(Self {
            id: id.clone(),
            offset_x: pointer.x.saturating_sub(item.x()),
            offset_y: pointer.y.saturating_sub(item.y()),
            start_x: item.x(),
            start_y: item.y(),
        })
    }

    /// Where the item's origin belongs for a pointer at `pointer`.
    #[must_use]
    pub fn target(&self, pointer: Point) -> Point {
        Point {
            x: pointer.x.saturating_sub(self.offset_x).max(0),
            y: pointer.y.saturating_sub(self.offset_y).max(0),
        }
    }

    /// Move the dragged item to follow `pointer`.
    ///
    /// Returns the new origin, or `None` if the item has disappeared from the
    /// document since the drag began.
    pub fn apply<T>(&self, doc: &mut CanvasDocument<T>, pointer: Point) -> Option<Point> {
        let item = doc.get_mut(&self.id)?;
        let to = self.target(pointer);
        item.set_position(to.x, to.y);
        Some(to)
    }

    /// Whether the item now sits somewhere other than where it started.
    #[must_use]
    pub fn moved<T>(&self, doc: &CanvasDocument<T>) -> bool {
        doc.get(&self.id)
            .is_some_and(|item| item.x() != self.start_x || item.y() != self.start_y)
    }
}
