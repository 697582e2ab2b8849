//! Scene model: where everything on the canvas goes, ready to paint.
//!
//! [`build_scene`] flattens a document and the current selection into plain
//! frames: one absolutely positioned box per item in draw order, plus the
//! eight handle hotspots of the selected item. A DOM host can turn each frame
//! into a positioned element via [`ItemFrame::inline_style`]; the 2D renderer
//! in [`crate::render`] paints the same frames onto a canvas element.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::consts::{CANVAS_MARGIN_PX, MIN_CANVAS_HEIGHT, MIN_CANVAS_WIDTH};
use crate::doc::{CanvasDocument, ItemId, Payload};
use crate::hit::handle_rect;
use crate::resize::Handle;

/// Scrollable size of the canvas surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: i64,
    pub height: i64,
}

/// Size the canvas so every item fits with a margin to spare.
///
/// The canvas never shrinks below a usable working area, and grows without
/// bound as items are dragged further right or down.
#[must_use]
pub fn canvas_extent<T>(doc: &CanvasDocument<T>) -> Extent {
    let right = doc.iter().map(|item| item.geometry().right()).max().unwrap_or(0);
    let bottom = doc.iter().map(|item| item.geometry().bottom()).max().unwrap_or(0);
    Extent {
        width: right.saturating_add(CANVAS_MARGIN_PX).max(MIN_CANVAS_WIDTH),
        height: bottom.saturating_add(CANVAS_MARGIN_PX).max(MIN_CANVAS_HEIGHT),
    }
}

/// One item, placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFrame {
    pub id: ItemId,
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
    pub z_index: i64,
    /// Drawn with a selection outline.
    pub selected: bool,
    /// Caption supplied by the payload.
    pub label: Option<String>,
}

impl ItemFrame {
    /// Absolute-positioning CSS for a DOM element representing this item.
    #[must_use]
    pub fn inline_style(&self) -> String {
        format!(
            "position: absolute; left: {}px; top: {}px; width: {}px; height: {}px; z-index: {};",
            self.left, self.top, self.width, self.height, self.z_index
        )
    }
}

/// One resize-handle hotspot of the selected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleFrame {
    pub handle: Handle,
    pub left: i64,
    pub top: i64,
    pub size: i64,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub extent: Extent,
    /// Items bottom-first.
    pub items: Vec<ItemFrame>,
    /// Handles of the selected item; empty when nothing is selected.
    pub handles: Vec<HandleFrame>,
}

/// Lay out `doc` with `selected` highlighted.
#[must_use]
pub fn build_scene<T: Payload>(doc: &CanvasDocument<T>, selected: Option<&ItemId>) -> Scene {
    let items = doc
        .sorted_for_draw()
        .into_iter()
        .map(|item| {
            let g = item.geometry();
            ItemFrame {
                id: item.id.clone(),
                left: g.x,
                top: g.y,
                width: g.width,
                height: g.height,
                z_index: g.z_index,
                selected: selected == Some(&item.id),
                label: item.payload.label().map(ToOwned::to_owned),
            }
        })
        .collect();

    let handles = selected
        .and_then(|id| doc.get(id))
        .map(|item| {
            let g = item.geometry();
            Handle::ALL
                .into_iter()
                .map(|handle| {
                    let (left, top, size) = handle_rect(&g, handle);
                    HandleFrame { handle, left, top, size }
                })
                .collect()
        })
        .unwrap_or_default();

    Scene { extent: canvas_extent(doc), items, handles }
}
