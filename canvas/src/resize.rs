//! Resize controller: reshapes one item by dragging one of its eight handles.
//!
//! Every pointer move is resolved against the geometry captured when the
//! resize began, never against the previous move, so the result depends only
//! on the total pointer delta. Handles on the west or north side move the
//! item's origin so that the opposite edge stays put; once the minimum size is
//! reached the item stops shrinking instead of sliding.

#[cfg(test)]
#[path = "resize_test.rs"]
mod resize_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{MIN_ITEM_HEIGHT, MIN_ITEM_WIDTH};
use crate::doc::{CanvasDocument, Geometry, ItemId};
use crate::viewport::Point;

/// One of the eight resize handles on an item's border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl Handle {
    /// All handles, clockwise from the top edge.
    pub const ALL: [Handle; 8] = [
        Handle::N,
        Handle::Ne,
        Handle::E,
        Handle::Se,
        Handle::S,
        Handle::Sw,
        Handle::W,
        Handle::Nw,
    ];

    /// Whether dragging this handle moves the top edge.
    #[must_use]
    pub fn north(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    /// Whether dragging this handle moves the bottom edge.
    #[must_use]
    pub fn south(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    /// Whether dragging this handle moves the right edge.
    #[must_use]
    pub fn east(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    /// Whether dragging this handle moves the left edge.
    #[must_use]
    pub fn west(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    /// The point on `g`'s border where this handle sits.
    #[must_use]
    pub fn anchor(self, g: &Geometry) -> Point {
        let x = if self.west() {
            g.x
        } else if self.east() {
            g.right()
        } else {
            g.x.saturating_add(g.width / 2)
        };
        let y = if self.north() {
            g.y
        } else if self.south() {
            g.bottom()
        } else {
            g.y.saturating_add(g.height / 2)
        };
        Point { x, y }
    }

    /// CSS cursor shown while hovering this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }

    /// Lowercase compass name (`"n"`, `"ne"`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::N => "n",
            Self::Ne => "ne",
            Self::E => "e",
            Self::Se => "se",
            Self::S => "s",
            Self::Sw => "sw",
            Self::W => "w",
            Self::Nw => "nw",
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a handle name is not one of the eight compass points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resize handle `{0}` (expected n, ne, e, se, s, sw, w or nw)")]
pub struct ParseHandleError(pub String);

impl FromStr for Handle {
    type Err = ParseHandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" => Ok(Self::N),
            "ne" => Ok(Self::Ne),
            "e" => Ok(Self::E),
            "se" => Ok(Self::Se),
            "s" => Ok(Self::S),
            "sw" => Ok(Self::Sw),
            "w" => Ok(Self::W),
            "nw" => Ok(Self::Nw),
            _ => Err(ParseHandleError(s.to_owned())),
        }
    }
}

/// An active resize of a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeState {
    /// Item being resized.
    pub id: ItemId,
    /// Handle being dragged.
    pub handle: Handle,
    /// Pointer position when the resize began.
    pub start: Point,
    /// Item geometry when the resize began.
    pub start_geometry: Geometry,
}

impl ResizeState {
    /// Capture the starting pointer and geometry for resizing `id`.
    ///
    /// Returns `None` when the document has no such item.
    #[must_use]
    pub fn begin<T>(doc: &CanvasDocument<T>, id: &ItemId, handle: Handle, pointer: Point) -> Option<Self> {
        let item = doc.get(id)?;
        Some(Self { id: id.clone(), handle, start: pointer, start_geometry: item.geometry() })
    }

    /// The geometry the item should take for a pointer at `pointer`.
    #[must_use]
    pub fn resolve(&self, pointer: Point) -> Geometry {
        let dx = pointer.x.saturating_sub(self.start.x);
        let dy = pointer.y.saturating_sub(self.start.y);
        let start = self.start_geometry;
        let mut g = start;

        if self.handle.east() {
            g.width = start.width.saturating_add(dx).max(MIN_ITEM_WIDTH);
        } else if self.handle.west() {
            // Cap so the origin never crosses zero while the right edge holds.
            let max_width = start.right().max(MIN_ITEM_WIDTH);
            g.width = start.width.saturating_sub(dx).clamp(MIN_ITEM_WIDTH, max_width);
            g.x = start.right() - g.width;
        }

        if self.handle.south() {
            g.height = start.height.saturating_add(dy).max(MIN_ITEM_HEIGHT);
        } else if self.handle.north() {
            let max_height = start.bottom().max(MIN_ITEM_HEIGHT);
            g.height = start.height.saturating_sub(dy).clamp(MIN_ITEM_HEIGHT, max_height);
            g.y = start.bottom() - g.height;
        }

        g
    }

    /// Reshape the item to follow `pointer`.
    ///
    /// Returns the applied geometry, or `None` if the item has disappeared
    /// from the document since the resize began.
    pub fn apply<T>(&self, doc: &mut CanvasDocument<T>, pointer: Point) -> Option<Geometry> {
        let item = doc.get_mut(&self.id)?;
        item.set_geometry(self.resolve(pointer));
        Some(item.geometry())
    }

    /// Whether the item's geometry differs from where the resize started.
    #[must_use]
    pub fn changed<T>(&self, doc: &CanvasDocument<T>) -> bool {
        doc.get(&self.id).is_some_and(|item| item.geometry() != self.start_geometry)
    }
}
