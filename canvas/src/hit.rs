#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::HANDLE_SIZE_PX;
use crate::doc::{CanvasDocument, Geometry, ItemId};
use crate::resize::Handle;
use crate::viewport::Point;

/// Which part of an item was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    Handle(Handle),
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub id: ItemId,
    pub part: HitPart,
}

/// Square hotspot for `handle` on `g`, as `(left, top, size)`.
#[must_use]
pub fn handle_rect(g: &Geometry, handle: Handle) -> (i64, i64, i64) {
    let anchor = handle.anchor(g);
    let half = HANDLE_SIZE_PX / 2;
    (anchor.x - half, anchor.y - half, HANDLE_SIZE_PX)
}

/// Which handle of `g` (if any) lies under `pt`. Corners win over edges
/// where hotspots overlap on very small items.
#[must_use]
pub fn handle_at(g: &Geometry, pt: Point) -> Option<Handle> {
    const PRIORITY: [Handle; 8] =
        [Handle::Nw, Handle::Ne, Handle::Se, Handle::Sw, Handle::N, Handle::E, Handle::S, Handle::W];
    PRIORITY.into_iter().find(|&handle| {
        let (left, top, size) = handle_rect(g, handle);
        pt.x >= left && pt.x < left.saturating_add(size) && pt.y >= top && pt.y < top.saturating_add(size)
    })
}

/// Find what lies under `pt`.
///
/// Handles of the selected item are checked first, since they poke slightly
/// outside its box and sit above everything else. Then item bodies are
/// checked topmost first.
#[must_use]
pub fn hit_test<T>(doc: &CanvasDocument<T>, pt: Point, selected: Option<&ItemId>) -> Option<Hit> {
    if let Some(item) = selected.and_then(|id| doc.get(id)) {
        if let Some(handle) = handle_at(&item.geometry(), pt) {
            return Some(Hit { id: item.id.clone(), part: HitPart::Handle(handle) });
        }
    }

    doc.sorted_for_draw()
        .into_iter()
        .rev()
        .find(|item| item.geometry().contains(pt))
        .map(|item| Hit { id: item.id.clone(), part: HitPart::Body })
}
