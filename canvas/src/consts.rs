//! Shared numeric constants for the canvas crate.

// ── Geometry ────────────────────────────────────────────────────

/// Smallest width an item may take, in canvas pixels.
pub const MIN_ITEM_WIDTH: i64 = 50;

/// Smallest height an item may take, in canvas pixels.
pub const MIN_ITEM_HEIGHT: i64 = 30;

/// Width given to items whose payload has no opinion.
pub const DEFAULT_ITEM_WIDTH: i64 = 300;

/// Height given to items whose payload has no opinion.
pub const DEFAULT_ITEM_HEIGHT: i64 = 120;

// ── Canvas extent ───────────────────────────────────────────────

/// Free space kept beyond the right-most and bottom-most item.
pub const CANVAS_MARGIN_PX: i64 = 200;

/// Minimum scrollable canvas width, even when empty.
pub const MIN_CANVAS_WIDTH: i64 = 1200;

/// Minimum scrollable canvas height, even when empty.
pub const MIN_CANVAS_HEIGHT: i64 = 800;

// ── Hit-testing ─────────────────────────────────────────────────

/// Side length of a resize-handle hotspot, centred on the item border.
pub const HANDLE_SIZE_PX: i64 = 10;

// ── Legacy layouts ──────────────────────────────────────────────

/// Vertical gap between items stacked by the legacy-layout migration.
pub const LEGACY_STACK_GAP_PX: i64 = 20;

/// Largest magnitude a stored pixel value may have; beyond it the field is
/// treated as unreadable and defaulted.
pub const MAX_STORED_PX: i64 = 1 << 31;

// ── Viewport ────────────────────────────────────────────────────

/// Smallest zoom factor accepted by the viewport.
pub const MIN_ZOOM: f64 = 0.25;

/// Largest zoom factor accepted by the viewport.
pub const MAX_ZOOM: f64 = 4.0;
