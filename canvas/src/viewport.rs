//! Coordinate spaces: raw pointer positions versus canvas positions.
//!
//! Controllers in this crate only ever see canvas-space [`Point`]s. Turning a
//! pointer event's client coordinates into canvas space (accounting for where
//! the canvas sits on the page, how far it is scrolled, and the zoom level) is
//! the job of a [`CanvasSpace`] implementation, so hosts with different
//! scrolling models can swap it out without touching the drag/resize math.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::{MAX_ZOOM, MIN_ZOOM};

/// A position in canvas space, in whole pixels from the canvas origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    #[must_use]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// A position as reported by the input device (CSS pixels, page-relative).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientPoint {
    pub x: f64,
    pub y: f64,
}

impl ClientPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Translation from client coordinates into canvas space.
pub trait CanvasSpace {
    /// Resolve a client-space pointer position to canvas space.
    fn to_canvas(&self, client: ClientPoint) -> Point;
}

/// Scroll-and-zoom view onto the canvas.
///
/// `origin_*` is where the canvas element's top-left sits in client space,
/// `scroll_*` is the element's scroll offset (CSS pixels), and `zoom` scales
/// canvas pixels to CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin_x: f64,
    pub origin_y: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { origin_x: 0.0, origin_y: 0.0, scroll_x: 0.0, scroll_y: 0.0, zoom: 1.0 }
    }
}

impl Viewport {
    /// Record where the canvas element sits in client space.
    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.origin_x = x;
        self.origin_y = y;
    }

    /// Record the canvas element's scroll offset.
    pub fn set_scroll(&mut self, x: f64, y: f64) {
        self.scroll_x = x.max(0.0);
        self.scroll_y = y.max(0.0);
    }

    /// Set the zoom factor, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = if zoom.is_finite() { zoom.clamp(MIN_ZOOM, MAX_ZOOM) } else { 1.0 };
    }

    /// Convert a canvas-space point back to client coordinates.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_client(&self, pt: Point) -> ClientPoint {
        ClientPoint {
            x: pt.x as f64 * self.zoom - self.scroll_x + self.origin_x,
            y: pt.y as f64 * self.zoom - self.scroll_y + self.origin_y,
        }
    }
}

impl CanvasSpace for Viewport {
    #[allow(clippy::cast_possible_truncation)]
    fn to_canvas(&self, client: ClientPoint) -> Point {
        let x = (client.x - self.origin_x + self.scroll_x) / self.zoom;
        let y = (client.y - self.origin_y + self.scroll_y) / self.zoom;
        Point { x: x.round() as i64, y: y.round() as i64 }
    }
}
