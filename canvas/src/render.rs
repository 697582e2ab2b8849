//! Rendering: paints a [`Scene`] onto a 2D canvas context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives a read-only scene and produces pixels; it does not mutate
//! any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use js_sys::Array;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::layout::{HandleFrame, ItemFrame, Scene};

const ITEM_FILL: &str = "#FFFFFF";
const ITEM_STROKE: &str = "#C9CED6";
const LABEL_COLOR: &str = "#2B2F36";
const SELECTION_COLOR: &str = "#2F6FED";
const HANDLE_FILL: &str = "#FFFFFF";

/// Selection dash segment length in canvas pixels.
const SELECTION_DASH_PX: f64 = 4.0;
/// Inset of the label from the item's top-left corner.
const LABEL_PADDING_PX: f64 = 8.0;

/// Draw the full scene: items bottom-first, then the selection handles.
///
/// `scale` maps canvas pixels to device pixels (zoom × device pixel ratio).
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
#[allow(clippy::cast_precision_loss)]
pub fn draw(ctx: &CanvasRenderingContext2d, scene: &Scene, scale: f64) -> Result<(), JsValue> {
    ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, scene.extent.width as f64, scene.extent.height as f64);

    for frame in &scene.items {
        draw_item(ctx, frame)?;
    }
    for handle in &scene.handles {
        draw_handle(ctx, handle);
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn draw_item(ctx: &CanvasRenderingContext2d, frame: &ItemFrame) -> Result<(), JsValue> {
    let (x, y, w, h) = (frame.left as f64, frame.top as f64, frame.width as f64, frame.height as f64);

    ctx.save();
    ctx.set_fill_style_str(ITEM_FILL);
    ctx.fill_rect(x, y, w, h);
    ctx.set_line_width(1.0);
    ctx.set_stroke_style_str(ITEM_STROKE);
    ctx.stroke_rect(x, y, w, h);

    if let Some(label) = frame.label.as_deref() {
        ctx.set_fill_style_str(LABEL_COLOR);
        ctx.set_font("13px sans-serif");
        ctx.set_text_align("left");
        ctx.set_text_baseline("top");
        ctx.fill_text_with_max_width(label, x + LABEL_PADDING_PX, y + LABEL_PADDING_PX, (w - 2.0 * LABEL_PADDING_PX).max(0.0))?;
    }

    if frame.selected {
        let dash = Array::of2(&JsValue::from_f64(SELECTION_DASH_PX), &JsValue::from_f64(SELECTION_DASH_PX));
        ctx.set_line_dash(&dash)?;
        ctx.set_line_width(2.0);
        ctx.set_stroke_style_str(SELECTION_COLOR);
        ctx.stroke_rect(x - 1.0, y - 1.0, w + 2.0, h + 2.0);
    }
    ctx.restore();
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn draw_handle(ctx: &CanvasRenderingContext2d, handle: &HandleFrame) {
    let (x, y, s) = (handle.left as f64, handle.top as f64, handle.size as f64);
    ctx.set_fill_style_str(HANDLE_FILL);
    ctx.fill_rect(x, y, s, s);
    ctx.set_line_width(1.0);
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.stroke_rect(x, y, s, s);
}
