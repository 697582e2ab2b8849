use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::LEGACY_STACK_GAP_PX;
use crate::doc::{CanvasDocument, DocError, Geometry, ItemId, Payload, PositionedItem};
use crate::drag::DragState;
use crate::hit::{HitPart, hit_test};
use crate::input::{Button, InputState, Key, UiState};
use crate::layout::{Extent, Scene, build_scene, canvas_extent};
use crate::render;
use crate::resize::{Handle, ResizeState};
use crate::viewport::{CanvasSpace, ClientPoint, Point, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The selected item changed; property panels should follow.
    SelectionChanged(Option<ItemId>),
    /// A drag finished with the item somewhere new.
    ItemMoved { id: ItemId, x: i64, y: i64 },
    /// An item's size (and possibly origin) changed.
    ItemResized { id: ItemId, geometry: Geometry },
    ItemAdded(ItemId),
    ItemRemoved(ItemId),
    /// An item's stacking order changed.
    ItemReordered { id: ItemId, z_index: i64 },
    /// The host should show this CSS cursor over the canvas.
    SetCursor(&'static str),
    RenderNeeded,
}

impl Action {
    /// Whether the action reflects a change the backend has not seen yet.
    #[must_use]
    pub fn mutates_document(&self) -> bool {
        matches!(
            self,
            Self::ItemMoved { .. }
                | Self::ItemResized { .. }
                | Self::ItemAdded(_)
                | Self::ItemRemoved(_)
                | Self::ItemReordered { .. }
        )
    }
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug, Clone)]
pub struct EngineCore<T> {
    pub doc: CanvasDocument<T>,
    pub viewport: Viewport,
    pub ui: UiState,
    pub input: InputState,
}

impl<T> Default for EngineCore<T> {
    fn default() -> Self {
        Self {
            doc: CanvasDocument::new(),
            viewport: Viewport::default(),
            ui: UiState::default(),
            input: InputState::Idle,
        }
    }
}

impl<T: Payload> EngineCore<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document.
    #[must_use]
    pub fn with_document(doc: CanvasDocument<T>) -> Self {
        Self { doc, ..Self::default() }
    }

    // --- Data inputs ---

    /// Replace the document wholesale, dropping any gesture and selection.
    pub fn load_document(&mut self, doc: CanvasDocument<T>) -> Vec<Action> {
        self.doc = doc;
        self.input = InputState::Idle;
        let mut actions = Vec::new();
        if self.ui.selected.take().is_some() {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Add an item and select it.
    ///
    /// Width and height come from the payload's defaults. Without an explicit
    /// position the item lands at the left edge, below existing content.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::DuplicateId`] if `id` is already in use.
    pub fn add_item(&mut self, id: ItemId, payload: T, at: Option<Point>) -> Result<Vec<Action>, DocError> {
        let at = at.unwrap_or_else(|| {
            let bottom = self.doc.iter().map(|item| item.geometry().bottom()).max();
            Point::new(0, bottom.map_or(0, |b| b + LEGACY_STACK_GAP_PX))
        });
        let geometry = Geometry::new(
            at.x,
            at.y,
            payload.default_width(),
            payload.default_height(),
            self.doc.next_z_index(),
        );
        self.doc.insert(PositionedItem::new(id.clone(), geometry, payload))?;

        let mut actions = vec![Action::ItemAdded(id.clone())];
        actions.extend(self.select(&id));
        if !actions.contains(&Action::RenderNeeded) {
            actions.push(Action::RenderNeeded);
        }
        Ok(actions)
    }

    /// Remove an item, ending any gesture on it and clearing its selection.
    pub fn remove_item(&mut self, id: &ItemId) -> Vec<Action> {
        if self.doc.remove(id).is_none() {
            return Vec::new();
        }
        if self.input.active_id() == Some(id) {
            self.input = InputState::Idle;
        }
        let mut actions = vec![Action::ItemRemoved(id.clone())];
        if self.ui.selected.as_ref() == Some(id) {
            self.ui.selected = None;
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Overwrite an item's geometry from a property panel. Values are clamped.
    pub fn set_geometry(&mut self, id: &ItemId, geometry: Geometry) -> Vec<Action> {
        let Some(item) = self.doc.get_mut(id) else {
            return Vec::new();
        };
        let before = item.geometry();
        item.set_geometry(geometry);
        let after = item.geometry();
        if after == before {
            return Vec::new();
        }
        vec![Action::ItemResized { id: id.clone(), geometry: after }, Action::RenderNeeded]
    }

    /// Lift an item above all others.
    pub fn bring_to_front(&mut self, id: &ItemId) -> Vec<Action> {
        self.reorder(id, CanvasDocument::bring_to_front)
    }

    /// Drop an item below all others.
    pub fn send_to_back(&mut self, id: &ItemId) -> Vec<Action> {
        self.reorder(id, CanvasDocument::send_to_back)
    }

    fn reorder(&mut self, id: &ItemId, op: fn(&mut CanvasDocument<T>, &ItemId) -> bool) -> Vec<Action> {
        let Some(before) = self.doc.get(id).map(PositionedItem::z_index) else {
            return Vec::new();
        };
        op(&mut self.doc, id);
        match self.doc.get(id).map(PositionedItem::z_index) {
            Some(z_index) if z_index != before => {
                vec![Action::ItemReordered { id: id.clone(), z_index }, Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    // --- Selection ---

    /// Select an item. Unknown ids are ignored.
    pub fn select(&mut self, id: &ItemId) -> Vec<Action> {
        if !self.doc.contains(id) || self.ui.selected.as_ref() == Some(id) {
            return Vec::new();
        }
        self.ui.selected = Some(id.clone());
        vec![Action::SelectionChanged(Some(id.clone())), Action::RenderNeeded]
    }

    /// Deselect whatever is selected.
    pub fn clear_selection(&mut self) -> Vec<Action> {
        if self.ui.selected.take().is_none() {
            return Vec::new();
        }
        vec![Action::SelectionChanged(None), Action::RenderNeeded]
    }

    // --- Gestures ---

    /// Start dragging `id`, grabbed at canvas point `pointer`.
    ///
    /// Any gesture already in progress is replaced. Unknown ids are a no-op.
    pub fn begin_drag(&mut self, id: &ItemId, pointer: Point) -> Vec<Action> {
        let Some(drag) = DragState::begin(&self.doc, id, pointer) else {
            return Vec::new();
        };
        let mut actions = self.finish_gesture();
        self.input = InputState::DraggingItem(drag);
        actions.extend(self.select(id));
        actions
    }

    /// Stop the active drag. Does nothing if no drag is active.
    pub fn end_drag(&mut self) -> Vec<Action> {
        if !matches!(self.input, InputState::DraggingItem(_)) {
            return Vec::new();
        }
        self.finish_gesture()
    }

    /// Start resizing `id` by `handle`, with the pointer at `pointer`.
    ///
    /// Any gesture already in progress is replaced. Unknown ids are a no-op.
    pub fn begin_resize(&mut self, id: &ItemId, handle: Handle, pointer: Point) -> Vec<Action> {
        let Some(resize) = ResizeState::begin(&self.doc, id, handle, pointer) else {
            return Vec::new();
        };
        let mut actions = self.finish_gesture();
        self.input = InputState::ResizingItem(resize);
        actions.extend(self.select(id));
        actions
    }

    /// Stop the active resize. Does nothing if no resize is active.
    pub fn end_resize(&mut self) -> Vec<Action> {
        if !matches!(self.input, InputState::ResizingItem(_)) {
            return Vec::new();
        }
        self.finish_gesture()
    }

    // --- Pointer events (canvas space) ---

    /// Dispatch a press: a handle of the selected item starts a resize, an
    /// item body selects it and starts a drag, empty canvas clears selection.
    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let mut actions = self.finish_gesture();
        let hit = hit_test(&self.doc, pt, self.ui.selected.as_ref());
        match hit {
            Some(hit) => match hit.part {
                HitPart::Handle(handle) => actions.extend(self.begin_resize(&hit.id, handle, pt)),
                HitPart::Body => actions.extend(self.begin_drag(&hit.id, pt)),
            },
            None => actions.extend(self.clear_selection()),
        }
        actions
    }

    /// Apply a pointer move to the active gesture, or update the hover cursor
    /// when idle.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let applied = match &self.input {
            InputState::Idle => return self.update_hover(pt),
            InputState::DraggingItem(drag) => drag.apply(&mut self.doc, pt).is_some(),
            InputState::ResizingItem(resize) => resize.apply(&mut self.doc, pt).is_some(),
        };
        if applied {
            vec![Action::RenderNeeded]
        } else {
            // The item vanished mid-gesture (e.g. removed by a re-render).
            self.input = InputState::Idle;
            Vec::new()
        }
    }

    /// Release ends whatever gesture is active, wherever the pointer is.
    pub fn on_pointer_up(&mut self, pt: Point, _button: Button) -> Vec<Action> {
        if self.input.is_idle() {
            return Vec::new();
        }
        let mut actions = self.on_pointer_move(pt);
        actions.extend(self.finish_gesture());
        actions
    }

    // --- Keyboard ---

    /// `Delete`/`Backspace` remove the selected item; `Escape` stops the
    /// gesture and clears the selection.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        match key.0.as_str() {
            "Delete" | "Backspace" => match self.ui.selected.clone() {
                Some(id) if self.input.is_idle() => self.remove_item(&id),
                _ => Vec::new(),
            },
            "Escape" => {
                let mut actions = self.finish_gesture();
                actions.extend(self.clear_selection());
                actions
            }
            _ => Vec::new(),
        }
    }

    // --- Queries ---

    /// The currently selected item, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&ItemId> {
        self.ui.selected.as_ref()
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&PositionedItem<T>> {
        self.doc.get(id)
    }

    /// The document being edited.
    #[must_use]
    pub fn document(&self) -> &CanvasDocument<T> {
        &self.doc
    }

    /// Scrollable canvas size for the current content.
    #[must_use]
    pub fn extent(&self) -> Extent {
        canvas_extent(&self.doc)
    }

    /// Render-ready snapshot of the canvas.
    #[must_use]
    pub fn scene(&self) -> Scene {
        build_scene(&self.doc, self.ui.selected.as_ref())
    }

    // --- Internals ---

    /// End the active gesture, reporting the net change it made.
    fn finish_gesture(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::DraggingItem(drag) => match self.doc.get(&drag.id) {
                Some(item) if drag.moved(&self.doc) => {
                    vec![Action::ItemMoved { id: drag.id.clone(), x: item.x(), y: item.y() }]
                }
                _ => Vec::new(),
            },
            InputState::ResizingItem(resize) => match self.doc.get(&resize.id) {
                Some(item) if resize.changed(&self.doc) => {
                    vec![Action::ItemResized { id: resize.id.clone(), geometry: item.geometry() }]
                }
                _ => Vec::new(),
            },
        }
    }

    fn update_hover(&mut self, pt: Point) -> Vec<Action> {
        let cursor = hit_test(&self.doc, pt, self.ui.selected.as_ref()).map(|hit| match hit.part {
            HitPart::Handle(handle) => handle.cursor(),
            HitPart::Body => "move",
        });
        if cursor == self.ui.cursor {
            return Vec::new();
        }
        self.ui.cursor = cursor;
        vec![Action::SetCursor(cursor.unwrap_or("default"))]
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
///
/// Pointer handlers take client coordinates straight from DOM events and
/// resolve them through the core's [`Viewport`].
pub struct Engine<T> {
    canvas: HtmlCanvasElement,
    pub core: EngineCore<T>,
    dpr: f64,
}

impl<T: Payload> Engine<T> {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, core: EngineCore::new(), dpr: 1.0 }
    }

    // --- Delegated data inputs ---

    pub fn load_document(&mut self, doc: CanvasDocument<T>) -> Vec<Action> {
        self.core.load_document(doc)
    }

    // --- Viewport ---

    /// Record where the canvas sits on the page, its scroll offset, zoom,
    /// and the device pixel ratio.
    pub fn set_viewport(&mut self, origin: ClientPoint, scroll: ClientPoint, zoom: f64, dpr: f64) {
        self.core.viewport.set_origin(origin.x, origin.y);
        self.core.viewport.set_scroll(scroll.x, scroll.y);
        self.core.viewport.set_zoom(zoom);
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, client: ClientPoint, button: i16) -> Vec<Action> {
        let pt = self.core.viewport.to_canvas(client);
        self.core.on_pointer_down(pt, Button::from_dom(button))
    }

    pub fn on_pointer_move(&mut self, client: ClientPoint) -> Vec<Action> {
        let pt = self.core.viewport.to_canvas(client);
        self.core.on_pointer_move(pt)
    }

    pub fn on_pointer_up(&mut self, client: ClientPoint, button: i16) -> Vec<Action> {
        let pt = self.core.viewport.to_canvas(client);
        self.core.on_pointer_up(pt, Button::from_dom(button))
    }

    pub fn on_key_down(&mut self, key: &str) -> Vec<Action> {
        self.core.on_key_down(&Key(key.to_owned()))
    }

    // --- Render ---

    /// Size the canvas element to the content extent and draw the scene.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let scene = self.core.scene();
        let scale = self.core.viewport.zoom * self.dpr;
        self.canvas.set_width(device_pixels(scene.extent.width, scale));
        self.canvas.set_height(device_pixels(scene.extent.height, scale));

        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        render::draw(&ctx, &scene, scale)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<&ItemId> {
        self.core.selection()
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&PositionedItem<T>> {
        self.core.item(id)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn device_pixels(css_px: i64, scale: f64) -> u32 {
    (css_px as f64 * scale).ceil().clamp(0.0, f64::from(u32::MAX)) as u32
}
