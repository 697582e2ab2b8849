//! Input model: mouse buttons, keys, UI state, and the gesture state machine.
//!
//! `InputState` is the single slot for the gesture in progress between
//! pointer-down and pointer-up. Because drag and resize are variants of the
//! same enum, at most one item is ever being manipulated, and starting a new
//! gesture replaces whatever was there before.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ItemId;
use crate::drag::DragState;
use crate::resize::ResizeState;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// UI state other components observe (property panels, cursor styling).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// The currently selected item, if any.
    pub selected: Option<ItemId>,
    /// CSS cursor the host should display over the canvas.
    pub cursor: Option<&'static str>,
}

/// The gesture currently in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// An item is following the pointer.
    DraggingItem(DragState),
    /// An item is being reshaped by one of its handles.
    ResizingItem(ResizeState),
}

impl InputState {
    /// The item the active gesture operates on.
    #[must_use]
    pub fn active_id(&self) -> Option<&ItemId> {
        match self {
            Self::Idle => None,
            Self::DraggingItem(drag) => Some(&drag.id),
            Self::ResizingItem(resize) => Some(&resize.id),
        }
    }

    /// Whether no gesture is in progress.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
