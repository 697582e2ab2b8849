//! Free-form block canvas for the CMS admin screens.
//!
//! The page builder and the org-chart editor both place rectangular items on
//! a scrollable canvas, let the administrator drag them around and resize them
//! by one of eight handles, and persist the result as a JSON layout document.
//! This crate owns that shared behaviour. Item payloads are opaque: the canvas
//! only reads and writes geometry, so the same engine serves block content and
//! org-chart nodes alike.
//!
//! The crate compiles to WebAssembly for the browser host, but everything
//! except [`render`] and [`engine::Engine`] is plain Rust and tested natively.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`doc`] | Geometry model: items, ids, payload hooks, the document store |
//! | [`viewport`] | Client-to-canvas coordinate translation (scroll, zoom) |
//! | [`drag`] | Drag controller math |
//! | [`resize`] | Resize handles and resize controller math |
//! | [`input`] | Gesture state machine and UI state |
//! | [`hit`] | Hit-testing of item bodies and resize handles |
//! | [`layout`] | Canvas extent and the render-ready scene model |
//! | [`render`] | Paints a scene onto a 2D canvas context |
//! | [`codec`] | JSON layout documents, including legacy migration |
//! | [`engine`] | [`engine::EngineCore`] façade and the browser [`engine::Engine`] |
//! | [`consts`] | Shared numeric constants (minimum sizes, margins, zoom limits) |

pub mod codec;
pub mod consts;
pub mod doc;
pub mod drag;
pub mod engine;
pub mod hit;
pub mod input;
pub mod layout;
pub mod render;
pub mod resize;
pub mod viewport;
