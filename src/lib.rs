//! CMS admin layout editing: the backend side of the free-form canvas.
//!
//! The [`canvas`] crate owns geometry, gestures and the JSON layout codec.
//! This crate connects it to the CMS:
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Typed configuration from environment variables |
//! | [`error`] | Error types for configuration, storage and the local cache |
//! | [`format`] | Binds a payload type to its stored document shape |
//! | [`page`] | Page-builder blocks |
//! | [`orgchart`] | Org-chart nodes and edges |
//! | [`store`] | Where layouts live on the backend, and the HTTP client for it |
//! | [`cache`] | Last-known-good copy of each layout on local disk |
//! | [`session`] | One editing session: load fallback, dirty tracking, save state |

pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod orgchart;
pub mod page;
pub mod session;
pub mod store;
