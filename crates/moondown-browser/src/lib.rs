//! Browser DOM layer for the moondown table editor.
//!
//! This crate provides the web-sys side of the editor and assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `table`: `DomTable`, the `TableSurface` over an `HTMLTableElement`
//! - `handle`: shared ownership, event dispatch and owner callbacks
//! - `edge_ui`: floating row/column trigger buttons and their menus
//! - `selection`: caret placement inside a cell
//! - `widgets`: decoration widgets as DOM nodes, with the image cache
//!
//! # Re-exports
//!
//! This crate re-exports `moondown-core` for convenience, so consumers
//! only need to depend on `moondown-browser`.

// Re-export core crate
pub use moondown_core;
pub use moondown_core::*;

pub mod edge_ui;
pub mod handle;
pub mod selection;
pub mod table;
pub mod widgets;

pub use handle::{Callback, Container, TableCallbacks, TableHandle};
pub use table::DomTable;
pub use widgets::widget_to_dom;

use wasm_bindgen::JsValue;
use web_sys::HtmlElement;

/// Convert a failed DOM call into a [`TableError`].
pub(crate) fn dom_err(context: &str, err: JsValue) -> TableError {
    TableError::Platform(format!("{context} failed: {err:?}"))
}

/// Set an inline style property. Failures are logged, not returned.
pub(crate) fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = element.style().set_property(property, value) {
        tracing::warn!(target: "moondown::dom", property, value, error = ?e, "set_property failed");
    }
}
