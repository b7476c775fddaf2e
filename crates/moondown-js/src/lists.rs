//! List and syntax-hiding helpers for the host text editor.

use moondown_core::{ListEdit, apply_edits};
use wasm_bindgen::prelude::*;

use crate::types::{
    JsBulletMarker, JsDecoration, JsListEdit, JsTextEdit, byte_to_utf16, utf16_to_byte,
};

fn to_js_value<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

fn list_edit(text: &str, edit: ListEdit) -> JsListEdit {
    let after = apply_edits(text, &edit.edits);
    JsListEdit {
        edits: edit
            .edits
            .iter()
            .map(|e| JsTextEdit::from_core(text, e))
            .collect(),
        cursor: byte_to_utf16(&after, edit.cursor),
    }
}

/// Edits that renumber every ordered list in `text`. Returns `JsTextEdit[]`.
#[wasm_bindgen(js_name = renumberOrderedLists)]
pub fn renumber_ordered_lists(text: &str) -> Result<JsValue, JsError> {
    let edits: Vec<JsTextEdit> = moondown_core::renumber_ordered_lists(text)
        .iter()
        .map(|e| JsTextEdit::from_core(text, e))
        .collect();
    to_js_value(&edits)
}

/// Enter at `cursor`; `undefined` when the cursor is not in a list item.
#[wasm_bindgen(js_name = continueList)]
pub fn continue_list(text: &str, cursor: usize) -> Option<JsListEdit> {
    let cursor = utf16_to_byte(text, cursor);
    moondown_core::continue_list(text, cursor).map(|edit| list_edit(text, edit))
}

/// Tab at `cursor`; `undefined` when the cursor is not in a list item.
#[wasm_bindgen(js_name = indentListItem)]
pub fn indent_list_item(text: &str, cursor: usize) -> Option<JsListEdit> {
    let cursor = utf16_to_byte(text, cursor);
    moondown_core::indent_list_item(text, cursor).map(|edit| list_edit(text, edit))
}

/// Shift-Tab at `cursor`; `undefined` when the cursor is not in a list item.
#[wasm_bindgen(js_name = outdentListItem)]
pub fn outdent_list_item(text: &str, cursor: usize) -> Option<JsListEdit> {
    let cursor = utf16_to_byte(text, cursor);
    moondown_core::outdent_list_item(text, cursor).map(|edit| list_edit(text, edit))
}

/// Bullet widgets for unordered list items. Returns `JsBulletMarker[]`.
#[wasm_bindgen(js_name = bulletMarkers)]
pub fn bullet_markers(text: &str) -> Result<JsValue, JsError> {
    let markers: Vec<JsBulletMarker> = moondown_core::bullet_markers(text)
        .iter()
        .map(|m| JsBulletMarker::from_core(text, m))
        .collect();
    to_js_value(&markers)
}

/// Syntax-hiding decorations for `source` with the selection at
/// `from..to`. Returns `JsDecoration[]`.
#[wasm_bindgen(js_name = syntaxDecorations)]
pub fn syntax_decorations(source: &str, from: usize, to: usize) -> Result<JsValue, JsError> {
    let selection = utf16_to_byte(source, from)..utf16_to_byte(source, to.max(from));
    let decorations: Vec<JsDecoration> = moondown_core::syntax_decorations(source, selection)
        .iter()
        .map(|d| JsDecoration::from_core(source, d))
        .collect();
    to_js_value(&decorations)
}

/// Render Markdown to HTML.
#[wasm_bindgen(js_name = markdownToHtml)]
pub fn markdown_to_html(source: &str) -> String {
    moondown_core::markdown_to_html(source)
}
