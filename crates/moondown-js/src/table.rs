//! JsTableEditor - the table editor wrapper for JavaScript.

use std::str::FromStr;

use js_sys::{Function, Reflect};
use moondown_browser::{Callback, Container, DomTable, TableCallbacks, TableHandle};
use moondown_core::table::{
    CellSelection, ColAlignment, Grid, TableEditorConfig, TableNotification,
};
use moondown_core::{TableEditor, TableError, parse_pipe_table};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, HtmlTableElement};

use crate::types::JsTableNotification;

fn js_err(e: TableError) -> JsError {
    JsError::new(&e.to_string())
}

fn get(options: &JsValue, key: &str) -> JsValue {
    if !options.is_object() {
        return JsValue::UNDEFINED;
    }
    Reflect::get(options, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

/// Wrap an options callback. It is called as `callback(editor, notification)`
/// with a `TableEditor` for the same table.
fn callback(options: &JsValue, key: &str) -> Option<Callback> {
    let function = get(options, key).dyn_into::<Function>().ok()?;
    Some(Box::new(
        move |handle: &TableHandle, notification: &TableNotification| {
            let editor = JsValue::from(JsTableEditor {
                handle: handle.clone(),
            });
            let payload =
                match serde_wasm_bindgen::to_value(&JsTableNotification::from(notification)) {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::warn!(target: "moondown::js", error = %e, "failed to serialize notification");
                        JsValue::UNDEFINED
                    }
                };
            if let Err(e) = function.call2(&JsValue::NULL, &editor, &payload) {
                tracing::warn!(target: "moondown::js", error = ?e, "table callback threw");
            }
        },
    ))
}

fn container(options: &JsValue) -> Container {
    let value = get(options, "container");
    if let Some(selector) = value.as_string() {
        Container::Selector(selector)
    } else if let Ok(element) = value.dyn_into::<HtmlElement>() {
        Container::Element(element)
    } else {
        Container::Body
    }
}

fn config(options: &JsValue) -> Result<TableEditorConfig, JsError> {
    if !options.is_object() {
        return Ok(TableEditorConfig::default());
    }
    serde_wasm_bindgen::from_value(options.clone())
        .map_err(|e| JsError::new(&format!("Invalid table options: {}", e)))
}

fn selection(value: &JsValue) -> Result<CellSelection, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(CellSelection::End);
    }
    if let Some(place) = value.as_string() {
        return match place.as_str() {
            "start" => Ok(CellSelection::Start),
            "end" => Ok(CellSelection::End),
            other => Err(JsError::new(&format!("Unknown cell selection: {}", other))),
        };
    }
    let bound = |key| {
        get(value, key)
            .as_f64()
            .filter(|n| *n >= 0.0)
            .map(|n| n as usize)
            .ok_or_else(|| JsError::new(&format!("Cell selection needs a numeric `{}`", key)))
    };
    Ok(CellSelection::Range {
        from: bound("from")?,
        to: bound("to")?,
    })
}

/// An editable pipe table exposed to JavaScript.
///
/// The `<table>` element is available as `domElement` and must be inserted
/// into the page by the caller. Callbacks in the options object receive the
/// editor, so `onChange(editor)` can read `editor.getMarkdownTable()`, and a
/// `JsTableNotification` snapshot as the second argument.
#[wasm_bindgen(js_name = TableEditor)]
pub struct JsTableEditor {
    handle: TableHandle,
}

impl JsTableEditor {
    fn mount(grid: Grid, options: &JsValue) -> Result<JsTableEditor, JsError> {
        let callbacks = TableCallbacks {
            on_change: callback(options, "onChange"),
            on_blur: callback(options, "onBlur"),
            on_cell_change: callback(options, "onCellChange"),
            on_save_intent: callback(options, "saveIntent"),
        };
        let handle = TableHandle::mount(grid, container(options), callbacks, config(options)?)
            .map_err(js_err)?;
        Ok(Self { handle })
    }

    fn run<R>(
        &self,
        f: impl FnOnce(&mut TableEditor<DomTable>) -> Result<R, TableError>,
    ) -> Result<R, JsError> {
        self.handle.try_with_editor(f).map_err(js_err)
    }
}

#[wasm_bindgen(js_class = TableEditor)]
impl JsTableEditor {
    /// Create an editor from a table AST (`string[][]`, header row first) and
    /// one alignment per column (`"left" | "center" | "right"`).
    #[wasm_bindgen(constructor)]
    pub fn new(
        ast: JsValue,
        alignments: Vec<String>,
        options: JsValue,
    ) -> Result<JsTableEditor, JsError> {
        let rows: Vec<Vec<String>> = serde_wasm_bindgen::from_value(ast)
            .map_err(|e| JsError::new(&format!("Invalid table AST: {}", e)))?;
        let alignments = alignments
            .iter()
            .map(|a| ColAlignment::from_str(a))
            .collect::<Result<Vec<_>, _>>()
            .map_err(js_err)?;
        let grid = Grid::new(rows, alignments).map_err(js_err)?;
        Self::mount(grid, &options)
    }

    /// Create an editor from pipe-table Markdown.
    #[wasm_bindgen(js_name = fromMarkdown)]
    pub fn from_markdown(source: &str, options: JsValue) -> Result<JsTableEditor, JsError> {
        let grid = parse_pipe_table(source).map_err(js_err)?;
        Self::mount(grid, &options)
    }

    // === Content access ===

    #[wasm_bindgen(getter, js_name = domElement)]
    pub fn dom_element(&self) -> Result<HtmlTableElement, JsError> {
        self.handle
            .dom_element()
            .ok_or_else(|| JsError::new("table editor is busy"))
    }

    #[wasm_bindgen(js_name = getMarkdownTable)]
    pub fn get_markdown_table(&self) -> Result<String, JsError> {
        self.run(|editor| Ok(editor.get_markdown_table()))
    }

    #[wasm_bindgen(js_name = markClean)]
    pub fn mark_clean(&self) -> Result<(), JsError> {
        self.run(|editor| {
            editor.mark_clean();
            Ok(())
        })
    }

    #[wasm_bindgen(getter, js_name = isClean)]
    pub fn is_clean(&self) -> Result<bool, JsError> {
        self.run(|editor| Ok(editor.is_clean()))
    }

    #[wasm_bindgen(getter)]
    pub fn rows(&self) -> Result<usize, JsError> {
        self.run(|editor| Ok(editor.row_count()))
    }

    #[wasm_bindgen(getter)]
    pub fn cols(&self) -> Result<usize, JsError> {
        self.run(|editor| Ok(editor.col_count()))
    }

    // === Navigation ===

    /// Returns whether the cursor moved. `automaticallyAddRows` defaults to true.
    #[wasm_bindgen(js_name = nextCell)]
    pub fn next_cell(&self, automatically_add_rows: Option<bool>) -> Result<bool, JsError> {
        self.run(|editor| editor.next_cell(automatically_add_rows.unwrap_or(true)))
    }

    #[wasm_bindgen(js_name = previousCell)]
    pub fn previous_cell(&self) -> Result<bool, JsError> {
        self.run(|editor| editor.previous_cell())
    }

    #[wasm_bindgen(js_name = nextRow)]
    pub fn next_row(&self, automatically_add_rows: Option<bool>) -> Result<bool, JsError> {
        self.run(|editor| editor.next_row(automatically_add_rows.unwrap_or(true)))
    }

    #[wasm_bindgen(js_name = previousRow)]
    pub fn previous_row(&self) -> Result<bool, JsError> {
        self.run(|editor| editor.previous_row())
    }

    /// Focus the cursor cell if focus is inside the table.
    ///
    /// `place` is `"start"`, `"end"` (default) or `{ from, to }`.
    #[wasm_bindgen(js_name = selectCell)]
    pub fn select_cell(&self, place: JsValue) -> Result<(), JsError> {
        let selection = selection(&place)?;
        self.run(|editor| {
            editor.select_cell(selection);
            Ok(())
        })
    }

    // === Structure ===

    #[wasm_bindgen(js_name = prependCol)]
    pub fn prepend_col(&self) -> Result<(), JsError> {
        self.run(|editor| editor.prepend_col())
    }

    #[wasm_bindgen(js_name = appendCol)]
    pub fn append_col(&self) -> Result<(), JsError> {
        self.run(|editor| editor.append_col())
    }

    #[wasm_bindgen(js_name = prependRow)]
    pub fn prepend_row(&self) -> Result<(), JsError> {
        self.run(|editor| editor.prepend_row())
    }

    #[wasm_bindgen(js_name = appendRow)]
    pub fn append_row(&self) -> Result<(), JsError> {
        self.run(|editor| editor.append_row())
    }

    /// Remove the cursor row. Returns false if it is the only row.
    #[wasm_bindgen(js_name = pluckRow)]
    pub fn pluck_row(&self) -> Result<bool, JsError> {
        self.run(|editor| editor.pluck_row())
    }

    /// Remove the cursor column. Returns false if it is the only column.
    #[wasm_bindgen(js_name = pluckCol)]
    pub fn pluck_col(&self) -> Result<bool, JsError> {
        self.run(|editor| editor.pluck_col())
    }

    /// Align a column; `col` defaults to the cursor column.
    #[wasm_bindgen(js_name = changeColAlignment)]
    pub fn change_col_alignment(&self, alignment: &str, col: Option<usize>) -> Result<(), JsError> {
        let alignment = ColAlignment::from_str(alignment).map_err(js_err)?;
        self.run(|editor| editor.change_col_alignment(alignment, col))
    }

    // === Lifecycle ===

    /// Remove listeners, edge buttons and any open menu.
    #[wasm_bindgen]
    pub fn destroy(&self) {
        self.handle.destroy();
    }
}
