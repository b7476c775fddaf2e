//! `TableSurface` over a live `<table>` element.

use std::rc::Weak;
use std::time::Duration;

use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use moondown_core::table::{
    CellPos, CellSelection, ColAlignment, EdgeGeometry, Point, Rect, TableEditorConfig,
    TableSurface, in_edge_zone, layout_edge_buttons,
};
use wasm_bindgen::JsCast;
use web_sys::{DomRect, HtmlElement, HtmlTableElement, HtmlTableRowElement, MouseEvent};

use crate::edge_ui::{EdgeButtons, EdgeControls};
use crate::handle::TableShared;
use crate::selection::select_cell_contents;
use crate::set_style;

fn to_rect(rect: &DomRect) -> Rect {
    Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

/// The DOM side of a table editor.
pub struct DomTable {
    table: HtmlTableElement,
    container: HtmlElement,
    rows: Vec<HtmlTableRowElement>,
    cells: Vec<Vec<HtmlElement>>,
    /// Focus/blur listeners of the current cells; replaced on every rebuild.
    cell_listeners: Vec<EventListener>,
    container_listeners: Vec<EventListener>,
    edge: EdgeControls,
    shared: Weak<TableShared>,
    config: TableEditorConfig,
}

impl DomTable {
    pub(crate) fn new(
        table: HtmlTableElement,
        container: HtmlElement,
        buttons: EdgeButtons,
        shared: Weak<TableShared>,
        config: TableEditorConfig,
    ) -> Self {
        let edge = EdgeControls::new(buttons, shared.clone(), config.clone());
        let container_listeners = ["mouseover", "mousedown"]
            .into_iter()
            .map(|kind| {
                let shared = shared.clone();
                EventListener::new(&container, kind, move |event| {
                    let Some(event) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    let pointer = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));
                    if let Some(shared) = shared.upgrade() {
                        shared.with_editor(|editor| {
                            let cursor = editor.cursor();
                            editor.surface_mut().pointer_moved(pointer, cursor);
                        });
                    }
                })
            })
            .collect();

        Self {
            table,
            container,
            rows: Vec::new(),
            cells: Vec::new(),
            cell_listeners: Vec::new(),
            container_listeners,
            edge,
            shared,
            config,
        }
    }

    pub fn element(&self) -> &HtmlTableElement {
        &self.table
    }

    pub fn cell(&self, pos: CellPos) -> Option<&HtmlElement> {
        self.cells.get(pos.row)?.get(pos.col)
    }

    pub fn edge_controls(&self) -> &EdgeControls {
        &self.edge
    }

    /// Show or hide the edge buttons for a pointer position.
    pub fn pointer_moved(&mut self, pointer: Point, cursor: CellPos) {
        let table = to_rect(&self.table.get_bounding_client_rect());
        if in_edge_zone(table, pointer, &self.config) {
            self.edge.show();
            self.position_edge_controls(cursor);
        } else {
            self.edge.hide();
        }
    }

    fn edge_geometry(&self, cursor: CellPos) -> Option<EdgeGeometry> {
        let cell = to_rect(&self.cell(cursor)?.get_bounding_client_rect());
        let row = to_rect(&self.rows.get(cursor.row)?.get_bounding_client_rect());
        let column_top = self
            .cells
            .iter()
            .filter_map(|r| r.get(cursor.col))
            .map(|c| c.get_bounding_client_rect().top())
            .fold(f64::INFINITY, f64::min);
        let table = self.table.get_bounding_client_rect();
        Some(EdgeGeometry {
            cell,
            row,
            column: Rect::new(cell.x, column_top, cell.width, table.height()),
            container: to_rect(&self.container.get_bounding_client_rect()),
        })
    }

    fn position_edge_controls(&self, cursor: CellPos) {
        if let Some(geometry) = self.edge_geometry(cursor) {
            self.edge.apply(layout_edge_buttons(&geometry, &self.config));
        }
    }

    fn listen(&mut self, cell: &HtmlElement, pos: CellPos) {
        let shared = self.shared.clone();
        self.cell_listeners
            .push(EventListener::new(cell, "focus", move |_| {
                if let Some(shared) = shared.upgrade() {
                    shared.with_editor(|editor| editor.on_cell_focus(pos));
                }
            }));
        let shared = self.shared.clone();
        self.cell_listeners
            .push(EventListener::new(cell, "blur", move |_| {
                if let Some(shared) = shared.upgrade() {
                    shared.with_editor(|editor| editor.on_cell_blur(pos));
                }
            }));
    }
}

impl TableSurface for DomTable {
    fn clear(&mut self) {
        self.table.set_inner_html("");
        self.rows.clear();
        self.cells.clear();
        self.cell_listeners.clear();
    }

    fn push_row(&mut self) {
        match self
            .table
            .insert_row()
            .map(|row| row.unchecked_into::<HtmlTableRowElement>())
        {
            Ok(row) => {
                self.rows.push(row);
                self.cells.push(Vec::new());
            }
            Err(e) => tracing::warn!(target: "moondown::table", error = ?e, "insert_row failed"),
        }
    }

    fn push_cell(&mut self, pos: CellPos, html: &str, alignment: ColAlignment) {
        let Some(row) = self.rows.last() else {
            return;
        };
        let cell = match row.insert_cell() {
            Ok(cell) => cell,
            Err(e) => {
                tracing::warn!(target: "moondown::table", error = ?e, cell = %pos, "insert_cell failed");
                return;
            }
        };
        cell.set_inner_html(html);
        set_style(&cell, "text-align", alignment.as_str());
        if let Err(e) = cell.set_attribute("contenteditable", "true") {
            tracing::warn!(target: "moondown::table", error = ?e, cell = %pos, "cell is not editable");
        }
        self.listen(&cell, pos);
        if let Some(cells) = self.cells.last_mut() {
            cells.push(cell);
        }
    }

    fn set_cell_html(&mut self, pos: CellPos, html: &str) {
        if let Some(cell) = self.cell(pos) {
            cell.set_inner_html(html);
        }
    }

    fn set_cell_source(&mut self, pos: CellPos, source: &str) {
        if let Some(cell) = self.cell(pos) {
            cell.set_text_content(Some(source));
        }
    }

    fn cell_text(&self, pos: CellPos) -> Option<String> {
        self.cell(pos).map(|cell| cell.text_content().unwrap_or_default())
    }

    fn set_column_alignment(&mut self, col: usize, alignment: ColAlignment) {
        for cell in self.cells.iter().filter_map(|row| row.get(col)) {
            set_style(cell, "text-align", alignment.as_str());
        }
    }

    fn has_focus_within(&self) -> bool {
        gloo_utils::document()
            .active_element()
            .is_some_and(|active| self.table.contains(Some(&active)))
    }

    fn focus_cell(&mut self, pos: CellPos, selection: CellSelection) {
        let Some(cell) = self.cell(pos) else {
            return;
        };
        if let Err(e) = cell.focus() {
            tracing::warn!(target: "moondown::table", error = ?e, cell = %pos, "focus failed");
            return;
        }
        if let Err(e) = select_cell_contents(cell, selection) {
            tracing::debug!(target: "moondown::table", error = %e, cell = %pos, "could not place caret");
        }
    }

    fn schedule_blur_check(&mut self, delay: Duration) {
        let shared = self.shared.clone();
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || {
            if let Some(shared) = shared.upgrade() {
                shared.with_editor(|editor| editor.check_table_blur());
            }
        })
        .forget();
    }

    fn update_edge_controls(&mut self, cursor: CellPos) {
        self.position_edge_controls(cursor);
    }

    fn detach(&mut self) {
        self.cell_listeners.clear();
        self.container_listeners.clear();
        self.edge.teardown();
        for row in &self.cells {
            for cell in row {
                if let Err(e) = cell.remove_attribute("contenteditable") {
                    tracing::warn!(target: "moondown::table", error = ?e, "cell stays editable after detach");
                }
            }
        }
    }
}
