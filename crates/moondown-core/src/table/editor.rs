//! The table editor: grid, cursor and change tracking driving a surface.
//!
//! Control flow for every gesture is the same: mutate the [`Grid`], rebuild
//! the surface if the shape changed, re-select the cursor cell, then tell the
//! owner through its [`TableObserver`].

use super::config::TableEditorConfig;
use super::edge::{EdgeAction, MenuKind};
use super::grid::{CellPos, ColAlignment, Grid};
use super::navigation::{self, Dims, Step};
use super::notify::{ChangeTracker, NotificationKind, TableObserver, TableView};
use super::pipe::normalize_cell_text;
use super::surface::{CellSelection, TableSurface};
use crate::error::TableError;
use crate::render::render_inline;

/// Renders a cell's markdown source to display HTML.
pub type CellRenderer = Box<dyn Fn(&str) -> String>;

/// WYSIWYG pipe-table editor over a [`TableSurface`].
pub struct TableEditor<S: TableSurface> {
    grid: Grid,
    cursor: CellPos,
    /// Cell currently showing raw source, if any.
    editing: Option<CellPos>,
    tracker: ChangeTracker,
    attached: bool,
    surface: S,
    observer: Box<dyn TableObserver>,
    renderer: CellRenderer,
    config: TableEditorConfig,
}

impl<S: TableSurface> TableEditor<S> {
    /// Create an editor and render the grid into `surface`.
    pub fn new(
        grid: Grid,
        surface: S,
        observer: impl TableObserver + 'static,
        config: TableEditorConfig,
    ) -> Self {
        Self::with_renderer(grid, surface, observer, config, Box::new(render_inline))
    }

    /// Like [`new`](Self::new), with a custom markdown renderer for cells.
    pub fn with_renderer(
        grid: Grid,
        surface: S,
        observer: impl TableObserver + 'static,
        config: TableEditorConfig,
        renderer: CellRenderer,
    ) -> Self {
        let tracker = ChangeTracker::new(grid.serialize());
        let mut editor = Self {
            grid,
            cursor: CellPos::default(),
            editing: None,
            tracker,
            attached: true,
            surface,
            observer: Box::new(observer),
            renderer,
            config,
        };
        editor.rebuild();
        editor
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cursor(&self) -> CellPos {
        self.cursor
    }

    pub fn config(&self) -> &TableEditorConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_clean(&self) -> bool {
        self.tracker.is_clean()
    }

    pub fn row_count(&self) -> usize {
        self.grid.row_count()
    }

    pub fn col_count(&self) -> usize {
        self.grid.col_count()
    }

    /// The table as pipe-table markdown.
    pub fn get_markdown_table(&self) -> String {
        self.grid.serialize()
    }

    pub fn view(&self) -> TableView<'_> {
        TableView {
            grid: &self.grid,
            cursor: self.cursor,
            clean: self.tracker.is_clean(),
        }
    }

    /// The owner has saved the table.
    pub fn mark_clean(&mut self) {
        self.tracker.mark_clean(self.grid.serialize());
    }

    // === Surface synchronization ===

    /// Recreate the surface from the grid and restore the cursor selection.
    ///
    /// Surfaces that raise focus or blur synchronously while cells are
    /// cleared must drop those events; the editor is mutably borrowed for
    /// the whole rebuild and cannot take them.
    pub fn rebuild(&mut self) {
        let had_focus = self.surface.has_focus_within();
        // Anything still being typed belongs to the grid before its cell goes away.
        if self.commit_editing() {
            self.signal_content_change();
        }

        self.surface.clear();
        for (r, row) in self.grid.rows().iter().enumerate() {
            self.surface.push_row();
            for (c, source) in row.iter().enumerate() {
                let html = (self.renderer)(source);
                self.surface
                    .push_cell(CellPos::new(r, c), &html, self.grid.alignments()[c]);
            }
        }

        self.cursor = self.dims().clamp(self.cursor);
        tracing::trace!(
            target: "moondown::table",
            rows = self.grid.row_count(),
            cols = self.grid.col_count(),
            cursor = %self.cursor,
            "rebuilt table surface"
        );

        if had_focus {
            self.focus_cursor(CellSelection::Start);
        }
    }

    /// A cell received focus.
    pub fn on_cell_focus(&mut self, pos: CellPos) {
        if !self.accepts_events("focus") || self.grid.check(pos).is_err() {
            return;
        }

        if let Some(previous) = self.editing.filter(|p| *p != pos) {
            // The blur for the previous cell was swallowed; commit it now.
            self.editing = None;
            if self.commit_cell(previous) {
                self.signal_content_change();
            }
        }

        if self.editing != Some(pos) {
            let source = self.grid.rows()[pos.row][pos.col].clone();
            self.surface.set_cell_source(pos, &source);
            self.editing = Some(pos);
        }
        self.cursor = pos;
        self.surface.update_edge_controls(pos);
    }

    /// A cell lost focus.
    pub fn on_cell_blur(&mut self, pos: CellPos) {
        if !self.accepts_events("blur") {
            return;
        }

        // Cells that are not showing source hold rendered HTML whose text is
        // not the markdown; reading it back would corrupt the cell.
        if self.editing == Some(pos) {
            self.editing = None;
            if self.commit_cell(pos) {
                self.signal_content_change();
            }
        }

        self.surface
            .schedule_blur_check(self.config.blur_settle_delay());
    }

    /// Deferred part of a blur: if focus did not land on another cell, the
    /// whole table has lost focus.
    pub fn check_table_blur(&mut self) {
        if !self.attached {
            return;
        }
        if !self.surface.has_focus_within() {
            self.notify(NotificationKind::Blur);
        }
    }

    /// Focus the cursor cell, but only if focus is already inside the table.
    pub fn select_cell(&mut self, selection: CellSelection) {
        if !self.surface.has_focus_within() {
            return;
        }
        self.focus_cursor(selection);
    }

    fn focus_cursor(&mut self, selection: CellSelection) {
        let pos = self.cursor;
        if let Some(previous) = self.editing.filter(|p| *p != pos) {
            self.editing = None;
            if self.commit_cell(previous) {
                self.signal_content_change();
            }
        }

        if self.editing != Some(pos) {
            let source = self.grid.rows()[pos.row][pos.col].clone();
            self.surface.set_cell_source(pos, &source);
            self.editing = Some(pos);
        }
        self.surface.focus_cell(pos, selection);
        self.surface.update_edge_controls(pos);
    }

    fn accepts_events(&self, kind: &str) -> bool {
        if !self.attached {
            tracing::trace!(target: "moondown::table", kind, "ignoring cell event after detach");
            return false;
        }
        true
    }

    /// Write the editing cell's text back into the grid.
    fn commit_editing(&mut self) -> bool {
        match self.editing.take() {
            Some(pos) => self.commit_cell(pos),
            None => false,
        }
    }

    /// Read a cell's text into the grid and show it rendered again.
    ///
    /// Returns whether the cell's source changed.
    fn commit_cell(&mut self, pos: CellPos) -> bool {
        let Some(text) = self.surface.cell_text(pos) else {
            return false;
        };
        let text = normalize_cell_text(&text);
        let changed = match self.grid.cell_at(pos) {
            Ok(old) => old != text,
            Err(_) => return false,
        };

        let html = (self.renderer)(&text);
        self.surface.set_cell_html(pos, &html);
        if changed {
            if let Err(e) = self.grid.set_cell(pos, text) {
                tracing::warn!(target: "moondown::table", error = %e, cell = %pos, "cell commit failed");
                return false;
            }
            tracing::debug!(target: "moondown::table", cell = %pos, "committed cell edit");
        }
        changed
    }

    // === Navigation ===

    /// Move to the next cell, wrapping rows. Past the last cell a new row is
    /// appended when `auto_grow` is set; otherwise nothing happens.
    ///
    /// Returns whether the cursor moved.
    pub fn next_cell(&mut self, auto_grow: bool) -> Result<bool, TableError> {
        let step = navigation::next_cell(self.cursor, self.dims(), auto_grow);
        self.apply_step(step)
    }

    /// Move to the previous cell, wrapping rows. No-op at the first cell.
    pub fn previous_cell(&mut self) -> Result<bool, TableError> {
        let step = navigation::previous_cell(self.cursor, self.dims());
        self.apply_step(step)
    }

    /// Move down one row in the same column, growing the grid if asked.
    pub fn next_row(&mut self, auto_grow: bool) -> Result<bool, TableError> {
        let step = navigation::next_row(self.cursor, self.dims(), auto_grow);
        self.apply_step(step)
    }

    /// Move up one row in the same column. No-op in the first row.
    pub fn previous_row(&mut self) -> Result<bool, TableError> {
        let step = navigation::previous_row(self.cursor);
        self.apply_step(step)
    }

    fn apply_step(&mut self, step: Step) -> Result<bool, TableError> {
        match step {
            Step::Stay => return Ok(false),
            Step::Move(pos) => self.cursor = pos,
            Step::GrowAndMove(pos) => {
                // Navigation past the end adds a row as a side effect.
                self.commit_before_restructure();
                self.grid.insert_row(self.grid.row_count())?;
                self.cursor = pos;
                self.rebuild();
                self.signal_content_change();
            }
        }

        self.select_cell(CellSelection::End);
        self.surface.update_edge_controls(self.cursor);
        self.notify(NotificationKind::CellChange);
        Ok(true)
    }

    fn dims(&self) -> Dims {
        Dims::new(self.grid.row_count(), self.grid.col_count())
    }

    // === Structure ===

    fn commit_before_restructure(&mut self) {
        if self.commit_editing() {
            self.signal_content_change();
        }
    }

    /// Insert an empty column left of the cursor; the cursor stays on it.
    pub fn prepend_col(&mut self) -> Result<(), TableError> {
        self.commit_before_restructure();
        self.grid.insert_column(self.cursor.col, ColAlignment::Left)?;
        self.rebuild();
        self.signal_content_change();
        Ok(())
    }

    /// Insert an empty column right of the cursor and move into it.
    pub fn append_col(&mut self) -> Result<(), TableError> {
        self.commit_before_restructure();
        self.grid
            .insert_column(self.cursor.col + 1, ColAlignment::Left)?;
        self.rebuild();
        self.next_cell(true)?;
        self.signal_content_change();
        Ok(())
    }

    /// Insert an empty row above the cursor; the cursor stays on it.
    pub fn prepend_row(&mut self) -> Result<(), TableError> {
        self.commit_before_restructure();
        self.grid.insert_row(self.cursor.row)?;
        self.rebuild();
        self.signal_content_change();
        Ok(())
    }

    /// Insert an empty row below the cursor and move into it.
    pub fn append_row(&mut self) -> Result<(), TableError> {
        self.commit_before_restructure();
        self.grid.insert_row(self.cursor.row + 1)?;
        self.rebuild();
        self.next_row(true)?;
        self.signal_content_change();
        Ok(())
    }

    /// Remove the cursor row. No-op (returns false) for a single-row table.
    pub fn pluck_row(&mut self) -> Result<bool, TableError> {
        if self.grid.row_count() == 1 {
            return Ok(false);
        }
        self.commit_before_restructure();
        let removed = self.cursor.row;
        self.grid.remove_row(removed)?;
        self.cursor.row = navigation::row_after_removal(removed);
        self.rebuild();
        self.signal_content_change();
        self.notify(NotificationKind::CellChange);
        Ok(true)
    }

    /// Remove the cursor column. No-op (returns false) for a single-column table.
    pub fn pluck_col(&mut self) -> Result<bool, TableError> {
        if self.grid.col_count() == 1 {
            return Ok(false);
        }
        self.commit_before_restructure();
        let removed = self.cursor.col;
        self.grid.remove_column(removed)?;
        self.cursor.col = navigation::col_after_removal(removed);
        self.rebuild();
        self.signal_content_change();
        self.notify(NotificationKind::CellChange);
        Ok(true)
    }

    /// Set the alignment of `col`, or of the cursor column when `None`.
    pub fn change_col_alignment(
        &mut self,
        alignment: ColAlignment,
        col: Option<usize>,
    ) -> Result<(), TableError> {
        let col = col.unwrap_or(self.cursor.col);
        self.grid.set_alignment(col, alignment)?;
        self.surface.set_column_alignment(col, alignment);
        self.signal_content_change();
        self.notify(NotificationKind::CellChange);
        Ok(())
    }

    /// Run an edge-menu action.
    ///
    /// Returns the sub-menu to open, if the action asks for one. Every other
    /// action is followed by a save intent.
    pub fn run_edge_action(&mut self, action: EdgeAction) -> Result<Option<MenuKind>, TableError> {
        tracing::debug!(target: "moondown::table", ?action, cursor = %self.cursor, "edge action");
        match action {
            EdgeAction::OpenAlignmentMenu => return Ok(Some(MenuKind::Alignment)),
            EdgeAction::InsertColumnLeft => self.prepend_col()?,
            EdgeAction::InsertColumnRight => self.append_col()?,
            EdgeAction::DeleteColumn => {
                self.pluck_col()?;
            }
            EdgeAction::Align(alignment) => self.change_col_alignment(alignment, None)?,
            EdgeAction::InsertRowAbove => self.prepend_row()?,
            EdgeAction::InsertRowBelow => self.append_row()?,
            EdgeAction::DeleteRow => {
                self.pluck_row()?;
            }
        }
        if action.requests_save() {
            self.notify(NotificationKind::SaveIntent);
        }
        Ok(None)
    }

    // === Lifecycle ===

    /// Detach from the surface. Pending blur checks become no-ops.
    pub fn destroy(&mut self) {
        if !self.attached {
            return;
        }
        if self.commit_editing() {
            self.signal_content_change();
        }
        self.attached = false;
        self.surface.detach();
        tracing::debug!(target: "moondown::table", "table editor detached");
    }

    // === Notification ===

    fn signal_content_change(&mut self) {
        if self.tracker.observe(self.grid.serialize()) {
            self.notify(NotificationKind::Change);
        }
    }

    fn notify(&mut self, kind: NotificationKind) {
        let view = TableView {
            grid: &self.grid,
            cursor: self.cursor,
            clean: self.tracker.is_clean(),
        };
        match kind {
            NotificationKind::Change => self.observer.on_change(&view),
            NotificationKind::Blur => self.observer.on_blur(&view),
            NotificationKind::CellChange => self.observer.on_cell_change(&view),
            NotificationKind::SaveIntent => self.observer.on_save_intent(&view),
        }
    }
}
