//! Platform abstraction for the table's visible element.
//!
//! The editor drives a `TableSurface` the way a DOM table is driven: clear it,
//! append rows and cells, swap a cell between rendered HTML and raw source,
//! move focus. The browser implementation wraps an `HTMLTableElement`; the
//! in-memory [`VirtualTable`](super::VirtualTable) backs tests and headless use.

use std::time::Duration;

use super::grid::{CellPos, ColAlignment};

/// Where to put the caret when a cell is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellSelection {
    /// Caret before the first character.
    Start,
    /// Caret after the last character.
    #[default]
    End,
    /// Select the character range `from..to` (clamped to the content).
    Range { from: usize, to: usize },
}

impl CellSelection {
    /// Resolve to a character range for content of length `len`.
    pub fn resolve(&self, len: usize) -> (usize, usize) {
        match *self {
            CellSelection::Start => (0, 0),
            CellSelection::End => (len, len),
            CellSelection::Range { from, to } => {
                let from = from.min(len);
                (from, to.clamp(from, len))
            }
        }
    }
}

/// The visible, editable table the editor keeps in sync with its grid.
pub trait TableSurface {
    /// Remove every row and cell.
    ///
    /// On real hosts this can emit focus-loss events for a focused cell; the
    /// editor ignores events while it is rebuilding.
    fn clear(&mut self);

    /// Start a new row at the bottom of the table.
    fn push_row(&mut self);

    /// Append an editable cell to the last row, showing `html`.
    ///
    /// Implementations attach their focus and blur handlers here.
    fn push_cell(&mut self, pos: CellPos, html: &str, alignment: ColAlignment);

    /// Show rendered HTML in a cell.
    fn set_cell_html(&mut self, pos: CellPos, html: &str);

    /// Show raw source text in a cell for direct editing.
    fn set_cell_source(&mut self, pos: CellPos, source: &str);

    /// Current text content of a cell, or `None` if the cell does not exist.
    fn cell_text(&self, pos: CellPos) -> Option<String>;

    /// Restyle every cell of a column.
    fn set_column_alignment(&mut self, col: usize, alignment: ColAlignment);

    /// Whether any cell of the table currently holds focus.
    fn has_focus_within(&self) -> bool;

    /// Focus a cell and place the caret or selection.
    fn focus_cell(&mut self, pos: CellPos, selection: CellSelection);

    /// Arrange for [`TableEditor::check_table_blur`](super::TableEditor::check_table_blur)
    /// to run after `delay`.
    fn schedule_blur_check(&mut self, delay: Duration);

    /// Reposition (or hide) the edge-action buttons for the cursor cell.
    fn update_edge_controls(&mut self, cursor: CellPos);

    /// Drop event handlers and floating controls.
    fn detach(&mut self);
}
