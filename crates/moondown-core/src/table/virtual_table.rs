//! In-memory table surface.

use std::time::Duration;

use super::grid::{CellPos, ColAlignment};
use super::surface::{CellSelection, TableSurface};

/// One cell of a [`VirtualTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualCell {
    /// Markup currently shown in the cell.
    pub html: String,
    pub alignment: ColAlignment,
}

impl VirtualCell {
    /// Text content as a DOM would report it: markup stripped, basic
    /// entities decoded.
    pub fn text(&self) -> String {
        text_content(&self.html)
    }
}

/// A headless [`TableSurface`] that records what the editor asked of it.
///
/// Focus is simulated: nothing is focused until [`focus`](Self::focus) is
/// called, matching a freshly mounted table.
#[derive(Debug, Clone, Default)]
pub struct VirtualTable {
    rows: Vec<Vec<VirtualCell>>,
    focused: Option<CellPos>,
    selection: Option<(usize, usize)>,
    /// Number of `clear` calls.
    pub clears: usize,
    /// Delays passed to `schedule_blur_check`, oldest first.
    pub scheduled_blur_checks: Vec<Duration>,
    /// Cursor positions passed to `update_edge_controls`.
    pub edge_updates: Vec<CellPos>,
    pub detached: bool,
}

impl VirtualTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn cell(&self, pos: CellPos) -> Option<&VirtualCell> {
        self.rows.get(pos.row)?.get(pos.col)
    }

    pub fn focused(&self) -> Option<CellPos> {
        self.focused
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    /// Simulate the user putting focus into a cell.
    pub fn focus(&mut self, pos: CellPos) {
        self.focused = Some(pos);
    }

    /// Simulate focus leaving the table entirely.
    pub fn blur(&mut self) {
        self.focused = None;
        self.selection = None;
    }

    /// Simulate the user replacing a cell's content by typing.
    pub fn type_text(&mut self, pos: CellPos, text: &str) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.html = escape_text(text);
        }
    }

    fn cell_mut(&mut self, pos: CellPos) -> Option<&mut VirtualCell> {
        self.rows.get_mut(pos.row)?.get_mut(pos.col)
    }
}

impl TableSurface for VirtualTable {
    fn clear(&mut self) {
        self.rows.clear();
        self.focused = None;
        self.selection = None;
        self.clears += 1;
    }

    fn push_row(&mut self) {
        self.rows.push(Vec::new());
    }

    fn push_cell(&mut self, _pos: CellPos, html: &str, alignment: ColAlignment) {
        if let Some(row) = self.rows.last_mut() {
            row.push(VirtualCell {
                html: html.to_string(),
                alignment,
            });
        }
    }

    fn set_cell_html(&mut self, pos: CellPos, html: &str) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.html = html.to_string();
        }
    }

    fn set_cell_source(&mut self, pos: CellPos, source: &str) {
        self.type_text(pos, source);
    }

    fn cell_text(&self, pos: CellPos) -> Option<String> {
        self.cell(pos).map(VirtualCell::text)
    }

    fn set_column_alignment(&mut self, col: usize, alignment: ColAlignment) {
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(col) {
                cell.alignment = alignment;
            }
        }
    }

    fn has_focus_within(&self) -> bool {
        self.focused.is_some()
    }

    fn focus_cell(&mut self, pos: CellPos, selection: CellSelection) {
        let Some(len) = self.cell(pos).map(|c| c.text().chars().count()) else {
            return;
        };
        self.focused = Some(pos);
        self.selection = Some(selection.resolve(len));
    }

    fn schedule_blur_check(&mut self, delay: Duration) {
        self.scheduled_blur_checks.push(delay);
    }

    fn update_edge_controls(&mut self, cursor: CellPos) {
        self.edge_updates.push(cursor);
    }

    fn detach(&mut self) {
        self.detached = true;
        self.focused = None;
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    if let Err(error) = markdown_weaver_escape::escape_html_body_text(&mut out, text) {
        tracing::warn!(target: "moondown::table", ?error, "html escape failed");
    }
    out
}

/// Strip tags and decode the entities HTML escaping produces.
fn text_content(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content() {
        assert_eq!(text_content("<strong>a</strong> &amp; b"), "a & b");
        assert_eq!(text_content("1 &lt; 2"), "1 < 2");
    }

    #[test]
    fn test_type_text_roundtrips_markup_characters() {
        let mut table = VirtualTable::new();
        table.push_row();
        table.push_cell(CellPos::new(0, 0), "", ColAlignment::Left);
        table.type_text(CellPos::new(0, 0), "a < b & <i>");
        assert_eq!(
            table.cell_text(CellPos::new(0, 0)).as_deref(),
            Some("a < b & <i>")
        );
    }

    #[test]
    fn test_focus_cell_resolves_selection() {
        let mut table = VirtualTable::new();
        table.push_row();
        table.push_cell(CellPos::new(0, 0), "abc", ColAlignment::Left);
        table.focus_cell(CellPos::new(0, 0), CellSelection::End);
        assert_eq!(table.selection(), Some((3, 3)));
        table.focus_cell(CellPos::new(0, 0), CellSelection::Range { from: 1, to: 9 });
        assert_eq!(table.selection(), Some((1, 3)));
        assert!(table.has_focus_within());
    }
}
