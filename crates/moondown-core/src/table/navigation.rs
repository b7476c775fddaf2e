//! Cursor movement over the grid.
//!
//! Movement is computed here as a pure step; the editor applies it, growing
//! the grid first when a step asks for a new row.

use super::grid::CellPos;

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Move to an existing cell.
    Move(CellPos),
    /// Append a row at the end of the grid, then move to the given cell in it.
    GrowAndMove(CellPos),
    /// Nothing to do; the cursor stays where it is.
    Stay,
}

/// Grid dimensions used for bounds during navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dims {
    pub rows: usize,
    pub cols: usize,
}

impl Dims {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Clamp a position into the grid.
    pub fn clamp(&self, pos: CellPos) -> CellPos {
        CellPos::new(
            pos.row.min(self.rows.saturating_sub(1)),
            pos.col.min(self.cols.saturating_sub(1)),
        )
    }
}

/// Next cell in reading order, wrapping to the first column of the next row.
pub fn next_cell(pos: CellPos, dims: Dims, auto_grow: bool) -> Step {
    let mut target = CellPos::new(pos.row, pos.col + 1);
    if target.col >= dims.cols {
        target = CellPos::new(pos.row + 1, 0);
    }
    settle(target, dims, auto_grow)
}

/// Previous cell in reading order, wrapping to the last column of the previous row.
pub fn previous_cell(pos: CellPos, dims: Dims) -> Step {
    match (pos.row, pos.col) {
        (0, 0) => Step::Stay,
        (row, 0) => Step::Move(CellPos::new(row - 1, dims.cols.saturating_sub(1))),
        (row, col) => Step::Move(CellPos::new(row, col - 1)),
    }
}

/// Same column, next row.
pub fn next_row(pos: CellPos, dims: Dims, auto_grow: bool) -> Step {
    settle(CellPos::new(pos.row + 1, pos.col), dims, auto_grow)
}

/// Same column, previous row.
pub fn previous_row(pos: CellPos) -> Step {
    if pos.row == 0 {
        Step::Stay
    } else {
        Step::Move(CellPos::new(pos.row - 1, pos.col))
    }
}

fn settle(target: CellPos, dims: Dims, auto_grow: bool) -> Step {
    if target.row < dims.rows {
        Step::Move(target)
    } else if auto_grow {
        Step::GrowAndMove(target)
    } else {
        Step::Stay
    }
}

/// Column the cursor lands on after removing column `removed`.
pub fn col_after_removal(removed: usize) -> usize {
    removed.saturating_sub(1)
}

/// Row the cursor lands on after removing row `removed`.
pub fn row_after_removal(removed: usize) -> usize {
    removed.saturating_sub(1)
}
