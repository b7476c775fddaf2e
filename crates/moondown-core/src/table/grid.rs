//! The grid model: cell source text plus per-column alignment.
//!
//! The grid is always rectangular and never smaller than 1x1. Removing the last
//! remaining row or column is a no-op rather than an error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// A (row, column) coordinate inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl ColAlignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColAlignment::Left => "left",
            ColAlignment::Center => "center",
            ColAlignment::Right => "right",
        }
    }

    /// Separator-row token for this alignment.
    pub fn separator(&self) -> &'static str {
        match self {
            ColAlignment::Left => "---",
            ColAlignment::Center => ":---:",
            ColAlignment::Right => "---:",
        }
    }
}

impl fmt::Display for ColAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColAlignment {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(ColAlignment::Left),
            "center" => Ok(ColAlignment::Center),
            "right" => Ok(ColAlignment::Right),
            other => Err(TableError::InvalidAlignment(other.to_string())),
        }
    }
}

/// Rows of cell source strings with one alignment per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
    alignments: Vec<ColAlignment>,
}

impl Grid {
    /// Build a grid from a parsed table AST.
    ///
    /// The first row decides the column count. Shorter rows are padded with
    /// empty cells, longer rows truncated, and the alignment list is padded
    /// with `Left` or truncated to match.
    pub fn new(
        mut rows: Vec<Vec<String>>,
        mut alignments: Vec<ColAlignment>,
    ) -> Result<Self, TableError> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        if columns == 0 {
            return Err(TableError::EmptyTable);
        }

        for (index, row) in rows.iter_mut().enumerate() {
            if row.len() != columns {
                tracing::debug!(
                    target: "moondown::table",
                    row = index,
                    len = row.len(),
                    columns,
                    "normalizing ragged table row"
                );
                row.resize(columns, String::new());
            }
        }
        alignments.resize(columns, ColAlignment::Left);

        Ok(Self { rows, alignments })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.alignments.len()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn alignments(&self) -> &[ColAlignment] {
        &self.alignments
    }

    /// Check that a position lies inside the grid.
    pub fn check(&self, pos: CellPos) -> Result<(), TableError> {
        if pos.row >= self.row_count() {
            return Err(TableError::RowOutOfBounds {
                index: pos.row,
                rows: self.row_count(),
            });
        }
        self.check_col(pos.col)
    }

    fn check_col(&self, col: usize) -> Result<(), TableError> {
        if col >= self.col_count() {
            return Err(TableError::ColumnOutOfBounds {
                index: col,
                columns: self.col_count(),
            });
        }
        Ok(())
    }

    fn check_row(&self, row: usize) -> Result<(), TableError> {
        if row >= self.row_count() {
            return Err(TableError::RowOutOfBounds {
                index: row,
                rows: self.row_count(),
            });
        }
        Ok(())
    }

    /// Source text of a cell.
    pub fn cell_at(&self, pos: CellPos) -> Result<&str, TableError> {
        self.check(pos)?;
        Ok(&self.rows[pos.row][pos.col])
    }

    /// Replace the source text of a cell.
    ///
    /// Does not render or notify; callers decide when the change is signalled.
    pub fn set_cell(&mut self, pos: CellPos, text: impl Into<String>) -> Result<(), TableError> {
        self.check(pos)?;
        self.rows[pos.row][pos.col] = text.into();
        Ok(())
    }

    pub fn alignment(&self, col: usize) -> Result<ColAlignment, TableError> {
        self.check_col(col)?;
        Ok(self.alignments[col])
    }

    pub fn set_alignment(&mut self, col: usize, alignment: ColAlignment) -> Result<(), TableError> {
        self.check_col(col)?;
        self.alignments[col] = alignment;
        Ok(())
    }

    /// Insert an empty column before `at`. `at == col_count()` appends.
    pub fn insert_column(&mut self, at: usize, alignment: ColAlignment) -> Result<(), TableError> {
        if at > self.col_count() {
            return Err(TableError::ColumnOutOfBounds {
                index: at,
                columns: self.col_count(),
            });
        }
        for row in &mut self.rows {
            row.insert(at, String::new());
        }
        self.alignments.insert(at, alignment);
        Ok(())
    }

    /// Remove the column at `at`. Returns `Ok(false)` if it is the only column.
    pub fn remove_column(&mut self, at: usize) -> Result<bool, TableError> {
        self.check_col(at)?;
        if self.col_count() == 1 {
            return Ok(false);
        }
        for row in &mut self.rows {
            row.remove(at);
        }
        self.alignments.remove(at);
        Ok(true)
    }

    /// Insert an empty row before `at`. `at == row_count()` appends.
    pub fn insert_row(&mut self, at: usize) -> Result<(), TableError> {
        if at > self.row_count() {
            return Err(TableError::RowOutOfBounds {
                index: at,
                rows: self.row_count(),
            });
        }
        self.rows.insert(at, vec![String::new(); self.col_count()]);
        Ok(())
    }

    /// Remove the row at `at`. Returns `Ok(false)` if it is the only row.
    pub fn remove_row(&mut self, at: usize) -> Result<bool, TableError> {
        self.check_row(at)?;
        if self.row_count() == 1 {
            return Ok(false);
        }
        self.rows.remove(at);
        Ok(true)
    }

    /// Canonical pipe-table text for this grid.
    pub fn serialize(&self) -> String {
        super::pipe::build_pipe_table(&self.rows, &self.alignments)
    }
}
