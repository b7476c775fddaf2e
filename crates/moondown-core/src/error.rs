//! Error types for the table editor.

use miette::Diagnostic;

/// Errors raised by table construction, mutation and mounting.
///
/// Structural edits that would leave the grid without a row or a column are
/// not errors; those operations report `Ok(false)` instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum TableError {
    /// The table AST had no rows or no columns.
    #[error("a table needs at least one row and one column")]
    #[diagnostic(code(moondown::table::empty))]
    EmptyTable,

    /// Row index outside the current grid.
    #[error("row index {index} out of bounds (table has {rows} rows)")]
    #[diagnostic(code(moondown::table::row_bounds))]
    RowOutOfBounds { index: usize, rows: usize },

    /// Column index outside the current grid.
    #[error("column index {index} out of bounds (table has {columns} columns)")]
    #[diagnostic(code(moondown::table::column_bounds))]
    ColumnOutOfBounds { index: usize, columns: usize },

    /// Alignment value other than left, center or right.
    #[error("invalid column alignment: {0:?}")]
    #[diagnostic(
        code(moondown::table::alignment),
        help("valid alignments are \"left\", \"center\" and \"right\"")
    )]
    InvalidAlignment(String),

    /// An explicit container selector matched nothing.
    #[error("could not find element using selector {0}")]
    #[diagnostic(code(moondown::table::container))]
    ContainerNotFound(String),

    /// Pipe-table source could not be parsed.
    #[error("malformed pipe table: {0}")]
    #[diagnostic(code(moondown::table::parse))]
    MalformedTable(String),

    /// A platform (DOM) call failed.
    #[error("platform error: {0}")]
    #[diagnostic(code(moondown::table::platform))]
    Platform(String),
}

impl From<&str> for TableError {
    fn from(s: &str) -> Self {
        TableError::Platform(s.to_string())
    }
}

impl From<String> for TableError {
    fn from(s: String) -> Self {
        TableError::Platform(s)
    }
}
