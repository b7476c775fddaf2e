//! moondown-core: editor logic for a markdown editor with WYSIWYG tables.
//!
//! This crate provides:
//! - `Grid` and pipe-table serialization
//! - `TableEditor<S>` - table editing generic over a `TableSurface`
//! - Syntax-hiding decorations and block widgets
//! - List renumbering and continuation helpers

pub mod decoration;
pub mod error;
pub mod lists;
pub mod render;
pub mod table;

pub use decoration::{BlockWidget, Decoration, render_widget_html, syntax_decorations};
pub use error::TableError;
pub use lists::{
    BulletMarker, ListEdit, TextEdit, apply_edits, bullet_markers, bullet_symbol, continue_list,
    indent_list_item, outdent_list_item, renumber_ordered_lists,
};
pub use render::{markdown_to_html, render_inline};
pub use table::{
    CellPos, CellSelection, ColAlignment, Grid, TableEditor, TableEditorConfig, TableObserver,
    TableSurface, TableView, VirtualTable, parse_pipe_table,
};
