//! Pipe-table grid editing.
//!
//! A [`Grid`] holds the table as markdown source strings. [`TableEditor`]
//! keeps a [`TableSurface`] in sync with it, moves a cursor around, and
//! reports changes to a [`TableObserver`].

pub mod config;
pub mod edge;
pub mod editor;
pub mod grid;
pub mod navigation;
pub mod notify;
pub mod pipe;
pub mod surface;
pub mod virtual_table;


pub use config::TableEditorConfig;
pub use edge::{
    EdgeAction, EdgeGeometry, EdgeLayout, MenuItem, MenuKind, Placement, Point, Rect,
    in_edge_zone, layout_edge_buttons,
};
pub use editor::{CellRenderer, TableEditor};
pub use grid::{CellPos, ColAlignment, Grid};
pub use navigation::{Dims, Step};
pub use notify::{
    ChangeTracker, NoopObserver, NotificationKind, NotificationQueue, TableNotification,
    TableObserver, TableView,
};
pub use pipe::{build_pipe_table, escape_cell, normalize_cell_text, parse_pipe_table};
pub use surface::{CellSelection, TableSurface};
pub use virtual_table::{VirtualCell, VirtualTable};
