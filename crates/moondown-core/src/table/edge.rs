//! Edge-action controls: geometry and menu descriptors.
//!
//! Two trigger buttons float next to the table while the pointer is near it:
//! one above the focused column, one left of the focused row. Clicking either
//! opens a menu built from the descriptor lists below.

use super::config::TableEditorConfig;
use super::grid::ColAlignment;

/// A point in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Grow the rectangle outward by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// Whether the pointer is close enough to the table to show the edge controls.
pub fn in_edge_zone(table: Rect, pointer: Point, config: &TableEditorConfig) -> bool {
    table.expand(config.edge_button_size).contains(pointer)
}

/// Bounding boxes the button layout depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeGeometry {
    /// The focused cell.
    pub cell: Rect,
    /// The focused cell's row.
    pub row: Rect,
    /// The focused cell's column, from its topmost cell to the table bottom.
    pub column: Rect,
    /// The scrolling viewport the buttons must stay inside.
    pub container: Rect,
}

/// Where the two trigger buttons go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeLayout {
    /// The focused cell is scrolled out of view.
    Hidden,
    Shown {
        column_button: Rect,
        row_button: Rect,
    },
}

/// Size of the button above the column (wide and flat).
pub fn column_button_size(config: &TableEditorConfig) -> (f64, f64) {
    let s = config.edge_button_size;
    (s * 1.2, s * 0.6)
}

/// Size of the button left of the row (narrow and tall).
pub fn row_button_size(config: &TableEditorConfig) -> (f64, f64) {
    let s = config.edge_button_size;
    (s * 0.6, s * 1.2)
}

/// Place the trigger buttons around the focused cell.
pub fn layout_edge_buttons(geometry: &EdgeGeometry, config: &TableEditorConfig) -> EdgeLayout {
    let EdgeGeometry {
        cell,
        row,
        column,
        container,
    } = *geometry;
    let spacing = config.edge_spacing;

    let on_screen = cell.top() > container.top() && cell.bottom() < container.bottom();
    if !on_screen {
        return EdgeLayout::Hidden;
    }

    let (cw, ch) = column_button_size(config);
    let column_button = Rect::new(
        cell.left() + cell.width / 2.0 - cw / 2.0,
        column.top() - ch - spacing,
        cw,
        ch,
    );

    let (rw, rh) = row_button_size(config);
    let row_button = Rect::new(
        row.left() - rw - spacing,
        row.top() + row.height / 2.0 - rh / 2.0,
        rw,
        rh,
    );

    EdgeLayout::Shown {
        column_button: clamp_into(column_button, container, spacing),
        row_button: clamp_into(row_button, container, spacing),
    }
}

/// Keep a button inside the container, `spacing` px away from its edges.
fn clamp_into(mut button: Rect, container: Rect, spacing: f64) -> Rect {
    let min_x = container.left() + spacing;
    let max_x = container.right() - spacing - button.width;
    let min_y = container.top() + spacing;
    let max_y = container.bottom() - spacing - button.height;

    // Right/bottom limits first so a too-small container still pins to top-left.
    button.x = button.x.min(max_x).max(min_x);
    button.y = button.y.min(max_y).max(min_y);
    button
}

/// Something the edge menus can do to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeAction {
    InsertColumnLeft,
    InsertColumnRight,
    DeleteColumn,
    OpenAlignmentMenu,
    Align(ColAlignment),
    InsertRowAbove,
    InsertRowBelow,
    DeleteRow,
}

impl EdgeAction {
    /// Whether running the action should be followed by a save intent.
    pub fn requests_save(&self) -> bool {
        !matches!(self, EdgeAction::OpenAlignmentMenu)
    }
}

/// One button in an edge menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    /// Icon name (lucide naming).
    pub icon: &'static str,
    pub label: &'static str,
    pub action: EdgeAction,
}

/// Which side of its anchor a menu opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Bottom,
    Right,
}

/// The three edge menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Column,
    Row,
    Alignment,
}

impl MenuKind {
    pub fn items(&self) -> &'static [MenuItem] {
        match self {
            MenuKind::Column => COLUMN_ACTIONS,
            MenuKind::Row => ROW_ACTIONS,
            MenuKind::Alignment => ALIGNMENT_ACTIONS,
        }
    }

    pub fn placement(&self) -> Placement {
        match self {
            MenuKind::Row => Placement::Right,
            MenuKind::Column | MenuKind::Alignment => Placement::Bottom,
        }
    }
}

pub const COLUMN_ACTIONS: &[MenuItem] = &[
    MenuItem {
        icon: "arrow-left-to-line",
        label: "Insert column left",
        action: EdgeAction::InsertColumnLeft,
    },
    MenuItem {
        icon: "arrow-right-to-line",
        label: "Insert column right",
        action: EdgeAction::InsertColumnRight,
    },
    MenuItem {
        icon: "trash-2",
        label: "Delete column",
        action: EdgeAction::DeleteColumn,
    },
    MenuItem {
        icon: "align-center",
        label: "Alignment",
        action: EdgeAction::OpenAlignmentMenu,
    },
];

pub const ROW_ACTIONS: &[MenuItem] = &[
    MenuItem {
        icon: "arrow-up-to-line",
        label: "Insert row above",
        action: EdgeAction::InsertRowAbove,
    },
    MenuItem {
        icon: "arrow-down-to-line",
        label: "Insert row below",
        action: EdgeAction::InsertRowBelow,
    },
    MenuItem {
        icon: "trash-2",
        label: "Delete row",
        action: EdgeAction::DeleteRow,
    },
];

pub const ALIGNMENT_ACTIONS: &[MenuItem] = &[
    MenuItem {
        icon: "align-left",
        label: "Align left",
        action: EdgeAction::Align(ColAlignment::Left),
    },
    MenuItem {
        icon: "align-center",
        label: "Align center",
        action: EdgeAction::Align(ColAlignment::Center),
    },
    MenuItem {
        icon: "align-right",
        label: "Align right",
        action: EdgeAction::Align(ColAlignment::Right),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TableEditorConfig {
        TableEditorConfig::default()
    }

    #[test]
    fn test_edge_zone_margin() {
        let table = Rect::new(100.0, 100.0, 200.0, 100.0);
        let cfg = config();
        assert!(in_edge_zone(table, Point::new(150.0, 150.0), &cfg));
        assert!(in_edge_zone(table, Point::new(70.0, 70.0), &cfg));
        assert!(in_edge_zone(table, Point::new(330.0, 230.0), &cfg));
        assert!(!in_edge_zone(table, Point::new(69.0, 150.0), &cfg));
        assert!(!in_edge_zone(table, Point::new(150.0, 231.0), &cfg));
    }

    #[test]
    fn test_layout_places_buttons() {
        let cfg = config();
        let cell = Rect::new(200.0, 200.0, 100.0, 40.0);
        let geometry = EdgeGeometry {
            cell,
            row: Rect::new(100.0, 200.0, 400.0, 40.0),
            column: Rect::new(200.0, 160.0, 100.0, 120.0),
            container: Rect::new(0.0, 0.0, 1000.0, 800.0),
        };
        let EdgeLayout::Shown {
            column_button,
            row_button,
        } = layout_edge_buttons(&geometry, &cfg)
        else {
            panic!("expected buttons to be shown");
        };
        // 36x18 button centred over the cell, 5px above the column top.
        assert_eq!(column_button, Rect::new(232.0, 137.0, 36.0, 18.0));
        // 18x36 button centred on the row, 5px left of it.
        assert_eq!(row_button, Rect::new(77.0, 202.0, 18.0, 36.0));
    }

    #[test]
    fn test_layout_clamps_to_container() {
        let cfg = config();
        let geometry = EdgeGeometry {
            cell: Rect::new(0.0, 10.0, 50.0, 20.0),
            row: Rect::new(0.0, 10.0, 200.0, 20.0),
            column: Rect::new(0.0, 10.0, 50.0, 100.0),
            container: Rect::new(0.0, 0.0, 500.0, 500.0),
        };
        let EdgeLayout::Shown {
            column_button,
            row_button,
        } = layout_edge_buttons(&geometry, &cfg)
        else {
            panic!("expected buttons to be shown");
        };
        assert_eq!(column_button.y, 5.0);
        assert_eq!(column_button.x, 7.0);
        assert_eq!(row_button.x, 5.0);
        assert_eq!(row_button.y, 5.0);
    }

    #[test]
    fn test_layout_hidden_when_cell_scrolled_away() {
        let geometry = EdgeGeometry {
            cell: Rect::new(0.0, 900.0, 50.0, 20.0),
            row: Rect::new(0.0, 900.0, 200.0, 20.0),
            column: Rect::new(0.0, 0.0, 50.0, 920.0),
            container: Rect::new(0.0, 0.0, 500.0, 500.0),
        };
        assert_eq!(layout_edge_buttons(&geometry, &config()), EdgeLayout::Hidden);
    }

    #[test]
    fn test_menus() {
        assert_eq!(MenuKind::Column.items().len(), 4);
        assert_eq!(MenuKind::Row.placement(), Placement::Right);
        assert!(!EdgeAction::OpenAlignmentMenu.requests_save());
        assert!(
            MenuKind::Alignment
                .items()
                .iter()
                .all(|item| item.action.requests_save())
        );
    }

    #[test]
    fn test_union() {
        let a = Rect::new(0.0, 10.0, 10.0, 10.0);
        let b = Rect::new(5.0, 0.0, 10.0, 5.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 15.0, 20.0));
    }
}
