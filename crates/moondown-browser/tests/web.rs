//! WASM browser tests for moondown-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Event, HtmlElement, HtmlTableElement};

wasm_bindgen_test_configure!(run_in_browser);

use moondown_browser::edge_ui::build_menu;
use moondown_browser::{
    BlockWidget, ColAlignment, Container, Grid, TableCallbacks, TableError, TableHandle,
    widget_to_dom,
};
use moondown_core::table::{MenuKind, NotificationKind, TableEditorConfig, TableNotification};

fn grid(rows: &[&[&str]], alignments: &[ColAlignment]) -> Grid {
    let rows = rows
        .iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect();
    Grid::new(rows, alignments.to_vec()).unwrap()
}

fn mount(grid: Grid, callbacks: TableCallbacks) -> (TableHandle, HtmlTableElement) {
    let handle = TableHandle::mount(
        grid,
        Container::Body,
        callbacks,
        TableEditorConfig::default(),
    )
    .unwrap();
    let table = handle.dom_element().unwrap();
    gloo_utils::body().append_child(&table).unwrap();
    (handle, table)
}

fn cell(table: &HtmlTableElement, selector: &str) -> HtmlElement {
    table
        .query_selector(selector)
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap()
}

fn count(table: &HtmlTableElement, selector: &str) -> u32 {
    table.query_selector_all(selector).unwrap().length()
}

// === Mounting ===

#[wasm_bindgen_test]
fn test_mount_builds_editable_cells() {
    let (handle, table) = mount(
        grid(&[&["Name", "Qty"], &["apple", "3"]], &[]),
        TableCallbacks::default(),
    );

    assert!(table.class_list().contains("table-helper"));
    assert_eq!(count(&table, "tr"), 2);
    assert_eq!(count(&table, "td"), 4);
    let first = cell(&table, "td");
    assert_eq!(first.get_attribute("contenteditable").as_deref(), Some("true"));
    assert_eq!(first.text_content().as_deref(), Some("Name"));

    handle.destroy();
    table.remove();
}

#[wasm_bindgen_test]
fn test_missing_selector_container_fails() {
    let result = TableHandle::mount(
        grid(&[&["a"]], &[]),
        Container::Selector("#no-such-container".into()),
        TableCallbacks::default(),
        TableEditorConfig::default(),
    );
    assert!(matches!(result, Err(TableError::ContainerNotFound(_))));
}

#[wasm_bindgen_test]
fn test_column_alignment_is_applied_to_cells() {
    let (handle, table) = mount(
        grid(&[&["a", "b"], &["c", "d"]], &[ColAlignment::Left, ColAlignment::Center]),
        TableCallbacks::default(),
    );

    let second = cell(&table, "tr td:nth-child(2)");
    assert_eq!(second.style().get_property_value("text-align").unwrap(), "center");

    handle
        .try_with_editor(|editor| editor.change_col_alignment(ColAlignment::Right, Some(1)))
        .unwrap();
    assert_eq!(second.style().get_property_value("text-align").unwrap(), "right");

    handle.destroy();
    table.remove();
}

// === Structure and callbacks ===

#[wasm_bindgen_test]
fn test_append_col_rebuilds_and_notifies() {
    let changes = Rc::new(Cell::new(0));
    let callbacks = TableCallbacks {
        on_change: Some(Box::new({
            let changes = changes.clone();
            move |_: &TableHandle, n: &TableNotification| {
                assert!(!n.clean);
                changes.set(changes.get() + 1);
            }
        })),
        ..Default::default()
    };
    let (handle, table) = mount(grid(&[&["a", "b"], &["c", "d"]], &[]), callbacks);

    handle.try_with_editor(|editor| editor.append_col()).unwrap();

    assert_eq!(count(&table, "td"), 6);
    assert_eq!(changes.get(), 1);
    assert_eq!(
        handle.get_markdown_table().unwrap(),
        "| a |  | b |\n| --- | --- | --- |\n| c |  | d |"
    );

    handle.destroy();
    table.remove();
}

#[wasm_bindgen_test]
fn test_callbacks_may_reenter_the_editor() {
    let seen = Rc::new(Cell::new(0usize));
    let callbacks = TableCallbacks {
        on_cell_change: Some(Box::new({
            let seen = seen.clone();
            move |handle: &TableHandle, _: &TableNotification| {
                seen.set(handle.with_editor(|e| e.col_count()).unwrap_or(0));
            }
        })),
        ..Default::default()
    };
    let (handle, table) = mount(grid(&[&["a", "b"]], &[]), callbacks);

    handle.try_with_editor(|editor| editor.pluck_col()).unwrap();
    assert_eq!(seen.get(), 1);

    handle.destroy();
    table.remove();
}

#[wasm_bindgen_test]
fn test_callback_handle_reads_current_markdown() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let callbacks = TableCallbacks {
        on_change: Some(Box::new({
            let seen = seen.clone();
            move |handle: &TableHandle, _: &TableNotification| {
                seen.borrow_mut().extend(handle.get_markdown_table());
            }
        })),
        ..Default::default()
    };
    let (handle, table) = mount(grid(&[&["a"], &["b"]], &[]), callbacks);

    handle.try_with_editor(|editor| editor.append_row()).unwrap();
    assert_eq!(
        seen.borrow().as_slice(),
        ["| a |\n| --- |\n|  |\n| b |"]
    );

    handle.destroy();
    table.remove();
}

#[wasm_bindgen_test]
fn test_edit_is_committed_once_before_structural_change() {
    let seen: Rc<RefCell<Vec<(NotificationKind, String)>>> = Default::default();
    let record = |seen: &Rc<RefCell<Vec<(NotificationKind, String)>>>| {
        let seen = seen.clone();
        Box::new(move |_: &TableHandle, n: &TableNotification| {
            seen.borrow_mut().push((n.kind, n.markdown.clone()));
        })
    };
    let callbacks = TableCallbacks {
        on_change: Some(record(&seen)),
        on_cell_change: Some(record(&seen)),
        ..Default::default()
    };
    let (handle, table) = mount(grid(&[&["a", "b"], &["c", "d"]], &[]), callbacks);

    let first = cell(&table, "td");
    first.focus().unwrap();
    // Headless browsers without window focus may not dispatch it.
    first.dispatch_event(&Event::new("focus").unwrap()).unwrap();
    first.set_text_content(Some("typed"));

    handle.try_with_editor(|editor| editor.append_col()).unwrap();

    let two_cols = "| typed | b |\n| --- | --- |\n| c | d |";
    let three_cols = "| typed |  | b |\n| --- | --- | --- |\n| c |  | d |";
    let seen = seen.borrow();
    let kinds: Vec<_> = seen.iter().map(|(kind, _)| *kind).collect();
    assert_eq!(
        kinds,
        [
            NotificationKind::Change,
            NotificationKind::CellChange,
            NotificationKind::Change
        ]
    );
    assert_eq!(seen[0].1, two_cols);
    assert_eq!(seen[2].1, three_cols);
    assert_eq!(handle.get_markdown_table().unwrap(), three_cols);

    handle.destroy();
    table.remove();
}

#[wasm_bindgen_test]
fn test_destroy_removes_editability() {
    let (handle, table) = mount(grid(&[&["a"]], &[]), TableCallbacks::default());
    handle.destroy();
    let first = cell(&table, "td");
    assert_eq!(first.get_attribute("contenteditable"), None);
    table.remove();
}

#[wasm_bindgen_test]
fn test_menu_items_carry_inline_icons() {
    let document = gloo_utils::document();
    let (menu, _listeners) = build_menu(&document, MenuKind::Alignment, |_| {}).unwrap();

    let buttons = menu.query_selector_all("button").unwrap();
    assert_eq!(buttons.length(), 3);
    assert_eq!(menu.query_selector_all("button > svg").unwrap().length(), 3);
    assert!(menu.query_selector("[data-lucide]").unwrap().is_none());
}

#[wasm_bindgen_test]
fn test_dropping_the_handle_closes_an_open_menu() {
    let (handle, table) = mount(grid(&[&["a", "b"]], &[]), TableCallbacks::default());
    handle
        .with_editor(|editor| editor.surface().edge_controls().show())
        .unwrap();

    let document = gloo_utils::document();
    let trigger = document
        .query_selector(".table-helper-operate-button.top")
        .unwrap()
        .unwrap();
    trigger
        .dispatch_event(&Event::new("mousedown").unwrap())
        .unwrap();
    assert!(document.query_selector(".table-helper-menu").unwrap().is_some());

    // No destroy: the last handle going away must release the menu.
    drop(handle);
    assert!(document.query_selector(".table-helper-menu").unwrap().is_none());
    assert!(
        document
            .query_selector(".table-helper-operate-button")
            .unwrap()
            .is_none()
    );
    table.remove();
}

// === Widgets ===

#[wasm_bindgen_test]
fn test_code_widget_to_dom() {
    let document = gloo_utils::document();
    let node = widget_to_dom(
        &document,
        &BlockWidget::Code {
            language: "rust".into(),
            content: "fn main() {}".into(),
        },
    )
    .unwrap();
    assert_eq!(node.class_name(), "cm-blockcode-widget");
    assert_eq!(node.text_content().as_deref(), Some("fn main() {}"));
}

#[wasm_bindgen_test]
fn test_image_widget_has_caption() {
    let document = gloo_utils::document();
    let node = widget_to_dom(
        &document,
        &BlockWidget::Image {
            alt: "a cat".into(),
            src: "data:image/gif;base64,R0lGODlhAQABAAAAACw=".into(),
        },
    )
    .unwrap();
    assert_eq!(node.class_name(), "cm-image-widget");
    assert!(node.query_selector("img").unwrap().is_some());
    let caption = node.query_selector(".cm-image-caption").unwrap().unwrap();
    assert_eq!(caption.text_content().as_deref(), Some("a cat"));
}
