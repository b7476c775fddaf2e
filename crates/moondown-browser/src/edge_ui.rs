//! Edge-action trigger buttons and menus.
//!
//! Menus are built from the descriptor lists in
//! [`moondown_core::table::edge`]; this module only turns them into DOM and
//! routes clicks back into the editor.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::{EventListener, EventListenerOptions};
use moondown_core::table::{EdgeAction, EdgeLayout, MenuKind, Placement, Rect, TableEditorConfig};
use moondown_core::TableError;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Node};

use crate::handle::TableShared;
use crate::{dom_err, set_style};

/// Position offscreen used while a layout is hidden.
const OFFSCREEN: &str = "-1000px";

fn create_div(document: &Document, classes: &[&str]) -> Result<HtmlElement, TableError> {
    let element = document
        .create_element("div")
        .map_err(|e| dom_err("create_element", e))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| TableError::Platform("created element is not an HtmlElement".into()))?;
    for class in classes {
        element
            .class_list()
            .add_1(class)
            .map_err(|e| dom_err("class_list.add", e))?;
    }
    Ok(element)
}

/// The two trigger buttons, created before the editor exists.
pub struct EdgeButtons {
    column: HtmlElement,
    row: HtmlElement,
}

impl EdgeButtons {
    pub fn create(document: &Document) -> Result<Self, TableError> {
        let column = create_div(document, &["table-helper-operate-button", "top"])?;
        // Horizontal and vertical ellipsis.
        column.set_inner_html("&#8943;");
        let row = create_div(document, &["table-helper-operate-button", "left"])?;
        row.set_inner_html("&#8942;");
        for button in [&column, &row] {
            set_style(button, "position", "fixed");
            set_style(button, "top", OFFSCREEN);
        }
        Ok(Self { column, row })
    }
}

type MenuSlot = Rc<RefCell<Option<OpenMenu>>>;
type WeakMenuSlot = Weak<RefCell<Option<OpenMenu>>>;

/// A menu currently attached to the page. Dropping it removes its listeners.
struct OpenMenu {
    element: HtmlElement,
    _listeners: Vec<EventListener>,
}

impl Drop for OpenMenu {
    fn drop(&mut self) {
        self.element.remove();
    }
}

/// Edge-action controls bound to one editor.
pub struct EdgeControls {
    buttons: EdgeButtons,
    menu: MenuSlot,
    listeners: Vec<EventListener>,
    config: TableEditorConfig,
}

impl EdgeControls {
    pub(crate) fn new(
        buttons: EdgeButtons,
        shared: Weak<TableShared>,
        config: TableEditorConfig,
    ) -> Self {
        let menu: MenuSlot = Rc::new(RefCell::new(None));
        // Mousedown default would move focus out of the cell and blur the table.
        let options = EventListenerOptions::enable_prevent_default();

        let listeners = [
            (buttons.column.clone(), MenuKind::Column),
            (buttons.row.clone(), MenuKind::Row),
        ]
        .into_iter()
        .map(|(anchor, kind)| {
            let shared = shared.clone();
            let menu = Rc::downgrade(&menu);
            let target = anchor.clone();
            EventListener::new_with_options(&target, "mousedown", options, move |event| {
                event.prevent_default();
                open_menu(kind, &anchor, &shared, &menu);
            })
        })
        .collect();

        Self {
            buttons,
            menu,
            listeners,
            config,
        }
    }

    pub fn is_shown(&self) -> bool {
        self.buttons.column.is_connected()
    }

    /// Attach the buttons to the page.
    pub fn show(&self) {
        if self.is_shown() {
            return;
        }
        let body = gloo_utils::body();
        for button in [&self.buttons.column, &self.buttons.row] {
            if let Err(e) = body.append_child(button) {
                tracing::warn!(target: "moondown::table", error = ?e, "failed to attach edge button");
            }
        }
    }

    /// Take the buttons off the page.
    pub fn hide(&self) {
        self.buttons.column.remove();
        self.buttons.row.remove();
    }

    pub fn config(&self) -> &TableEditorConfig {
        &self.config
    }

    /// Apply a computed layout to the buttons.
    pub fn apply(&self, layout: EdgeLayout) {
        match layout {
            EdgeLayout::Hidden => {
                for button in [&self.buttons.column, &self.buttons.row] {
                    set_style(button, "top", OFFSCREEN);
                }
            }
            EdgeLayout::Shown {
                column_button,
                row_button,
            } => {
                place(&self.buttons.column, column_button);
                place(&self.buttons.row, row_button);
            }
        }
    }

    pub fn close_menu(&self) {
        self.menu.borrow_mut().take();
    }

    /// Remove buttons, menu and listeners.
    pub fn teardown(&mut self) {
        self.close_menu();
        self.hide();
        self.listeners.clear();
    }
}

impl Drop for EdgeControls {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn place(element: &HtmlElement, rect: Rect) {
    set_style(element, "left", &format!("{}px", rect.x));
    set_style(element, "top", &format!("{}px", rect.y));
    set_style(element, "width", &format!("{}px", rect.width));
    set_style(element, "height", &format!("{}px", rect.height));
}

/// Inner SVG elements of the menu icons, on a 24x24 stroke grid.
fn icon_paths(icon: &str) -> Option<&'static str> {
    Some(match icon {
        "arrow-left-to-line" => r#"<path d="M3 19V5"/><path d="m13 6-6 6 6 6"/><path d="M7 12h14"/>"#,
        "arrow-right-to-line" => r#"<path d="M17 12H3"/><path d="m11 18 6-6-6-6"/><path d="M21 5v14"/>"#,
        "arrow-up-to-line" => r#"<path d="M5 3h14"/><path d="m18 13-6-6-6 6"/><path d="M12 7v14"/>"#,
        "arrow-down-to-line" => r#"<path d="M12 17V3"/><path d="m6 11 6 6 6-6"/><path d="M19 21H5"/>"#,
        "trash-2" => {
            r#"<path d="M3 6h18"/><path d="M19 6v14c0 1-1 2-2 2H7c-1 0-2-1-2-2V6"/><path d="M8 6V4c0-1 1-2 2-2h4c1 0 2 1 2 2v2"/><path d="M10 11v6"/><path d="M14 11v6"/>"#
        }
        "align-left" => r#"<path d="M21 6H3"/><path d="M15 12H3"/><path d="M17 18H3"/>"#,
        "align-center" => r#"<path d="M21 6H3"/><path d="M17 12H7"/><path d="M19 18H5"/>"#,
        "align-right" => r#"<path d="M21 6H3"/><path d="M21 12H9"/><path d="M21 18H7"/>"#,
        _ => return None,
    })
}

/// Button content for a menu item: an inline icon, or the label as text
/// when the icon is unknown.
fn set_item_content(button: &Element, icon: &str, label: &str) {
    match icon_paths(icon) {
        Some(paths) => button.set_inner_html(&format!(
            "<svg class=\"table-helper-icon\" xmlns=\"http://www.w3.org/2000/svg\" \
             width=\"16\" height=\"16\" viewBox=\"0 0 24 24\" fill=\"none\" \
             stroke=\"currentColor\" stroke-width=\"2\" stroke-linecap=\"round\" \
             stroke-linejoin=\"round\" aria-hidden=\"true\">{paths}</svg>"
        )),
        None => button.set_text_content(Some(label)),
    }
}

/// Build a menu element from a descriptor list.
///
/// `on_select` runs when an item is clicked.
pub fn build_menu<F>(
    document: &Document,
    kind: MenuKind,
    on_select: F,
) -> Result<(HtmlElement, Vec<EventListener>), TableError>
where
    F: Fn(EdgeAction) + Clone + 'static,
{
    let container = create_div(document, &["table-helper-menu"])?;
    let mut listeners = Vec::with_capacity(kind.items().len() * 2);

    for item in kind.items() {
        let button = document
            .create_element("button")
            .map_err(|e| dom_err("create_element", e))?;
        button.set_class_name("tippy-button");
        button
            .set_attribute("title", item.label)
            .map_err(|e| dom_err("set_attribute", e))?;
        button
            .set_attribute("aria-label", item.label)
            .map_err(|e| dom_err("set_attribute", e))?;
        set_item_content(&button, item.icon, item.label);

        listeners.push(EventListener::new_with_options(
            &button,
            "mousedown",
            EventListenerOptions::enable_prevent_default(),
            |event| event.prevent_default(),
        ));
        let action = item.action;
        let on_select = on_select.clone();
        listeners.push(EventListener::new(&button, "click", move |_| {
            on_select(action)
        }));

        container
            .append_child(&button)
            .map_err(|e| dom_err("append_child", e))?;
    }

    Ok((container, listeners))
}

/// Open a menu of `kind` under `anchor`, replacing any open one.
///
/// The menu's own listeners hold the slot weakly, so a dropped editor frees
/// the menu even without `destroy`.
fn open_menu(
    kind: MenuKind,
    anchor: &HtmlElement,
    shared: &Weak<TableShared>,
    slot: &WeakMenuSlot,
) {
    let Some(open) = slot.upgrade() else {
        return;
    };
    open.borrow_mut().take();

    let document = gloo_utils::document();
    let on_select = {
        let anchor = anchor.clone();
        let shared = shared.clone();
        let slot = slot.clone();
        move |action| run_action(action, &anchor, &shared, &slot)
    };

    let (element, mut listeners) = match build_menu(&document, kind, on_select) {
        Ok(menu) => menu,
        Err(e) => {
            tracing::warn!(target: "moondown::table", error = %e, "failed to build edge menu");
            return;
        }
    };

    let spacing = shared
        .upgrade()
        .and_then(|s| s.with_editor(|editor| editor.config().edge_spacing))
        .unwrap_or(5.0);
    let rect = anchor.get_bounding_client_rect();
    let (left, top) = match kind.placement() {
        Placement::Bottom => (rect.left(), rect.bottom() + spacing),
        Placement::Right => (rect.right() + spacing, rect.top()),
    };
    set_style(&element, "position", "fixed");
    set_style(&element, "left", &format!("{left}px"));
    set_style(&element, "top", &format!("{top}px"));

    // Any press outside the menu and its trigger closes it. The trigger is
    // excluded because the press that opened the menu is still propagating.
    let outside = {
        let slot = slot.clone();
        let menu = element.clone();
        let anchor = anchor.clone();
        EventListener::new(&document, "mousedown", move |event| {
            let inside = event
                .target()
                .and_then(|t| t.dyn_into::<Node>().ok())
                .is_some_and(|node| menu.contains(Some(&node)) || anchor.contains(Some(&node)));
            if !inside {
                if let Some(slot) = slot.upgrade() {
                    slot.borrow_mut().take();
                }
            }
        })
    };
    listeners.push(outside);

    if let Err(e) = gloo_utils::body().append_child(&element) {
        tracing::warn!(target: "moondown::table", error = ?e, "failed to attach edge menu");
        return;
    }
    *open.borrow_mut() = Some(OpenMenu {
        element,
        _listeners: listeners,
    });
}

fn run_action(
    action: EdgeAction,
    anchor: &HtmlElement,
    shared: &Weak<TableShared>,
    slot: &WeakMenuSlot,
) {
    if let Some(open) = slot.upgrade() {
        open.borrow_mut().take();
    }
    let Some(table) = shared.upgrade() else {
        return;
    };
    match table.with_editor(|editor| editor.run_edge_action(action)) {
        Some(Ok(Some(submenu))) => open_menu(submenu, anchor, shared, slot),
        Some(Ok(None)) => {}
        Some(Err(e)) => {
            tracing::warn!(target: "moondown::table", error = %e, ?action, "edge action failed")
        }
        None => tracing::trace!(target: "moondown::table", ?action, "edge action while busy"),
    }
}
