//! Shared ownership of a mounted table editor.
//!
//! DOM listeners only hold a [`Weak`] to the editor. Each event borrows the
//! editor mutably for the duration of the handler; an event raised while
//! another handler runs (focus moved by `focus()`, blur emitted by clearing
//! the table) finds the editor borrowed and is dropped. Owner callbacks are
//! queued during the borrow and delivered after it ends, so they may call
//! back into the editor through the handle they are given.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use moondown_core::table::{
    Grid, NotificationKind, NotificationQueue, TableEditor, TableEditorConfig, TableNotification,
};
use moondown_core::TableError;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlTableElement};

use crate::dom_err;
use crate::edge_ui::EdgeButtons;
use crate::table::DomTable;

/// Where the edge controls look for pointer movement.
#[derive(Debug, Clone, Default)]
pub enum Container {
    Element(HtmlElement),
    /// CSS selector; must match an element.
    Selector(String),
    /// No container given: use `document.body`.
    #[default]
    Body,
}

impl Container {
    pub fn resolve(&self) -> Result<HtmlElement, TableError> {
        match self {
            Container::Element(element) => Ok(element.clone()),
            Container::Selector(selector) => gloo_utils::document()
                .query_selector(selector)
                .map_err(|e| dom_err("query_selector", e))?
                .and_then(|e| e.dyn_into::<HtmlElement>().ok())
                .ok_or_else(|| TableError::ContainerNotFound(selector.clone())),
            Container::Body => Ok(gloo_utils::body()),
        }
    }
}

/// Owner callback receiving the editor and a snapshot of the table.
pub type Callback = Box<dyn Fn(&TableHandle, &TableNotification)>;

/// Owner callbacks, all optional.
#[derive(Default)]
pub struct TableCallbacks {
    pub on_change: Option<Callback>,
    pub on_blur: Option<Callback>,
    pub on_cell_change: Option<Callback>,
    pub on_save_intent: Option<Callback>,
}

impl TableCallbacks {
    fn deliver(&self, handle: &TableHandle, notification: &TableNotification) {
        let callback = match notification.kind {
            NotificationKind::Change => &self.on_change,
            NotificationKind::Blur => &self.on_blur,
            NotificationKind::CellChange => &self.on_cell_change,
            NotificationKind::SaveIntent => &self.on_save_intent,
        };
        if let Some(callback) = callback {
            callback(handle, notification);
        }
    }
}

pub(crate) struct TableShared {
    editor: RefCell<TableEditor<DomTable>>,
    queue: NotificationQueue,
    callbacks: TableCallbacks,
}

impl TableShared {
    /// Run `f` against the editor and deliver any notifications it raised.
    ///
    /// Returns `None` without running `f` if the editor is already borrowed.
    pub(crate) fn with_editor<R>(
        self: &Rc<Self>,
        f: impl FnOnce(&mut TableEditor<DomTable>) -> R,
    ) -> Option<R> {
        let result = match self.editor.try_borrow_mut() {
            Ok(mut editor) => f(&mut editor),
            Err(_) => {
                tracing::trace!(target: "moondown::table", "editor busy, dropping nested event");
                return None;
            }
        };
        self.flush();
        Some(result)
    }

    fn flush(self: &Rc<Self>) {
        let notifications = self.queue.drain();
        if notifications.is_empty() {
            return;
        }
        let handle = TableHandle {
            shared: Rc::clone(self),
        };
        for notification in &notifications {
            self.callbacks.deliver(&handle, notification);
        }
    }
}

/// A table editor mounted in the page.
///
/// Cloning yields another handle to the same editor.
#[derive(Clone)]
pub struct TableHandle {
    shared: Rc<TableShared>,
}

impl TableHandle {
    /// Build the table element and its controls.
    ///
    /// The table element is not inserted anywhere; place
    /// [`dom_element`](Self::dom_element) in the document yourself.
    pub fn mount(
        grid: Grid,
        container: Container,
        callbacks: TableCallbacks,
        config: TableEditorConfig,
    ) -> Result<Self, TableError> {
        let container = container.resolve()?;
        let document = gloo_utils::document();
        let table = document
            .create_element("table")
            .map_err(|e| dom_err("create_element", e))?
            .dyn_into::<HtmlTableElement>()
            .map_err(|_| TableError::Platform("created element is not a table".into()))?;
        table
            .class_list()
            .add_1("table-helper")
            .map_err(|e| dom_err("class_list.add", e))?;
        let buttons = EdgeButtons::create(&document)?;

        let queue = NotificationQueue::new();
        let shared = Rc::new_cyclic(|weak: &Weak<TableShared>| {
            let surface = DomTable::new(table, container, buttons, weak.clone(), config.clone());
            TableShared {
                editor: RefCell::new(TableEditor::new(grid, surface, queue.clone(), config)),
                queue,
                callbacks,
            }
        });
        // Construction renders without focus and raises nothing, but keep the
        // queue empty for the first real event.
        shared.flush();

        tracing::debug!(target: "moondown::table", "table editor mounted");
        Ok(Self { shared })
    }

    /// Run `f` against the editor, then deliver notifications.
    ///
    /// Returns `None` if called from inside another editor call (for example
    /// from a DOM event raised synchronously by the editor itself).
    pub fn with_editor<R>(&self, f: impl FnOnce(&mut TableEditor<DomTable>) -> R) -> Option<R> {
        self.shared.with_editor(f)
    }

    /// Like [`with_editor`](Self::with_editor) for fallible operations; a busy
    /// editor is reported as an error.
    pub fn try_with_editor<R>(
        &self,
        f: impl FnOnce(&mut TableEditor<DomTable>) -> Result<R, TableError>,
    ) -> Result<R, TableError> {
        self.shared
            .with_editor(f)
            .unwrap_or_else(|| Err(TableError::Platform("table editor is busy".into())))
    }

    /// The `<table>` element.
    pub fn dom_element(&self) -> Option<HtmlTableElement> {
        self.with_editor(|editor| editor.surface().element().clone())
    }

    pub fn get_markdown_table(&self) -> Option<String> {
        self.with_editor(|editor| editor.get_markdown_table())
    }

    /// Detach listeners and floating controls.
    pub fn destroy(&self) {
        self.with_editor(|editor| editor.destroy());
    }
}
