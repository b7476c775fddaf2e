//! Change tracking and owner callbacks.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::Serialize;

use super::grid::{CellPos, Grid};

/// Clean/dirty state measured against a serialized snapshot of the grid.
#[derive(Debug, Clone)]
pub struct ChangeTracker {
    clean: bool,
    last_seen: String,
}

impl ChangeTracker {
    /// Start clean, with `snapshot` as the reference serialization.
    pub fn new(snapshot: String) -> Self {
        Self {
            clean: true,
            last_seen: snapshot,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.clean
    }

    /// Record the current serialization.
    ///
    /// Returns true if the owner should be told about a change: anything other
    /// than "unchanged while already clean" marks the table dirty.
    pub fn observe(&mut self, current: String) -> bool {
        if self.clean && current == self.last_seen {
            return false;
        }
        self.last_seen = current;
        self.clean = false;
        true
    }

    /// The owner saved the table; `snapshot` becomes the new reference.
    pub fn mark_clean(&mut self, snapshot: String) {
        self.clean = true;
        self.last_seen = snapshot;
    }
}

/// Read-only view of the table handed to observers.
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    pub grid: &'a Grid,
    pub cursor: CellPos,
    pub clean: bool,
}

impl TableView<'_> {
    /// Pipe-table text of the current grid.
    pub fn markdown(&self) -> String {
        self.grid.serialize()
    }
}

/// Callbacks invoked by the table editor.
///
/// All methods default to doing nothing, so an owner only implements the
/// notifications it cares about.
pub trait TableObserver {
    /// Table content differs from the last seen state, or the table was clean.
    fn on_change(&mut self, _table: &TableView<'_>) {}

    /// No cell in the table holds focus any more.
    fn on_blur(&mut self, _table: &TableView<'_>) {}

    /// The cursor moved or the focused column/row changed shape.
    fn on_cell_change(&mut self, _table: &TableView<'_>) {}

    /// An edge action ran and the owner may want to save.
    fn on_save_intent(&mut self, _table: &TableView<'_>) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TableObserver for NoopObserver {}

/// Kinds of owner notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    Change,
    Blur,
    CellChange,
    SaveIntent,
}

/// A notification captured for later delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableNotification {
    pub kind: NotificationKind,
    pub markdown: String,
    pub cursor: CellPos,
    pub clean: bool,
}

/// Observer that queues notifications instead of running callbacks inline.
///
/// Hosts that keep the editor behind a `RefCell` use this so owner callbacks
/// run after the editor borrow is released and may call back into it.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue(Rc<RefCell<VecDeque<TableNotification>>>);

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued notification, oldest first.
    pub fn drain(&self) -> Vec<TableNotification> {
        self.0.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    fn push(&self, kind: NotificationKind, table: &TableView<'_>) {
        self.0.borrow_mut().push_back(TableNotification {
            kind,
            markdown: table.markdown(),
            cursor: table.cursor,
            clean: table.clean,
        });
    }
}

impl TableObserver for NotificationQueue {
    fn on_change(&mut self, table: &TableView<'_>) {
        self.push(NotificationKind::Change, table);
    }

    fn on_blur(&mut self, table: &TableView<'_>) {
        self.push(NotificationKind::Blur, table);
    }

    fn on_cell_change(&mut self, table: &TableView<'_>) {
        self.push(NotificationKind::CellChange, table);
    }

    fn on_save_intent(&mut self, table: &TableView<'_>) {
        self.push(NotificationKind::SaveIntent, table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_clean_table_is_silent() {
        let mut tracker = ChangeTracker::new("a".into());
        assert!(!tracker.observe("a".into()));
        assert!(tracker.is_clean());
    }

    #[test]
    fn test_change_marks_dirty() {
        let mut tracker = ChangeTracker::new("a".into());
        assert!(tracker.observe("b".into()));
        assert!(!tracker.is_clean());
        // Dirty tables keep reporting, even with the same content.
        assert!(tracker.observe("b".into()));
    }

    #[test]
    fn test_mark_clean_twice() {
        let mut tracker = ChangeTracker::new("a".into());
        tracker.observe("b".into());
        tracker.mark_clean("b".into());
        tracker.mark_clean("b".into());
        assert!(tracker.is_clean());
        assert!(!tracker.observe("b".into()));
    }

    #[test]
    fn test_queue_drains_in_order() {
        let grid = Grid::new(vec![vec!["x".into()]], vec![]).unwrap();
        let view = TableView {
            grid: &grid,
            cursor: CellPos::default(),
            clean: true,
        };
        let mut queue = NotificationQueue::new();
        queue.on_cell_change(&view);
        queue.on_blur(&view);

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].kind, NotificationKind::CellChange);
        assert_eq!(drained[1].kind, NotificationKind::Blur);
        assert_eq!(drained[1].markdown, "| x |\n| --- |");
        assert!(queue.is_empty());
    }
}
