// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Bounded undo history of box edits.
//!
//! Entries record semantic transitions (add/move/resize/delete) with
//! before/after snapshots. They reference boxes by list index, so undo is
//! only exact when applied in strict reverse order, which is how the editor
//! uses it.

use crate::models::annotation::BoundingBox;
use crate::models::store::BoxStore;

/// Default maximum number of history entries.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Kind of a recorded edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Add,
    Move,
    Resize,
    Delete,
}

/// A single recorded edit. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    Add {
        index: usize,
        after: BoundingBox,
    },
    Move {
        index: usize,
        before: BoundingBox,
        after: BoundingBox,
    },
    Resize {
        index: usize,
        before: BoundingBox,
        after: BoundingBox,
    },
    Delete {
        index: usize,
        before: BoundingBox,
    },
}

impl HistoryEntry {
    pub fn kind(&self) -> EditKind {
        match self {
            HistoryEntry::Add { .. } => EditKind::Add,
            HistoryEntry::Move { .. } => EditKind::Move,
            HistoryEntry::Resize { .. } => EditKind::Resize,
            HistoryEntry::Delete { .. } => EditKind::Delete,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            HistoryEntry::Add { index, .. }
            | HistoryEntry::Move { index, .. }
            | HistoryEntry::Resize { index, .. }
            | HistoryEntry::Delete { index, .. } => *index,
        }
    }

    pub fn before(&self) -> Option<&BoundingBox> {
        match self {
            HistoryEntry::Add { .. } => None,
            HistoryEntry::Move { before, .. }
            | HistoryEntry::Resize { before, .. }
            | HistoryEntry::Delete { before, .. } => Some(before),
        }
    }

    pub fn after(&self) -> Option<&BoundingBox> {
        match self {
            HistoryEntry::Delete { .. } => None,
            HistoryEntry::Add { after, .. }
            | HistoryEntry::Move { after, .. }
            | HistoryEntry::Resize { after, .. } => Some(after),
        }
    }
}

/// History system for undo.
///
/// There is no redo stack: an undone edit can only be re-done by performing
/// it again.
#[derive(Debug, Clone)]
pub struct ActionHistory {
    /// Recorded edits, oldest first
    entries: Vec<HistoryEntry>,
    /// Maximum history size
    max_size: usize,
}

impl Default for ActionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl ActionHistory {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Record an edit, evicting the oldest entry when full.
    pub fn push(&mut self, entry: HistoryEntry) {
        log::debug!("History push: {:?} at {}", entry.kind(), entry.index());
        self.entries.push(entry);
        if self.entries.len() > self.max_size {
            self.entries.remove(0);
        }
    }

    /// Reverse the most recent edit on `store`.
    ///
    /// Returns the kind of the undone edit, or `None` if there was nothing to
    /// undo. An entry whose index no longer fits the list is dropped without
    /// touching the boxes.
    pub fn undo(&mut self, store: &mut BoxStore) -> Option<EditKind> {
        let entry = self.entries.pop()?;
        let kind = entry.kind();
        match entry {
            HistoryEntry::Add { index, .. } => {
                store.remove_raw(index);
            }
            HistoryEntry::Move { index, before, .. } | HistoryEntry::Resize { index, before, .. } => {
                store.replace_raw(index, before);
            }
            HistoryEntry::Delete { index, before } => {
                store.insert_raw(index, before);
            }
        }
        Some(kind)
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::handles::Handle;
    use crate::models::annotation::Point;

    fn bx(x: f64) -> BoundingBox {
        BoundingBox::new("0", x, 0.0, x + 10.0, 10.0)
    }

    #[test]
    fn test_history_bound_is_fifo() {
        let mut history = ActionHistory::default();
        for i in 0..60 {
            history.push(HistoryEntry::Add { index: i, after: bx(i as f64) });
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.entries()[0].index(), 10);
        assert_eq!(history.entries()[49].index(), 59);
    }

    #[test]
    fn test_undo_empty_is_noop() {
        let mut history = ActionHistory::default();
        let mut store = BoxStore::new(100, 100);
        assert_eq!(history.undo(&mut store), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_undo_restores_initial_list() {
        let mut history = ActionHistory::default();
        let mut store = BoxStore::with_boxes(200, 200, vec![bx(0.0), bx(50.0)]);
        let initial = store.boxes().to_vec();

        // add
        let draft = store.start_draw(Point::new(100.0, 100.0));
        let draft = store.update_draw(draft, Point::new(150.0, 140.0));
        let added = store.commit_draw(draft, "1", &mut history);
        assert_eq!(added, Some(2));

        // move
        let before = store.get(0).cloned().unwrap();
        store.move_box(0, Point::new(5.0, 7.0));
        store.record_edit(EditKind::Move, 0, before, &mut history);

        // resize
        let before = store.get(1).cloned().unwrap();
        store.resize(1, Handle::SouthEast, Point::new(20.0, 20.0));
        store.record_edit(EditKind::Resize, 1, before, &mut history);

        // delete
        store.delete_at(0, &mut history);

        assert_eq!(history.len(), 4);
        assert_eq!(history.undo(&mut store), Some(EditKind::Delete));
        assert_eq!(history.undo(&mut store), Some(EditKind::Resize));
        assert_eq!(history.undo(&mut store), Some(EditKind::Move));
        assert_eq!(history.undo(&mut store), Some(EditKind::Add));
        assert_eq!(store.boxes(), initial.as_slice());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_clear_all_undoes_one_box_per_call() {
        let mut history = ActionHistory::default();
        let mut store = BoxStore::with_boxes(200, 200, vec![bx(0.0), bx(20.0), bx(40.0)]);
        let initial = store.boxes().to_vec();

        assert_eq!(store.clear_all(&mut history), 3);
        assert_eq!(history.len(), 3);

        history.undo(&mut store);
        assert_eq!(store.len(), 1);
        history.undo(&mut store);
        assert_eq!(store.len(), 2);
        history.undo(&mut store);
        assert_eq!(store.boxes(), initial.as_slice());
    }

    #[test]
    fn test_entry_accessors() {
        let entry = HistoryEntry::Add { index: 3, after: bx(1.0) };
        assert_eq!(entry.kind(), EditKind::Add);
        assert!(entry.before().is_none());
        assert_eq!(entry.after(), Some(&bx(1.0)));
    }
}
