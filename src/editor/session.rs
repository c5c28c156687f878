// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editing session state machine.
//!
//! An `EditorSession` owns everything mutable while one image is open: the
//! box store, the undo history, the viewport, the selection and the current
//! pointer interaction. Events are applied one at a time; each call to
//! `handle_event` is a complete transition.

use super::events::{EditorEvent, KeyCommand};
use super::handles::{Handle, HandleDetector};
use super::history::{ActionHistory, EditKind};
use crate::io::persistence::PersistenceManager;
use crate::models::annotation::{BoundingBox, Point};
use crate::models::classes::{class_id_of, ClassCatalog};
use crate::models::store::{BoxStore, DraftBox};
use crate::util::geometry::{viewport_delta_to_image_delta, viewport_to_image, ViewportState};
use std::path::PathBuf;
use std::time::Instant;

/// What a pointer press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Draw,
    Edit,
    Pan,
}

/// Pointer interaction in progress. `last` positions are viewport units.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Drawing(DraftBox),
    Moving {
        index: usize,
        last: Point,
        before: BoundingBox,
    },
    Resizing {
        index: usize,
        handle: Handle,
        last: Point,
        before: BoundingBox,
    },
    Panning {
        last: Point,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }
}

/// Whether the session keeps running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    Continue,
    Finished,
}

/// Result of a finished session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionReport {
    /// Label file written during the session, if any save happened.
    pub annotation_path: Option<PathBuf>,
    /// The user asked to stop the whole batch.
    pub user_cancelled: bool,
    /// Boxes present when the session ended.
    pub box_count: usize,
}

/// State of one open image.
#[derive(Debug)]
pub struct EditorSession {
    store: BoxStore,
    history: ActionHistory,
    viewport: ViewportState,
    detector: HandleDetector,
    classes: ClassCatalog,
    active_class: usize,
    mode: EditMode,
    selection: Option<usize>,
    interaction: Interaction,
    persistence: PersistenceManager,
    finished: bool,
    user_cancelled: bool,
    message: Option<String>,
}

impl EditorSession {
    pub fn new(
        store: BoxStore,
        viewport: ViewportState,
        classes: ClassCatalog,
        detector: HandleDetector,
        history: ActionHistory,
        persistence: PersistenceManager,
    ) -> Self {
        Self {
            store,
            history,
            viewport,
            detector,
            classes,
            active_class: 0,
            mode: EditMode::Draw,
            selection: None,
            interaction: Interaction::Idle,
            persistence,
            finished: false,
            user_cancelled: false,
            message: None,
        }
    }

    pub fn store(&self) -> &BoxStore {
        &self.store
    }

    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn detector(&self) -> &HandleDetector {
        &self.detector
    }

    pub fn classes(&self) -> &ClassCatalog {
        &self.classes
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Label of the class new boxes get.
    pub fn active_class_label(&self) -> &str {
        self.classes.get(self.active_class).unwrap_or("0")
    }

    /// One-line status for the host to display.
    pub fn status_line(&self) -> String {
        let mut status = self.message.clone().unwrap_or_else(|| {
            format!("Class: {} | Count: {}", self.active_class_label(), self.store.len())
        });
        status.push_str(match self.mode {
            EditMode::Edit => " | EDIT MODE: select a box to move/resize",
            EditMode::Pan => " | PAN MODE: drag to move the image",
            EditMode::Draw => " | Click and drag to draw",
        });
        status
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            annotation_path: self
                .persistence
                .has_saved()
                .then(|| self.persistence.label_path().to_path_buf()),
            user_cancelled: self.user_cancelled,
            box_count: self.store.len(),
        }
    }

    /// Apply one event.
    pub fn handle_event(&mut self, event: EditorEvent, now: Instant) -> SessionControl {
        if self.finished {
            return SessionControl::Finished;
        }
        log::trace!("Event: {:?}", event);
        self.message = None;

        match event {
            EditorEvent::PointerPress { x, y } => self.pointer_press(Point::new(x, y)),
            EditorEvent::PointerDrag { x, y } => self.pointer_drag(Point::new(x, y)),
            EditorEvent::PointerRelease { x, y } => self.pointer_release(Point::new(x, y)),
            EditorEvent::Zoom { steps } => {
                if self.viewport.zoom_by_steps(steps) {
                    log::debug!("Zoom factor {:.3}", self.viewport.zoom_factor);
                }
            }
            EditorEvent::Pan { dx, dy } => self.viewport.pan_by(dx, dy),
            EditorEvent::Key { command } => self.command(command, now),
        }

        if self.finished {
            return SessionControl::Finished;
        }
        // Saves only ever see committed boxes, never a drag in progress.
        if self.interaction.is_idle() {
            self.persistence.check_auto_save(&self.store, now);
        }
        SessionControl::Continue
    }

    /// The host has no more events: save and finish normally.
    pub fn finish(&mut self, now: Instant) -> SessionReport {
        if !self.finished {
            self.abort_interaction();
            self.persistence.save(&self.store, now);
            self.finished = true;
        }
        self.report()
    }

    fn to_image(&self, point: Point) -> Point {
        viewport_to_image(point, &self.viewport)
    }

    fn pointer_press(&mut self, point: Point) {
        self.abort_interaction();
        match self.mode {
            EditMode::Pan => self.interaction = Interaction::Panning { last: point },
            EditMode::Draw => {
                let draft = self.store.start_draw(self.to_image(point));
                self.interaction = Interaction::Drawing(draft);
            }
            EditMode::Edit => {
                if let Some(index) = self.selection {
                    let handle = self.detector.detect(point, self.store.boxes(), index, &self.viewport);
                    if let (Some(before), true) = (self.store.get(index), handle != Handle::None) {
                        self.interaction = Interaction::Resizing {
                            index,
                            handle,
                            last: point,
                            before: before.clone(),
                        };
                        self.message = Some(format!("Resizing box {}", index + 1));
                        return;
                    }
                }

                self.selection = self.store.select_at(self.to_image(point));
                if let Some(index) = self.selection {
                    if let Some(before) = self.store.get(index) {
                        self.interaction = Interaction::Moving {
                            index,
                            last: point,
                            before: before.clone(),
                        };
                        self.message = Some(format!("Box {} selected for editing", index + 1));
                    }
                }
            }
        }
    }

    fn pointer_drag(&mut self, point: Point) {
        let interaction = std::mem::take(&mut self.interaction);
        self.interaction = match interaction {
            Interaction::Idle => Interaction::Idle,
            Interaction::Drawing(draft) => {
                Interaction::Drawing(self.store.update_draw(draft, self.to_image(point)))
            }
            Interaction::Moving { index, last, before } => {
                let delta = viewport_delta_to_image_delta(point.delta_from(last), &self.viewport);
                self.store.move_box(index, delta);
                Interaction::Moving {
                    index,
                    last: point,
                    before,
                }
            }
            Interaction::Resizing {
                index,
                handle,
                last,
                before,
            } => {
                let delta = viewport_delta_to_image_delta(point.delta_from(last), &self.viewport);
                let handle = self.store.resize(index, handle, delta);
                Interaction::Resizing {
                    index,
                    handle,
                    last: point,
                    before,
                }
            }
            Interaction::Panning { last } => {
                let delta = point.delta_from(last);
                self.viewport.pan_by(delta.x, delta.y);
                Interaction::Panning { last: point }
            }
        };
    }

    fn pointer_release(&mut self, point: Point) {
        self.pointer_drag(point);
        match std::mem::take(&mut self.interaction) {
            Interaction::Drawing(draft) => {
                let class_id = class_id_of(self.active_class_label()).to_string();
                if self.store.commit_draw(draft, &class_id, &mut self.history).is_some() {
                    self.message = Some(format!("Box added. Count: {}", self.store.len()));
                }
            }
            Interaction::Moving { index, before, .. } => {
                if self.store.record_edit(EditKind::Move, index, before, &mut self.history) {
                    self.message = Some(format!("Box {} moved", index + 1));
                }
            }
            Interaction::Resizing { index, before, .. } => {
                if self.store.record_edit(EditKind::Resize, index, before, &mut self.history) {
                    self.message = Some(format!("Box {} resized", index + 1));
                }
            }
            Interaction::Panning { .. } | Interaction::Idle => {}
        }
    }

    /// Drop an unfinished drag, restoring the dragged box.
    fn abort_interaction(&mut self) {
        match std::mem::take(&mut self.interaction) {
            Interaction::Moving { index, before, .. } | Interaction::Resizing { index, before, .. } => {
                self.store.replace_raw(index, before);
            }
            Interaction::Drawing(_) | Interaction::Panning { .. } | Interaction::Idle => {}
        }
    }

    fn fix_selection(&mut self) {
        if self.selection.is_some_and(|i| i >= self.store.len()) {
            self.selection = None;
        }
    }

    fn command(&mut self, command: KeyCommand, now: Instant) {
        self.abort_interaction();
        match command {
            KeyCommand::Undo => {
                if let Some(kind) = self.history.undo(&mut self.store) {
                    log::info!("Undo: {:?}", kind);
                    self.message = Some(format!("Undone: {:?}", kind));
                }
                self.fix_selection();
            }
            KeyCommand::ClearAll => {
                self.store.clear_all(&mut self.history);
                self.selection = None;
                self.message = Some("All boxes cleared".to_string());
            }
            KeyCommand::Save => {
                if self.persistence.save(&self.store, now) {
                    self.message = Some(format!("Saved {} boxes", self.store.len()));
                }
            }
            KeyCommand::ToggleEdit => {
                self.mode = if self.mode == EditMode::Edit {
                    EditMode::Draw
                } else {
                    EditMode::Edit
                };
                self.selection = None;
            }
            KeyCommand::TogglePan => {
                self.mode = if self.mode == EditMode::Pan {
                    EditMode::Draw
                } else {
                    EditMode::Pan
                };
            }
            KeyCommand::CycleClass => {
                self.active_class = self.classes.next_index(self.active_class);
            }
            KeyCommand::SetClass(label) => match self.classes.position(&label) {
                Some(index) => self.active_class = index,
                None => log::warn!("Unknown class: {}", label),
            },
            KeyCommand::DeleteLast => {
                if self.store.delete_last(&mut self.history).is_some() {
                    self.message = Some(format!("Last box deleted. Remaining: {}", self.store.len()));
                }
                self.fix_selection();
            }
            KeyCommand::DeleteSelected => {
                if let Some(index) = self.selection.take() {
                    self.store.delete_at(index, &mut self.history);
                }
            }
            KeyCommand::SelectNone => self.selection = None,
            KeyCommand::Next => {
                self.persistence.save(&self.store, now);
                self.finished = true;
            }
            KeyCommand::SaveAndExit => {
                if !self.store.is_empty() {
                    self.persistence.save(&self.store, now);
                }
                self.user_cancelled = true;
                self.finished = true;
            }
            KeyCommand::Quit => {
                log::info!("Session closed without saving");
                self.user_cancelled = true;
                self.finished = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::persistence::DEFAULT_AUTO_SAVE_INTERVAL;
    use std::time::Duration;
    use tempfile::TempDir;

    fn session_in(dir: &TempDir, boxes: Vec<BoundingBox>, scale: f64, auto_save: bool) -> EditorSession {
        let persistence = PersistenceManager::new(
            dir.path().join("img.txt"),
            200,
            100,
            auto_save,
            DEFAULT_AUTO_SAVE_INTERVAL,
            Instant::now(),
        );
        EditorSession::new(
            BoxStore::with_boxes(200, 100, boxes),
            ViewportState::new(scale),
            ClassCatalog::new(vec!["0-levedura".to_string(), "1-fungo".to_string()]),
            HandleDetector::default(),
            ActionHistory::default(),
            persistence,
        )
    }

    fn drag(session: &mut EditorSession, from: (f64, f64), to: (f64, f64)) {
        let now = Instant::now();
        session.handle_event(EditorEvent::PointerPress { x: from.0, y: from.1 }, now);
        let mid = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
        session.handle_event(EditorEvent::PointerDrag { x: mid.0, y: mid.1 }, now);
        session.handle_event(EditorEvent::PointerDrag { x: to.0, y: to.1 }, now);
        session.handle_event(EditorEvent::PointerRelease { x: to.0, y: to.1 }, now);
    }

    fn key(session: &mut EditorSession, command: KeyCommand) -> SessionControl {
        session.handle_event(EditorEvent::key(command), Instant::now())
    }

    #[test]
    fn test_draw_uses_active_class_and_scale() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, vec![], 0.5, false);
        key(&mut session, KeyCommand::CycleClass);
        drag(&mut session, (10.0, 10.0), (30.0, 40.0));

        assert_eq!(session.store().boxes(), &[BoundingBox::new("1", 20.0, 20.0, 60.0, 80.0)]);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_move_records_single_entry_with_drag_start_snapshot() {
        let dir = TempDir::new().unwrap();
        let original = BoundingBox::new("0", 10.0, 10.0, 50.0, 50.0);
        let mut session = session_in(&dir, vec![original.clone()], 1.0, false);
        key(&mut session, KeyCommand::ToggleEdit);
        drag(&mut session, (30.0, 30.0), (40.0, 35.0));

        assert_eq!(session.selection(), Some(0));
        assert_eq!(session.store().get(0), Some(&BoundingBox::new("0", 20.0, 15.0, 60.0, 55.0)));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().entries()[0].before(), Some(&original));
    }

    #[test]
    fn test_resize_via_handle_after_selection() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, vec![BoundingBox::new("0", 10.0, 10.0, 50.0, 50.0)], 1.0, false);
        key(&mut session, KeyCommand::ToggleEdit);
        // Click selects without changing anything.
        drag(&mut session, (30.0, 30.0), (30.0, 30.0));
        assert!(session.history().is_empty());

        // Drag the SE handle past the NW corner.
        drag(&mut session, (50.0, 50.0), (0.0, 5.0));
        assert_eq!(session.store().get(0), Some(&BoundingBox::new("0", 0.0, 5.0, 10.0, 10.0)));
        assert_eq!(session.history().entries()[0].kind(), EditKind::Resize);
        assert!(session.interaction().is_idle());
    }

    #[test]
    fn test_pan_mode_moves_viewport_only() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, vec![], 1.0, false);
        key(&mut session, KeyCommand::TogglePan);
        drag(&mut session, (10.0, 10.0), (30.0, 5.0));
        assert_eq!(session.viewport().pan_offset, Point::new(20.0, -5.0));
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_undo_after_delete_selected() {
        let dir = TempDir::new().unwrap();
        let boxes = vec![
            BoundingBox::new("0", 10.0, 10.0, 20.0, 20.0),
            BoundingBox::new("1", 40.0, 40.0, 60.0, 60.0),
        ];
        let mut session = session_in(&dir, boxes.clone(), 1.0, false);
        key(&mut session, KeyCommand::ToggleEdit);
        drag(&mut session, (15.0, 15.0), (15.0, 15.0));
        key(&mut session, KeyCommand::DeleteSelected);
        assert_eq!(session.store().len(), 1);
        assert_eq!(session.selection(), None);

        key(&mut session, KeyCommand::Undo);
        assert_eq!(session.store().boxes(), boxes.as_slice());
        // Undo with nothing left is a no-op.
        key(&mut session, KeyCommand::Undo);
        assert_eq!(session.store().boxes(), boxes.as_slice());
    }

    #[test]
    fn test_key_during_drag_restores_box() {
        let dir = TempDir::new().unwrap();
        let original = BoundingBox::new("0", 10.0, 10.0, 50.0, 50.0);
        let mut session = session_in(&dir, vec![original.clone()], 1.0, false);
        let now = Instant::now();
        key(&mut session, KeyCommand::ToggleEdit);
        session.handle_event(EditorEvent::PointerPress { x: 30.0, y: 30.0 }, now);
        session.handle_event(EditorEvent::PointerDrag { x: 60.0, y: 30.0 }, now);
        key(&mut session, KeyCommand::SelectNone);

        assert_eq!(session.store().get(0), Some(&original));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_auto_save_deferred_during_drag() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, vec![], 1.0, true);
        let late = Instant::now() + DEFAULT_AUTO_SAVE_INTERVAL + Duration::from_secs(5);

        session.handle_event(EditorEvent::PointerPress { x: 10.0, y: 10.0 }, late);
        session.handle_event(EditorEvent::PointerDrag { x: 40.0, y: 40.0 }, late);
        assert!(!dir.path().join("img.txt").exists());

        session.handle_event(EditorEvent::PointerRelease { x: 40.0, y: 40.0 }, late);
        let saved = std::fs::read_to_string(dir.path().join("img.txt")).unwrap();
        assert_eq!(saved.lines().count(), 1);
    }

    #[test]
    fn test_next_saves_and_finishes() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, vec![BoundingBox::new("0", 0.0, 0.0, 10.0, 10.0)], 1.0, false);
        assert_eq!(key(&mut session, KeyCommand::Next), SessionControl::Finished);

        let report = session.report();
        assert_eq!(report.annotation_path, Some(dir.path().join("img.txt")));
        assert!(!report.user_cancelled);
        // Finished sessions ignore further input.
        assert_eq!(key(&mut session, KeyCommand::ClearAll), SessionControl::Finished);
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_quit_cancels_without_saving() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, vec![BoundingBox::new("0", 0.0, 0.0, 10.0, 10.0)], 1.0, false);
        key(&mut session, KeyCommand::Quit);

        let report = session.report();
        assert!(report.user_cancelled);
        assert_eq!(report.annotation_path, None);
        assert!(!dir.path().join("img.txt").exists());
    }

    #[test]
    fn test_save_and_exit_cancels_batch() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, vec![BoundingBox::new("0", 0.0, 0.0, 10.0, 10.0)], 1.0, false);
        key(&mut session, KeyCommand::SaveAndExit);

        let report = session.report();
        assert!(report.user_cancelled);
        assert!(report.annotation_path.is_some());
    }

    #[test]
    fn test_set_class_by_label_or_id() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, vec![], 1.0, false);
        key(&mut session, KeyCommand::SetClass("1".to_string()));
        assert_eq!(session.active_class_label(), "1-fungo");
        key(&mut session, KeyCommand::SetClass("9-nothing".to_string()));
        assert_eq!(session.active_class_label(), "1-fungo");
        assert!(session.status_line().starts_with("Class: 1-fungo | Count: 0"));
    }
}
