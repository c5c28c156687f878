// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Render frame for the annotation overlay.
//!
//! The editing core never draws. After each event it produces a
//! `RenderFrame` describing what the canvas should show, in viewport units
//! before the pan offset is applied.

use crate::editor::handles::Handle;
use crate::editor::session::{EditorSession, Interaction};
use crate::models::annotation::{BoundingBox, Point};
use crate::util::geometry::{image_to_viewport, ViewportState};

/// How a rectangle should be painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxStyle {
    Normal,
    Selected,
}

/// A committed box as it appears on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxOverlay {
    pub min: Point,
    pub max: Point,
    /// `"<class name> #<n>"`, numbered from 1.
    pub label: String,
    pub style: BoxStyle,
}

/// One square resize handle of the selected box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleSquare {
    pub handle: Handle,
    pub center: Point,
    /// Half the side length, in viewport units.
    pub half_size: f64,
}

/// Everything the host needs to repaint the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub boxes: Vec<BoxOverlay>,
    pub handles: Vec<HandleSquare>,
    pub draft: Option<(Point, Point)>,
    pub pan_offset: Point,
    pub zoom_factor: f64,
    pub status: String,
}

impl RenderFrame {
    /// Describe the current state of a session.
    pub fn from_session(session: &EditorSession) -> Self {
        let viewport = session.viewport();
        let selection = session.selection();

        let boxes = session
            .store()
            .boxes()
            .iter()
            .enumerate()
            .map(|(i, bbox)| {
                let (min, max) = to_viewport_rect(bbox, viewport);
                BoxOverlay {
                    min,
                    max,
                    label: format!("{} #{}", session.classes().display_name(&bbox.class_id), i + 1),
                    style: if selection == Some(i) {
                        BoxStyle::Selected
                    } else {
                        BoxStyle::Normal
                    },
                }
            })
            .collect();

        let handles = selection
            .and_then(|i| session.store().get(i))
            .map(|bbox| {
                let detector = session.detector();
                detector
                    .handle_positions(bbox, viewport)
                    .into_iter()
                    .map(|(handle, center)| HandleSquare {
                        handle,
                        center,
                        half_size: detector.handle_size(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let draft = match session.interaction() {
            Interaction::Drawing(draft) => {
                let (top_left, bottom_right) = draft.corners();
                Some((
                    image_to_viewport(top_left, viewport),
                    image_to_viewport(bottom_right, viewport),
                ))
            }
            _ => None,
        };

        Self {
            boxes,
            handles,
            draft,
            pan_offset: viewport.pan_offset,
            zoom_factor: viewport.zoom_factor,
            status: session.status_line(),
        }
    }
}

fn to_viewport_rect(bbox: &BoundingBox, viewport: &ViewportState) -> (Point, Point) {
    (
        image_to_viewport(Point::new(bbox.x1, bbox.y1), viewport),
        image_to_viewport(Point::new(bbox.x2, bbox.y2), viewport),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::events::{EditorEvent, KeyCommand};
    use crate::editor::handles::HandleDetector;
    use crate::editor::history::ActionHistory;
    use crate::io::persistence::{PersistenceManager, DEFAULT_AUTO_SAVE_INTERVAL};
    use crate::models::classes::ClassCatalog;
    use crate::models::store::BoxStore;
    use std::time::Instant;

    fn session(boxes: Vec<BoundingBox>) -> EditorSession {
        let persistence = PersistenceManager::new(
            std::env::temp_dir().join("overlay-never-written.txt"),
            400,
            300,
            false,
            DEFAULT_AUTO_SAVE_INTERVAL,
            Instant::now(),
        );
        EditorSession::new(
            BoxStore::with_boxes(400, 300, boxes),
            ViewportState::new(0.5),
            ClassCatalog::new(vec!["0-levedura".to_string(), "1-fungo".to_string()]),
            HandleDetector::default(),
            ActionHistory::default(),
            persistence,
        )
    }

    #[test]
    fn test_labels_and_scaled_rects() {
        let session = session(vec![
            BoundingBox::new("1", 20.0, 40.0, 100.0, 80.0),
            BoundingBox::new("7", 0.0, 0.0, 10.0, 10.0),
        ]);
        let frame = RenderFrame::from_session(&session);

        assert_eq!(frame.boxes[0].label, "1-fungo #1");
        assert_eq!(frame.boxes[1].label, "7-unknown #2");
        assert_eq!(frame.boxes[0].min, Point::new(10.0, 20.0));
        assert_eq!(frame.boxes[0].max, Point::new(50.0, 40.0));
        assert!(frame.handles.is_empty());
        assert_eq!(frame.draft, None);
        assert_eq!(frame.boxes[0].style, BoxStyle::Normal);
    }

    #[test]
    fn test_selection_shows_eight_handles() {
        let mut session = session(vec![BoundingBox::new("0", 20.0, 40.0, 100.0, 80.0)]);
        let now = Instant::now();
        session.handle_event(EditorEvent::key(KeyCommand::ToggleEdit), now);
        session.handle_event(EditorEvent::PointerPress { x: 30.0, y: 30.0 }, now);
        session.handle_event(EditorEvent::PointerRelease { x: 30.0, y: 30.0 }, now);

        let frame = RenderFrame::from_session(&session);
        assert_eq!(frame.boxes[0].style, BoxStyle::Selected);
        assert_eq!(frame.handles.len(), 8);
        assert_eq!(frame.handles[0].handle, Handle::NorthWest);
        assert_eq!(frame.handles[0].center, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_draft_in_viewport_units() {
        let mut session = session(vec![]);
        let now = Instant::now();
        session.handle_event(EditorEvent::PointerPress { x: 40.0, y: 40.0 }, now);
        session.handle_event(EditorEvent::PointerDrag { x: 10.0, y: 20.0 }, now);

        let frame = RenderFrame::from_session(&session);
        assert_eq!(frame.draft, Some((Point::new(10.0, 20.0), Point::new(40.0, 40.0))));
        assert!(frame.status.contains("Count: 0"));
    }
}
