// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Bounding box store for the image being edited.
//!
//! Boxes live in original-image pixel coordinates. Insertion order is the
//! display order, and list index is the identity history entries refer to.

use super::annotation::{BoundingBox, Point};
use crate::editor::handles::Handle;
use crate::editor::history::{ActionHistory, EditKind, HistoryEntry};

/// Smallest width/height a box may have, in image pixels.
pub const MIN_BOX_EXTENT: f64 = 1.0;

/// A box being drawn: fixed origin, moving opposite corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftBox {
    pub origin: Point,
    pub current: Point,
}

impl DraftBox {
    /// Top-left and bottom-right corners.
    pub fn corners(&self) -> (Point, Point) {
        (
            Point::new(self.origin.x.min(self.current.x), self.origin.y.min(self.current.y)),
            Point::new(self.origin.x.max(self.current.x), self.origin.y.max(self.current.y)),
        )
    }
}

/// Ordered boxes of one image plus the image bounds they are clamped to.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStore {
    boxes: Vec<BoundingBox>,
    image_width: f64,
    image_height: f64,
}

impl BoxStore {
    /// Create an empty store for an image of the given size.
    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self::with_boxes(image_width, image_height, Vec::new())
    }

    /// Create a store hydrated with existing boxes.
    pub fn with_boxes(image_width: u32, image_height: u32, boxes: Vec<BoundingBox>) -> Self {
        Self {
            boxes,
            image_width: image_width as f64,
            image_height: image_height as f64,
        }
    }

    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn get(&self, index: usize) -> Option<&BoundingBox> {
        self.boxes.get(index)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn image_size(&self) -> (f64, f64) {
        (self.image_width, self.image_height)
    }

    fn clamp_point(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(0.0, self.image_width),
            point.y.clamp(0.0, self.image_height),
        )
    }

    /// Begin drawing a box at an image position.
    pub fn start_draw(&self, origin: Point) -> DraftBox {
        let origin = self.clamp_point(origin);
        DraftBox {
            origin,
            current: origin,
        }
    }

    /// Move the free corner of a draft.
    pub fn update_draw(&self, draft: DraftBox, current: Point) -> DraftBox {
        DraftBox {
            origin: draft.origin,
            current: self.clamp_point(current),
        }
    }

    /// Append the drafted box and record an `add` entry.
    ///
    /// Drafts thinner than `MIN_BOX_EXTENT` on either axis are discarded.
    pub fn commit_draw(
        &mut self,
        draft: DraftBox,
        class_id: &str,
        history: &mut ActionHistory,
    ) -> Option<usize> {
        let (top_left, bottom_right) = draft.corners();
        let bbox = BoundingBox::from_corners(class_id, top_left, bottom_right);
        if bbox.width() < MIN_BOX_EXTENT || bbox.height() < MIN_BOX_EXTENT {
            log::debug!("Discarded degenerate draft {:?}", bbox);
            return None;
        }
        let index = self.boxes.len();
        self.boxes.push(bbox.clone());
        history.push(HistoryEntry::Add { index, after: bbox });
        log::info!("Added box {}, total: {}", index + 1, self.boxes.len());
        Some(index)
    }

    /// Topmost box containing an image position; later boxes are on top.
    pub fn select_at(&self, point: Point) -> Option<usize> {
        self.boxes.iter().rposition(|b| b.contains(point))
    }

    /// Translate a box, then clamp each coordinate into the image.
    ///
    /// A box pushed against the border shrinks rather than stopping.
    pub fn move_box(&mut self, index: usize, delta: Point) -> bool {
        let (width, height) = (self.image_width, self.image_height);
        let Some(bbox) = self.boxes.get_mut(index) else {
            return false;
        };
        bbox.x1 += delta.x;
        bbox.x2 += delta.x;
        bbox.y1 += delta.y;
        bbox.y2 += delta.y;
        clamp_to_bounds(bbox, width, height);
        true
    }

    /// Drag one handle of a box.
    ///
    /// Only the coordinates the handle owns change. If the drag crosses the
    /// opposite edge the coordinates are swapped and the returned handle is
    /// the mirrored one, so the caller keeps dragging the same physical
    /// corner. Returns `Handle::None` for an out-of-range index.
    pub fn resize(&mut self, index: usize, handle: Handle, delta: Point) -> Handle {
        let (width, height) = (self.image_width, self.image_height);
        let Some(bbox) = self.boxes.get_mut(index) else {
            return Handle::None;
        };

        let (moves_x1, moves_y1, moves_x2, moves_y2) = handle.moves();
        if moves_x1 {
            bbox.x1 += delta.x;
        }
        if moves_y1 {
            bbox.y1 += delta.y;
        }
        if moves_x2 {
            bbox.x2 += delta.x;
        }
        if moves_y2 {
            bbox.y2 += delta.y;
        }

        let mut active = handle;
        if bbox.x1 > bbox.x2 {
            std::mem::swap(&mut bbox.x1, &mut bbox.x2);
            active = active.mirrored_horizontally();
        }
        if bbox.y1 > bbox.y2 {
            std::mem::swap(&mut bbox.y1, &mut bbox.y2);
            active = active.mirrored_vertically();
        }

        clamp_to_bounds(bbox, width, height);
        active
    }

    /// Remove the most recently added box.
    pub fn delete_last(&mut self, history: &mut ActionHistory) -> Option<BoundingBox> {
        let last = self.boxes.len().checked_sub(1)?;
        self.delete_at(last, history)
    }

    /// Remove the box at `index` and record a `delete` entry.
    pub fn delete_at(&mut self, index: usize, history: &mut ActionHistory) -> Option<BoundingBox> {
        if index >= self.boxes.len() {
            return None;
        }
        let removed = self.boxes.remove(index);
        history.push(HistoryEntry::Delete {
            index,
            before: removed.clone(),
        });
        log::info!("Deleted box {}, remaining: {}", index + 1, self.boxes.len());
        Some(removed)
    }

    /// Remove every box, one `delete` entry per box in list order.
    ///
    /// Entries are recorded as successive removals from the front, so each
    /// undo restores exactly one box and a full run of undos restores the
    /// original order.
    pub fn clear_all(&mut self, history: &mut ActionHistory) -> usize {
        let removed = self.boxes.len();
        for bbox in self.boxes.drain(..) {
            history.push(HistoryEntry::Delete {
                index: 0,
                before: bbox,
            });
        }
        log::info!("Cleared {} boxes", removed);
        removed
    }

    /// Record a finished move/resize drag.
    ///
    /// `before` is the box as captured at drag start. Nothing is recorded if
    /// the box did not change.
    pub fn record_edit(
        &self,
        kind: EditKind,
        index: usize,
        before: BoundingBox,
        history: &mut ActionHistory,
    ) -> bool {
        let Some(after) = self.boxes.get(index).cloned() else {
            return false;
        };
        if after == before {
            return false;
        }
        let entry = match kind {
            EditKind::Move => HistoryEntry::Move { index, before, after },
            EditKind::Resize => HistoryEntry::Resize { index, before, after },
            EditKind::Add | EditKind::Delete => return false,
        };
        history.push(entry);
        true
    }

    pub(crate) fn remove_raw(&mut self, index: usize) -> Option<BoundingBox> {
        (index < self.boxes.len()).then(|| self.boxes.remove(index))
    }

    pub(crate) fn replace_raw(&mut self, index: usize, bbox: BoundingBox) -> bool {
        match self.boxes.get_mut(index) {
            Some(slot) => {
                *slot = bbox;
                true
            }
            None => false,
        }
    }

    pub(crate) fn insert_raw(&mut self, index: usize, bbox: BoundingBox) {
        let index = index.min(self.boxes.len());
        self.boxes.insert(index, bbox);
    }
}

/// Clamp every coordinate into the image and keep a minimal extent.
fn clamp_to_bounds(bbox: &mut BoundingBox, width: f64, height: f64) {
    bbox.x1 = bbox.x1.clamp(0.0, width);
    bbox.x2 = bbox.x2.clamp(0.0, width);
    bbox.y1 = bbox.y1.clamp(0.0, height);
    bbox.y2 = bbox.y2.clamp(0.0, height);
    keep_extent(&mut bbox.x1, &mut bbox.x2, width);
    keep_extent(&mut bbox.y1, &mut bbox.y2, height);
}

fn keep_extent(lo: &mut f64, hi: &mut f64, limit: f64) {
    if *hi - *lo >= MIN_BOX_EXTENT {
        return;
    }
    if *lo + MIN_BOX_EXTENT <= limit {
        *hi = *lo + MIN_BOX_EXTENT;
    } else {
        *hi = limit;
        *lo = (limit - MIN_BOX_EXTENT).max(0.0);
    }
}
