// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Resize handle hit-testing.
//!
//! A selected box exposes eight grab points: four corners and four edge
//! midpoints. Hit-testing happens in viewport space so the grab area keeps
//! the same on-screen size at every zoom level.

use crate::models::annotation::{BoundingBox, Point};
use crate::util::geometry::{image_to_viewport, ViewportState};

/// Default handle half-size in viewport units.
pub const DEFAULT_HANDLE_SIZE: f64 = 6.0;

/// Grab area is a square of this many handle sizes around the handle.
const DETECT_FACTOR: f64 = 1.5;

/// One of the eight resize handles of a box, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handle {
    #[default]
    None,
    NorthWest,
    NorthEast,
    SouthEast,
    SouthWest,
    North,
    East,
    South,
    West,
}

impl Handle {
    /// All real handles in hit-test priority order: corners first.
    pub const ALL: [Handle; 8] = [
        Handle::NorthWest,
        Handle::NorthEast,
        Handle::SouthEast,
        Handle::SouthWest,
        Handle::North,
        Handle::East,
        Handle::South,
        Handle::West,
    ];

    /// Counterpart after the box flips left/right.
    pub fn mirrored_horizontally(self) -> Handle {
        match self {
            Handle::NorthWest => Handle::NorthEast,
            Handle::NorthEast => Handle::NorthWest,
            Handle::SouthEast => Handle::SouthWest,
            Handle::SouthWest => Handle::SouthEast,
            Handle::East => Handle::West,
            Handle::West => Handle::East,
            other => other,
        }
    }

    /// Counterpart after the box flips top/bottom.
    pub fn mirrored_vertically(self) -> Handle {
        match self {
            Handle::NorthWest => Handle::SouthWest,
            Handle::SouthWest => Handle::NorthWest,
            Handle::NorthEast => Handle::SouthEast,
            Handle::SouthEast => Handle::NorthEast,
            Handle::North => Handle::South,
            Handle::South => Handle::North,
            other => other,
        }
    }

    /// Which coordinates this handle drags, as `(x1, y1, x2, y2)`.
    pub fn moves(self) -> (bool, bool, bool, bool) {
        match self {
            Handle::None => (false, false, false, false),
            Handle::NorthWest => (true, true, false, false),
            Handle::NorthEast => (false, true, true, false),
            Handle::SouthEast => (false, false, true, true),
            Handle::SouthWest => (true, false, false, true),
            Handle::North => (false, true, false, false),
            Handle::East => (false, false, true, false),
            Handle::South => (false, false, false, true),
            Handle::West => (true, false, false, false),
        }
    }

    /// Position of the handle on a box, in image pixels.
    pub fn anchor(self, bbox: &BoundingBox) -> Option<Point> {
        let mid_x = (bbox.x1 + bbox.x2) / 2.0;
        let mid_y = (bbox.y1 + bbox.y2) / 2.0;
        let point = match self {
            Handle::None => return None,
            Handle::NorthWest => Point::new(bbox.x1, bbox.y1),
            Handle::NorthEast => Point::new(bbox.x2, bbox.y1),
            Handle::SouthEast => Point::new(bbox.x2, bbox.y2),
            Handle::SouthWest => Point::new(bbox.x1, bbox.y2),
            Handle::North => Point::new(mid_x, bbox.y1),
            Handle::East => Point::new(bbox.x2, mid_y),
            Handle::South => Point::new(mid_x, bbox.y2),
            Handle::West => Point::new(bbox.x1, mid_y),
        };
        Some(point)
    }
}

/// Finds the handle under the pointer.
#[derive(Debug, Clone, Copy)]
pub struct HandleDetector {
    handle_size: f64,
}

impl Default for HandleDetector {
    fn default() -> Self {
        Self::new(DEFAULT_HANDLE_SIZE)
    }
}

impl HandleDetector {
    pub fn new(handle_size: f64) -> Self {
        Self { handle_size }
    }

    pub fn handle_size(&self) -> f64 {
        self.handle_size
    }

    /// Detect the handle of `boxes[index]` under a viewport position.
    ///
    /// Returns `Handle::None` when the index is out of range.
    pub fn detect(
        &self,
        pointer: Point,
        boxes: &[BoundingBox],
        index: usize,
        viewport: &ViewportState,
    ) -> Handle {
        match boxes.get(index) {
            Some(bbox) => self.detect_on(pointer, bbox, viewport),
            None => Handle::None,
        }
    }

    /// Detect the handle of a single box under a viewport position.
    pub fn detect_on(&self, pointer: Point, bbox: &BoundingBox, viewport: &ViewportState) -> Handle {
        let reach = self.handle_size * DETECT_FACTOR;
        Handle::ALL
            .into_iter()
            .find(|handle| {
                handle.anchor(bbox).is_some_and(|anchor| {
                    let at = image_to_viewport(anchor, viewport);
                    (pointer.x - at.x).abs() <= reach && (pointer.y - at.y).abs() <= reach
                })
            })
            .unwrap_or(Handle::None)
    }

    /// Viewport positions of all eight handles, for painting.
    pub fn handle_positions(&self, bbox: &BoundingBox, viewport: &ViewportState) -> Vec<(Handle, Point)> {
        Handle::ALL
            .into_iter()
            .filter_map(|handle| {
                handle
                    .anchor(bbox)
                    .map(|anchor| (handle, image_to_viewport(anchor, viewport)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<BoundingBox> {
        vec![BoundingBox::new("0", 10.0, 10.0, 50.0, 50.0)]
    }

    #[test]
    fn test_detect_each_handle_exactly() {
        let boxes = sample();
        let viewport = ViewportState::new(1.0);
        let detector = HandleDetector::default();

        let cases = [
            (Point::new(10.0, 10.0), Handle::NorthWest),
            (Point::new(50.0, 10.0), Handle::NorthEast),
            (Point::new(50.0, 50.0), Handle::SouthEast),
            (Point::new(10.0, 50.0), Handle::SouthWest),
            (Point::new(30.0, 10.0), Handle::North),
            (Point::new(50.0, 30.0), Handle::East),
            (Point::new(30.0, 50.0), Handle::South),
            (Point::new(10.0, 30.0), Handle::West),
        ];
        for (pointer, expected) in cases {
            assert_eq!(detector.detect(pointer, &boxes, 0, &viewport), expected);
        }
    }

    #[test]
    fn test_center_is_no_handle() {
        let boxes = sample();
        let viewport = ViewportState::new(1.0);
        let detector = HandleDetector::default();
        assert_eq!(detector.detect(Point::new(30.0, 30.0), &boxes, 0, &viewport), Handle::None);
    }

    #[test]
    fn test_square_region_not_circle() {
        let boxes = sample();
        let viewport = ViewportState::new(1.0);
        let detector = HandleDetector::default();
        // 9 units off on both axes: outside a radius of 9 but inside the square.
        assert_eq!(
            detector.detect(Point::new(19.0, 19.0), &boxes, 0, &viewport),
            Handle::NorthWest
        );
        assert_eq!(detector.detect(Point::new(19.5, 10.0), &boxes, 0, &viewport), Handle::None);
    }

    #[test]
    fn test_corners_win_over_edges() {
        // Small box: the N midpoint region overlaps the NW corner region.
        let boxes = vec![BoundingBox::new("0", 0.0, 0.0, 10.0, 10.0)];
        let viewport = ViewportState::new(1.0);
        let detector = HandleDetector::default();
        assert_eq!(detector.detect(Point::new(4.0, 0.0), &boxes, 0, &viewport), Handle::NorthWest);
    }

    #[test]
    fn test_detection_follows_zoom() {
        let boxes = sample();
        let mut viewport = ViewportState::new(0.5);
        viewport.set_zoom(4.0);
        let detector = HandleDetector::default();
        // SE corner lands at (100, 100) in viewport space.
        assert_eq!(
            detector.detect(Point::new(100.0, 100.0), &boxes, 0, &viewport),
            Handle::SouthEast
        );
        assert_eq!(detector.detect(Point::new(50.0, 50.0), &boxes, 0, &viewport), Handle::None);
    }

    #[test]
    fn test_out_of_range_index() {
        let boxes = sample();
        let viewport = ViewportState::new(1.0);
        let detector = HandleDetector::default();
        assert_eq!(detector.detect(Point::new(10.0, 10.0), &boxes, 3, &viewport), Handle::None);
    }

    #[test]
    fn test_mirroring_is_involution() {
        for handle in Handle::ALL {
            assert_eq!(handle.mirrored_horizontally().mirrored_horizontally(), handle);
            assert_eq!(handle.mirrored_vertically().mirrored_vertically(), handle);
        }
        assert_eq!(Handle::West.mirrored_horizontally(), Handle::East);
        assert_eq!(Handle::North.mirrored_horizontally(), Handle::North);
    }
}
