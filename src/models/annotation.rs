// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the core data structures for representing
//! labeled bounding boxes in original-image pixel coordinates.

use serde::{Deserialize, Serialize};

/// A 2D point or displacement.
///
/// The coordinate space depends on context: image pixels for box geometry,
/// viewport units for pointer positions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    pub fn delta_from(&self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// A labeled, axis-aligned rectangle in original-image pixels.
///
/// Kept ordered so that `x1 < x2` and `y1 < y2` after every committed edit.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub class_id: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Create a box, ordering the coordinates so the first corner is top-left.
    pub fn new(class_id: impl Into<String>, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            class_id: class_id.into(),
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Create a box spanning two opposite corners.
    pub fn from_corners(class_id: impl Into<String>, a: Point, b: Point) -> Self {
        Self::new(class_id, a.x, a.y, b.x, b.y)
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn center(&self) -> Point {
        Point::new(self.x1 + self.width() / 2.0, self.y1 + self.height() / 2.0)
    }

    /// Check whether a point lies inside the rectangle (edges included).
    pub fn contains(&self, point: Point) -> bool {
        self.x1 <= point.x && point.x <= self.x2 && self.y1 <= point.y && point.y <= self.y2
    }

    /// Check the ordering invariant.
    pub fn is_well_formed(&self) -> bool {
        self.x1 < self.x2 && self.y1 < self.y2
    }
}
