// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides utilities for coordinate transformations between
//! original image pixels, the zoomed viewport, and normalized coordinates.

use crate::models::annotation::Point;

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.5;
/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 5.0;
/// Multiplier applied per zoom step.
pub const ZOOM_STEP: f64 = 1.1;

/// Mapping between image pixels and viewport units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    /// Fixed per image, computed once from image and window dimensions.
    pub scale_to_fit: f64,
    /// User zoom, always within `[MIN_ZOOM, MAX_ZOOM]`.
    pub zoom_factor: f64,
    /// Applied by the renderer, never by the transforms below.
    pub pan_offset: Point,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ViewportState {
    /// Create a viewport with no zoom and no pan.
    pub fn new(scale_to_fit: f64) -> Self {
        Self {
            scale_to_fit,
            zoom_factor: 1.0,
            pan_offset: Point::default(),
        }
    }

    /// Fit an image into a window, shrinking only.
    pub fn fit(image_width: u32, image_height: u32, max_width: u32, max_height: u32) -> Self {
        if image_width == 0 || image_height == 0 {
            return Self::new(1.0);
        }
        let scale = (max_width as f64 / image_width as f64).min(max_height as f64 / image_height as f64);
        Self::new(scale.min(1.0))
    }

    /// Combined image-pixel to viewport scale.
    pub fn effective_scale(&self) -> f64 {
        self.scale_to_fit * self.zoom_factor
    }

    /// Set the zoom factor, clamped. Returns true if it changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let clamped = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let changed = clamped != self.zoom_factor;
        self.zoom_factor = clamped;
        changed
    }

    /// Zoom in (positive steps) or out (negative steps).
    pub fn zoom_by_steps(&mut self, steps: i32) -> bool {
        self.set_zoom(self.zoom_factor * ZOOM_STEP.powi(steps))
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_offset.x += dx;
        self.pan_offset.y += dy;
    }
}

/// Map an image-pixel position to viewport units.
pub fn image_to_viewport(point: Point, viewport: &ViewportState) -> Point {
    let scale = viewport.effective_scale();
    Point::new(point.x * scale, point.y * scale)
}

/// Map a viewport position back to image pixels.
pub fn viewport_to_image(point: Point, viewport: &ViewportState) -> Point {
    viewport_delta_to_image_delta(point, viewport)
}

/// Convert a viewport displacement to an image-pixel displacement.
pub fn viewport_delta_to_image_delta(delta: Point, viewport: &ViewportState) -> Point {
    let scale = viewport.effective_scale();
    Point::new(delta.x / scale, delta.y / scale)
}

/// Convert pixel coordinates to normalized coordinates (0.0 to 1.0).
pub fn normalize_coordinates(pixel_x: f64, pixel_y: f64, width: u32, height: u32) -> Point {
    Point {
        x: pixel_x / width as f64,
        y: pixel_y / height as f64,
    }
}

/// Convert normalized coordinates to pixel coordinates.
pub fn denormalize_coordinates(point: &Point, width: u32, height: u32) -> (f64, f64) {
    (point.x * width as f64, point.y * height as f64)
}
