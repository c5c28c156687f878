// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Host-facing side of the editor.
//!
//! A host feeds semantic events into an editing session and paints the
//! frames it gets back. The crate ships a headless host that replays
//! recorded event scripts.

pub mod overlay;
pub mod replay;

use crate::editor::events::EditorEvent;
use overlay::RenderFrame;
use std::time::Instant;

/// Source of input events and sink for render frames.
pub trait EditorHost {
    /// Next input event, or `None` when the host has no more input.
    fn next_event(&mut self) -> Option<EditorEvent>;

    /// Paint the current state of the session.
    fn repaint(&mut self, frame: &RenderFrame);

    /// Clock used for auto-save checks.
    fn now(&self) -> Instant {
        Instant::now()
    }
}
