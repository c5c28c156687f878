// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Headless host replaying a fixed list of events.

use super::overlay::RenderFrame;
use super::EditorHost;
use crate::editor::events::EditorEvent;
use std::collections::VecDeque;

/// Feeds recorded events to a session and keeps the last frame.
#[derive(Debug, Default)]
pub struct ReplayHost {
    events: VecDeque<EditorEvent>,
    frames_painted: usize,
    last_frame: Option<RenderFrame>,
}

impl ReplayHost {
    pub fn new(events: Vec<EditorEvent>) -> Self {
        Self {
            events: events.into(),
            frames_painted: 0,
            last_frame: None,
        }
    }

    /// Events not yet consumed.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    pub fn frames_painted(&self) -> usize {
        self.frames_painted
    }

    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.last_frame.as_ref()
    }
}

impl EditorHost for ReplayHost {
    fn next_event(&mut self) -> Option<EditorEvent> {
        self.events.pop_front()
    }

    fn repaint(&mut self, frame: &RenderFrame) {
        self.frames_painted += 1;
        log::debug!("Frame {}: {}", self.frames_painted, frame.status);
        self.last_frame = Some(frame.clone());
    }
}
