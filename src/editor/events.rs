// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Semantic input events consumed by the editor session.
//!
//! The host translates raw widget input into these. Pointer positions are
//! viewport (canvas) coordinates with the pan offset already removed.

use serde::{Deserialize, Serialize};

/// A single input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    PointerPress { x: f64, y: f64 },
    PointerDrag { x: f64, y: f64 },
    PointerRelease { x: f64, y: f64 },
    /// Positive steps zoom in, negative steps zoom out.
    Zoom { steps: i32 },
    Pan { dx: f64, dy: f64 },
    Key { command: KeyCommand },
}

impl EditorEvent {
    pub fn key(command: KeyCommand) -> Self {
        EditorEvent::Key { command }
    }
}

/// Keyboard (or button) commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommand {
    Undo,
    ClearAll,
    Save,
    ToggleEdit,
    TogglePan,
    CycleClass,
    SetClass(String),
    DeleteLast,
    DeleteSelected,
    SelectNone,
    /// Save and move on to the next image.
    Next,
    /// Save and stop the batch.
    SaveAndExit,
    /// Stop the batch without saving.
    Quit,
}

impl KeyCommand {
    /// Map a keyboard shortcut to its command.
    pub fn from_shortcut(key: &str) -> Option<KeyCommand> {
        let command = match key {
            "z" => KeyCommand::Undo,
            "r" => KeyCommand::ClearAll,
            "s" => KeyCommand::Save,
            "e" => KeyCommand::ToggleEdit,
            "p" => KeyCommand::TogglePan,
            "c" => KeyCommand::CycleClass,
            "d" => KeyCommand::Next,
            "x" => KeyCommand::SaveAndExit,
            "q" => KeyCommand::Quit,
            "Delete" => KeyCommand::DeleteLast,
            "Escape" => KeyCommand::SelectNone,
            _ => return None,
        };
        Some(command)
    }
}
