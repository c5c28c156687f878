// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Bounding box annotation engine.
//!
//! Boxes are edited through an event-driven session (draw, select, move,
//! resize, delete, undo), stored as YOLO label files next to each image set,
//! auto-saved, and processed in resumable batches with rotating backups.

pub mod app;
pub mod config;
pub mod editor;
pub mod io;
pub mod models;
pub mod ui;
pub mod util;
pub mod workflow;

pub use app::Annotator;
pub use config::AnnotatorConfig;
pub use editor::events::{EditorEvent, KeyCommand};
pub use editor::session::{EditorSession, SessionReport};
pub use models::annotation::{BoundingBox, Point};
pub use ui::EditorHost;
pub use workflow::batch::{BatchSummary, BatchWorkflowController};
pub use workflow::policy::{BatchPolicy, ExistingLabelPolicy, FixedPolicy, ResumePolicy};
