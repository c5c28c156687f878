// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label persistence for one editing session, including auto-save.
//!
//! Auto-save is a polling check: the host calls `check_auto_save` from its
//! own event handling, so it can never interleave with an edit.

use super::labels::{load_labels, save_labels};
use crate::models::annotation::BoundingBox;
use crate::models::store::BoxStore;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Default auto-save interval (five minutes).
pub const DEFAULT_AUTO_SAVE_INTERVAL: Duration = Duration::from_secs(300);

/// Owns the label file of the image being edited.
#[derive(Debug, Clone)]
pub struct PersistenceManager {
    label_path: PathBuf,
    image_width: u32,
    image_height: u32,
    auto_save: bool,
    auto_save_interval: Duration,
    last_save_time: Instant,
    saved: bool,
}

impl PersistenceManager {
    pub fn new(
        label_path: PathBuf,
        image_width: u32,
        image_height: u32,
        auto_save: bool,
        auto_save_interval: Duration,
        now: Instant,
    ) -> Self {
        Self {
            label_path,
            image_width,
            image_height,
            auto_save,
            auto_save_interval,
            last_save_time: now,
            saved: false,
        }
    }

    pub fn label_path(&self) -> &Path {
        &self.label_path
    }

    /// Whether any save succeeded during this session.
    pub fn has_saved(&self) -> bool {
        self.saved
    }

    /// Load existing boxes, or start empty.
    ///
    /// A missing file is normal; an unreadable one is logged and treated as
    /// empty.
    pub fn load(&self) -> Vec<BoundingBox> {
        if !self.label_path.exists() {
            return Vec::new();
        }
        log::info!("Loading existing annotations from {}", self.label_path.display());
        load_labels(&self.label_path, self.image_width, self.image_height).unwrap_or_else(|e| {
            log::error!("{:#}", e);
            Vec::new()
        })
    }

    /// Save the committed boxes. Failures are logged and reported as `false`;
    /// the next save retries.
    pub fn save(&mut self, store: &BoxStore, now: Instant) -> bool {
        match save_labels(store.boxes(), &self.label_path, self.image_width, self.image_height) {
            Ok(()) => {
                self.saved = true;
                self.last_save_time = now;
                true
            }
            Err(e) => {
                log::error!("Failed to save annotations: {:#}", e);
                false
            }
        }
    }

    /// Save if auto-save is on and the interval has elapsed.
    ///
    /// Returns true when a save was performed.
    pub fn check_auto_save(&mut self, store: &BoxStore, now: Instant) -> bool {
        if !self.auto_save {
            return false;
        }
        if now.saturating_duration_since(self.last_save_time) <= self.auto_save_interval {
            return false;
        }
        log::info!("Auto-saving {}", self.label_path.display());
        // The timer restarts even when the save fails.
        self.last_save_time = now;
        self.save(store, now)
    }
}
