// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Batch progress file.
//!
//! A single JSON record per output directory, overwritten after every
//! completed or skipped image. Writing is best-effort.

use crate::models::progress::ProgressRecord;
use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

/// Reserved progress file name, excluded from backups.
pub const PROGRESS_FILE_NAME: &str = ".annotation_progress.json";

pub fn progress_path(output_dir: &Path) -> PathBuf {
    output_dir.join(PROGRESS_FILE_NAME)
}

/// Write a progress record to the output directory.
pub fn write_progress(output_dir: &Path, record: &ProgressRecord) -> Result<()> {
    let path = progress_path(output_dir);
    let json = serde_json::to_string(record)?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Record `current_image` as the last processed image.
///
/// Failures are logged and reported as `false`; they never abort a batch.
pub fn save_progress(output_dir: &Path, current_image: &Path) -> bool {
    let record = ProgressRecord::new(
        current_image.to_string_lossy().into_owned(),
        Local::now().naive_local(),
    );
    match write_progress(output_dir, &record) {
        Ok(()) => {
            log::debug!("Progress saved: {}", record.last_annotated_path);
            true
        }
        Err(e) => {
            log::warn!("Could not save progress: {:#}", e);
            false
        }
    }
}

/// Read the progress record, if a valid one exists.
pub fn load_progress(output_dir: &Path) -> Option<ProgressRecord> {
    let path = progress_path(output_dir);
    if !path.exists() {
        return None;
    }
    let result: Result<ProgressRecord> = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))
        .and_then(|json| serde_json::from_str(&json).context("Invalid progress record"));
    match result {
        Ok(record) => Some(record),
        Err(e) => {
            log::warn!("Error loading progress: {:#}", e);
            None
        }
    }
}
