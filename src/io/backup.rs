// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rotating backups of label directories.
//!
//! A batch run starts by copying every label file into
//! `<label_dir>/backups/backup_annotations_<YYYYMMDD_HHMMSS>`. Only the most
//! recent snapshots are kept.

use super::media::dir_pattern;
use super::progress::PROGRESS_FILE_NAME;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Subdirectory of the label directory holding snapshots.
pub const BACKUP_DIR_NAME: &str = "backups";
/// Prefix of every snapshot directory name.
pub const BACKUP_PREFIX: &str = "backup_annotations_";
/// Default number of snapshots kept.
pub const DEFAULT_MAX_BACKUPS: usize = 5;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Snapshot directory name for a timestamp.
pub fn backup_dir_name(timestamp: NaiveDateTime) -> String {
    format!("{}{}", BACKUP_PREFIX, timestamp.format(TIMESTAMP_FORMAT))
}

/// Whether a directory name looks like `backup_annotations_YYYYMMDD_HHMMSS`.
pub fn is_backup_dir_name(name: &str) -> bool {
    let Some(stamp) = name.strip_prefix(BACKUP_PREFIX) else {
        return false;
    };
    stamp.len() == 15
        && stamp
            .char_indices()
            .all(|(i, c)| if i == 8 { c == '_' } else { c.is_ascii_digit() })
        && NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok()
}

/// Back up all label files of `label_dir`, then prune old snapshots.
///
/// Returns the snapshot directory, or `None` when there was nothing to back
/// up or the backup failed. Failures are logged, never propagated.
pub fn backup_annotations(label_dir: &Path, timestamp: NaiveDateTime, keep: usize) -> Option<PathBuf> {
    match try_backup(label_dir, timestamp, keep) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Error creating backup: {:#}", e);
            None
        }
    }
}

fn try_backup(label_dir: &Path, timestamp: NaiveDateTime, keep: usize) -> Result<Option<PathBuf>> {
    if !label_dir.is_dir() {
        return Ok(None);
    }

    let root = label_dir.join(BACKUP_DIR_NAME);
    let backup_dir = root.join(backup_dir_name(timestamp));
    std::fs::create_dir_all(&backup_dir)
        .with_context(|| format!("Failed to create {}", backup_dir.display()))?;

    let pattern = dir_pattern(label_dir, "*.txt");
    let mut count = 0;
    for entry in glob::glob(&pattern)? {
        let file = entry?;
        let Some(name) = file.file_name() else {
            continue;
        };
        if name == PROGRESS_FILE_NAME || !file.is_file() {
            continue;
        }
        std::fs::copy(&file, backup_dir.join(name))
            .with_context(|| format!("Failed to copy {}", file.display()))?;
        count += 1;
    }

    if count == 0 {
        std::fs::remove_dir(&backup_dir)
            .with_context(|| format!("Failed to remove empty {}", backup_dir.display()))?;
        log::info!("No annotation files found to back up");
        return Ok(None);
    }

    log::info!("Backup created in {} with {} annotation files", backup_dir.display(), count);
    prune_backups(&root, keep);
    Ok(Some(backup_dir))
}

/// Snapshot directories under `root`, newest first.
pub fn list_backups(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(root).with_context(|| format!("Failed to list {}", root.display()))? {
        let path = entry?.path();
        let is_backup = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(is_backup_dir_name);
        if is_backup && path.is_dir() {
            dirs.push(path);
        }
    }
    // Names embed the timestamp, so name order is time order.
    dirs.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
    Ok(dirs)
}

/// Delete all but the `keep` newest snapshots. Returns how many were removed.
pub fn prune_backups(root: &Path, keep: usize) -> usize {
    let dirs = match list_backups(root) {
        Ok(dirs) => dirs,
        Err(e) => {
            log::warn!("Could not list backups: {:#}", e);
            return 0;
        }
    };

    let mut removed = 0;
    for old in dirs.iter().skip(keep) {
        match std::fs::remove_dir_all(old) {
            Ok(()) => {
                removed += 1;
                log::info!("Removed old backup: {}", old.display());
            }
            Err(e) => log::warn!("Could not remove old backup {}: {}", old.display(), e),
        }
    }
    removed
}
