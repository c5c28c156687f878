// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Recorded editor event scripts.
//!
//! A script is a list of editor events. For image `foo.png` the headless
//! host looks for `foo.yaml`, `foo.yml` or `foo.json` in its script
//! directory.

use crate::editor::events::EditorEvent;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

const SCRIPT_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Import an event script from YAML format.
pub fn import_yaml(path: &Path) -> Result<Vec<EditorEvent>> {
    let yaml = std::fs::read_to_string(path)?;
    let events = serde_yaml::from_str(&yaml)?;
    Ok(events)
}

/// Import an event script from JSON format.
pub fn import_json(path: &Path) -> Result<Vec<EditorEvent>> {
    let json = std::fs::read_to_string(path)?;
    let events = serde_json::from_str(&json)?;
    Ok(events)
}

/// Import an event script, choosing the format from the extension.
pub fn load_event_script(path: &Path) -> Result<Vec<EditorEvent>> {
    let extension = path.extension().and_then(|s| s.to_str());
    let events = match extension {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        _ => bail!("Unsupported file extension: {:?}", extension),
    }
    .with_context(|| format!("Failed to import event script {}", path.display()))?;

    log::info!("Imported {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Script recorded for `image` in `script_dir`, if any.
pub fn find_script(script_dir: &Path, image: &Path) -> Option<PathBuf> {
    let stem = image.file_stem()?.to_string_lossy();
    SCRIPT_EXTENSIONS
        .iter()
        .map(|ext| script_dir.join(format!("{}.{}", stem, ext)))
        .find(|candidate| candidate.is_file())
}
