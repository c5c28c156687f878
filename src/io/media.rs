// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file discovery and inspection.
//!
//! The editor never decodes pixels itself; it only needs image dimensions
//! to map between pixel, normalized and viewport coordinates.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Read the pixel dimensions of an image from its header.
pub fn image_dimensions(path: &Path) -> Result<(u32, u32)> {
    let (width, height) = image::image_dimensions(path)
        .with_context(|| format!("Image could not be loaded: {}", path.display()))?;
    if width == 0 || height == 0 {
        bail!("Image has no pixels: {}", path.display());
    }
    Ok((width, height))
}

/// Glob pattern matching `file_pattern` inside `dir`.
///
/// The directory part is escaped so names like `run[1]` match literally.
pub(crate) fn dir_pattern(dir: &Path, file_pattern: &str) -> String {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    Path::new(&escaped).join(file_pattern).to_string_lossy().into_owned()
}

/// List images with the given extensions in `dir`, sorted by path.
pub fn list_images(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for ext in extensions {
        let pattern = dir_pattern(dir, &format!("*.{}", ext));
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) if path.is_file() => images.push(path),
                Ok(_) => {}
                Err(e) => log::warn!("Skipping unreadable entry: {}", e),
            }
        }
    }
    images.sort();
    images.dedup();
    Ok(images)
}
