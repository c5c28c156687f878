// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotator configuration.
//!
//! Settings live in a YAML file. Lookup order is an explicit path, then
//! `./config.yaml`, then `~/.bbox-annotator/config.yaml`; when none is
//! usable the built-in defaults apply.

use crate::editor::handles::DEFAULT_HANDLE_SIZE;
use crate::editor::history::DEFAULT_MAX_HISTORY;
use crate::io::backup::DEFAULT_MAX_BACKUPS;
use crate::io::persistence::DEFAULT_AUTO_SAVE_INTERVAL;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the working and home directories.
pub const CONFIG_FILE_NAME: &str = "config.yaml";
/// Directory under `$HOME` holding the per-user config.
pub const USER_CONFIG_DIR: &str = ".bbox-annotator";

/// Settings shared by the editor and the batch workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Class labels like `0-levedura`; the prefix before `-` is the id.
    pub classes: Vec<String>,
    pub auto_save: bool,
    pub auto_save_interval_secs: u64,
    /// Handle half-size in viewport units.
    pub handle_size: f64,
    pub max_history: usize,
    pub max_backups: usize,
    pub max_display_width: u32,
    pub max_display_height: u32,
    /// Extensions (without dot) of images picked up by a batch.
    pub image_extensions: Vec<String>,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            classes: vec![
                "0-levedura".to_string(),
                "1-fungo".to_string(),
                "2-micro-alga".to_string(),
            ],
            auto_save: true,
            auto_save_interval_secs: DEFAULT_AUTO_SAVE_INTERVAL.as_secs(),
            handle_size: DEFAULT_HANDLE_SIZE,
            max_history: DEFAULT_MAX_HISTORY,
            max_backups: DEFAULT_MAX_BACKUPS,
            max_display_width: 800,
            max_display_height: 600,
            image_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
        }
    }
}

impl AnnotatorConfig {
    pub fn auto_save_interval(&self) -> Duration {
        Duration::from_secs(self.auto_save_interval_secs)
    }

    /// Load config from a YAML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a YAML file, creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            bail!("At least one class must be configured");
        }
        if self.handle_size <= 0.0 {
            bail!("Handle size must be > 0");
        }
        if self.max_history == 0 {
            bail!("History size must be > 0");
        }
        if self.max_display_width == 0 || self.max_display_height == 0 {
            bail!("Display dimensions must be > 0");
        }
        if self.image_extensions.is_empty() {
            bail!("At least one image extension must be configured");
        }
        Ok(())
    }

    /// Candidate config files, most specific first.
    pub fn search_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = explicit.map(Path::to_path_buf).into_iter().collect();
        paths.push(PathBuf::from(CONFIG_FILE_NAME));
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(USER_CONFIG_DIR).join(CONFIG_FILE_NAME));
        }
        paths
    }

    /// Load the first existing config file, falling back to defaults.
    ///
    /// A file that exists but cannot be parsed is logged and defaults are
    /// used; later candidates are not consulted.
    pub fn discover(explicit: Option<&Path>) -> Self {
        Self::load_first(&Self::search_paths(explicit))
    }

    fn load_first(paths: &[PathBuf]) -> Self {
        let Some(path) = paths.iter().find(|p| p.is_file()) else {
            log::warn!("No config file found, using defaults");
            return Self::default();
        };
        match Self::load_from_file(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }
}
