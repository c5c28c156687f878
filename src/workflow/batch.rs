// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Batch annotation of a directory of images.
//!
//! A run lists the images, backs up existing labels, picks a start index
//! from the progress record, then opens one editing session per image until
//! the list is exhausted or the user cancels.

use super::policy::{BatchPolicy, ExistingLabelPolicy, ResumePolicy};
use crate::config::AnnotatorConfig;
use crate::editor::session::SessionReport;
use crate::io::backup::backup_annotations;
use crate::io::labels::label_path_for;
use crate::io::media::list_images;
use crate::io::progress::{load_progress, save_progress};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use std::path::Path;

/// How an editing session should be seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preload {
    /// Load the boxes of the existing label file, if any.
    Existing,
    /// Start with no boxes.
    Empty,
}

/// Opens one editing session per image.
pub trait SessionRunner {
    fn annotate(&mut self, image: &Path, output_dir: &Path, preload: Preload) -> SessionReport;
}

/// Where a batch run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchState {
    #[default]
    Idle,
    LoadingProgress,
    SelectingStartIndex,
    Loading { index: usize },
    Editing { index: usize },
    Saving { index: usize },
    Advancing { index: usize },
    Done,
    Cancelled,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total_images: usize,
    /// Images annotated this run plus images that already had labels.
    pub total_annotated: usize,
    pub annotated_this_session: usize,
    pub cancelled: bool,
}

impl BatchSummary {
    pub fn remaining(&self) -> usize {
        self.total_images.saturating_sub(self.total_annotated)
    }
}

/// First image to process given the progress record position.
///
/// A record pointing at the last image restarts the batch.
pub fn start_index(last_index: usize, total: usize, policy: ResumePolicy) -> usize {
    if last_index + 1 >= total {
        return 0;
    }
    match policy {
        ResumePolicy::Continue => last_index + 1,
        ResumePolicy::Restart => 0,
        ResumePolicy::Review => last_index,
    }
}

/// Drives a batch run.
pub struct BatchWorkflowController {
    image_extensions: Vec<String>,
    max_backups: usize,
    clock: Box<dyn Fn() -> NaiveDateTime>,
    state: BatchState,
}

impl BatchWorkflowController {
    pub fn new(config: &AnnotatorConfig) -> Self {
        Self {
            image_extensions: config.image_extensions.clone(),
            max_backups: config.max_backups,
            clock: Box::new(|| Local::now().naive_local()),
            state: BatchState::Idle,
        }
    }

    /// Replace the clock used to name backups.
    pub fn with_clock(mut self, clock: Box<dyn Fn() -> NaiveDateTime>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    fn set_state(&mut self, state: BatchState) {
        log::debug!("Batch state: {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Annotate every image of `image_dir`, writing labels to `output_dir`.
    pub fn run(
        &mut self,
        image_dir: &Path,
        output_dir: &Path,
        policy: &mut dyn BatchPolicy,
        runner: &mut dyn SessionRunner,
    ) -> Result<BatchSummary> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

        let images = list_images(image_dir, &self.image_extensions)?;
        if images.is_empty() {
            log::warn!("No image files found in {}", image_dir.display());
            self.set_state(BatchState::Done);
            return Ok(BatchSummary::default());
        }

        backup_annotations(output_dir, (self.clock)(), self.max_backups);

        self.set_state(BatchState::LoadingProgress);
        let last_index = load_progress(output_dir).and_then(|record| {
            let last = images
                .iter()
                .position(|image| image.to_string_lossy() == record.last_annotated_path);
            if last.is_none() {
                log::info!("Progress record {} is not in this batch", record.last_annotated_path);
            }
            last
        });

        self.set_state(BatchState::SelectingStartIndex);
        let start = match last_index {
            Some(last) if last + 1 < images.len() => {
                log::info!("Previous annotation found. Last annotated image: {}", file_name(&images[last]));
                let decision = policy.resume(&images[last]);
                let start = start_index(last, images.len(), decision);
                log::info!("Resume policy {:?}: starting at image {}", decision, start + 1);
                start
            }
            Some(_) => {
                log::info!("All images were already annotated. Restarting from the beginning.");
                0
            }
            None => 0,
        };

        // Images before the start index count as done if they have labels.
        let mut existing = images[..start]
            .iter()
            .filter(|image| label_path_for(image, output_dir).exists())
            .count();
        let mut summary = BatchSummary {
            total_images: images.len(),
            ..BatchSummary::default()
        };

        for (index, image) in images.iter().enumerate().skip(start) {
            log::info!("Annotating: {} ({}/{})", file_name(image), index + 1, images.len());
            self.set_state(BatchState::Loading { index });

            let label_path = label_path_for(image, output_dir);
            let preload = if label_path.exists() {
                match policy.existing_labels(image, &label_path) {
                    ExistingLabelPolicy::Skip => {
                        log::info!("Keeping existing annotation for {}", file_name(image));
                        existing += 1;
                        self.set_state(BatchState::Advancing { index });
                        save_progress(output_dir, image);
                        continue;
                    }
                    ExistingLabelPolicy::Edit => {
                        log::info!("Editing existing annotation for {}", file_name(image));
                        Preload::Existing
                    }
                    ExistingLabelPolicy::Overwrite => {
                        log::info!("Overwriting existing annotation for {}", file_name(image));
                        Preload::Empty
                    }
                }
            } else {
                Preload::Existing
            };

            self.set_state(BatchState::Editing { index });
            let report = runner.annotate(image, output_dir, preload);

            self.set_state(BatchState::Saving { index });
            if report.user_cancelled {
                log::info!("Annotation cancelled by user. Stopping batch.");
                save_progress(output_dir, image);
                summary.cancelled = true;
                break;
            }
            if report.annotation_path.is_some() {
                summary.annotated_this_session += 1;
                log::info!("Annotation saved for {}", file_name(image));
            }

            self.set_state(BatchState::Advancing { index });
            save_progress(output_dir, image);
        }

        summary.total_annotated = existing + summary.annotated_this_session;
        self.set_state(if summary.cancelled {
            BatchState::Cancelled
        } else {
            BatchState::Done
        });
        log::info!(
            "Batch finished: {} images, {} annotated ({} this session)",
            summary.total_images,
            summary.total_annotated,
            summary.annotated_this_session
        );
        Ok(summary)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
