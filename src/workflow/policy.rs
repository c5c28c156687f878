// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Decisions the batch workflow asks its collaborator for.

use anyhow::{bail, Error, Result};
use std::path::Path;
use std::str::FromStr;

/// Where to pick up a batch that has a progress record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResumePolicy {
    /// Start after the last processed image.
    #[default]
    Continue,
    /// Start from the first image.
    Restart,
    /// Start at the last processed image again.
    Review,
}

impl FromStr for ResumePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "continue" | "1" => Ok(ResumePolicy::Continue),
            "restart" | "2" => Ok(ResumePolicy::Restart),
            "review" | "3" => Ok(ResumePolicy::Review),
            other => bail!("Unknown resume policy: {}", other),
        }
    }
}

/// What to do with an image that already has a label file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingLabelPolicy {
    /// Keep the labels and count the image as annotated.
    Skip,
    /// Open the editor with the existing boxes.
    #[default]
    Edit,
    /// Open the editor empty; the next save replaces the file.
    Overwrite,
}

impl FromStr for ExistingLabelPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "skip" | "p" => Ok(ExistingLabelPolicy::Skip),
            "edit" | "e" => Ok(ExistingLabelPolicy::Edit),
            "overwrite" | "s" => Ok(ExistingLabelPolicy::Overwrite),
            other => bail!("Unknown existing-label policy: {}", other),
        }
    }
}

/// Supplies resume and per-image decisions to a batch run.
pub trait BatchPolicy {
    /// Called when a progress record points at `last_image` and more
    /// images follow it.
    fn resume(&mut self, _last_image: &Path) -> ResumePolicy {
        ResumePolicy::default()
    }

    /// Called for each image whose label file already exists.
    fn existing_labels(&mut self, _image: &Path, _label_path: &Path) -> ExistingLabelPolicy {
        ExistingLabelPolicy::default()
    }
}

/// Gives the same answers for every question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedPolicy {
    pub resume: ResumePolicy,
    pub existing: ExistingLabelPolicy,
}

impl FixedPolicy {
    pub fn new(resume: ResumePolicy, existing: ExistingLabelPolicy) -> Self {
        Self { resume, existing }
    }
}

impl BatchPolicy for FixedPolicy {
    fn resume(&mut self, _last_image: &Path) -> ResumePolicy {
        self.resume
    }

    fn existing_labels(&mut self, _image: &Path, _label_path: &Path) -> ExistingLabelPolicy {
        self.existing
    }
}
