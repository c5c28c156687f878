// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Configured annotation classes.
//!
//! Classes are configured as labels like `0-levedura`. The part before the
//! first `-` is the identifier written to label files.

/// Extract the identifier from a class label (`"1-fungo"` -> `"1"`).
pub fn class_id_of(label: &str) -> &str {
    label.split_once('-').map_or(label, |(id, _)| id)
}

/// Ordered list of class labels available to the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassCatalog {
    labels: Vec<String>,
}

impl ClassCatalog {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Find a class by full label or by identifier.
    pub fn position(&self, label_or_id: &str) -> Option<usize> {
        self.labels
            .iter()
            .position(|l| l == label_or_id)
            .or_else(|| self.labels.iter().position(|l| class_id_of(l) == label_or_id))
    }

    /// Whether `class_id` belongs to one of the configured labels.
    pub fn is_known(&self, class_id: &str) -> bool {
        self.labels.iter().any(|l| class_id_of(l) == class_id)
    }

    /// Human-readable name for a class identifier.
    ///
    /// Unknown identifiers are tolerated and rendered as `<id>-unknown`.
    pub fn display_name(&self, class_id: &str) -> String {
        self.labels
            .iter()
            .find(|l| class_id_of(l) == class_id)
            .cloned()
            .unwrap_or_else(|| format!("{}-unknown", class_id))
    }

    /// Index following `current`, wrapping around.
    pub fn next_index(&self, current: usize) -> usize {
        if self.labels.is_empty() {
            0
        } else {
            (current + 1) % self.labels.len()
        }
    }
}
