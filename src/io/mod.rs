// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for images, label files, progress records and backups.

pub mod backup;
pub mod labels;
pub mod media;
pub mod persistence;
pub mod progress;
pub mod serialization;
