// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for the annotation editor.

pub mod annotation;
pub mod classes;
pub mod progress;
pub mod store;
