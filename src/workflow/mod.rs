// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Batch annotation workflow.

pub mod batch;
pub mod policy;
