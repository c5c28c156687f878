// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interactive editing core: events, handles, undo and the session state machine.

pub mod events;
pub mod handles;
pub mod history;
pub mod session;
