// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod backup;
pub mod bookmark;
pub mod data;
pub mod errors;
pub mod nav;
pub mod panel;
pub mod prefs;
pub mod status;
