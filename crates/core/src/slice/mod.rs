// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted state slices
//!
//! Each slice is stored under its own key, has a static schema, and is
//! always written whole. Mutations are pure: they take the previous value and
//! return the next one, so a writer can replay its change on top of whatever
//! is currently persisted.

#[macro_use]
mod choice;
mod preferences;
mod reading;
mod session;
mod ui;

pub use choice::UnknownChoice;
pub use preferences::{
    FontFamily, FontSize, LineHeight, PageWidth, PreferenceChange, Preferences, TextAlign,
    Theme, PREFERENCES_SCHEMA,
};
pub use reading::{ChapterProgress, ReadingState, CHAPTER_PROGRESS_SCHEMA, READING_STATE_SCHEMA};
pub use session::{Bookmark, SessionData, BOOKMARK_SCHEMA, SESSION_DATA_SCHEMA};
pub use ui::{NavigationMode, Panel, UiState, UI_STATE_SCHEMA};

use crate::schema::{Schema, Violation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// A unit of independently persisted, independently validated state
pub trait Slice: Serialize + DeserializeOwned + Clone + PartialEq + Debug + 'static {
    /// Storage key the slice lives under
    const KEY: &'static str;
    /// Shape the stored JSON must satisfy
    const SCHEMA: &'static Schema;

    /// Serialize and validate against [`Slice::SCHEMA`]
    fn check(&self) -> Result<(), Vec<Violation>> {
        let value = serde_json::to_value(self)
            .map_err(|e| vec![Violation::new(Self::SCHEMA.name, e.to_string())])?;
        Self::SCHEMA.validate(&value)
    }
}

impl Slice for Preferences {
    const KEY: &'static str = crate::keys::PREFERENCES_KEY;
    const SCHEMA: &'static Schema = &PREFERENCES_SCHEMA;
}

impl Slice for ReadingState {
    const KEY: &'static str = crate::keys::READING_STATE_KEY;
    const SCHEMA: &'static Schema = &READING_STATE_SCHEMA;
}

impl Slice for UiState {
    const KEY: &'static str = crate::keys::UI_STATE_KEY;
    const SCHEMA: &'static Schema = &UI_STATE_SCHEMA;
}

impl Slice for SessionData {
    const KEY: &'static str = crate::keys::SESSION_DATA_KEY;
    const SCHEMA: &'static Schema = &SESSION_DATA_SCHEMA;
}

/// Schema for the slice stored under `key`, if it is a slice key
pub fn schema_for_key(key: &str) -> Option<&'static Schema> {
    match key {
        crate::keys::PREFERENCES_KEY => Some(&PREFERENCES_SCHEMA),
        crate::keys::READING_STATE_KEY => Some(&READING_STATE_SCHEMA),
        crate::keys::UI_STATE_KEY => Some(&UI_STATE_SCHEMA),
        crate::keys::SESSION_DATA_KEY => Some(&SESSION_DATA_SCHEMA),
        _ => None,
    }
}

#[cfg(test)]
#[path = "slice_tests.rs"]
mod tests;
