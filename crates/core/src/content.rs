// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content collaborators: chapter list, chapter markup, font configuration
//!
//! The persistence core only needs the chapter count (to bound navigation)
//! and the font ids; fetching and rendering belong to the view layer.

use crate::clock::Clock;
use crate::error::{ErrorKind, StorageError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// One entry of the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterEntry {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub content_path: String,
}

/// Family, weight and fallback stack for one font id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    #[serde(default)]
    pub weight: Option<u16>,
    pub fallback: String,
}

/// Font id to metadata
pub type FontConfig = BTreeMap<String, FontSpec>;

/// Where chapters and fonts come from
pub trait ContentSource {
    fn chapters(&self) -> Result<Vec<ChapterEntry>, StorageError>;
    fn chapter_html(&self, content_path: &str) -> Result<String, StorageError>;
    fn fonts(&self) -> Result<FontConfig, StorageError>;
}

/// Ordered chapter list with navigation bounds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOfContents {
    chapters: Vec<ChapterEntry>,
}

impl TableOfContents {
    pub fn new(chapters: Vec<ChapterEntry>) -> Self {
        Self { chapters }
    }

    pub fn len(&self) -> u64 {
        self.chapters.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn get(&self, index: u64) -> Option<&ChapterEntry> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.chapters.get(i))
    }

    pub fn contains(&self, index: u64) -> bool {
        index < self.len()
    }

    pub fn next_index(&self, current: u64) -> Option<u64> {
        let next = current.checked_add(1)?;
        self.contains(next).then_some(next)
    }

    pub fn previous_index(&self, current: u64) -> Option<u64> {
        let previous = current.checked_sub(1)?;
        self.contains(previous).then_some(previous)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChapterEntry> {
        self.chapters.iter()
    }
}

/// Content laid out in a directory: `chapters.json`, `fonts.json` and the
/// chapter files they reference
#[derive(Debug, Clone)]
pub struct DirContentSource<C: Clock> {
    root: PathBuf,
    clock: C,
}

impl<C: Clock> DirContentSource<C> {
    pub const CHAPTERS_FILE: &'static str = "chapters.json";
    pub const FONTS_FILE: &'static str = "fonts.json";

    pub fn new(root: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn fetch_text(&self, operation: &str, relative: &str) -> Result<String, StorageError> {
        let path = self.resolve(operation, relative)?;
        tracing::debug!(operation, path = %path.display(), "fetching content");
        std::fs::read_to_string(&path).map_err(|e| {
            StorageError::new(
                ErrorKind::NetworkError,
                operation,
                e.to_string(),
                self.clock.epoch_millis(),
            )
            .with_context(relative)
        })
    }

    fn fetch_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        relative: &str,
    ) -> Result<T, StorageError> {
        let text = self.fetch_text(operation, relative)?;
        serde_json::from_str(&text).map_err(|e| {
            StorageError::new(
                ErrorKind::DeserializeFailed,
                operation,
                e.to_string(),
                self.clock.epoch_millis(),
            )
            .with_context(relative)
        })
    }

    /// Join `relative` onto the root, refusing anything that escapes it
    fn resolve(&self, operation: &str, relative: &str) -> Result<PathBuf, StorageError> {
        let candidate = Path::new(relative);
        let escapes = candidate
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(StorageError::new(
                ErrorKind::ValidationFailed,
                operation,
                "content path must stay inside the content directory",
                self.clock.epoch_millis(),
            )
            .with_context(relative));
        }
        Ok(self.root.join(candidate))
    }
}

impl<C: Clock> ContentSource for DirContentSource<C> {
    fn chapters(&self) -> Result<Vec<ChapterEntry>, StorageError> {
        self.fetch_json("fetch_chapters", Self::CHAPTERS_FILE)
    }

    fn chapter_html(&self, content_path: &str) -> Result<String, StorageError> {
        self.fetch_text("fetch_chapter", content_path)
    }

    fn fonts(&self) -> Result<FontConfig, StorageError> {
        self.fetch_json("fetch_fonts", Self::FONTS_FILE)
    }
}

#[cfg(test)]
#[path = "content_tests.rs"]
mod tests;
