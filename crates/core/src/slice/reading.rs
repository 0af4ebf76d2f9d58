// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reading position and per-chapter progress
//!
//! Fields are partitioned by writer:
//!
//! | Field | Writer |
//! |---|---|
//! | `current_chapter_index`, `last_read_timestamp` | navigation |
//! | `last_scroll_position`, progress `scroll_position` / `last_visited` | scroll tracker |
//! | `total_reading_time`, `session_start_time`, progress `time_spent` | session clock |
//!
//! Each mutation below touches only the fields of one writer, which is what
//! lets a deferred scroll write be replayed over a newer navigation write
//! without reverting the chapter.

use crate::schema::{FieldKind, FieldSpec, Schema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Progress within a single chapter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterProgress {
    pub scroll_position: u64,
    /// Milliseconds since the Unix epoch
    pub last_visited: u64,
    /// Milliseconds
    pub time_spent: u64,
}

/// Where the reader is and how long they have been reading
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingState {
    pub current_chapter_index: u64,
    pub last_scroll_position: u64,
    pub last_read_timestamp: u64,
    pub total_reading_time: u64,
    pub session_start_time: u64,
    pub chapter_progress: BTreeMap<u64, ChapterProgress>,
}

pub const CHAPTER_PROGRESS_SCHEMA: Schema = Schema {
    name: "chapterProgress",
    fields: &[
        FieldSpec::required("scrollPosition", FieldKind::Count),
        FieldSpec::required("lastVisited", FieldKind::Count),
        FieldSpec::required("timeSpent", FieldKind::Count),
    ],
};

pub const READING_STATE_SCHEMA: Schema = Schema {
    name: "readingState",
    fields: &[
        FieldSpec::required("currentChapterIndex", FieldKind::Count),
        FieldSpec::required("lastScrollPosition", FieldKind::Count),
        FieldSpec::required("lastReadTimestamp", FieldKind::Count),
        FieldSpec::required("totalReadingTime", FieldKind::Count),
        FieldSpec::required("sessionStartTime", FieldKind::Count),
        FieldSpec::required(
            "chapterProgress",
            FieldKind::IndexMap(&CHAPTER_PROGRESS_SCHEMA),
        ),
    ],
};

impl ReadingState {
    /// Navigation: move to `chapter`
    pub fn navigate(mut self, chapter: u64, now: u64) -> Self {
        self.current_chapter_index = chapter;
        self.last_read_timestamp = now;
        self
    }

    /// Scroll tracker: record `offset` within `chapter`
    pub fn record_scroll(mut self, chapter: u64, offset: u64, now: u64) -> Self {
        self.last_scroll_position = offset;
        let progress = self.chapter_progress.entry(chapter).or_default();
        progress.scroll_position = offset;
        progress.last_visited = now;
        self
    }

    /// Session clock: a new session began at `now`
    pub fn begin_session(mut self, now: u64) -> Self {
        self.session_start_time = now;
        self
    }

    /// Session clock: `elapsed_ms` of reading happened in `chapter`
    pub fn add_reading_time(mut self, chapter: u64, elapsed_ms: u64) -> Self {
        self.total_reading_time = self.total_reading_time.saturating_add(elapsed_ms);
        let progress = self.chapter_progress.entry(chapter).or_default();
        progress.time_spent = progress.time_spent.saturating_add(elapsed_ms);
        self
    }

    /// Saved scroll offset for `chapter`, if it was ever visited
    pub fn scroll_for(&self, chapter: u64) -> Option<u64> {
        self.chapter_progress.get(&chapter).map(|p| p.scroll_position)
    }
}
