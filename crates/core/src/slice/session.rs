// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session analytics and bookmarks

use crate::clock::Clock;
use crate::id::IdGen;
use crate::schema::{FieldKind, FieldSpec, Schema, Uniqueness};
use serde::{Deserialize, Serialize};

/// A saved position, addressable by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub chapter_index: u64,
    pub scroll_position: u64,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Per-visit analytics
///
/// There is deliberately no `Default`: every value carries a session id, so
/// one is minted by [`SessionData::new`] when a controller starts up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub session_id: String,
    /// Milliseconds since the Unix epoch
    pub last_visit: u64,
    /// Milliseconds
    pub total_reading_time: u64,
    /// Unique chapter indices in first-visit order
    pub chapters_visited: Vec<u64>,
    pub bookmarks: Vec<Bookmark>,
    pub visit_count: u64,
    /// Words per minute
    pub average_reading_speed: f64,
}

pub const BOOKMARK_SCHEMA: Schema = Schema {
    name: "bookmark",
    fields: &[
        FieldSpec::required("id", FieldKind::NonEmptyText),
        FieldSpec::required("chapterIndex", FieldKind::Count),
        FieldSpec::required("scrollPosition", FieldKind::Count),
        FieldSpec::required("timestamp", FieldKind::Count),
        FieldSpec::optional("note", FieldKind::OptionalText),
    ],
};

pub const SESSION_DATA_SCHEMA: Schema = Schema {
    name: "sessionData",
    fields: &[
        FieldSpec::required("sessionId", FieldKind::NonEmptyText),
        FieldSpec::required("lastVisit", FieldKind::Count),
        FieldSpec::required("totalReadingTime", FieldKind::Count),
        FieldSpec::required(
            "chaptersVisited",
            FieldKind::List {
                item: &FieldKind::Count,
                unique: Uniqueness::Values,
            },
        ),
        FieldSpec::required(
            "bookmarks",
            FieldKind::List {
                item: &FieldKind::Record(&BOOKMARK_SCHEMA),
                unique: Uniqueness::ByField("id"),
            },
        ),
        FieldSpec::required("visitCount", FieldKind::Count),
        FieldSpec::required("averageReadingSpeed", FieldKind::Number),
    ],
};

impl SessionData {
    /// Smoothing factor for the rolling reading-speed average
    pub const SPEED_SMOOTHING: f64 = 0.2;

    /// Fresh session record with a newly minted id
    pub fn new(ids: &impl IdGen, clock: &impl Clock) -> Self {
        Self::with_id(ids.next(), clock.epoch_millis())
    }

    pub fn with_id(session_id: impl Into<String>, now: u64) -> Self {
        Self {
            session_id: session_id.into(),
            last_visit: now,
            total_reading_time: 0,
            chapters_visited: Vec::new(),
            bookmarks: Vec::new(),
            visit_count: 0,
            average_reading_speed: 0.0,
        }
    }

    /// Session start: adopt a new session id and count the visit
    pub fn begin_visit(mut self, session_id: impl Into<String>, now: u64) -> Self {
        self.session_id = session_id.into();
        self.last_visit = now;
        self.visit_count = self.visit_count.saturating_add(1);
        self
    }

    /// Append `chapter` unless it was already visited
    pub fn visit_chapter(mut self, chapter: u64) -> Self {
        if !self.chapters_visited.contains(&chapter) {
            self.chapters_visited.push(chapter);
        }
        self
    }

    pub fn add_reading_time(mut self, elapsed_ms: u64) -> Self {
        self.total_reading_time = self.total_reading_time.saturating_add(elapsed_ms);
        self
    }

    /// Fold a words-per-minute sample into the rolling average
    pub fn record_reading_speed(mut self, words_per_minute: f64) -> Self {
        if !words_per_minute.is_finite() || words_per_minute < 0.0 {
            return self;
        }
        self.average_reading_speed = if self.average_reading_speed == 0.0 {
            words_per_minute
        } else {
            self.average_reading_speed
                + Self::SPEED_SMOOTHING * (words_per_minute - self.average_reading_speed)
        };
        self
    }

    /// Add `bookmark`, replacing any bookmark with the same id
    pub fn add_bookmark(mut self, bookmark: Bookmark) -> Self {
        self.bookmarks.retain(|b| b.id != bookmark.id);
        self.bookmarks.push(bookmark);
        self
    }

    /// Remove the bookmark with `id`; `None` when there is no such bookmark
    pub fn remove_bookmark(mut self, id: &str) -> Option<Self> {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|b| b.id != id);
        (self.bookmarks.len() != before).then_some(self)
    }

    pub fn bookmark(&self, id: &str) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    pub fn bookmarks_for_chapter(&self, chapter: u64) -> impl Iterator<Item = &Bookmark> {
        self.bookmarks
            .iter()
            .filter(move |b| b.chapter_index == chapter)
    }
}
