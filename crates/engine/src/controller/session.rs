// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session analytics and bookmarks
//!
//! Session start writes the identity fields, bookmark operations write the
//! bookmark list, and the session clock writes the reading totals, all
//! immediately. Visited chapters follow navigation and are debounced.

use super::write_through;
use crate::error::EngineError;
use novel_core::{Bookmark, Clock, IdGen, SessionData};
use novel_storage::{KvBackend, PersistenceStore};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionController {
    current: SessionData,
    chapter_delay: Duration,
}

impl SessionController {
    /// Load the session record and start a new visit under a fresh id
    pub fn start<B, C>(
        store: &mut PersistenceStore<B, C>,
        ids: &impl IdGen,
        chapter_delay: Duration,
    ) -> Self
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        let fresh = SessionData::new(ids, store.clock());
        let session_id = fresh.session_id.clone();
        let now = fresh.last_visit;
        let mut current = store.load_session_data(fresh);
        write_through(store, &mut current, |s| s.begin_visit(session_id.clone(), now));
        tracing::info!(
            session_id = %current.session_id,
            visit = current.visit_count,
            "session started"
        );
        Self {
            current,
            chapter_delay,
        }
    }

    pub fn current(&self) -> &SessionData {
        &self.current
    }

    /// Navigation-adjacent: note that `chapter` was visited
    ///
    /// The deferred write replays every chapter known in memory, so a burst
    /// of navigations loses none of them.
    pub fn visit_chapter<B, C>(&mut self, store: &mut PersistenceStore<B, C>, chapter: u64)
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        if self.current.chapters_visited.contains(&chapter) {
            return;
        }
        self.current = self.current.clone().visit_chapter(chapter);
        let visited = self.current.chapters_visited.clone();
        store.debounced_update(self.chapter_delay, self.current.clone(), move |s: SessionData| {
            visited.iter().fold(s, |s, &c| s.visit_chapter(c))
        });
    }

    /// Bookmark `chapter` at `scroll_position`; returns the new bookmark
    pub fn add_bookmark<B, C>(
        &mut self,
        store: &mut PersistenceStore<B, C>,
        ids: &impl IdGen,
        chapter: u64,
        scroll_position: u64,
        note: Option<String>,
    ) -> (Bookmark, bool)
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        let bookmark = Bookmark {
            id: ids.next(),
            chapter_index: chapter,
            scroll_position,
            timestamp: store.clock().epoch_millis(),
            note: note.filter(|n| !n.trim().is_empty()),
        };
        let stored = write_through(store, &mut self.current, |s| s.add_bookmark(bookmark.clone()));
        tracing::debug!(id = %bookmark.id, chapter, "bookmark added");
        (bookmark, stored)
    }

    pub fn remove_bookmark<B, C>(&mut self, store: &mut PersistenceStore<B, C>, id: &str) -> Result<bool, EngineError>
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        if self.current.bookmark(id).is_none() {
            return Err(EngineError::BookmarkNotFound(id.to_string()));
        }
        Ok(write_through(store, &mut self.current, |s| {
            s.clone().remove_bookmark(id).unwrap_or(s)
        }))
    }

    /// Session clock: fold `elapsed` reading time and an optional speed
    /// sample into the totals
    pub fn tick<B, C>(
        &mut self,
        store: &mut PersistenceStore<B, C>,
        elapsed: Duration,
        words_per_minute: Option<f64>,
    ) -> bool
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        write_through(store, &mut self.current, |s| {
            let s = s.add_reading_time(ms);
            match words_per_minute {
                Some(wpm) => s.record_reading_speed(wpm),
                None => s,
            }
        })
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
