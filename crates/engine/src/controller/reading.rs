// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reading position
//!
//! Three writers share the reading-state slice:
//! - navigation owns `currentChapterIndex` and `lastReadTimestamp`, written
//!   immediately
//! - the scroll tracker owns `lastScrollPosition` and the scroll fields of
//!   `chapterProgress`, written after a quiet period
//! - the session clock owns the reading-time fields
//!
//! A scroll write records the chapter it was tracking when the scroll
//! happened; it never touches the current chapter index.

use super::write_through;
use novel_core::keys::READING_STATE_KEY;
use novel_core::{Clock, ReadingState};
use novel_storage::{KvBackend, PersistenceStore};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ReadingController {
    current: ReadingState,
    scroll_delay: Duration,
}

impl ReadingController {
    pub fn mount<B, C>(store: &mut PersistenceStore<B, C>, scroll_delay: Duration) -> Self
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        Self {
            current: store.load_reading_state(),
            scroll_delay,
        }
    }

    pub fn current(&self) -> &ReadingState {
        &self.current
    }

    pub fn chapter(&self) -> u64 {
        self.current.current_chapter_index
    }

    /// Navigation: move to `chapter` and write it immediately
    ///
    /// A pending scroll write for the chapter being left is flushed first so
    /// the two writes land in the order they happened.
    pub fn navigate<B, C>(&mut self, store: &mut PersistenceStore<B, C>, chapter: u64) -> bool
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        store.flush_key(READING_STATE_KEY);
        let now = store.clock().epoch_millis();
        tracing::debug!(from = self.chapter(), to = chapter, "navigating");
        write_through(store, &mut self.current, |state| state.navigate(chapter, now))
    }

    /// Scroll tracker: remember `offset` in the current chapter
    pub fn record_scroll<B, C>(&mut self, store: &mut PersistenceStore<B, C>, offset: u64)
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        let chapter = self.chapter();
        let now = store.clock().epoch_millis();
        self.current = self.current.clone().record_scroll(chapter, offset, now);
        store.debounced_update(self.scroll_delay, self.current.clone(), move |state: ReadingState| {
            state.record_scroll(chapter, offset, now)
        });
    }

    /// Session clock: a session started now
    pub fn begin_session<B, C>(&mut self, store: &mut PersistenceStore<B, C>) -> bool
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        let now = store.clock().epoch_millis();
        write_through(store, &mut self.current, |state| state.begin_session(now))
    }

    /// Session clock: `elapsed` was spent reading the current chapter
    pub fn add_reading_time<B, C>(&mut self, store: &mut PersistenceStore<B, C>, elapsed: Duration) -> bool
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        let chapter = self.chapter();
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        write_through(store, &mut self.current, |state| state.add_reading_time(chapter, ms))
    }

    /// Saved scroll offset to restore when entering `chapter`
    pub fn restore_point(&self, chapter: u64) -> u64 {
        self.current.scroll_for(chapter).unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "reading_tests.rs"]
mod tests;
