// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The reader: startup gate and the operations the view layer calls
//!
//! No controller exists until the startup migration succeeds, so nothing can
//! write a slice while the migration owns them.

use crate::controller::{PreferencesController, ReadingController, SessionController, UiController};
use crate::error::{EngineError, StartupError};
use crate::scheduler::{ScheduledKind, Scheduler};
use novel_core::{
    Bookmark, Clock, ContentSource, IdGen, NavigationMode, Panel, PreferenceChange, ReaderConfig,
    TableOfContents,
};
use novel_storage::{with_retry, KvBackend, MigrationEngine, MigrationOutcome, PersistenceStore};
use std::time::{Duration, Instant};

/// Result of a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub chapter: u64,
    /// Scroll offset to restore in the new chapter
    pub restore_scroll: u64,
    /// Whether the chapter change reached storage
    pub persisted: bool,
}

/// What a [`Reader::poll`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollReport {
    pub flushed: usize,
    pub ticks: usize,
}

pub struct Reader<B: KvBackend + 'static, C: Clock + 'static, I: IdGen> {
    store: PersistenceStore<B, C>,
    ids: I,
    config: ReaderConfig,
    migration: MigrationOutcome,
    preferences: PreferencesController,
    ui: UiController,
    reading: ReadingController,
    session: SessionController,
    scheduler: Scheduler,
    toc: Option<TableOfContents>,
    active: bool,
    last_tick: Instant,
}

impl<B: KvBackend + 'static, C: Clock + 'static, I: IdGen> Reader<B, C, I> {
    /// Build a store over `backend` and open it with the built-in migrations
    pub fn launch(backend: B, clock: C, ids: I, config: ReaderConfig) -> Result<Self, StartupError<B, C>> {
        let store = PersistenceStore::new(backend, clock, &config);
        let engine = MigrationEngine::builtin(&config);
        Self::open(store, &engine, ids, config)
    }

    /// Migrate, then mount every controller and start a session
    ///
    /// On migration failure the store comes back inside the error so the
    /// caller can retry.
    pub fn open(
        mut store: PersistenceStore<B, C>,
        engine: &MigrationEngine,
        ids: I,
        config: ReaderConfig,
    ) -> Result<Self, StartupError<B, C>> {
        let migration = engine.run(&mut store, &ids);
        if !migration.is_success() {
            return Err(StartupError::MigrationBlocked {
                store: Box::new(store),
                outcome: migration,
            });
        }

        let preferences = PreferencesController::mount(&mut store);
        let ui = UiController::mount(&mut store, config.debounce.layout);
        let mut reading = ReadingController::mount(&mut store, config.debounce.scroll);
        let session = SessionController::start(&mut store, &ids, config.debounce.chapter);
        reading.begin_session(&mut store);

        let mut scheduler = Scheduler::new();
        scheduler.init_session_tick(store.clock(), config.session.tick_interval);
        let last_tick = store.clock().now();

        Ok(Self {
            store,
            ids,
            config,
            migration,
            preferences,
            ui,
            reading,
            session,
            scheduler,
            toc: None,
            active: true,
            last_tick,
        })
    }

    pub fn migration(&self) -> &MigrationOutcome {
        &self.migration
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn store(&self) -> &PersistenceStore<B, C> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PersistenceStore<B, C> {
        &mut self.store
    }

    pub fn preferences(&self) -> &PreferencesController {
        &self.preferences
    }

    pub fn ui(&self) -> &UiController {
        &self.ui
    }

    pub fn reading(&self) -> &ReadingController {
        &self.reading
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn table_of_contents(&self) -> Option<&TableOfContents> {
        self.toc.as_ref()
    }

    // -- content ------------------------------------------------------------

    pub fn set_table_of_contents(&mut self, toc: TableOfContents) {
        self.toc = Some(toc);
    }

    /// Fetch the chapter list, retrying transient failures
    pub fn load_table_of_contents(&mut self, source: &impl ContentSource) -> bool {
        let result = with_retry(self.store.clock(), self.store.retry_policy(), "fetch_chapters", || {
            source.chapters()
        });
        match result {
            Ok(chapters) => {
                self.toc = Some(TableOfContents::new(chapters));
                true
            }
            Err(error) => {
                self.store.report(&error);
                false
            }
        }
    }

    /// HTML for `chapter`, or `None` if it cannot be fetched
    pub fn chapter_html(&mut self, source: &impl ContentSource, chapter: u64) -> Option<String> {
        let path = self.toc.as_ref()?.get(chapter)?.content_path.clone();
        let result = with_retry(self.store.clock(), self.store.retry_policy(), "fetch_chapter", || {
            source.chapter_html(&path)
        });
        result.map_err(|error| self.store.report(&error)).ok()
    }

    // -- settings and panels ------------------------------------------------

    pub fn set_preference(&mut self, change: PreferenceChange) -> bool {
        self.preferences.apply(&mut self.store, change)
    }

    pub fn reset_preferences(&mut self) -> bool {
        self.preferences.reset(&mut self.store)
    }

    pub fn toggle_panel(&mut self, panel: Panel) -> bool {
        self.ui.toggle(&mut self.store, panel)
    }

    pub fn open_panel(&mut self, panel: Panel) -> bool {
        self.ui.open(&mut self.store, panel)
    }

    pub fn close_panel(&mut self, panel: Panel) -> bool {
        self.ui.close(&mut self.store, panel)
    }

    pub fn close_panels(&mut self) -> bool {
        self.ui.close_all(&mut self.store)
    }

    pub fn set_navigation_mode(&mut self, mode: NavigationMode) -> bool {
        self.ui.set_navigation_mode(&mut self.store, mode)
    }

    pub fn set_panel_animation(&mut self, duration: Duration) -> bool {
        self.ui.set_panel_animation(&mut self.store, duration)
    }

    pub fn set_content_width(&mut self, width: u64) {
        self.ui.set_content_width(&mut self.store, width);
    }

    // -- navigation ---------------------------------------------------------

    pub fn next_chapter(&mut self) -> Result<Navigation, EngineError> {
        let current = self.reading.chapter();
        let next = match &self.toc {
            Some(toc) => toc.next_index(current).ok_or(EngineError::NoNextChapter)?,
            None => current.checked_add(1).ok_or(EngineError::NoNextChapter)?,
        };
        self.go_to_chapter(next)
    }

    pub fn previous_chapter(&mut self) -> Result<Navigation, EngineError> {
        let current = self.reading.chapter();
        let previous = match &self.toc {
            Some(toc) => toc.previous_index(current),
            None => current.checked_sub(1),
        };
        self.go_to_chapter(previous.ok_or(EngineError::NoPreviousChapter)?)
    }

    /// Select `chapter` directly, as from the table of contents
    pub fn go_to_chapter(&mut self, chapter: u64) -> Result<Navigation, EngineError> {
        if let Some(toc) = &self.toc {
            if !toc.contains(chapter) {
                return Err(EngineError::ChapterOutOfRange {
                    index: chapter,
                    count: toc.len(),
                });
            }
        }
        // Time read so far belongs to the chapter being left
        self.tick();
        let persisted = self.reading.navigate(&mut self.store, chapter);
        self.session.visit_chapter(&mut self.store, chapter);
        Ok(Navigation {
            chapter,
            restore_scroll: self.reading.restore_point(chapter),
            persisted,
        })
    }

    pub fn record_scroll(&mut self, offset: u64) {
        self.reading.record_scroll(&mut self.store, offset);
    }

    // -- bookmarks ----------------------------------------------------------

    /// Bookmark the current position
    pub fn add_bookmark(&mut self, note: Option<String>) -> (Bookmark, bool) {
        let chapter = self.reading.chapter();
        let offset = self.reading.restore_point(chapter);
        self.session
            .add_bookmark(&mut self.store, &self.ids, chapter, offset, note)
    }

    pub fn remove_bookmark(&mut self, id: &str) -> Result<bool, EngineError> {
        self.session.remove_bookmark(&mut self.store, id)
    }

    /// Jump to a bookmark's chapter; returns where to scroll
    pub fn open_bookmark(&mut self, id: &str) -> Result<Navigation, EngineError> {
        let bookmark = self
            .session
            .current()
            .bookmark(id)
            .cloned()
            .ok_or_else(|| EngineError::BookmarkNotFound(id.to_string()))?;
        let navigation = self.go_to_chapter(bookmark.chapter_index)?;
        Ok(Navigation {
            restore_scroll: bookmark.scroll_position,
            ..navigation
        })
    }

    // -- time ---------------------------------------------------------------

    /// Record a words-per-minute sample
    pub fn record_reading_speed(&mut self, words_per_minute: f64) -> bool {
        self.session
            .tick(&mut self.store, Duration::ZERO, Some(words_per_minute))
    }

    /// Pause or resume reading-time accumulation, e.g. when the page is
    /// hidden
    pub fn set_active(&mut self, active: bool) {
        if active == self.active {
            return;
        }
        if active {
            self.last_tick = self.store.clock().now();
        } else {
            self.tick();
        }
        self.active = active;
        tracing::debug!(active, "reader activity changed");
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run due debounced writes and session ticks
    pub fn poll(&mut self) -> PollReport {
        let now = self.store.clock().now();
        let flushed = self.store.flush_due();
        let mut ticks = 0;
        for item in self.scheduler.poll(now) {
            match item.kind {
                ScheduledKind::SessionTick => {
                    self.tick();
                    ticks += 1;
                }
            }
        }
        PollReport { flushed, ticks }
    }

    /// When [`Self::poll`] next has work to do
    pub fn next_wakeup(&self) -> Option<Instant> {
        match (self.store.next_flush_at(), self.scheduler.next_fire_time()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Write everything pending now, e.g. before the process exits
    pub fn flush_all(&mut self) -> usize {
        self.tick();
        self.store.flush_all()
    }

    /// Flush and hand back the store
    pub fn close(mut self) -> PersistenceStore<B, C> {
        self.flush_all();
        self.store
    }

    // Accumulate reading time since the last tick while active
    fn tick(&mut self) {
        let now = self.store.clock().now();
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        if !self.active || elapsed.is_zero() {
            return;
        }
        self.reading.add_reading_time(&mut self.store, elapsed);
        self.session.tick(&mut self.store, elapsed, None);
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
