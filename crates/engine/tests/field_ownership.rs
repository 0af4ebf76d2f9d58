// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Integration tests for concurrent writers over one file-backed store
//!
//! Every writer only touches the fields it owns, so interleaving immediate
//! and debounced writes never loses a value. State written by one process
//! is what the next process starts from.

use novel_core::keys::{PREFERENCES_KEY, UI_STATE_KEY};
use novel_core::slice::{FontSize, Theme};
use novel_core::{FakeClock, Panel, PreferenceChange, ReaderConfig, SequentialIdGen, SessionData};
use novel_engine::Reader;
use novel_storage::{FileBackend, KvBackend, MigrationOutcome};
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

type FileReader = Reader<FileBackend, FakeClock, SequentialIdGen>;

fn open(dir: &TempDir, clock: &FakeClock, prefix: &str) -> FileReader {
    let backend = FileBackend::open(dir.path()).unwrap();
    Reader::launch(
        backend,
        clock.clone(),
        SequentialIdGen::new(prefix),
        ReaderConfig::default(),
    )
    .unwrap()
}

fn stored_session(reader: &mut FileReader) -> SessionData {
    reader
        .store_mut()
        .load_session_data(SessionData::with_id("unset", 0))
}

// =============================================================================
// Interleaved writers
// =============================================================================

#[test]
fn scroll_ticks_and_navigation_interleave_without_loss() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::new();
    let mut reader = open(&dir, &clock, "a");

    reader.go_to_chapter(1).unwrap();
    reader.record_scroll(100);
    clock.advance(Duration::from_millis(400));
    reader.record_scroll(250);
    reader.toggle_panel(Panel::Settings);
    reader.set_content_width(800);

    // session tick lands while the scroll write is still pending
    clock.advance(Duration::from_secs(30));
    reader.poll();
    reader.go_to_chapter(2).unwrap();
    reader.record_scroll(40);
    reader.flush_all();

    let state = reader.store_mut().load_reading_state();
    assert_eq!(state.current_chapter_index, 2);
    assert_eq!(state.scroll_for(1), Some(250));
    assert_eq!(state.scroll_for(2), Some(40));
    assert_eq!(state.last_scroll_position, 40);
    assert_eq!(state.chapter_progress[&1].time_spent, 30_400);

    let ui = reader.store_mut().load_ui_state();
    assert!(ui.is_settings_open);
    assert_eq!(ui.content_width, 800);

    let session = stored_session(&mut reader);
    assert_eq!(session.chapters_visited, vec![1, 2]);
    assert_eq!(session.total_reading_time, 30_400);
}

#[test]
fn preference_writes_do_not_touch_layout_or_position() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::new();
    let mut reader = open(&dir, &clock, "a");
    reader.go_to_chapter(4).unwrap();
    reader.set_content_width(640);
    reader.flush_all();
    let ui_before = reader.store_mut().load_ui_state();
    let reading_before = reader.store_mut().load_reading_state();

    reader.set_preference(PreferenceChange::Theme(Theme::Dark));
    reader.set_preference(PreferenceChange::FontSize(FontSize::Large));

    assert_eq!(reader.store_mut().load_ui_state(), ui_before);
    assert_eq!(reader.store_mut().load_reading_state(), reading_before);
    let prefs = reader.store_mut().load_preferences();
    assert_eq!((prefs.theme, prefs.font_size), (Theme::Dark, FontSize::Large));
}

// =============================================================================
// Across processes
// =============================================================================

#[test]
fn reopened_reader_resumes_where_the_last_one_stopped() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::new();

    let mut first = open(&dir, &clock, "a");
    first.go_to_chapter(3).unwrap();
    first.record_scroll(512);
    first.open_panel(Panel::Toc);
    let (bookmark, _) = first.add_bookmark(Some("cliffhanger".to_string()));
    first.set_preference(PreferenceChange::Theme(Theme::Light));
    first.close();

    clock.advance(Duration::from_secs(3600));
    let mut second = open(&dir, &clock, "b");
    assert!(matches!(second.migration(), MigrationOutcome::UpToDate { .. }));
    assert_eq!(second.reading().chapter(), 3);
    assert_eq!(second.reading().restore_point(3), 512);
    assert!(second.ui().current().is_toc_open);
    assert_eq!(second.preferences().current().theme, Theme::Light);

    let session = second.session().current().clone();
    assert_eq!(session.session_id, "b-1");
    assert_eq!(session.visit_count, 2);
    assert_eq!(session.bookmark(&bookmark.id).and_then(|b| b.note.as_deref()), Some("cliffhanger"));
    assert_eq!(stored_session(&mut second), session);
}

#[test]
fn legacy_data_on_disk_is_migrated_before_the_reader_mounts() {
    let dir = TempDir::new().unwrap();
    let backend = FileBackend::open(dir.path()).unwrap();
    let prefs = json!({"data": {
        "theme": "sepia", "font": "serif", "fontSize": "medium",
        "lineHeight": "normal", "showToc": true
    }});
    backend.set(PREFERENCES_KEY, &prefs.to_string()).unwrap();

    let clock = FakeClock::new();
    let reader = open(&dir, &clock, "a");
    assert!(matches!(
        reader.migration(),
        MigrationOutcome::Migrated { from: 1, to: 4, .. }
    ));
    assert_eq!(reader.preferences().current().theme, Theme::Light);
    assert!(reader.ui().current().is_toc_open);
    assert!(backend.get(UI_STATE_KEY).unwrap().is_some());
}
