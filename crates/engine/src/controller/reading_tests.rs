// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use novel_core::{FakeClock, ReaderConfig};
use novel_storage::MemoryBackend;

const SCROLL: Duration = Duration::from_millis(1000);

fn setup() -> (MemoryBackend, FakeClock, PersistenceStore<MemoryBackend, FakeClock>) {
    let backend = MemoryBackend::new();
    let clock = FakeClock::new();
    let store = PersistenceStore::new(backend.clone(), clock.clone(), &ReaderConfig::default());
    (backend, clock, store)
}

#[test]
fn navigation_is_written_immediately() {
    let (_, clock, mut store) = setup();
    let mut reading = ReadingController::mount(&mut store, SCROLL);
    assert!(reading.navigate(&mut store, 4));

    let stored = store.load_reading_state();
    assert_eq!(stored.current_chapter_index, 4);
    assert_eq!(stored.last_read_timestamp, clock.epoch_millis());
}

#[test]
fn scroll_bursts_produce_one_write() {
    let (backend, clock, mut store) = setup();
    let mut reading = ReadingController::mount(&mut store, SCROLL);

    for offset in [100, 200, 300] {
        reading.record_scroll(&mut store, offset);
        clock.advance(Duration::from_millis(100));
    }
    assert_eq!(reading.current().last_scroll_position, 300);
    assert_eq!(backend.write_attempts(), 0);

    clock.advance(SCROLL);
    assert_eq!(store.flush_due(), 1);
    assert_eq!(backend.write_attempts(), 1);
    assert_eq!(store.load_reading_state().scroll_for(0), Some(300));
}

#[test]
fn navigating_away_keeps_scroll_of_previous_chapter() {
    let (_, clock, mut store) = setup();
    let mut reading = ReadingController::mount(&mut store, SCROLL);
    reading.navigate(&mut store, 2);

    reading.record_scroll(&mut store, 750);
    clock.advance(Duration::from_millis(300));
    assert!(reading.navigate(&mut store, 3));
    assert!(store.pending_keys().is_empty());

    clock.advance(SCROLL);
    store.flush_due();
    let stored = store.load_reading_state();
    assert_eq!(stored.current_chapter_index, 3);
    assert_eq!(stored.scroll_for(2), Some(750));
    assert_eq!(reading.restore_point(2), 750);
    assert_eq!(reading.restore_point(3), 0);
}

#[test]
fn late_scroll_write_never_reverts_the_chapter() {
    let (_, clock, mut store) = setup();
    let mut reading = ReadingController::mount(&mut store, SCROLL);
    reading.navigate(&mut store, 1);
    reading.record_scroll(&mut store, 500);

    // Navigation from another view that does not flush the pending scroll
    assert!(store
        .update_slice(&ReadingState::default(), |s| s.navigate(6, 1))
        .is_some());

    clock.advance(SCROLL);
    assert_eq!(store.flush_due(), 1);
    let stored = store.load_reading_state();
    assert_eq!(stored.current_chapter_index, 6);
    assert_eq!(stored.scroll_for(1), Some(500));
}

#[test]
fn reading_time_goes_to_current_chapter() {
    let (_, _, mut store) = setup();
    let mut reading = ReadingController::mount(&mut store, SCROLL);
    reading.navigate(&mut store, 2);
    assert!(reading.begin_session(&mut store));
    assert!(reading.add_reading_time(&mut store, Duration::from_secs(30)));
    assert!(reading.add_reading_time(&mut store, Duration::from_secs(30)));

    let stored = store.load_reading_state();
    assert_eq!(stored.total_reading_time, 60_000);
    assert_eq!(stored.chapter_progress[&2].time_spent, 60_000);
    assert_eq!(*reading.current(), stored);
}

#[test]
fn tick_does_not_drop_pending_scroll() {
    let (_, clock, mut store) = setup();
    let mut reading = ReadingController::mount(&mut store, SCROLL);
    reading.record_scroll(&mut store, 420);
    assert!(reading.add_reading_time(&mut store, Duration::from_secs(30)));
    assert_eq!(reading.current().last_scroll_position, 420);

    clock.advance(SCROLL);
    store.flush_due();
    let stored = store.load_reading_state();
    assert_eq!(stored.last_scroll_position, 420);
    assert_eq!(stored.total_reading_time, 30_000);
}
