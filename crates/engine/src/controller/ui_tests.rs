// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use novel_core::{FakeClock, ReaderConfig};
use novel_storage::MemoryBackend;

const LAYOUT: Duration = Duration::from_millis(500);

fn setup() -> (FakeClock, PersistenceStore<MemoryBackend, FakeClock>) {
    let clock = FakeClock::new();
    let store = PersistenceStore::new(MemoryBackend::new(), clock.clone(), &ReaderConfig::default());
    (clock, store)
}

#[test]
fn toggle_writes_immediately_and_remembers_panel() {
    let (_, mut store) = setup();
    let mut ui = UiController::mount(&mut store, LAYOUT);

    assert!(ui.toggle(&mut store, Panel::Toc));
    let stored = store.load_ui_state();
    assert!(stored.is_toc_open);
    assert_eq!(stored.last_active_panel, Some(Panel::Toc));

    assert!(ui.toggle(&mut store, Panel::Toc));
    let stored = store.load_ui_state();
    assert!(!stored.is_toc_open);
    assert_eq!(stored.last_active_panel, Some(Panel::Toc));
}

#[test]
fn close_all_keeps_last_active_panel() {
    let (_, mut store) = setup();
    let mut ui = UiController::mount(&mut store, LAYOUT);
    ui.open(&mut store, Panel::Toc);
    ui.open(&mut store, Panel::Settings);
    assert!(ui.close_all(&mut store));

    let stored = store.load_ui_state();
    assert!(!stored.is_toc_open && !stored.is_settings_open);
    assert_eq!(stored.last_active_panel, Some(Panel::Settings));
}

#[test]
fn content_width_is_debounced() {
    let (clock, mut store) = setup();
    let mut ui = UiController::mount(&mut store, LAYOUT);

    ui.set_content_width(&mut store, 600);
    clock.advance(Duration::from_millis(200));
    ui.set_content_width(&mut store, 640);
    assert_eq!(ui.current().content_width, 640);

    clock.advance(Duration::from_millis(499));
    store.flush_due();
    assert_eq!(store.load_ui_state().content_width, UiState::DEFAULT_CONTENT_WIDTH);

    clock.advance(Duration::from_millis(1));
    assert_eq!(store.flush_due(), 1);
    assert_eq!(store.load_ui_state().content_width, 640);
}

#[test]
fn pending_width_does_not_clobber_panel_writes() {
    let (clock, mut store) = setup();
    let mut ui = UiController::mount(&mut store, LAYOUT);

    ui.set_content_width(&mut store, 800);
    ui.open(&mut store, Panel::Settings);
    clock.advance(LAYOUT);
    store.flush_due();

    let stored = store.load_ui_state();
    assert_eq!(stored.content_width, 800);
    assert!(stored.is_settings_open);
}

#[test]
fn panel_write_does_not_clobber_pending_width() {
    let (clock, mut store) = setup();
    let mut ui = UiController::mount(&mut store, LAYOUT);

    ui.set_content_width(&mut store, 800);
    clock.advance(LAYOUT);
    store.flush_due();

    // A second controller with a stale width must not write it back
    let mut stale = UiController::mount(&mut store, LAYOUT);
    ui.set_content_width(&mut store, 900);
    clock.advance(LAYOUT);
    store.flush_due();
    stale.toggle(&mut store, Panel::Toc);
    assert_eq!(store.load_ui_state().content_width, 900);
}

#[test]
fn navigation_mode_and_animation() {
    let (_, mut store) = setup();
    let mut ui = UiController::mount(&mut store, LAYOUT);
    assert!(ui.set_navigation_mode(&mut store, NavigationMode::Swipe));
    assert!(ui.set_panel_animation(&mut store, Duration::from_millis(150)));

    let stored = store.load_ui_state();
    assert_eq!(stored.navigation_mode, NavigationMode::Swipe);
    assert_eq!(stored.panel_animation_ms, 150);
}
