// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Settings actions. Every preference is written immediately.

use super::write_through;
use novel_core::{Clock, PreferenceChange, Preferences};
use novel_storage::{KvBackend, PersistenceStore};

#[derive(Debug, Clone, PartialEq)]
pub struct PreferencesController {
    current: Preferences,
}

impl PreferencesController {
    pub fn mount<B, C>(store: &mut PersistenceStore<B, C>) -> Self
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        Self {
            current: store.load_preferences(),
        }
    }

    pub fn current(&self) -> &Preferences {
        &self.current
    }

    pub fn apply<B, C>(&mut self, store: &mut PersistenceStore<B, C>, change: PreferenceChange) -> bool
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        tracing::debug!(?change, "preference changed");
        write_through(store, &mut self.current, |prefs| prefs.apply(change))
    }

    /// Replace every preference at once
    pub fn replace<B, C>(&mut self, store: &mut PersistenceStore<B, C>, prefs: Preferences) -> bool
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        write_through(store, &mut self.current, |_| prefs)
    }

    pub fn reset<B, C>(&mut self, store: &mut PersistenceStore<B, C>) -> bool
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        self.replace(store, Preferences::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use novel_core::slice::{FontSize, Theme};
    use novel_core::{FakeClock, ReaderConfig};
    use novel_storage::MemoryBackend;
    use yare::parameterized;

    fn setup() -> (MemoryBackend, PersistenceStore<MemoryBackend, FakeClock>) {
        let backend = MemoryBackend::new();
        let store = PersistenceStore::new(backend.clone(), FakeClock::new(), &ReaderConfig::default());
        (backend, store)
    }

    #[parameterized(
        theme = { "theme", "dark" },
        font = { "font", "monospace" },
        font_size = { "fontSize", "large" },
        line_height = { "line-height", "relaxed" },
        text_align = { "textAlign", "justify" },
        page_width = { "pageWidth", "wide" },
    )]
    fn each_setting_is_written_immediately(field: &str, value: &str) {
        let (_, mut store) = setup();
        let mut controller = PreferencesController::mount(&mut store);
        let change = PreferenceChange::parse(field, value).unwrap();

        assert!(controller.apply(&mut store, change));
        assert_eq!(store.load_preferences(), *controller.current());
        assert_ne!(*controller.current(), Preferences::default());
    }

    #[test]
    fn settings_accumulate() {
        let (_, mut store) = setup();
        let mut controller = PreferencesController::mount(&mut store);
        controller.apply(&mut store, PreferenceChange::Theme(Theme::Dark));
        controller.apply(&mut store, PreferenceChange::FontSize(FontSize::Small));

        let reloaded = PreferencesController::mount(&mut store);
        assert_eq!(reloaded.current().theme, Theme::Dark);
        assert_eq!(reloaded.current().font_size, FontSize::Small);
    }

    #[test]
    fn failed_write_still_updates_memory() {
        let (backend, mut store) = setup();
        let mut controller = PreferencesController::mount(&mut store);
        backend.set_unavailable(true);
        assert!(!controller.apply(&mut store, PreferenceChange::Theme(Theme::Light)));
        assert_eq!(controller.current().theme, Theme::Light);
        backend.set_unavailable(false);
        assert_eq!(store.load_preferences(), Preferences::default());
    }

    #[test]
    fn reset_restores_defaults() {
        let (_, mut store) = setup();
        let mut controller = PreferencesController::mount(&mut store);
        controller.apply(&mut store, PreferenceChange::Theme(Theme::Dark));
        assert!(controller.reset(&mut store));
        assert_eq!(store.load_preferences(), Preferences::default());
    }
}
