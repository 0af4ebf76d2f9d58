// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Panel visibility and layout
//!
//! Panel operations write immediately. Content width changes arrive in bursts
//! while the window is resized, so the layout tracker debounces them and owns
//! `contentWidth` alone.

use super::write_through;
use novel_core::{Clock, NavigationMode, Panel, UiState};
use novel_storage::{KvBackend, PersistenceStore};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct UiController {
    current: UiState,
    layout_delay: Duration,
}

impl UiController {
    pub fn mount<B, C>(store: &mut PersistenceStore<B, C>, layout_delay: Duration) -> Self
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        Self {
            current: store.load_ui_state(),
            layout_delay,
        }
    }

    pub fn current(&self) -> &UiState {
        &self.current
    }

    pub fn toggle<B, C>(&mut self, store: &mut PersistenceStore<B, C>, panel: Panel) -> bool
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        // Toggle relative to what is shown, not to what is stored
        let open = !self.current.is_open(panel);
        self.set_panel(store, panel, open)
    }

    pub fn open<B, C>(&mut self, store: &mut PersistenceStore<B, C>, panel: Panel) -> bool
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        self.set_panel(store, panel, true)
    }

    pub fn close<B, C>(&mut self, store: &mut PersistenceStore<B, C>, panel: Panel) -> bool
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        self.set_panel(store, panel, false)
    }

    pub fn close_all<B, C>(&mut self, store: &mut PersistenceStore<B, C>) -> bool
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        write_through(store, &mut self.current, UiState::close_all)
    }

    pub fn set_navigation_mode<B, C>(&mut self, store: &mut PersistenceStore<B, C>, mode: NavigationMode) -> bool
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        write_through(store, &mut self.current, |ui| ui.with_navigation_mode(mode))
    }

    pub fn set_panel_animation<B, C>(&mut self, store: &mut PersistenceStore<B, C>, duration: Duration) -> bool
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        write_through(store, &mut self.current, |ui| ui.with_panel_animation_ms(ms))
    }

    /// Layout tracker: record the content width after a quiet period
    pub fn set_content_width<B, C>(&mut self, store: &mut PersistenceStore<B, C>, width: u64)
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        self.current = self.current.clone().with_content_width(width);
        store.debounced_update(self.layout_delay, self.current.clone(), move |ui: UiState| {
            ui.with_content_width(width)
        });
    }

    fn set_panel<B, C>(&mut self, store: &mut PersistenceStore<B, C>, panel: Panel, open: bool) -> bool
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        tracing::debug!(?panel, open, "panel changed");
        write_through(store, &mut self.current, |ui| {
            if open {
                ui.open(panel)
            } else {
                ui.close(panel)
            }
        })
    }
}

#[cfg(test)]
#[path = "ui_tests.rs"]
mod tests;
