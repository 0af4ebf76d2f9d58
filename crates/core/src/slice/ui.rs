// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Panel visibility and layout state

use crate::schema::{FieldKind, FieldSpec, Schema};
use serde::{Deserialize, Serialize};

choice_enum! {
    /// A side panel
    Panel default Toc {
        Toc => "toc",
        Settings => "settings",
    }
}

choice_enum! {
    /// How the reader turns chapters
    NavigationMode default Buttons {
        Buttons => "buttons",
        Keyboard => "keyboard",
        Swipe => "swipe",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub is_toc_open: bool,
    pub is_settings_open: bool,
    pub last_active_panel: Option<Panel>,
    pub content_width: u64,
    pub navigation_mode: NavigationMode,
    /// Milliseconds
    #[serde(rename = "panelAnimationDuration")]
    pub panel_animation_ms: u64,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            is_toc_open: false,
            is_settings_open: false,
            last_active_panel: None,
            content_width: Self::DEFAULT_CONTENT_WIDTH,
            navigation_mode: NavigationMode::default(),
            panel_animation_ms: Self::DEFAULT_PANEL_ANIMATION_MS,
        }
    }
}

pub const UI_STATE_SCHEMA: Schema = Schema {
    name: "uiState",
    fields: &[
        FieldSpec::required("isTocOpen", FieldKind::Bool),
        FieldSpec::required("isSettingsOpen", FieldKind::Bool),
        FieldSpec::required("lastActivePanel", FieldKind::OptionalChoice(Panel::NAMES)),
        FieldSpec::required("contentWidth", FieldKind::Count),
        FieldSpec::required("navigationMode", FieldKind::Choice(NavigationMode::NAMES)),
        FieldSpec::required("panelAnimationDuration", FieldKind::Count),
    ],
};

impl UiState {
    pub const DEFAULT_CONTENT_WIDTH: u64 = 720;
    pub const DEFAULT_PANEL_ANIMATION_MS: u64 = 300;

    pub fn is_open(&self, panel: Panel) -> bool {
        match panel {
            Panel::Toc => self.is_toc_open,
            Panel::Settings => self.is_settings_open,
        }
    }

    pub fn open(self, panel: Panel) -> Self {
        self.with_panel(panel, true)
    }

    pub fn close(self, panel: Panel) -> Self {
        self.with_panel(panel, false)
    }

    pub fn toggle(self, panel: Panel) -> Self {
        let open = !self.is_open(panel);
        self.with_panel(panel, open)
    }

    /// Close both panels
    ///
    /// Closing never clears `last_active_panel`; it names the panel to restore.
    pub fn close_all(mut self) -> Self {
        self.is_toc_open = false;
        self.is_settings_open = false;
        self
    }

    pub fn with_content_width(mut self, width: u64) -> Self {
        self.content_width = width;
        self
    }

    pub fn with_navigation_mode(mut self, mode: NavigationMode) -> Self {
        self.navigation_mode = mode;
        self
    }

    pub fn with_panel_animation_ms(mut self, ms: u64) -> Self {
        self.panel_animation_ms = ms;
        self
    }

    fn with_panel(mut self, panel: Panel, open: bool) -> Self {
        match panel {
            Panel::Toc => self.is_toc_open = open,
            Panel::Settings => self.is_settings_open = open,
        }
        if open {
            self.last_active_panel = Some(panel);
        }
        self
    }
}
