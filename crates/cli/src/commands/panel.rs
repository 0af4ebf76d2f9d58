// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Panel and layout commands

use crate::app::App;
use crate::error::CliError;
use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand};
use novel_core::{NavigationMode, Panel, UiState};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

#[derive(Args)]
pub struct PanelArgs {
    #[command(subcommand)]
    pub command: PanelCommand,
}

#[derive(Subcommand)]
pub enum PanelCommand {
    /// Show panel and layout state
    Show,
    /// Toggle a panel (toc or settings)
    Toggle { panel: String },
    /// Open a panel
    Open { panel: String },
    /// Close a panel
    Close { panel: String },
    /// Close every panel
    CloseAll,
    /// Set the content column width in pixels
    Width { pixels: u64 },
    /// Set how chapters are turned (buttons, keyboard or swipe)
    Mode { mode: String },
    /// Set the panel animation duration, e.g. "300ms"
    Animation {
        #[arg(value_parser = humantime::parse_duration)]
        duration: Duration,
    },
}

#[derive(Serialize)]
#[serde(transparent)]
struct UiView(UiState);

impl fmt::Display for UiView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ui = &self.0;
        let flag = |open: bool| if open { "open" } else { "closed" };
        writeln!(f, "toc:        {}", flag(ui.is_toc_open))?;
        writeln!(f, "settings:   {}", flag(ui.is_settings_open))?;
        writeln!(
            f,
            "last panel: {}",
            ui.last_active_panel.map_or("-", Panel::as_str)
        )?;
        writeln!(f, "width:      {}px", ui.content_width)?;
        writeln!(f, "navigation: {}", ui.navigation_mode)?;
        write!(f, "animation:  {}ms", ui.panel_animation_ms)
    }
}

pub fn handle(app: &App, command: PanelCommand, format: OutputFormat) -> anyhow::Result<()> {
    if let PanelCommand::Show = command {
        let ui = app.migrated_store()?.load_ui_state();
        return output::print(&UiView(ui), format);
    }

    let mut reader = app.reader()?;
    let saved = match command {
        PanelCommand::Show => true,
        PanelCommand::Toggle { panel } => reader.toggle_panel(panel.parse()?),
        PanelCommand::Open { panel } => reader.open_panel(panel.parse()?),
        PanelCommand::Close { panel } => reader.close_panel(panel.parse()?),
        PanelCommand::CloseAll => reader.close_panels(),
        PanelCommand::Width { pixels } => {
            // debounced; written when the reader closes
            reader.set_content_width(pixels);
            true
        }
        PanelCommand::Mode { mode } => {
            let mode: NavigationMode = mode.parse()?;
            reader.set_navigation_mode(mode)
        }
        PanelCommand::Animation { duration } => reader.set_panel_animation(duration),
    };
    let ui = *reader.ui().current();
    reader.close();
    if !saved {
        return Err(CliError::not_saved("panel state").into());
    }
    output::print(&UiView(ui), format)
}
