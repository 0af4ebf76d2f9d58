// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Preference commands

use crate::app::App;
use crate::error::CliError;
use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand};
use novel_core::{PreferenceChange, Preferences};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct PrefsArgs {
    #[command(subcommand)]
    pub command: PrefsCommand,
}

#[derive(Subcommand)]
pub enum PrefsCommand {
    /// Show current preferences
    Show,
    /// Change one preference
    Set {
        /// theme, font, font-size, line-height, text-align or page-width
        field: String,
        value: String,
    },
    /// Restore every preference to its default
    Reset,
}

#[derive(Serialize)]
#[serde(transparent)]
struct PrefsView(Preferences);

impl fmt::Display for PrefsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.0;
        writeln!(f, "theme:       {}", p.theme)?;
        writeln!(f, "font:        {}", p.font)?;
        writeln!(f, "font-size:   {}", p.font_size)?;
        writeln!(f, "line-height: {}", p.line_height)?;
        writeln!(f, "text-align:  {}", p.text_align)?;
        write!(f, "page-width:  {}", p.page_width)
    }
}

pub fn handle(app: &App, command: PrefsCommand, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        PrefsCommand::Show => {
            let prefs = app.migrated_store()?.load_preferences();
            output::print(&PrefsView(prefs), format)
        }
        PrefsCommand::Set { field, value } => {
            let change = PreferenceChange::parse(&field, &value)?;
            let mut reader = app.reader()?;
            let saved = reader.set_preference(change);
            let prefs = *reader.preferences().current();
            reader.close();
            if !saved {
                return Err(CliError::not_saved("preference").into());
            }
            output::print(&PrefsView(prefs), format)
        }
        PrefsCommand::Reset => {
            let mut reader = app.reader()?;
            let saved = reader.reset_preferences();
            reader.close();
            if !saved {
                return Err(CliError::not_saved("preferences").into());
            }
            println!("Preferences reset");
            Ok(())
        }
    }
}
