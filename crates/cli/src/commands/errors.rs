// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recorded critical errors

use crate::app::App;
use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand};
use novel_storage::CriticalError;
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct ErrorsArgs {
    #[command(subcommand)]
    pub command: ErrorsCommand,
}

#[derive(Subcommand)]
pub enum ErrorsCommand {
    /// List the most recent critical errors
    List,
    /// Forget recorded errors
    Clear,
}

#[derive(Serialize)]
#[serde(transparent)]
struct ErrorLine(CriticalError);

impl fmt::Display for ErrorLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &self.0;
        write!(
            f,
            "{}  {:<20} {:<12} {}",
            output::timestamp(e.context.timestamp),
            e.code,
            e.context.operation,
            e.message
        )?;
        if let Some(key) = &e.context.key {
            write!(f, " [{}]", key)?;
        }
        Ok(())
    }
}

pub fn handle(app: &App, command: ErrorsCommand, format: OutputFormat) -> anyhow::Result<()> {
    let mut store = app.store()?;
    match command {
        ErrorsCommand::List => {
            let lines: Vec<ErrorLine> = store.critical_errors().into_iter().map(ErrorLine).collect();
            output::print_list(&lines, "No recorded errors", format)
        }
        ErrorsCommand::Clear => {
            if !store.clear_critical_errors() {
                anyhow::bail!("could not clear recorded errors");
            }
            println!("Cleared recorded errors");
            Ok(())
        }
    }
}
