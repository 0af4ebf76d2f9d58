// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Whole-store commands: migrate, export, import, usage, clear

use crate::app::App;
use crate::error::CliError;
use crate::output::{self, OutputFormat};
use clap::Args;
use novel_core::keys::CURRENT_SCHEMA_VERSION;
use novel_core::UuidIdGen;
use novel_storage::{export_all, import_all, MigrationOutcome, UsageReport};
use serde::Serialize;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;

#[derive(Args)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Export file to read, or "-" for stdin
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Confirm deleting every slice, the version record and all backups
    #[arg(long)]
    pub yes: bool,
}

/// Run the startup migration on its own
pub fn migrate(app: &App) -> anyhow::Result<()> {
    let mut store = app.store()?;
    let outcome = app.engine().run(&mut store, &UuidIdGen);
    if !outcome.is_success() {
        return Err(CliError::migration_blocked(&outcome).into());
    }
    println!("{}", capitalize(&outcome.to_string()));
    if let MigrationOutcome::Migrated { applied, .. } = &outcome {
        for description in applied {
            println!("  {}", description);
        }
    }
    Ok(())
}

pub fn export(app: &App, args: ExportArgs) -> anyhow::Result<()> {
    let mut store = app.migrated_store()?;
    let text = export_all(&mut store, CURRENT_SCHEMA_VERSION)?;
    match args.file {
        Some(path) => {
            std::fs::write(&path, text)?;
            println!("Exported to {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

pub fn import(app: &App, args: ImportArgs) -> anyhow::Result<()> {
    let text = if args.file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        std::fs::read_to_string(&args.file)?
    };
    let mut store = app.migrated_store()?;
    if !import_all(&mut store, &app.engine(), &text) {
        let reason = store
            .critical_errors()
            .last()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(CliError::new("import failed")
            .with_context(reason)
            .with_context("stored data was left unchanged")
            .into());
    }
    println!("Imported {}", args.file.display());
    Ok(())
}

#[derive(Serialize)]
#[serde(transparent)]
struct UsageView(UsageReport);

impl fmt::Display for UsageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} used ({:.2}%)",
            output::bytes(self.0.used),
            output::bytes(self.0.quota),
            self.0.percentage
        )
    }
}

pub fn usage(app: &App, format: OutputFormat) -> anyhow::Result<()> {
    let report = app.store()?.usage_report();
    output::print(&UsageView(report), format)
}

pub fn clear(app: &App, args: ClearArgs) -> anyhow::Result<()> {
    if !args.yes {
        return Err(CliError::clear_not_confirmed().into());
    }
    if !app.store()?.clear_all() {
        anyhow::bail!("some data could not be removed");
    }
    println!("Cleared all reader data");
    Ok(())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
