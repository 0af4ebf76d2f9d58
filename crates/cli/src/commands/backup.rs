// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Migration backup commands

use crate::app::App;
use crate::error::CliError;
use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand};
use novel_storage::{Backup, BackupError};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct BackupArgs {
    #[command(subcommand)]
    pub command: BackupCommand,
}

#[derive(Subcommand)]
pub enum BackupCommand {
    /// List backups, newest first
    List,
    /// Show one backup
    Show { id: String },
    /// Restore storage exactly as a backup captured it
    Rollback { id: String },
    /// Delete all but the newest backups
    Prune {
        /// Backups to keep (defaults to the configured retention)
        #[arg(long)]
        keep: Option<usize>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BackupLine {
    id: String,
    created_at: u64,
    version: u32,
    slices: usize,
}

impl From<&Backup> for BackupLine {
    fn from(backup: &Backup) -> Self {
        Self {
            id: backup.id.clone(),
            created_at: backup.created_at,
            version: backup.version,
            slices: backup.slice_count(),
        }
    }
}

impl fmt::Display for BackupLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<40} v{:<3} {} slices  {}",
            self.id,
            self.version,
            self.slices,
            output::timestamp(self.created_at)
        )
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct BackupView(Backup);

impl fmt::Display for BackupView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        writeln!(f, "Backup: {}", b.id)?;
        writeln!(f, "  Created: {}", output::timestamp(b.created_at))?;
        writeln!(f, "  Schema version: {}", b.version)?;
        let slices = [
            ("preferences", &b.preferences),
            ("reading state", &b.reading_state),
            ("ui state", &b.ui_state),
            ("session data", &b.session_data),
        ];
        for (name, text) in slices {
            match text {
                Some(text) => writeln!(f, "  {}: {}", name, output::bytes(text.len() as u64))?,
                None => writeln!(f, "  {}: -", name)?,
            }
        }
        write!(
            f,
            "  Version record: {}",
            if b.version_record.is_some() { "yes" } else { "no" }
        )
    }
}

fn not_found(error: BackupError) -> anyhow::Error {
    match error {
        BackupError::NotFound(id) => CliError::backup_not_found(&id).into(),
        other => other.into(),
    }
}

pub fn handle(app: &App, command: BackupCommand, format: OutputFormat) -> anyhow::Result<()> {
    let engine = app.engine();
    let backups = engine.backups();
    let mut store = app.store()?;

    match command {
        BackupCommand::List => {
            let lines: Vec<BackupLine> = backups.list(&store)?.iter().map(BackupLine::from).collect();
            output::print_list(&lines, "No backups", format)
        }
        BackupCommand::Show { id } => {
            let backup = backups.load(&store, &id).map_err(not_found)?;
            output::print(&BackupView(backup), format)
        }
        BackupCommand::Rollback { id } => {
            let backup = engine.rollback_to(&mut store, &id).map_err(not_found)?;
            println!(
                "Restored backup {} (schema version {})",
                backup.id, backup.version
            );
            if backup.version < novel_core::keys::CURRENT_SCHEMA_VERSION {
                println!("Data will be migrated again the next time it is opened");
            }
            Ok(())
        }
        BackupCommand::Prune { keep } => {
            let keep = keep.unwrap_or(backups.retain());
            let removed = backups.prune(&mut store, keep)?;
            println!("Removed {} backup(s), kept at most {}", removed.len(), keep);
            Ok(())
        }
    }
}
