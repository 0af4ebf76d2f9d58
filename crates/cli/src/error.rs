// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing errors with context and suggestions

use novel_storage::MigrationOutcome;
use std::fmt;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {}

/// Builders for the failures users actually hit
impl CliError {
    /// Startup migration did not reach the current schema
    pub fn migration_blocked(outcome: &MigrationOutcome) -> Self {
        let error = CliError::new("stored data could not be brought up to date")
            .with_context(outcome.to_string());
        match outcome {
            MigrationOutcome::RolledBack { backup_id, .. } => error
                .with_context("storage was restored to how it was before the attempt")
                .with_suggestion("Retry: novel migrate")
                .with_suggestion(format!("Inspect the backup: novel backup show {}", backup_id)),
            _ => error
                .with_suggestion("Retry: novel migrate")
                .with_suggestion("Check recorded errors: novel errors list"),
        }
    }

    pub fn backup_not_found(id: &str) -> Self {
        CliError::new(format!("backup '{}' not found", id))
            .with_context("backups are evicted once more than the retention count exist")
            .with_suggestion("List backups: novel backup list")
    }

    pub fn bookmark_not_found(id: &str) -> Self {
        CliError::new(format!("bookmark '{}' not found", id))
            .with_suggestion("List bookmarks: novel bookmark list")
    }

    /// A write was attempted but did not reach storage
    pub fn not_saved(what: &str) -> Self {
        CliError::new(format!("{} was not saved", what))
            .with_suggestion("Check available space: novel usage")
            .with_suggestion("Check recorded errors: novel errors list")
    }

    pub fn clear_not_confirmed() -> Self {
        CliError::new("refusing to delete all reader data without confirmation")
            .with_context("this removes every slice, the version record and all backups")
            .with_suggestion("Keep a copy first: novel export --file backup.json")
            .with_suggestion("Then run: novel clear --yes")
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
