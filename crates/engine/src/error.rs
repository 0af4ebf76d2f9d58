// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the reader engine

use novel_core::Clock;
use novel_storage::{KvBackend, MigrationOutcome, PersistenceStore};
use std::fmt;
use thiserror::Error;

/// Errors from navigation and bookmark operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("chapter {index} is out of range ({count} chapters)")]
    ChapterOutOfRange { index: u64, count: u64 },
    #[error("already at the last chapter")]
    NoNextChapter,
    #[error("already at the first chapter")]
    NoPreviousChapter,
    #[error("bookmark not found: {0}")]
    BookmarkNotFound(String),
}

/// Startup could not complete because storage is not at the current schema
///
/// The store is handed back so the caller can offer a retry.
#[derive(Error)]
pub enum StartupError<B: KvBackend + 'static, C: Clock + 'static> {
    #[error("{outcome}")]
    MigrationBlocked {
        store: Box<PersistenceStore<B, C>>,
        outcome: MigrationOutcome,
    },
}

impl<B: KvBackend + 'static, C: Clock + 'static> StartupError<B, C> {
    pub fn outcome(&self) -> &MigrationOutcome {
        match self {
            StartupError::MigrationBlocked { outcome, .. } => outcome,
        }
    }

    /// Take the store back, e.g. to retry [`crate::Reader::open`]
    pub fn into_store(self) -> PersistenceStore<B, C> {
        match self {
            StartupError::MigrationBlocked { store, .. } => *store,
        }
    }
}

impl<B: KvBackend + 'static, C: Clock + 'static> fmt::Debug for StartupError<B, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationBlocked")
            .field("outcome", self.outcome())
            .finish_non_exhaustive()
    }
}
