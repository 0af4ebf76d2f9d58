// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data directory, configuration and store construction

use crate::error::CliError;
use anyhow::Context;
use novel_core::{DirContentSource, ReaderConfig, SystemClock, UuidIdGen};
use novel_engine::Reader;
use novel_storage::{FileBackend, MigrationEngine, PersistenceStore};
use std::path::{Path, PathBuf};

pub type Store = PersistenceStore<FileBackend, SystemClock>;
pub type CliReader = Reader<FileBackend, SystemClock, UuidIdGen>;

/// Config file looked up inside the data directory
pub const CONFIG_FILE: &str = "novel.toml";

pub struct App {
    data_dir: PathBuf,
    content_dir: Option<PathBuf>,
    config: ReaderConfig,
}

impl App {
    /// Resolve the data directory and load the config
    pub fn resolve(
        data_dir: Option<PathBuf>,
        config_path: Option<PathBuf>,
        content_dir: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let config = match config_path {
            Some(path) => ReaderConfig::load(&path)?,
            None => ReaderConfig::load_or_default(&data_dir.join(CONFIG_FILE))?,
        };
        tracing::debug!(data_dir = %data_dir.display(), "resolved data directory");
        Ok(Self {
            data_dir,
            content_dir,
            config,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn engine(&self) -> MigrationEngine {
        MigrationEngine::builtin(&self.config)
    }

    /// Open the store without running migrations
    pub fn store(&self) -> anyhow::Result<Store> {
        let backend = FileBackend::open(&self.data_dir)
            .with_context(|| format!("cannot open data directory {}", self.data_dir.display()))?;
        Ok(PersistenceStore::new(backend, SystemClock, &self.config))
    }

    /// Open the store and bring it to the current schema, without starting
    /// a reading session
    pub fn migrated_store(&self) -> anyhow::Result<Store> {
        let mut store = self.store()?;
        let outcome = self.engine().run(&mut store, &UuidIdGen);
        if !outcome.is_success() {
            return Err(CliError::migration_blocked(&outcome).into());
        }
        Ok(store)
    }

    /// Open the store through the startup gate
    ///
    /// The chapter list is loaded when a content directory was given.
    pub fn reader(&self) -> anyhow::Result<CliReader> {
        let store = self.store()?;
        let mut reader = Reader::open(store, &self.engine(), UuidIdGen, self.config.clone())
            .map_err(|e| CliError::migration_blocked(e.outcome()))?;
        if let Some(source) = self.content_source() {
            if !reader.load_table_of_contents(&source) {
                tracing::warn!(dir = %source.root().display(), "chapter list unavailable");
            }
        }
        Ok(reader)
    }

    pub fn content_source(&self) -> Option<DirContentSource<SystemClock>> {
        self.content_dir
            .as_ref()
            .map(|dir| DirContentSource::new(dir.clone(), SystemClock))
    }
}

fn default_data_dir() -> anyhow::Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("novel"))
        .ok_or_else(|| {
            CliError::new("no platform data directory")
                .with_suggestion("Pass one explicitly: novel --data-dir <DIR>")
                .into()
        })
}
