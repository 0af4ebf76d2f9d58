// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Full snapshots of the four slices, taken before migrations
//!
//! A backup holds the raw stored text of every slice and of the version
//! record, so restoring it puts storage back exactly as it was.

use crate::backend::KvBackend;
use crate::store::PersistenceStore;
use novel_core::keys::{
    backup_key, BACKUP_KEY_PREFIX, DATA_VERSION_KEY, PREFERENCES_KEY, READING_STATE_KEY,
    SESSION_DATA_KEY, UI_STATE_KEY,
};
use novel_core::{Clock, IdGen, StorageError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from backup operations
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("backup not found: {0}")]
    NotFound(String),
    #[error("backup {id} is unreadable: {source}")]
    Corrupt {
        id: String,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Snapshot of every slice at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub id: String,
    /// Milliseconds since the Unix epoch
    pub created_at: u64,
    /// Creation order among stored backups; breaks ties within a millisecond
    #[serde(default)]
    pub sequence: u64,
    /// Schema version the data was at
    pub version: u32,
    pub version_record: Option<String>,
    pub preferences: Option<String>,
    pub reading_state: Option<String>,
    pub ui_state: Option<String>,
    pub session_data: Option<String>,
}

impl Backup {
    fn entries(&self) -> [(&'static str, &Option<String>); 5] {
        [
            (PREFERENCES_KEY, &self.preferences),
            (READING_STATE_KEY, &self.reading_state),
            (UI_STATE_KEY, &self.ui_state),
            (SESSION_DATA_KEY, &self.session_data),
            (DATA_VERSION_KEY, &self.version_record),
        ]
    }

    /// Number of slices that had data when the backup was taken
    pub fn slice_count(&self) -> usize {
        self.entries()
            .iter()
            .filter(|(key, value)| *key != DATA_VERSION_KEY && value.is_some())
            .count()
    }
}

/// Creates, lists, restores and evicts backups
#[derive(Debug, Clone, Copy)]
pub struct BackupManager {
    retain: usize,
}

impl BackupManager {
    pub fn new(retain: usize) -> Self {
        Self {
            retain: retain.max(1),
        }
    }

    pub fn retain(&self) -> usize {
        self.retain
    }

    /// Generate a backup id; the leading timestamp keeps ids sortable
    pub fn generate_id(created_at: u64, ids: &impl IdGen) -> String {
        format!("{:013}-{}", created_at, ids.next())
    }

    /// Snapshot the slices, then evict beyond the retention count
    ///
    /// Eviction is best effort; a failure to evict never fails the backup.
    pub fn create<B, C>(
        &self,
        store: &mut PersistenceStore<B, C>,
        ids: &impl IdGen,
        version: u32,
    ) -> Result<Backup, BackupError>
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        let created_at = store.clock().epoch_millis();
        let sequence = self
            .list(store)?
            .iter()
            .map(|b| b.sequence)
            .max()
            .map_or(0, |last| last + 1);
        let backup = Backup {
            id: Self::generate_id(created_at, ids),
            created_at,
            sequence,
            version,
            version_record: store.read_raw(DATA_VERSION_KEY)?,
            preferences: store.read_raw(PREFERENCES_KEY)?,
            reading_state: store.read_raw(READING_STATE_KEY)?,
            ui_state: store.read_raw(UI_STATE_KEY)?,
            session_data: store.read_raw(SESSION_DATA_KEY)?,
        };

        let text = serde_json::to_string(&backup).map_err(|source| BackupError::Corrupt {
            id: backup.id.clone(),
            source,
        })?;
        store.write_raw(&backup_key(&backup.id), &text)?;
        tracing::info!(id = %backup.id, version, "created backup");

        if let Err(e) = self.prune(store, self.retain) {
            tracing::warn!(error = %e, "backup eviction failed");
        }
        Ok(backup)
    }

    /// Every readable backup, newest first by creation time, then sequence
    pub fn list<B, C>(&self, store: &PersistenceStore<B, C>) -> Result<Vec<Backup>, BackupError>
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        let mut backups = Vec::new();
        for key in store.managed_keys()? {
            let Some(id) = key.strip_prefix(BACKUP_KEY_PREFIX) else {
                continue;
            };
            match self.load(store, id) {
                Ok(backup) => backups.push(backup),
                Err(e) => tracing::warn!(id, error = %e, "skipping unreadable backup"),
            }
        }
        backups.sort_by(|a, b| {
            (b.created_at, b.sequence, &b.id).cmp(&(a.created_at, a.sequence, &a.id))
        });
        Ok(backups)
    }

    pub fn load<B, C>(&self, store: &PersistenceStore<B, C>, id: &str) -> Result<Backup, BackupError>
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        let text = store
            .read_raw(&backup_key(id))?
            .ok_or_else(|| BackupError::NotFound(id.to_string()))?;
        serde_json::from_str(&text).map_err(|source| BackupError::Corrupt {
            id: id.to_string(),
            source,
        })
    }

    /// Put every slice and the version record back exactly as captured
    ///
    /// Keys that were absent at backup time are removed.
    pub fn restore<B, C>(
        &self,
        store: &mut PersistenceStore<B, C>,
        backup: &Backup,
    ) -> Result<(), BackupError>
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        for (key, value) in backup.entries() {
            store.cancel_pending(key);
            match value {
                Some(text) => store.write_raw(key, text)?,
                None => store.remove_raw(key)?,
            }
        }
        tracing::info!(id = %backup.id, version = backup.version, "restored backup");
        Ok(())
    }

    /// Keep the `keep` newest backups; returns the ids removed
    pub fn prune<B, C>(
        &self,
        store: &mut PersistenceStore<B, C>,
        keep: usize,
    ) -> Result<Vec<String>, BackupError>
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        let mut removed = Vec::new();
        for backup in self.list(store)?.into_iter().skip(keep) {
            store.remove_raw(&backup_key(&backup.id))?;
            tracing::debug!(id = %backup.id, "evicted backup");
            removed.push(backup.id);
        }
        Ok(removed)
    }

    pub fn delete<B, C>(&self, store: &mut PersistenceStore<B, C>, id: &str) -> Result<(), BackupError>
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        store.remove_raw(&backup_key(id))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "backup_tests.rs"]
mod tests;
