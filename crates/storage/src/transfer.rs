// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Export and import of every slice as a single JSON document

use crate::backend::KvBackend;
use crate::envelope::SchemaVersion;
use crate::migration::{DataSet, MigrationEngine};
use crate::store::PersistenceStore;
use novel_core::keys::{DATA_VERSION_KEY, SLICE_KEYS};
use novel_core::schema::describe;
use novel_core::slice::schema_for_key;
use novel_core::{Clock, ErrorKind, StorageError};
use serde::{Deserialize, Serialize};

/// `{version, exportedAt, preferences, readingState, uiState, sessionData}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub version: u32,
    /// Milliseconds since the Unix epoch
    pub exported_at: u64,
    #[serde(flatten)]
    pub data: DataSet,
}

/// Serialize every slice, flushing pending writes first
pub fn export_all<B, C>(store: &mut PersistenceStore<B, C>, version: u32) -> Result<String, StorageError>
where
    B: KvBackend + 'static,
    C: Clock + 'static,
{
    store.flush_all();
    let file = ExportFile {
        version,
        exported_at: store.clock().epoch_millis(),
        data: DataSet::load(store),
    };
    serde_json::to_string_pretty(&file).map_err(|e| {
        let error = store.error(ErrorKind::SerializeFailed, "export", e.to_string());
        store.report(&error);
        error
    })
}

/// Replace every slice with the contents of an export
///
/// Older exports are migrated in memory. Every slice is validated before
/// any is written; if a write fails the previous values are put back.
/// Slices absent from the export are removed.
pub fn import_all<B, C>(
    store: &mut PersistenceStore<B, C>,
    engine: &MigrationEngine,
    text: &str,
) -> bool
where
    B: KvBackend + 'static,
    C: Clock + 'static,
{
    match try_import(store, engine, text) {
        Ok(()) => true,
        Err(error) => {
            store.report(&error);
            false
        }
    }
}

fn try_import<B, C>(
    store: &mut PersistenceStore<B, C>,
    engine: &MigrationEngine,
    text: &str,
) -> Result<(), StorageError>
where
    B: KvBackend + 'static,
    C: Clock + 'static,
{
    let file: ExportFile = serde_json::from_str(text)
        .map_err(|e| store.error(ErrorKind::DeserializeFailed, "import", e.to_string()))?;

    let target = engine.target();
    if file.version > target {
        return Err(store.error(
            ErrorKind::ValidationFailed,
            "import",
            format!("export version {} is newer than {}", file.version, target),
        ));
    }

    let data = if file.version < target {
        let (data, applied) = engine
            .migrate_data(file.data, file.version)
            .map_err(|failure| store.error(ErrorKind::MigrationFailed, "import", failure.to_string()))?;
        tracing::info!(from = file.version, to = target, rules = applied.len(), "migrated import");
        data
    } else {
        file.data
    };

    for (key, value) in data.entries() {
        let Some(value) = value else { continue };
        let Some(schema) = schema_for_key(key) else { continue };
        if let Err(violations) = schema.validate(value) {
            return Err(store
                .error(ErrorKind::ValidationFailed, "import", describe(&violations))
                .with_context(key));
        }
    }

    let mut previous = Vec::new();
    for key in SLICE_KEYS.iter().copied().chain([DATA_VERSION_KEY]) {
        store.cancel_pending(key);
        previous.push((key, store.read_raw(key)?));
    }

    let record = SchemaVersion {
        version: target,
        timestamp: store.clock().epoch_millis(),
        migration_id: None,
    };
    let mut written = true;
    for (key, value) in data.entries() {
        written = match value {
            Some(value) => store.save(key, value),
            None => store.remove_raw(key).is_ok(),
        };
        if !written {
            break;
        }
    }
    if written {
        written = store.write_version(&record);
    }
    if written {
        tracing::info!(version = target, "imported all slices");
        return Ok(());
    }

    for (key, text) in previous {
        let restored = match text {
            Some(text) => store.write_raw(key, &text),
            None => store.remove_raw(key),
        };
        if let Err(e) = restored {
            tracing::warn!(key, error = %e, "failed to restore slice after import");
        }
    }
    Err(store.error(
        ErrorKind::StorageUnavailable,
        "import",
        "write failed; previous data restored",
    ))
}

#[cfg(test)]
#[path = "transfer_tests.rs"]
mod tests;
