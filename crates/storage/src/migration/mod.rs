// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema migrations
//!
//! On startup the stored version is compared with the version this build
//! writes. Rules bridging the gap are applied in order to an in-memory copy
//! of all four slices. A backup is taken first; any rule failure restores it.

mod rules;

pub use rules::builtin_rules;

use crate::backend::KvBackend;
use crate::backup::{Backup, BackupError, BackupManager};
use crate::envelope::SchemaVersion;
use crate::store::PersistenceStore;
use novel_core::keys::{
    CURRENT_SCHEMA_VERSION, LEGACY_SCHEMA_VERSION, PREFERENCES_KEY, READING_STATE_KEY,
    SESSION_DATA_KEY, UI_STATE_KEY,
};
use novel_core::slice::schema_for_key;
use novel_core::{
    Clock, ErrorKind, IdGen, Preferences, ReaderConfig, ReadingState, SessionData, UiState,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Untyped snapshot of the four slices, as stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataSet {
    pub preferences: Option<Value>,
    pub reading_state: Option<Value>,
    pub ui_state: Option<Value>,
    pub session_data: Option<Value>,
}

impl DataSet {
    /// Read the enveloped data of every slice
    pub fn load<B, C>(store: &mut PersistenceStore<B, C>) -> Self
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        Self {
            preferences: store.load_data(PREFERENCES_KEY),
            reading_state: store.load_data(READING_STATE_KEY),
            ui_state: store.load_data(UI_STATE_KEY),
            session_data: store.load_data(SESSION_DATA_KEY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, value)| value.is_none())
    }

    /// `(key, value)` pairs in snapshot order
    pub fn entries(&self) -> [(&'static str, Option<&Value>); 4] {
        [
            (PREFERENCES_KEY, self.preferences.as_ref()),
            (READING_STATE_KEY, self.reading_state.as_ref()),
            (UI_STATE_KEY, self.ui_state.as_ref()),
            (SESSION_DATA_KEY, self.session_data.as_ref()),
        ]
    }
}

pub type MigrateFn = Box<dyn Fn(DataSet) -> Result<DataSet, String>>;
pub type ValidateFn = Box<dyn Fn(&DataSet) -> bool>;

/// One step from `from` to `to`
pub struct MigrationRule {
    pub from: u32,
    pub to: u32,
    pub description: String,
    migrate: MigrateFn,
    validate: Option<ValidateFn>,
}

impl MigrationRule {
    pub fn new(
        from: u32,
        to: u32,
        description: impl Into<String>,
        migrate: impl Fn(DataSet) -> Result<DataSet, String> + 'static,
    ) -> Self {
        Self {
            from,
            to,
            description: description.into(),
            migrate: Box::new(migrate),
            validate: None,
        }
    }

    /// Post-condition checked after the rule runs
    pub fn with_validator(mut self, validate: impl Fn(&DataSet) -> bool + 'static) -> Self {
        self.validate = Some(Box::new(validate));
        self
    }

    fn apply(&self, data: DataSet) -> Result<DataSet, String> {
        let migrated = (self.migrate)(data)?;
        match &self.validate {
            Some(validate) if !validate(&migrated) => Err("post-migration validation failed".into()),
            _ => Ok(migrated),
        }
    }
}

impl fmt::Debug for MigrationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationRule")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("description", &self.description)
            .field("validated", &self.validate.is_some())
            .finish()
    }
}

/// A rule that refused the data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
    pub rule: String,
    pub reason: String,
}

impl fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule, self.reason)
    }
}

/// Result of a startup migration pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// No data at all; the version record was set directly
    FreshInstall { version: u32 },
    /// Nothing to do
    UpToDate { version: u32 },
    Migrated {
        from: u32,
        to: u32,
        backup_id: String,
        applied: Vec<String>,
    },
    /// A rule failed and storage was restored from the backup
    RolledBack {
        from: u32,
        backup_id: String,
        failure: RuleFailure,
    },
    /// The pass could not run or could not be undone
    Failed { reason: String },
}

impl MigrationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            MigrationOutcome::FreshInstall { .. }
                | MigrationOutcome::UpToDate { .. }
                | MigrationOutcome::Migrated { .. }
        )
    }
}

impl fmt::Display for MigrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationOutcome::FreshInstall { version } => {
                write!(f, "fresh install at version {}", version)
            }
            MigrationOutcome::UpToDate { version } => write!(f, "up to date at version {}", version),
            MigrationOutcome::Migrated {
                from,
                to,
                backup_id,
                applied,
            } => write!(
                f,
                "migrated {} -> {} ({} rules, backup {})",
                from,
                to,
                applied.len(),
                backup_id
            ),
            MigrationOutcome::RolledBack {
                from,
                backup_id,
                failure,
            } => write!(
                f,
                "migration from {} rolled back to backup {}: {}",
                from, backup_id, failure
            ),
            MigrationOutcome::Failed { reason } => write!(f, "migration failed: {}", reason),
        }
    }
}

/// Applies migration rules with backup and rollback
pub struct MigrationEngine {
    rules: Vec<MigrationRule>,
    target: u32,
    backups: BackupManager,
}

impl MigrationEngine {
    pub fn new(rules: Vec<MigrationRule>, target: u32, backups: BackupManager) -> Self {
        Self {
            rules,
            target,
            backups,
        }
    }

    /// The rules shipped with this build, targeting the current version
    pub fn builtin(config: &ReaderConfig) -> Self {
        Self::new(
            builtin_rules(),
            CURRENT_SCHEMA_VERSION,
            BackupManager::new(config.backups.retain),
        )
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Stored schema version; unversioned data counts as the legacy version
    ///
    /// `None` means there is nothing stored at all.
    pub fn stored_version<B, C>(&self, store: &mut PersistenceStore<B, C>) -> Option<u32>
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        match store.read_version() {
            Some(record) => Some(record.version),
            None if store.has_slice_data() => Some(LEGACY_SCHEMA_VERSION),
            None => None,
        }
    }

    /// Rules to run for data at `version`, in order
    pub fn applicable(&self, version: u32) -> Vec<&MigrationRule> {
        let mut rules: Vec<&MigrationRule> = self
            .rules
            .iter()
            .filter(|r| r.from >= version && r.to <= self.target)
            .collect();
        rules.sort_by_key(|r| r.from);
        rules
    }

    /// Run the applicable rules on an in-memory copy
    pub fn migrate_data(&self, data: DataSet, version: u32) -> Result<(DataSet, Vec<String>), RuleFailure> {
        let mut data = data;
        let mut applied = Vec::new();
        for rule in self.applicable(version) {
            data = rule.apply(data).map_err(|reason| RuleFailure {
                rule: rule.description.clone(),
                reason,
            })?;
            tracing::debug!(from = rule.from, to = rule.to, rule = %rule.description, "applied migration rule");
            applied.push(rule.description.clone());
        }
        Ok((data, applied))
    }

    /// Bring storage up to the target version
    pub fn run<B, C>(&self, store: &mut PersistenceStore<B, C>, ids: &impl IdGen) -> MigrationOutcome
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        let span = tracing::info_span!("migration", target = self.target);
        let _guard = span.enter();

        let outcome = self.run_inner(store, ids);
        match &outcome {
            MigrationOutcome::UpToDate { .. } => tracing::debug!(%outcome, "migration skipped"),
            outcome if outcome.is_success() => tracing::info!(%outcome, "migration finished"),
            outcome => {
                let error = store.error(ErrorKind::MigrationFailed, "migrate", outcome.to_string());
                store.report(&error);
            }
        }
        outcome
    }

    /// [`Self::run`] reduced to success or failure
    pub fn initialize<B, C>(&self, store: &mut PersistenceStore<B, C>, ids: &impl IdGen) -> bool
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        self.run(store, ids).is_success()
    }

    /// Manually restore the backup `id`, version record included
    pub fn rollback_to<B, C>(
        &self,
        store: &mut PersistenceStore<B, C>,
        id: &str,
    ) -> Result<Backup, BackupError>
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        let backup = self.backups.load(store, id)?;
        self.backups.restore(store, &backup)?;
        Ok(backup)
    }

    fn run_inner<B, C>(&self, store: &mut PersistenceStore<B, C>, ids: &impl IdGen) -> MigrationOutcome
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        let Some(from) = self.stored_version(store) else {
            let record = SchemaVersion {
                version: self.target,
                timestamp: store.clock().epoch_millis(),
                migration_id: None,
            };
            return if store.write_version(&record) {
                MigrationOutcome::FreshInstall {
                    version: self.target,
                }
            } else {
                MigrationOutcome::Failed {
                    reason: "could not write version record".to_string(),
                }
            };
        };

        if from >= self.target {
            return MigrationOutcome::UpToDate { version: from };
        }

        let backup = match self.backups.create(store, ids, from) {
            Ok(backup) => backup,
            Err(e) => {
                return MigrationOutcome::Failed {
                    reason: format!("backup failed: {}", e),
                }
            }
        };

        let data = DataSet::load(store);
        let result = self
            .migrate_data(data, from)
            .and_then(|(data, applied)| self.commit(store, ids, &data, &backup).map(|()| applied));

        match result {
            Ok(applied) => MigrationOutcome::Migrated {
                from,
                to: self.target,
                backup_id: backup.id,
                applied,
            },
            Err(failure) => match self.backups.restore(store, &backup) {
                Ok(()) => MigrationOutcome::RolledBack {
                    from,
                    backup_id: backup.id,
                    failure,
                },
                Err(e) => MigrationOutcome::Failed {
                    reason: format!("{}; rollback failed: {}", failure, e),
                },
            },
        }
    }

    fn commit<B, C>(
        &self,
        store: &mut PersistenceStore<B, C>,
        ids: &impl IdGen,
        data: &DataSet,
        backup: &Backup,
    ) -> Result<(), RuleFailure>
    where
        B: KvBackend + 'static,
        C: Clock + 'static,
    {
        let failure = |reason: String| RuleFailure {
            rule: "commit".to_string(),
            reason,
        };
        for (key, value) in data.entries() {
            let Some(value) = value else { continue };
            let value = settle(store, ids, key, value);
            if !store.save_slice_value(key, &value) {
                return Err(failure(format!("could not write {}", key)));
            }
        }
        let record = SchemaVersion {
            version: self.target,
            timestamp: store.clock().epoch_millis(),
            migration_id: Some(backup.id.clone()),
        };
        if store.write_version(&record) {
            Ok(())
        } else {
            Err(failure("could not write version record".to_string()))
        }
    }
}

// Migrated data that still fails its schema is salvaged the same way a
// load would, so old installs with stray values are not stuck behind a
// rollback forever.
fn settle<B, C>(store: &PersistenceStore<B, C>, ids: &impl IdGen, key: &str, value: &Value) -> Value
where
    B: KvBackend + 'static,
    C: Clock + 'static,
{
    let Some(schema) = schema_for_key(key) else {
        return value.clone();
    };
    if schema.is_valid(value) {
        return value.clone();
    }
    let now = store.clock().epoch_millis();
    let default = match key {
        PREFERENCES_KEY => serde_json::to_value(Preferences::default()),
        READING_STATE_KEY => serde_json::to_value(ReadingState::default()),
        UI_STATE_KEY => serde_json::to_value(UiState::default()),
        _ => serde_json::to_value(SessionData::with_id(ids.next(), now)),
    };
    match default {
        Ok(default) => {
            tracing::warn!(key, "migrated slice failed validation, sanitizing");
            schema.sanitize(value, &default)
        }
        Err(_) => value.clone(),
    }
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
