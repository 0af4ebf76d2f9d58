// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage key layout and schema version constants

/// Key for the preferences slice
pub const PREFERENCES_KEY: &str = "novel-preferences";
/// Key for the reading state slice
pub const READING_STATE_KEY: &str = "novel-reading-state";
/// Key for the UI state slice
pub const UI_STATE_KEY: &str = "novel-ui-state";
/// Key for the session data slice
pub const SESSION_DATA_KEY: &str = "novel-session-data";
/// Key for the schema version record
pub const DATA_VERSION_KEY: &str = "novel-data-version";
/// Key for the persisted critical-error ring buffer
pub const CRITICAL_ERRORS_KEY: &str = "novel-critical-errors";
/// Prefix for migration backups; the backup id follows
pub const BACKUP_KEY_PREFIX: &str = "novel-backup-";
/// Every managed key starts with this prefix
pub const MANAGED_KEY_PREFIX: &str = "novel-";

/// The four slice keys, in snapshot order
pub const SLICE_KEYS: [&str; 4] = [
    PREFERENCES_KEY,
    READING_STATE_KEY,
    UI_STATE_KEY,
    SESSION_DATA_KEY,
];

/// Schema version written by this build
pub const CURRENT_SCHEMA_VERSION: u32 = 4;

/// Version assumed for slice data written before version records existed
pub const LEGACY_SCHEMA_VERSION: u32 = 1;

/// Storage key for a backup id
pub fn backup_key(id: &str) -> String {
    format!("{}{}", BACKUP_KEY_PREFIX, id)
}

/// Whether `key` belongs to this application
pub fn is_managed(key: &str) -> bool {
    key.starts_with(MANAGED_KEY_PREFIX)
}
