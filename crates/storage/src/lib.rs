// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! novel-storage: durable storage for the reader's state slices
//!
//! This crate provides:
//! - Key/value backends (in-memory and one-file-per-key)
//! - The persistence store with validated, enveloped slice saves and
//!   per-key debounced writes
//! - Retry with backoff and the critical-error log
//! - Backups, schema migrations, and export/import

pub mod backend;
pub mod backup;
pub mod debounce;
pub mod diagnostics;
pub mod envelope;
pub mod migration;
pub mod retry;
pub mod store;
pub mod transfer;

pub use backend::{BackendError, FileBackend, InjectedFailure, KvBackend, MemoryBackend};
pub use backup::{Backup, BackupError, BackupManager};
pub use debounce::Debouncer;
pub use diagnostics::{CriticalError, ErrorContext, ErrorReporter};
pub use envelope::{Envelope, SchemaVersion, StoredEnvelope};
pub use migration::{
    builtin_rules, DataSet, MigrationEngine, MigrationOutcome, MigrationRule, RuleFailure,
};
pub use retry::{retry_or_else, with_retry};
pub use store::{DeferredWrite, PersistenceStore, UsageReport};
pub use transfer::{export_all, import_all, ExportFile};
