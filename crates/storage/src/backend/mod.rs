// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key/value backends
//!
//! A backend is the platform's durable string store. It knows nothing about
//! slices, envelopes or versions; failures are reported as [`BackendError`]
//! and classified by the persistence store.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::{InjectedFailure, MemoryBackend};

use novel_core::ErrorKind;
use thiserror::Error;

/// Errors raised by a backend call
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: u64, available: u64 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError {
    /// Taxonomy kind for this failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            BackendError::Unavailable(_) => ErrorKind::StorageUnavailable,
            BackendError::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
            BackendError::Io(_) => ErrorKind::StorageUnavailable,
        }
    }
}

/// Durable string key/value store
pub trait KvBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Replace the value for `key` in a single write
    fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<(), BackendError>;

    fn keys(&self) -> Result<Vec<String>, BackendError>;

    /// Live quota in bytes, when the platform can report one
    fn quota_hint(&self) -> Option<u64> {
        None
    }
}
