// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared by storage, migration and content fetches

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of a failed storage (or fetch) operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    StorageUnavailable,
    QuotaExceeded,
    DataCorruption,
    ValidationFailed,
    SerializeFailed,
    DeserializeFailed,
    MigrationFailed,
    NetworkError,
    Unknown,
}

impl ErrorKind {
    /// Whether the operation is worth retrying with backoff
    pub fn is_recoverable(self) -> bool {
        matches!(
            self,
            ErrorKind::QuotaExceeded
                | ErrorKind::NetworkError
                | ErrorKind::SerializeFailed
                | ErrorKind::DeserializeFailed
        )
    }

    /// Stable code written to the diagnostics log
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::StorageUnavailable => "STORAGE_UNAVAILABLE",
            ErrorKind::QuotaExceeded => "QUOTA_EXCEEDED",
            ErrorKind::DataCorruption => "DATA_CORRUPTION",
            ErrorKind::ValidationFailed => "VALIDATION_FAILED",
            ErrorKind::SerializeFailed => "SERIALIZE_FAILED",
            ErrorKind::DeserializeFailed => "DESERIALIZE_FAILED",
            ErrorKind::MigrationFailed => "MIGRATION_FAILED",
            ErrorKind::NetworkError => "NETWORK_ERROR",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A classified failure with the operation that produced it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed ({kind}): {message}")]
pub struct StorageError {
    pub kind: ErrorKind,
    pub operation: String,
    pub message: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub context: Option<String>,
}

impl StorageError {
    pub fn new(
        kind: ErrorKind,
        operation: impl Into<String>,
        message: impl Into<String>,
        timestamp: u64,
    ) -> Self {
        Self {
            kind,
            operation: operation.into(),
            message: message.into(),
            timestamp,
            context: None,
        }
    }

    /// Attach free-form context (usually the storage key)
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }
}
