// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error reporting and the critical-error ring buffer
//!
//! Every reported error is logged. Non-recoverable ones are also kept in a
//! bounded buffer persisted under the critical-errors key so they can be
//! inspected after the fact.

use crate::backend::KvBackend;
use novel_core::keys::CRITICAL_ERRORS_KEY;
use novel_core::StorageError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Where and when a critical error happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContext {
    pub operation: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// One entry of the persisted ring buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalError {
    pub code: String,
    pub message: String,
    pub context: ErrorContext,
}

impl From<&StorageError> for CriticalError {
    fn from(error: &StorageError) -> Self {
        Self {
            code: error.kind.code().to_string(),
            message: error.message.clone(),
            context: ErrorContext {
                operation: error.operation.clone(),
                timestamp: error.timestamp,
                key: error.context.clone(),
            },
        }
    }
}

/// Logs storage errors and remembers the critical ones
#[derive(Debug, Clone)]
pub struct ErrorReporter {
    recent: VecDeque<CriticalError>,
    capacity: usize,
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporter {
    pub const CAPACITY: usize = 10;

    pub fn new() -> Self {
        Self {
            recent: VecDeque::with_capacity(Self::CAPACITY),
            capacity: Self::CAPACITY,
        }
    }

    /// Resume from the buffer persisted by a previous run
    pub fn load<B: KvBackend>(backend: &B) -> Self {
        let mut reporter = Self::new();
        match backend.get(CRITICAL_ERRORS_KEY) {
            Ok(Some(text)) => match serde_json::from_str::<Vec<CriticalError>>(&text) {
                Ok(entries) => {
                    for entry in entries {
                        reporter.push(entry);
                    }
                }
                Err(e) => tracing::warn!(error = %e, "discarding unreadable critical-error log"),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "critical-error log unavailable"),
        }
        reporter
    }

    /// Log `error`; keep and persist it if it is not recoverable
    pub fn report<B: KvBackend>(&mut self, backend: &B, error: &StorageError) {
        if error.is_recoverable() {
            tracing::warn!(
                code = error.kind.code(),
                operation = %error.operation,
                context = error.context.as_deref().unwrap_or(""),
                "{}",
                error.message
            );
            return;
        }

        tracing::error!(
            code = error.kind.code(),
            operation = %error.operation,
            context = error.context.as_deref().unwrap_or(""),
            "{}",
            error.message
        );
        self.push(CriticalError::from(error));
        self.persist(backend);
    }

    /// Oldest first
    pub fn critical_errors(&self) -> impl Iterator<Item = &CriticalError> {
        self.recent.iter()
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    /// Forget every critical error, in memory and in storage
    pub fn clear<B: KvBackend>(&mut self, backend: &B) -> bool {
        self.recent.clear();
        match backend.remove(CRITICAL_ERRORS_KEY) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to clear critical-error log");
                false
            }
        }
    }

    fn push(&mut self, entry: CriticalError) {
        while self.recent.len() >= self.capacity {
            self.recent.pop_front();
        }
        self.recent.push_back(entry);
    }

    // Best effort: a failure here is logged, never reported again
    fn persist<B: KvBackend>(&self, backend: &B) {
        let result = serde_json::to_string(&self.recent)
            .map_err(|e| e.to_string())
            .and_then(|text| {
                backend
                    .set(CRITICAL_ERRORS_KEY, &text)
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist critical-error log");
        }
    }
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
