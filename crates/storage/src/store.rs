// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence store: enveloped, validated slice storage over a backend
//!
//! Public save/load operations never fail loudly. Errors are classified,
//! reported, and turned into `false` or the caller's default.

use crate::backend::{BackendError, KvBackend};
use crate::debounce::Debouncer;
use crate::diagnostics::{CriticalError, ErrorReporter};
use crate::envelope::{Envelope, SchemaVersion, StoredEnvelope};
use crate::retry::with_retry;
use novel_core::keys::{self, CURRENT_SCHEMA_VERSION, DATA_VERSION_KEY, SLICE_KEYS};
use novel_core::schema::describe;
use novel_core::slice::schema_for_key;
use novel_core::{
    Clock, ErrorKind, Preferences, ReaderConfig, ReadingState, RetryPolicy, SessionData, Slice,
    StorageError, UiState,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

/// A write waiting in the debouncer; returns whether it was stored
pub type DeferredWrite<B, C> = Box<dyn FnOnce(&mut PersistenceStore<B, C>) -> bool>;

/// Bytes used by managed keys against the quota
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UsageReport {
    pub used: u64,
    pub quota: u64,
    /// `used / quota * 100`
    pub percentage: f64,
}

/// Slice storage over a [`KvBackend`]
pub struct PersistenceStore<B: KvBackend, C: Clock> {
    backend: B,
    clock: C,
    retry: RetryPolicy,
    quota_bytes: u64,
    reporter: ErrorReporter,
    pending: Debouncer<DeferredWrite<B, C>>,
}

impl<B: KvBackend + 'static, C: Clock + 'static> PersistenceStore<B, C> {
    pub fn new(backend: B, clock: C, config: &ReaderConfig) -> Self {
        let reporter = ErrorReporter::load(&backend);
        Self {
            backend,
            clock,
            retry: config.retry,
            quota_bytes: config.quota_bytes,
            reporter,
            pending: Debouncer::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Build a classified error stamped with the current time
    pub fn error(
        &self,
        kind: ErrorKind,
        operation: &str,
        message: impl Into<String>,
    ) -> StorageError {
        StorageError::new(kind, operation, message, self.clock.epoch_millis())
    }

    pub fn report(&mut self, error: &StorageError) {
        self.reporter.report(&self.backend, error);
    }

    pub fn critical_errors(&self) -> Vec<CriticalError> {
        self.reporter.critical_errors().cloned().collect()
    }

    pub fn clear_critical_errors(&mut self) -> bool {
        self.reporter.clear(&self.backend)
    }

    // -- raw access ---------------------------------------------------------

    /// Stored text for `key`, retried but not reported
    pub fn read_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        with_retry(&self.clock, &self.retry, "read", || {
            self.backend
                .get(key)
                .map_err(|e| self.backend_error("read", key, e))
        })
    }

    /// Replace the stored text for `key`, retried but not reported
    pub fn write_raw(&self, key: &str, text: &str) -> Result<(), StorageError> {
        with_retry(&self.clock, &self.retry, "write", || {
            self.backend
                .set(key, text)
                .map_err(|e| self.backend_error("write", key, e))
        })
    }

    pub fn remove_raw(&self, key: &str) -> Result<(), StorageError> {
        with_retry(&self.clock, &self.retry, "remove", || {
            self.backend
                .remove(key)
                .map_err(|e| self.backend_error("remove", key, e))
        })
    }

    /// Every key this application owns, sorted
    pub fn managed_keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys: Vec<String> = self
            .backend
            .keys()
            .map_err(|e| self.backend_error("keys", "", e))?
            .into_iter()
            .filter(|k| keys::is_managed(k))
            .collect();
        keys.sort();
        Ok(keys)
    }

    // -- envelopes ----------------------------------------------------------

    /// Wrap `value` in an envelope and store it under `key`
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> bool {
        let envelope = Envelope {
            data: value,
            version: CURRENT_SCHEMA_VERSION,
            timestamp: self.clock.epoch_millis(),
        };
        let text = match serde_json::to_string(&envelope) {
            Ok(text) => text,
            Err(e) => {
                let error = self
                    .error(ErrorKind::SerializeFailed, "save", e.to_string())
                    .with_context(key);
                self.report(&error);
                return false;
            }
        };
        match self.write_raw(key, &text) {
            Ok(()) => true,
            Err(error) => {
                self.report(&error);
                false
            }
        }
    }

    /// The data stored under `key`, or `default` if absent or unreadable
    pub fn load<T: DeserializeOwned>(&mut self, key: &str, default: T) -> T {
        let Some(data) = self.load_data(key) else {
            return default;
        };
        match serde_json::from_value(data) {
            Ok(value) => value,
            Err(e) => {
                let error = self
                    .error(ErrorKind::DeserializeFailed, "load", e.to_string())
                    .with_context(key);
                self.report(&error);
                default
            }
        }
    }

    /// The enveloped data under `key` as untyped JSON
    ///
    /// `None` when the key is absent, the envelope is empty, or the text is
    /// unreadable (the latter two are reported).
    pub fn load_data(&mut self, key: &str) -> Option<Value> {
        let text = match self.read_raw(key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(error) => {
                self.report(&error);
                return None;
            }
        };
        match serde_json::from_str::<StoredEnvelope>(&text) {
            Ok(envelope) => envelope.into_data(),
            Err(e) => {
                let error = self
                    .error(ErrorKind::DataCorruption, "load", e.to_string())
                    .with_context(key);
                self.report(&error);
                None
            }
        }
    }

    /// Whether any of the four slices has stored data
    pub fn has_slice_data(&self) -> bool {
        SLICE_KEYS
            .iter()
            .any(|key| matches!(self.read_raw(key), Ok(Some(_))))
    }

    // -- slices -------------------------------------------------------------

    /// Validate `value` and store it; invalid values are never written
    pub fn save_slice<S: Slice>(&mut self, value: &S) -> bool {
        if let Err(violations) = value.check() {
            let error = self
                .error(ErrorKind::ValidationFailed, "save", describe(&violations))
                .with_context(S::KEY);
            self.report(&error);
            return false;
        }
        self.save(S::KEY, value)
    }

    /// Validate untyped slice JSON against the schema for `key` and store it
    pub fn save_slice_value(&mut self, key: &str, value: &Value) -> bool {
        let Some(schema) = schema_for_key(key) else {
            let error = self
                .error(ErrorKind::ValidationFailed, "save", "not a slice key")
                .with_context(key);
            self.report(&error);
            return false;
        };
        if let Err(violations) = schema.validate(value) {
            let error = self
                .error(ErrorKind::ValidationFailed, "save", describe(&violations))
                .with_context(key);
            self.report(&error);
            return false;
        }
        self.save(key, value)
    }

    /// Load a slice, salvaging what it can from invalid data
    ///
    /// Valid data is returned as stored. Invalid data is sanitized against
    /// `default`; anything that still fails yields `default`.
    pub fn load_slice<S: Slice>(&mut self, default: S) -> S {
        let Some(data) = self.load_data(S::KEY) else {
            return default;
        };

        let candidate = match S::SCHEMA.validate(&data) {
            Ok(()) => data,
            Err(violations) => {
                tracing::warn!(
                    key = S::KEY,
                    violations = %describe(&violations),
                    "stored slice failed validation, sanitizing"
                );
                let Ok(fallback) = serde_json::to_value(&default) else {
                    return default;
                };
                S::SCHEMA.sanitize(&data, &fallback)
            }
        };

        match serde_json::from_value(candidate) {
            Ok(value) => value,
            Err(e) => {
                let error = self
                    .error(ErrorKind::DeserializeFailed, "load", e.to_string())
                    .with_context(S::KEY);
                self.report(&error);
                default
            }
        }
    }

    /// Read-merge-write: apply `change` to the persisted slice and store it
    ///
    /// `base` stands in when nothing usable is persisted. Returns the stored
    /// value, or `None` if it was rejected or the write failed.
    pub fn update_slice<S: Slice>(&mut self, base: &S, change: impl FnOnce(S) -> S) -> Option<S> {
        let current = self.load_slice(base.clone());
        let next = change(current);
        self.save_slice(&next).then_some(next)
    }

    pub fn load_preferences(&mut self) -> Preferences {
        self.load_slice(Preferences::default())
    }

    pub fn save_preferences(&mut self, value: &Preferences) -> bool {
        self.save_slice(value)
    }

    pub fn load_reading_state(&mut self) -> ReadingState {
        self.load_slice(ReadingState::default())
    }

    pub fn save_reading_state(&mut self, value: &ReadingState) -> bool {
        self.save_slice(value)
    }

    pub fn load_ui_state(&mut self) -> UiState {
        self.load_slice(UiState::default())
    }

    pub fn save_ui_state(&mut self, value: &UiState) -> bool {
        self.save_slice(value)
    }

    /// Session data has no fixed default; the caller mints one
    pub fn load_session_data(&mut self, default: SessionData) -> SessionData {
        self.load_slice(default)
    }

    pub fn save_session_data(&mut self, value: &SessionData) -> bool {
        self.save_slice(value)
    }

    // -- debounced writes ---------------------------------------------------

    /// Store `value` under `key` once `delay` passes without another
    /// debounced write for `key`
    ///
    /// Replaces whatever was pending for `key`, so only use it for keys with
    /// a single writer. Shared slices go through [`Self::debounced_update`].
    pub fn debounced_save<T: Serialize + 'static>(&mut self, key: &str, value: T, delay: Duration) {
        let owned_key = key.to_string();
        self.schedule(
            key,
            delay,
            Box::new(move |store: &mut Self| store.save(&owned_key, &value)),
        );
    }

    /// Debounced [`Self::save_slice`]
    pub fn debounced_save_slice<S: Slice>(&mut self, value: S, delay: Duration) {
        self.schedule(
            S::KEY,
            delay,
            Box::new(move |store: &mut Self| store.save_slice(&value)),
        );
    }

    /// Debounced [`Self::update_slice`]: `change` is replayed on the slice
    /// as persisted when the timer fires
    pub fn debounced_update<S: Slice>(
        &mut self,
        delay: Duration,
        base: S,
        change: impl FnOnce(S) -> S + 'static,
    ) {
        self.schedule(
            S::KEY,
            delay,
            Box::new(move |store: &mut Self| store.update_slice(&base, change).is_some()),
        );
    }

    /// Run every deferred write whose quiet period has elapsed
    ///
    /// Returns the number of writes run.
    pub fn flush_due(&mut self) -> usize {
        let due = self.pending.take_due(self.clock.now());
        self.run_deferred(due)
    }

    /// Run the deferred write for `key` now; `None` if nothing was pending
    pub fn flush_key(&mut self, key: &str) -> Option<bool> {
        let job = self.pending.take(key)?;
        tracing::debug!(key, "flushing deferred write early");
        Some(job(self))
    }

    /// Run every deferred write now, e.g. before shutdown
    pub fn flush_all(&mut self) -> usize {
        let all = self.pending.take_all();
        self.run_deferred(all)
    }

    /// Drop the deferred write for `key` without running it
    pub fn cancel_pending(&mut self, key: &str) -> bool {
        self.pending.cancel(key)
    }

    pub fn pending_keys(&self) -> Vec<String> {
        self.pending.pending_keys().map(str::to_string).collect()
    }

    /// When the earliest deferred write becomes due
    pub fn next_flush_at(&self) -> Option<Instant> {
        self.pending.next_fire_time()
    }

    fn schedule(&mut self, key: &str, delay: Duration, job: DeferredWrite<B, C>) {
        let fire_at = self.clock.now() + delay;
        if self.pending.schedule(key, fire_at, job) {
            tracing::trace!(key, "superseded pending write");
        }
    }

    fn run_deferred(&mut self, jobs: Vec<(String, DeferredWrite<B, C>)>) -> usize {
        let count = jobs.len();
        for (key, job) in jobs {
            let stored = job(self);
            tracing::debug!(key = %key, stored, "debounced write fired");
        }
        count
    }

    // -- housekeeping -------------------------------------------------------

    /// Bytes stored under managed keys
    pub fn usage_report(&mut self) -> UsageReport {
        let keys = match self.managed_keys() {
            Ok(keys) => keys,
            Err(error) => {
                self.report(&error);
                Vec::new()
            }
        };
        let mut used = 0;
        for key in &keys {
            match self.read_raw(key) {
                Ok(Some(text)) => used += text.len() as u64,
                Ok(None) => {}
                Err(error) => self.report(&error),
            }
        }
        let quota = self.backend.quota_hint().unwrap_or(self.quota_bytes);
        let percentage = if quota == 0 {
            0.0
        } else {
            used as f64 / quota as f64 * 100.0
        };
        UsageReport {
            used,
            quota,
            percentage,
        }
    }

    /// Drop pending writes, forget critical errors and remove every managed key
    pub fn clear_all(&mut self) -> bool {
        let dropped = self.pending.take_all().len();
        if dropped > 0 {
            tracing::debug!(dropped, "discarded pending writes");
        }
        self.reporter.clear(&self.backend);
        let keys = match self.managed_keys() {
            Ok(keys) => keys,
            Err(error) => {
                self.report(&error);
                return false;
            }
        };
        let mut ok = true;
        for key in keys {
            if let Err(error) = self.remove_raw(&key) {
                self.report(&error);
                ok = false;
            }
        }
        ok
    }

    // -- version record -----------------------------------------------------

    /// The stored version record; `None` when absent or unreadable
    pub fn read_version(&mut self) -> Option<SchemaVersion> {
        let text = match self.read_raw(DATA_VERSION_KEY) {
            Ok(text) => text?,
            Err(error) => {
                self.report(&error);
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(record) => Some(record),
            Err(e) => {
                let error = self
                    .error(ErrorKind::DataCorruption, "read_version", e.to_string())
                    .with_context(DATA_VERSION_KEY);
                self.report(&error);
                None
            }
        }
    }

    pub fn write_version(&mut self, record: &SchemaVersion) -> bool {
        let text = match serde_json::to_string(record) {
            Ok(text) => text,
            Err(e) => {
                let error = self.error(ErrorKind::SerializeFailed, "write_version", e.to_string());
                self.report(&error);
                return false;
            }
        };
        match self.write_raw(DATA_VERSION_KEY, &text) {
            Ok(()) => true,
            Err(error) => {
                self.report(&error);
                false
            }
        }
    }

    fn backend_error(&self, operation: &str, key: &str, error: BackendError) -> StorageError {
        let error = self.error(error.kind(), operation, error.to_string());
        if key.is_empty() {
            error
        } else {
            error.with_context(key)
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
