// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process backend with quota and failure injection

use super::{BackendError, KvBackend};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// Failure a [`MemoryBackend`] can be told to produce on upcoming writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    QuotaExceeded,
    Unavailable,
}

#[derive(Default)]
struct MemoryState {
    entries: BTreeMap<String, String>,
    quota: Option<u64>,
    unavailable: bool,
    injected: VecDeque<InjectedFailure>,
    failing_keys: BTreeMap<String, InjectedFailure>,
    unreadable_keys: BTreeSet<String>,
    write_attempts: u64,
}

impl MemoryState {
    fn used_bytes(&self) -> u64 {
        self.entries
            .iter()
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum()
    }
}

/// Map-backed store shared between clones
///
/// Clones see the same entries, so a test can keep a handle for inspection
/// while the persistence store owns another.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit total key + value bytes
    pub fn with_quota(quota: u64) -> Self {
        let backend = Self::new();
        backend.lock().quota = Some(quota);
        backend
    }

    /// Fail the next `count` writes with `failure`
    pub fn fail_next_writes(&self, count: usize, failure: InjectedFailure) {
        let mut state = self.lock();
        state.injected.extend(std::iter::repeat(failure).take(count));
    }

    /// Fail every write to `key` until [`MemoryBackend::heal_key`]
    pub fn fail_key(&self, key: &str, failure: InjectedFailure) {
        self.lock().failing_keys.insert(key.to_string(), failure);
    }

    pub fn heal_key(&self, key: &str) {
        let mut state = self.lock();
        state.failing_keys.remove(key);
        state.unreadable_keys.remove(key);
    }

    /// Fail every read of `key` until [`MemoryBackend::heal_key`]
    pub fn fail_reads(&self, key: &str) {
        self.lock().unreadable_keys.insert(key.to_string());
    }

    /// Make every call fail as if storage were disabled
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Number of `set` calls made, including failed ones
    pub fn write_attempts(&self) -> u64 {
        self.lock().write_attempts
    }

    /// Copy of every stored entry
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.lock().entries.clone()
    }

    /// Store `value` directly, bypassing quota and failure injection
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.lock()
            .entries
            .insert(key.to_string(), value.to_string());
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let state = self.lock();
        if state.unavailable {
            return Err(BackendError::Unavailable("storage disabled".to_string()));
        }
        if state.unreadable_keys.contains(key) {
            return Err(BackendError::Unavailable("injected read failure".to_string()));
        }
        Ok(state.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let mut state = self.lock();
        state.write_attempts += 1;
        if state.unavailable {
            return Err(BackendError::Unavailable("storage disabled".to_string()));
        }

        let existing = state
            .entries
            .get(key)
            .map(|v| (key.len() + v.len()) as u64)
            .unwrap_or(0);
        let needed = (key.len() + value.len()) as u64;
        let available = state
            .quota
            .map(|quota| quota.saturating_sub(state.used_bytes() - existing))
            .unwrap_or(u64::MAX);

        let injected = match state.injected.pop_front() {
            Some(failure) => Some(failure),
            None => state.failing_keys.get(key).copied(),
        };
        match injected {
            Some(InjectedFailure::QuotaExceeded) => {
                return Err(BackendError::QuotaExceeded { needed, available })
            }
            Some(InjectedFailure::Unavailable) => {
                return Err(BackendError::Unavailable("injected failure".to_string()))
            }
            None => {}
        }

        if needed > available {
            return Err(BackendError::QuotaExceeded { needed, available });
        }

        state.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        let mut state = self.lock();
        if state.unavailable {
            return Err(BackendError::Unavailable("storage disabled".to_string()));
        }
        state.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        let state = self.lock();
        if state.unavailable {
            return Err(BackendError::Unavailable("storage disabled".to_string()));
        }
        Ok(state.entries.keys().cloned().collect())
    }

    fn quota_hint(&self) -> Option<u64> {
        self.lock().quota
    }
}
