// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-key cancellable timers
//!
//! At most one job is pending per key. Scheduling again for the same key
//! drops the earlier job outright; jobs are never merged here.

use std::collections::BTreeMap;
use std::time::Instant;

struct Pending<J> {
    fire_at: Instant,
    sequence: u64,
    job: J,
}

/// Pending deferred jobs keyed by string
pub struct Debouncer<J> {
    pending: BTreeMap<String, Pending<J>>,
    sequence: u64,
}

impl<J> Default for Debouncer<J> {
    fn default() -> Self {
        Self::new()
    }
}

impl<J> Debouncer<J> {
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
            sequence: 0,
        }
    }

    /// Schedule `job` for `key` at `fire_at`, cancelling any pending job for
    /// that key. Returns true if a pending job was replaced.
    pub fn schedule(&mut self, key: impl Into<String>, fire_at: Instant, job: J) -> bool {
        self.sequence += 1;
        let pending = Pending {
            fire_at,
            sequence: self.sequence,
            job,
        };
        self.pending.insert(key.into(), pending).is_some()
    }

    /// Drop the pending job for `key`
    pub fn cancel(&mut self, key: &str) -> bool {
        self.pending.remove(key).is_some()
    }

    /// Remove and return the pending job for `key` regardless of its deadline
    pub fn take(&mut self, key: &str) -> Option<J> {
        self.pending.remove(key).map(|p| p.job)
    }

    /// Remove and return every job due at or before `now`, earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<(String, J)> {
        let due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, p)| p.fire_at <= now)
            .map(|(key, _)| key.clone())
            .collect();
        self.remove_ordered(due)
    }

    /// Remove and return every pending job, earliest first
    pub fn take_all(&mut self) -> Vec<(String, J)> {
        let keys: Vec<String> = self.pending.keys().cloned().collect();
        self.remove_ordered(keys)
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending_keys(&self) -> impl Iterator<Item = &str> {
        self.pending.keys().map(String::as_str)
    }

    pub fn next_fire_time(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.fire_at).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn remove_ordered(&mut self, keys: Vec<String>) -> Vec<(String, J)> {
        let mut taken: Vec<(Instant, u64, String, J)> = keys
            .into_iter()
            .filter_map(|key| {
                self.pending
                    .remove(&key)
                    .map(|p| (p.fire_at, p.sequence, key, p.job))
            })
            .collect();
        taken.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        taken
            .into_iter()
            .map(|(_, _, key, job)| (key, job))
            .collect()
    }
}

#[cfg(test)]
#[path = "debounce_tests.rs"]
mod tests;
