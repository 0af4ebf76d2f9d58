// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer-based scheduling for periodic work

use novel_core::Clock;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

/// A scheduled item
#[derive(Debug, Clone)]
pub struct ScheduledItem {
    pub id: String,
    pub fire_at: Instant,
    pub kind: ScheduledKind,
    pub repeat: Option<Duration>,
}

/// The kind of scheduled event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduledKind {
    /// Accumulate reading time into the session slices
    SessionTick,
}

impl PartialEq for ScheduledItem {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.id == other.id
    }
}

impl Eq for ScheduledItem {}

impl PartialOrd for ScheduledItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Min-heap: earliest first
        Reverse(self.fire_at).cmp(&Reverse(other.fire_at))
    }
}

/// Manages scheduled events
pub struct Scheduler {
    items: BinaryHeap<ScheduledItem>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub const SESSION_TICK: &'static str = "session-tick";

    pub fn new() -> Self {
        Self {
            items: BinaryHeap::new(),
        }
    }

    /// Schedule a one-shot timer
    pub fn schedule(&mut self, id: impl Into<String>, fire_at: Instant, kind: ScheduledKind) {
        self.items.push(ScheduledItem {
            id: id.into(),
            fire_at,
            kind,
            repeat: None,
        });
    }

    /// Schedule a repeating timer
    pub fn schedule_repeating(
        &mut self,
        id: impl Into<String>,
        fire_at: Instant,
        interval: Duration,
        kind: ScheduledKind,
    ) {
        self.items.push(ScheduledItem {
            id: id.into(),
            fire_at,
            kind,
            repeat: Some(interval),
        });
    }

    /// Cancel every item with `id`
    pub fn cancel(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
    }

    /// Get all items that should fire at or before the given time
    ///
    /// A repeating item that fell several intervals behind fires once per
    /// missed interval.
    pub fn poll(&mut self, now: Instant) -> Vec<ScheduledItem> {
        let mut ready = Vec::new();

        while let Some(item) = self.items.peek() {
            if item.fire_at > now {
                break;
            }

            let Some(item) = self.items.pop() else {
                break;
            };

            if let Some(interval) = item.repeat.filter(|i| !i.is_zero()) {
                self.items.push(ScheduledItem {
                    fire_at: item.fire_at + interval,
                    ..item.clone()
                });
            }

            ready.push(item);
        }

        ready
    }

    /// Start the periodic session tick
    pub fn init_session_tick(&mut self, clock: &impl Clock, interval: Duration) {
        self.cancel(Self::SESSION_TICK);
        self.schedule_repeating(
            Self::SESSION_TICK,
            clock.now() + interval,
            interval,
            ScheduledKind::SessionTick,
        );
    }

    /// Check if scheduler has any pending items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the next fire time, if any
    pub fn next_fire_time(&self) -> Option<Instant> {
        self.items.peek().map(|item| item.fire_at)
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
