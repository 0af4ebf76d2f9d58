// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State controllers
//!
//! Each controller keeps the authoritative in-memory copy of one slice and
//! writes only the fields its writer category owns. Every write is a
//! read-merge over the persisted slice, so a write never carries stale
//! values for fields someone else owns.

mod preferences;
mod reading;
mod session;
mod ui;

pub use preferences::PreferencesController;
pub use reading::ReadingController;
pub use session::SessionController;
pub use ui::UiController;

use novel_core::{Clock, Slice};
use novel_storage::{KvBackend, PersistenceStore};

/// Apply `change` to the in-memory copy and to the persisted slice
///
/// The persisted side is a read-merge: `change` is replayed on whatever is
/// stored (or on `current` when nothing usable is), so fields owned by other
/// writers keep their stored values. A failed write was already reported by
/// the store; the in-memory copy changes either way.
fn write_through<S, B, C>(
    store: &mut PersistenceStore<B, C>,
    current: &mut S,
    change: impl Fn(S) -> S,
) -> bool
where
    S: Slice,
    B: KvBackend + 'static,
    C: Clock + 'static,
{
    let stored = store.update_slice(current, &change).is_some();
    *current = change(current.clone());
    stored
}
