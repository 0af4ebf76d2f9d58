// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! novel-core: shared types for the reader's persistence layer
//!
//! This crate provides:
//! - Clock and id abstractions so time and randomness can be faked in tests
//! - The four persisted state slices and their pure mutations
//! - Static schemas and the generic validator/sanitizer
//! - The storage error taxonomy, key layout and configuration

pub mod clock;
pub mod config;
pub mod content;
pub mod error;
pub mod id;
pub mod keys;
pub mod schema;
pub mod slice;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, ReaderConfig, RetryPolicy};
pub use content::{ChapterEntry, ContentSource, DirContentSource, FontConfig, TableOfContents};
pub use error::{ErrorKind, StorageError};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use schema::{Schema, Violation};
pub use slice::{
    Bookmark, ChapterProgress, NavigationMode, Panel, PreferenceChange, Preferences,
    ReadingState, SessionData, Slice, UiState,
};
