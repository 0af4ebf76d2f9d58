// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Reader engine: slice controllers, the session clock and the startup gate

mod controller;
mod error;
mod reader;
mod scheduler;

pub use controller::{PreferencesController, ReadingController, SessionController, UiController};
pub use error::{EngineError, StartupError};
pub use reader::{Navigation, PollReport, Reader};
pub use scheduler::{ScheduledItem, ScheduledKind, Scheduler};
