// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use novel_core::{ErrorKind, FakeClock};
use std::cell::Cell;
use std::time::Duration;

fn failure(kind: ErrorKind) -> StorageError {
    StorageError::new(kind, "test", "boom", 0)
}

#[test]
fn succeeds_without_sleeping() {
    let clock = FakeClock::new();
    let result = with_retry(&clock, &RetryPolicy::default(), "op", || Ok::<_, StorageError>(7));
    assert_eq!(result, Ok(7));
    assert!(clock.slept().is_empty());
}

#[test]
fn recoverable_errors_back_off_exponentially() {
    let clock = FakeClock::new();
    let calls = Cell::new(0);
    let result: Result<(), _> = with_retry(&clock, &RetryPolicy::default(), "op", || {
        calls.set(calls.get() + 1);
        Err(failure(ErrorKind::QuotaExceeded))
    });
    assert_eq!(result.unwrap_err().kind, ErrorKind::QuotaExceeded);
    assert_eq!(calls.get(), 3);
    assert_eq!(
        clock.slept(),
        vec![Duration::from_millis(100), Duration::from_millis(200)]
    );
}

#[test]
fn recovers_when_a_later_attempt_succeeds() {
    let clock = FakeClock::new();
    let calls = Cell::new(0);
    let result = with_retry(&clock, &RetryPolicy::default(), "op", || {
        calls.set(calls.get() + 1);
        if calls.get() < 2 {
            Err(failure(ErrorKind::NetworkError))
        } else {
            Ok("fetched")
        }
    });
    assert_eq!(result, Ok("fetched"));
    assert_eq!(calls.get(), 2);
}

#[test]
fn non_recoverable_errors_are_not_retried() {
    let clock = FakeClock::new();
    let calls = Cell::new(0);
    let result: Result<(), _> = with_retry(&clock, &RetryPolicy::default(), "op", || {
        calls.set(calls.get() + 1);
        Err(failure(ErrorKind::StorageUnavailable))
    });
    assert!(result.is_err());
    assert_eq!(calls.get(), 1);
    assert!(clock.slept().is_empty());
}

#[test]
fn exhaustion_returns_fallback() {
    let clock = FakeClock::new();
    let value = retry_or_else(
        &clock,
        &RetryPolicy::default(),
        "op",
        || Err::<u32, _>(failure(ErrorKind::DeserializeFailed)),
        |e| {
            assert_eq!(e.kind, ErrorKind::DeserializeFailed);
            42
        },
    );
    assert_eq!(value, 42);
}

#[test]
fn no_retry_policy_attempts_once() {
    let clock = FakeClock::new();
    let calls = Cell::new(0);
    let _: Result<(), _> = with_retry(&clock, &RetryPolicy::no_retry(), "op", || {
        calls.set(calls.get() + 1);
        Err(failure(ErrorKind::QuotaExceeded))
    });
    assert_eq!(calls.get(), 1);
}
