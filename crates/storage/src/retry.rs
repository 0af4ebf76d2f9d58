// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded retry with exponential backoff

use novel_core::{Clock, RetryPolicy, StorageError};

/// Run `attempt` until it succeeds, fails with a non-recoverable error, or
/// the policy's attempts are used up
///
/// Backoff sleeps go through the clock, so a fake clock makes retries
/// instantaneous and observable.
pub fn with_retry<T, C: Clock>(
    clock: &C,
    policy: &RetryPolicy,
    operation: &str,
    mut attempt: impl FnMut() -> Result<T, StorageError>,
) -> Result<T, StorageError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut number = 1;
    loop {
        match attempt() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_recoverable() && number < max_attempts => {
                number += 1;
                let delay = policy.delay_before(number);
                tracing::debug!(
                    operation,
                    attempt = number,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "retrying"
                );
                clock.sleep(delay);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Like [`with_retry`], but hands the final error to `fallback` instead of
/// returning it
pub fn retry_or_else<T, C: Clock>(
    clock: &C,
    policy: &RetryPolicy,
    operation: &str,
    attempt: impl FnMut() -> Result<T, StorageError>,
    fallback: impl FnOnce(StorageError) -> T,
) -> T {
    with_retry(clock, policy, operation, attempt).unwrap_or_else(fallback)
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
