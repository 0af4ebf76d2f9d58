// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reader configuration loaded from `novel.toml`
//!
//! Every field has a default, so an absent file or an empty table is a
//! complete configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    /// Storage quota estimate used by the usage report when the backend
    /// cannot report one
    pub quota_bytes: u64,
    pub debounce: DebounceConfig,
    pub retry: RetryPolicy,
    pub session: SessionConfig,
    pub backups: BackupConfig,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            quota_bytes: Self::DEFAULT_QUOTA_BYTES,
            debounce: DebounceConfig::default(),
            retry: RetryPolicy::default(),
            session: SessionConfig::default(),
            backups: BackupConfig::default(),
        }
    }
}

impl ReaderConfig {
    /// Typical per-origin local storage allowance
    pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.backups.retain == 0 {
            return Err(ConfigError::Invalid(
                "backups.retain must be at least 1".to_string(),
            ));
        }
        if self.session.tick_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "session.tick_interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Quiet periods for debounced writers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebounceConfig {
    /// Scroll offset and chapter progress
    #[serde(with = "humantime_serde")]
    pub scroll: Duration,
    /// Chapter-change-adjacent session writes
    #[serde(with = "humantime_serde")]
    pub chapter: Duration,
    /// Content width while resizing
    #[serde(with = "humantime_serde")]
    pub layout: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            scroll: Duration::from_millis(1000),
            chapter: Duration::from_millis(500),
            layout: Duration::from_millis(500),
        }
    }
}

/// Bounded retry with exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryPolicy {
    /// Total attempts, counting the first one
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for each one after
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff before attempt `attempt` (1-based; the first attempt has none)
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let exponent = (attempt - 2).min(16);
        self.base_delay.saturating_mul(1 << exponent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// How often reading time is accumulated
    #[serde(with = "humantime_serde")]
    pub tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackupConfig {
    /// Migration backups kept, newest first
    pub retain: usize,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self { retain: 3 }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
