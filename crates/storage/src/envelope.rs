// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk wrappers: the slice envelope and the schema version record

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{data, version, timestamp}` wrapper written for every slice save
#[derive(Debug, Serialize)]
pub struct Envelope<'a, T: ?Sized> {
    pub data: &'a T,
    pub version: u32,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

/// Lenient reading form of [`Envelope`]
///
/// Older writers sometimes omitted `version`; only `data` matters for loads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoredEnvelope {
    pub data: Option<Value>,
    pub version: Option<u32>,
    pub timestamp: Option<u64>,
}

impl StoredEnvelope {
    /// The wrapped data, treating `null` and `{}` as absent
    pub fn into_data(self) -> Option<Value> {
        match self.data {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) if map.is_empty() => None,
            Some(data) => Some(data),
        }
    }
}

/// Record stored under the data version key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaVersion {
    pub version: u32,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    /// Backup taken by the migration that produced this version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_id: Option<String>,
}
