//! Snapshots: a JSON record of the full machine state.
//!
//! A snapshot is a flat JSON object. Two reserved keys identify what it was
//! taken from:
//! ```text
//! "__ARCH": architecture identifier, e.g. "chip-8"
//! "__VERS": snapshot format version
//! ```
//! The engine writes `registers`, `memory`, `stack`, `program_counter` and
//! `program`; architectures add their own keys beside them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SnapshotError;

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "__ARCH")]
    pub arch: String,
    #[serde(rename = "__VERS")]
    pub version: u32,
    #[serde(flatten)]
    pub state: SnapshotState,
}

impl Snapshot {
    pub fn new(arch: impl Into<String>, state: SnapshotState) -> Self {
        Self {
            arch: arch.into(),
            version: SNAPSHOT_VERSION,
            state,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::Json(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Json(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(text).map_err(|e| SnapshotError::Json(e.to_string()))
    }
}

/// The keyed state inside a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotState(Map<String, Value>);

impl SnapshotState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any earlier value.
    pub fn put<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), SnapshotError> {
        let value = serde_json::to_value(value).map_err(|e| SnapshotError::Malformed {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.0.insert(key.to_string(), value);
        Ok(())
    }

    /// Decode the value under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, SnapshotError> {
        let value = self.0.get(key).ok_or_else(|| SnapshotError::MissingKey {
            key: key.to_string(),
        })?;
        T::deserialize(value).map_err(|e| SnapshotError::Malformed {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    /// Decode a sequence under `key` and require exactly `expected` entries.
    pub fn get_exact<T: DeserializeOwned>(
        &self,
        key: &str,
        expected: usize,
    ) -> Result<Vec<T>, SnapshotError> {
        let values: Vec<T> = self.get(key)?;
        if values.len() != expected {
            return Err(SnapshotError::SizeMismatch {
                key: key.to_string(),
                expected,
                found: values.len(),
            });
        }
        Ok(values)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
