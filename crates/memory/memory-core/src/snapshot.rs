//! # Snapshot
//!
//! Export/import format of a memory store.
//!
//! ```json
//! {
//!   "memories": [[1, { "id": 1, "content": "...", "metadata": { "timestamp": "..." } }]],
//!   "config": { "maxMemories": 1000, "similarityThreshold": 0.7, "autoExpire": false, "expireDays": 30 },
//!   "nextId": 2,
//!   "exportedAt": "2024-01-01T00:00:00Z"
//! }
//! ```
//!
//! Term vectors are not part of the snapshot; importers rebuild them from content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::MemoryConfig;
use crate::error::{MemoryError, Result};
use crate::types::{MemoryId, MemoryRecord};

/// Full copy of a store's records, configuration and id counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySnapshot {
    /// `[id, record]` pairs in id order
    pub memories: Vec<(MemoryId, MemoryRecord)>,
    pub config: MemoryConfig,
    /// Next id the store would assign
    pub next_id: MemoryId,
    pub exported_at: DateTime<Utc>,
}

impl MemorySnapshot {
    /// Parses a snapshot from JSON. Any parse error is reported as `MalformedSnapshot`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MemoryError::MalformedSnapshot(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| MemoryError::MalformedSnapshot(e.to_string()))
    }

    /// Checks structural consistency before anything is loaded from this snapshot.
    ///
    /// - the configuration is valid
    /// - each pair's id matches its record's id
    /// - ids are unique and non-zero
    /// - `next_id` is non-zero and greater than every id
    pub fn validate(&self) -> Result<()> {
        self.config
            .validate()
            .map_err(|e| MemoryError::MalformedSnapshot(e.to_string()))?;

        if self.next_id == 0 {
            return Err(MemoryError::MalformedSnapshot("nextId must be at least 1".to_string()));
        }

        let mut seen: HashSet<MemoryId> = HashSet::with_capacity(self.memories.len());
        for (id, record) in &self.memories {
            if *id != record.id() {
                return Err(MemoryError::MalformedSnapshot(format!(
                    "entry id {} does not match record id {}",
                    id,
                    record.id()
                )));
            }
            if *id == 0 {
                return Err(MemoryError::MalformedSnapshot("id 0 is not allowed".to_string()));
            }
            if !seen.insert(*id) {
                return Err(MemoryError::MalformedSnapshot(format!("duplicate id {}", id)));
            }
            if *id >= self.next_id {
                return Err(MemoryError::MalformedSnapshot(format!(
                    "id {} is not below nextId {}",
                    id, self.next_id
                )));
            }
        }
        Ok(())
    }
}
