//! In-memory store: dedup on add, capacity eviction, expiry sweeps, snapshots.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use embedding::{cosine_similarity, TermVector, TextVectorizer};
use memory_core::{
    Clock, MemoryConfig, MemoryError, MemoryId, MemoryRecord, MemorySnapshot, MemoryStats,
    MemoryStore, MetadataPatch, RecordMetadata, Result, ScoredRecord, SystemClock,
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::expiry::{ExpiryHandle, ExpiryScheduler};

/// First id handed out by a fresh or cleared store.
const FIRST_ID: MemoryId = 1;

/// Everything the lock guards. Ids are monotonic, so `BTreeMap` order is insertion order.
#[derive(Debug)]
struct StoreState {
    config: MemoryConfig,
    records: BTreeMap<MemoryId, MemoryRecord>,
    next_id: MemoryId,
}

impl StoreState {
    fn new(config: MemoryConfig) -> Self {
        Self {
            config,
            records: BTreeMap::new(),
            next_id: FIRST_ID,
        }
    }

    /// Removes the record with the oldest timestamp, lowest id first on ties.
    fn evict_oldest(&mut self) -> Option<MemoryRecord> {
        let oldest = self
            .records
            .values()
            .min_by_key(|record| (record.timestamp(), record.id()))
            .map(MemoryRecord::id)?;
        self.records.remove(&oldest)
    }

    fn enforce_capacity(&mut self) {
        while self.records.len() > self.config.max_memories {
            match self.evict_oldest() {
                Some(evicted) => info!(
                    id = evicted.id(),
                    timestamp = %evicted.timestamp(),
                    limit = self.config.max_memories,
                    "Evicted oldest memory over capacity"
                ),
                None => break,
            }
        }
    }
}

/// Scores every record with a vector against `query`, keeps positive scores, and
/// returns the best `limit` in descending order. Ties keep id order (stable sort).
fn rank<'a>(
    records: &'a BTreeMap<MemoryId, MemoryRecord>,
    query: &TermVector,
    limit: usize,
) -> Vec<(&'a MemoryRecord, f64)> {
    let mut scored: Vec<(&MemoryRecord, f64)> = records
        .values()
        .filter_map(|record| {
            record
                .vector()
                .map(|vector| (record, cosine_similarity(query, vector)))
        })
        .filter(|(_, similarity)| *similarity > 0.0)
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(limit);
    scored
}

fn newest_first(mut records: Vec<MemoryRecord>) -> Vec<MemoryRecord> {
    records.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    records
}

/// In-memory associative memory store.
///
/// Cloning is cheap and every clone shares the same records; the expiry scheduler
/// holds one such clone.
#[derive(Debug, Clone)]
pub struct InMemoryMemoryStore {
    state: Arc<RwLock<StoreState>>,
    vectorizer: TextVectorizer,
    clock: Arc<dyn Clock>,
}

impl InMemoryMemoryStore {
    /// Creates an empty store reading time from the system clock.
    pub fn new(config: MemoryConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates an empty store with a custom clock.
    pub fn with_clock(config: MemoryConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        info!(
            max_memories = config.max_memories,
            similarity_threshold = config.similarity_threshold,
            auto_expire = config.auto_expire,
            expire_days = config.expire_days,
            "Created in-memory memory store"
        );
        Ok(Self {
            state: Arc::new(RwLock::new(StoreState::new(config))),
            vectorizer: TextVectorizer::new(),
            clock,
        })
    }

    /// Returns the number of records in the store.
    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    /// Returns true if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Current configuration. Changes only through `import`.
    pub async fn config(&self) -> MemoryConfig {
        self.state.read().await.config.clone()
    }

    /// [`export`](MemoryStore::export) serialized as JSON.
    pub async fn export_json(&self) -> Result<String> {
        self.export().await.to_json()
    }

    /// Parses `json` as a snapshot and [`import`](MemoryStore::import)s it.
    pub async fn import_json(&self, json: &str) -> Result<()> {
        let snapshot = match MemorySnapshot::from_json(json) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Rejected memory snapshot");
                return Err(e);
            }
        };
        self.import(snapshot).await
    }

    /// Starts the periodic expiry sweep when auto-expire is enabled.
    ///
    /// Must be called from within a Tokio runtime. Returns `None` when auto-expire is
    /// off; otherwise the sweep runs every `expiry_interval_secs` until the returned
    /// handle is stopped or dropped.
    pub async fn start_expiry(&self) -> Option<ExpiryHandle> {
        let config = self.config().await;
        if !config.auto_expire {
            debug!("Auto-expire disabled; expiry scheduler not started");
            return None;
        }
        let period = std::time::Duration::from_secs(config.expiry_interval_secs);
        Some(ExpiryScheduler::new(self.clone(), period).spawn())
    }
}

#[async_trait]
impl MemoryStore for InMemoryMemoryStore {
    async fn add(&self, content: &str, metadata: MetadataPatch) -> MemoryId {
        let vector = self.vectorizer.vectorize(content);

        let mut state = self.state.write().await;
        // Read under the lock so timestamps follow id order.
        let now = self.clock.now();
        let threshold = state.config.similarity_threshold;

        let duplicate = rank(&state.records, &vector, 1)
            .first()
            .map(|(record, similarity)| (record.id(), *similarity))
            .filter(|(_, similarity)| *similarity > threshold);

        if let Some((id, similarity)) = duplicate {
            if let Some(record) = state.records.get_mut(&id) {
                record.replace_content(content, vector);
                record.touch(metadata, now);
                info!(id, similarity, threshold, "Merged memory into near-duplicate");
                return id;
            }
        }

        let id = state.next_id;
        state.next_id += 1;

        let terms = vector.len();
        let record =
            MemoryRecord::new(id, content, RecordMetadata::new(now, metadata)).with_vector(vector);
        state.records.insert(id, record);
        info!(id, terms, count = state.records.len(), "Added memory");

        state.enforce_capacity();
        id
    }

    async fn get(&self, id: MemoryId) -> Option<MemoryRecord> {
        let state = self.state.read().await;
        let result = state.records.get(&id).cloned();
        debug!(id, found = result.is_some(), "Memory lookup");
        result
    }

    async fn update(&self, id: MemoryId, content: &str, metadata: MetadataPatch) -> Result<MemoryRecord> {
        let mut state = self.state.write().await;
        let now = self.clock.now();

        let record = state
            .records
            .get_mut(&id)
            .ok_or(MemoryError::NotFound(id))?;
        record.set_content(content);
        record.touch(metadata, now);
        record.refresh_vector(&self.vectorizer);

        info!(id, "Updated memory");
        Ok(record.clone())
    }

    async fn delete(&self, id: MemoryId) -> bool {
        let removed = self.state.write().await.records.remove(&id).is_some();
        info!(id, removed, "Deleted memory");
        removed
    }

    async fn clear(&self) {
        let mut state = self.state.write().await;
        let removed = state.records.len();
        state.records.clear();
        state.next_id = FIRST_ID;
        info!(removed, "Cleared memory store");
    }

    async fn search(&self, query: &str, limit: usize) -> Vec<ScoredRecord> {
        let vector = self.vectorizer.vectorize(query);
        let state = self.state.read().await;

        let results: Vec<ScoredRecord> = rank(&state.records, &vector, limit)
            .into_iter()
            .map(|(record, similarity)| ScoredRecord {
                record: record.clone(),
                similarity,
            })
            .collect();

        debug!(
            terms = vector.len(),
            limit,
            results = results.len(),
            top_similarity = ?results.first().map(|r| r.similarity),
            "Memory similarity search"
        );
        results
    }

    async fn find_similar(&self, content: &str, limit: usize) -> Vec<ScoredRecord> {
        self.search(content, limit).await
    }

    async fn search_by_tags(&self, tags: &[&str], match_all: bool) -> Vec<MemoryRecord> {
        let state = self.state.read().await;
        let results: Vec<MemoryRecord> = state
            .records
            .values()
            .filter(|record| {
                if match_all {
                    tags.iter().all(|tag| record.has_tag(tag))
                } else {
                    tags.iter().any(|tag| record.has_tag(tag))
                }
            })
            .cloned()
            .collect();

        debug!(?tags, match_all, results = results.len(), "Memory tag search");
        results
    }

    async fn get_by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<MemoryRecord> {
        let state = self.state.read().await;
        let in_range: Vec<MemoryRecord> = state
            .records
            .values()
            .filter(|record| record.timestamp() >= start && record.timestamp() <= end)
            .cloned()
            .collect();

        debug!(%start, %end, results = in_range.len(), "Memory date range query");
        newest_first(in_range)
    }

    async fn get_all(&self) -> Vec<MemoryRecord> {
        let state = self.state.read().await;
        newest_first(state.records.values().cloned().collect())
    }

    async fn get_stats(&self) -> MemoryStats {
        let state = self.state.read().await;
        let records = &state.records;

        let distinct_tags: HashSet<&str> = records
            .values()
            .flat_map(|record| record.tags().iter().map(String::as_str))
            .collect();

        let average_content_length = if records.is_empty() {
            0.0
        } else {
            let total: usize = records.values().map(|r| r.content().chars().count()).sum();
            total as f64 / records.len() as f64
        };

        MemoryStats {
            count: records.len(),
            limit: state.config.max_memories,
            oldest_timestamp: records.values().map(MemoryRecord::timestamp).min(),
            newest_timestamp: records.values().map(MemoryRecord::timestamp).max(),
            distinct_tag_count: distinct_tags.len(),
            average_content_length,
        }
    }

    async fn export(&self) -> MemorySnapshot {
        let state = self.state.read().await;
        let snapshot = MemorySnapshot {
            memories: state
                .records
                .iter()
                .map(|(id, record)| (*id, record.clone()))
                .collect(),
            config: state.config.clone(),
            next_id: state.next_id,
            exported_at: self.clock.now(),
        };
        info!(count = snapshot.memories.len(), next_id = snapshot.next_id, "Exported memory store");
        snapshot
    }

    async fn import(&self, snapshot: MemorySnapshot) -> Result<()> {
        if let Err(e) = snapshot.validate() {
            warn!(error = %e, "Rejected memory snapshot");
            return Err(e);
        }

        // Build the replacement fully before taking the lock.
        let mut incoming = StoreState::new(snapshot.config);
        incoming.next_id = snapshot.next_id;
        for (id, mut record) in snapshot.memories {
            record.refresh_vector(&self.vectorizer);
            incoming.records.insert(id, record);
        }
        incoming.enforce_capacity();

        let mut state = self.state.write().await;
        *state = incoming;
        info!(
            count = state.records.len(),
            next_id = state.next_id,
            exported_at = %snapshot.exported_at,
            "Imported memory snapshot"
        );
        Ok(())
    }

    async fn sweep_expired(&self) -> usize {
        let mut state = self.state.write().await;
        if !state.config.auto_expire {
            return 0;
        }

        let now = self.clock.now();
        // A window reaching past the earliest representable date expires nothing.
        let window = Duration::days(i64::from(state.config.expire_days));
        let Some(cutoff) = now.checked_sub_signed(window) else {
            debug!(
                expire_days = state.config.expire_days,
                "Expiry window exceeds date range; nothing to sweep"
            );
            return 0;
        };
        let before = state.records.len();
        state.records.retain(|_, record| record.timestamp() >= cutoff);
        let removed = before - state.records.len();

        info!(removed, %cutoff, remaining = state.records.len(), "Expiry sweep finished");
        removed
    }
}
