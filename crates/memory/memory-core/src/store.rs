//! # Memory Storage
//!
//! This module defines the interface of an associative memory store.
//!
//! ## MemoryStore Trait
//!
//! ### Mutations
//!
//! - `add` vectorizes the content and either merges it into the most similar record
//!   (similarity strictly above the configured threshold) or inserts a new record,
//!   evicting the oldest one when the store is over capacity.
//! - `update` replaces content and merges metadata of an existing record; no dedup.
//! - `delete`, `clear`, `import`, `sweep_expired`.
//!
//! ### Queries
//!
//! - `get`, `search`, `find_similar`, `search_by_tags`, `get_by_date_range`, `get_all`,
//!   `get_stats`, `export`.
//!
//! ### Example Usage
//!
//! ```rust
//! use memory_core::{MemoryStore, MetadataPatch};
//!
//! async fn example(store: &impl MemoryStore) -> memory_core::Result<()> {
//!     let id = store
//!         .add("the user likes pizza", MetadataPatch::new().with_tags(["food"]))
//!         .await;
//!
//!     let hits = store.search("pizza", 10).await;
//!     assert_eq!(hits[0].record.id(), id);
//!
//!     store.update(id, "the user likes pasta", MetadataPatch::new()).await?;
//!     assert!(store.delete(id).await);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::snapshot::MemorySnapshot;
use crate::types::{MemoryId, MemoryRecord, MemoryStats, MetadataPatch, ScoredRecord};

/// Default `limit` for [`MemoryStore::search`].
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Default `limit` for [`MemoryStore::find_similar`].
pub const DEFAULT_SIMILAR_LIMIT: usize = 5;

/// Trait for storing, deduplicating and querying memories.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Adds `content`, merging into a near-duplicate when one exists. Returns the id of
    /// the record that now holds the content.
    async fn add(&self, content: &str, metadata: MetadataPatch) -> MemoryId;

    /// Retrieves a record by id. Returns `None` if not found.
    async fn get(&self, id: MemoryId) -> Option<MemoryRecord>;

    /// Replaces the content of an existing record and merges `metadata` into it.
    ///
    /// Fails with `MemoryError::NotFound` when `id` does not exist.
    async fn update(&self, id: MemoryId, content: &str, metadata: MetadataPatch) -> Result<MemoryRecord>;

    /// Deletes a record. Returns whether it existed.
    async fn delete(&self, id: MemoryId) -> bool;

    /// Removes every record and resets the id counter.
    async fn clear(&self);

    /// Records with positive similarity to `query`, best first, at most `limit`.
    async fn search(&self, query: &str, limit: usize) -> Vec<ScoredRecord>;

    /// Same ranking as [`search`](Self::search); used for dedup on `add`.
    async fn find_similar(&self, content: &str, limit: usize) -> Vec<ScoredRecord>;

    /// Records carrying all (`match_all`) or any of `tags`, in id order.
    async fn search_by_tags(&self, tags: &[&str], match_all: bool) -> Vec<MemoryRecord>;

    /// Records created within `[start, end]`, newest first.
    async fn get_by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<MemoryRecord>;

    /// Every record, newest first.
    async fn get_all(&self) -> Vec<MemoryRecord>;

    async fn get_stats(&self) -> MemoryStats;

    /// Snapshot of records, configuration and id counter.
    async fn export(&self) -> MemorySnapshot;

    /// Replaces records, configuration and id counter with `snapshot`.
    ///
    /// Fails with `MemoryError::MalformedSnapshot` and leaves the store unchanged when
    /// the snapshot is inconsistent.
    async fn import(&self, snapshot: MemorySnapshot) -> Result<()>;

    /// Deletes records older than the configured expiry age. Returns how many were
    /// removed; always 0 when auto-expire is disabled.
    async fn sweep_expired(&self) -> usize;
}
