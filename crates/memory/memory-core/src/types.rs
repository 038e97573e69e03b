//! # Core Types
//!
//! This module defines the core types for memory storage.
//!
//! ## RecordMetadata
//!
//! Metadata attached to a stored memory.
//!
//! ### Fields
//!
//! | Field | Type | Description |
//! |-------|------|-------------|
//! | `timestamp` | `DateTime<Utc>` | Creation time, set once |
//! | `last_updated` | `Option<DateTime<Utc>>` | Time of the last merge or update |
//! | `tags` | `Vec<String>` | Ordered, duplicate-free tags |
//! | `category` | `Option<String>` | Free-form category |
//! | `extra` | `Map<String, Value>` | Any other caller-supplied keys |
//!
//! Serialized with camelCase keys; `extra` is flattened next to the well-known fields.
//!
//! ## MetadataPatch
//!
//! What callers pass to `add` and `update`. Every field that is set overwrites the
//! stored value (shallow merge, new keys win); unset fields leave the stored value alone.
//!
//! ### Example
//!
//! ```rust
//! use memory_core::MetadataPatch;
//!
//! let patch = MetadataPatch::new()
//!     .with_tags(["food", "italian", "food"])
//!     .with_category("preference")
//!     .with_extra("source", "chat");
//!
//! assert_eq!(patch.tags.as_deref(), Some(&["food".to_string(), "italian".to_string()][..]));
//! ```
//!
//! ## MemoryRecord
//!
//! One stored memory: id, content, metadata and the cached term vector.

use chrono::{DateTime, Utc};
use embedding::{TermVector, TextVectorizer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Handle of a stored memory. Assigned from a per-store counter starting at 1.
pub type MemoryId = u64;

/// Metadata keys that map to typed fields and are never accepted in `extra`.
pub const RESERVED_METADATA_KEYS: [&str; 4] = ["timestamp", "lastUpdated", "tags", "category"];

/// Returns `tags` with duplicates removed, keeping the first occurrence of each.
pub fn dedup_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.into();
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Caller-supplied metadata for `add` and `update`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataPatch {
    /// Replaces the stored tags when set
    pub tags: Option<Vec<String>>,
    /// Replaces the stored category when set
    pub category: Option<String>,
    /// Extension keys; each one overwrites the stored key of the same name
    pub extra: Map<String, Value>,
}

impl MetadataPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tags, dropping duplicates.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(dedup_tags(tags));
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Adds an extension key. Reserved names (see [`RESERVED_METADATA_KEYS`]) are ignored.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !RESERVED_METADATA_KEYS.contains(&key.as_str()) {
            self.extra.insert(key, value.into());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_none() && self.category.is_none() && self.extra.is_empty()
    }
}

/// Metadata associated with a memory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    /// When the record was created
    pub timestamp: DateTime<Utc>,
    /// When the record was last merged into or updated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Ordered, duplicate-free tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Any other keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecordMetadata {
    /// Creates metadata stamped with `timestamp` and populated from `patch`.
    pub fn new(timestamp: DateTime<Utc>, patch: MetadataPatch) -> Self {
        let mut metadata = Self {
            timestamp,
            last_updated: None,
            tags: Vec::new(),
            category: None,
            extra: Map::new(),
        };
        metadata.merge(patch);
        metadata
    }

    /// Shallow merge: every field set in `patch` overwrites the stored one.
    ///
    /// Tags are replaced, not unioned. `timestamp` and `last_updated` are untouched.
    pub fn merge(&mut self, patch: MetadataPatch) {
        if let Some(tags) = patch.tags {
            self.tags = dedup_tags(tags);
        }
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        for (key, value) in patch.extra {
            if RESERVED_METADATA_KEYS.contains(&key.as_str()) {
                continue;
            }
            self.extra.insert(key, value);
        }
    }
}

/// A single stored memory.
///
/// The cached vector is never serialized; it is rebuilt from `content` whenever the
/// content changes or the record is loaded from a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    id: MemoryId,
    content: String,
    metadata: RecordMetadata,
    #[serde(skip)]
    vector: Option<TermVector>,
}

impl MemoryRecord {
    /// Creates a record with no cached vector.
    pub fn new(id: MemoryId, content: impl Into<String>, metadata: RecordMetadata) -> Self {
        Self {
            id,
            content: content.into(),
            metadata,
            vector: None,
        }
    }

    pub fn id(&self) -> MemoryId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn metadata(&self) -> &RecordMetadata {
        &self.metadata
    }

    /// Creation time.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.metadata.timestamp
    }

    pub fn tags(&self) -> &[String] {
        &self.metadata.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata.tags.iter().any(|t| t == tag)
    }

    pub fn category(&self) -> Option<&str> {
        self.metadata.category.as_deref()
    }

    /// Cached term vector; `None` until [`refresh_vector`](Self::refresh_vector) runs.
    pub fn vector(&self) -> Option<&TermVector> {
        self.vector.as_ref()
    }

    /// Replaces the content and invalidates the cached vector.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.vector = None;
    }

    /// Merges `patch` into the metadata and stamps `last_updated`.
    pub fn touch(&mut self, patch: MetadataPatch, now: DateTime<Utc>) {
        self.metadata.merge(patch);
        self.metadata.last_updated = Some(now);
    }

    /// Attaches a vector already computed from this record's content.
    pub fn with_vector(mut self, vector: TermVector) -> Self {
        self.vector = Some(vector);
        self
    }

    /// Replaces the content along with its precomputed vector.
    pub fn replace_content(&mut self, content: impl Into<String>, vector: TermVector) {
        self.content = content.into();
        self.vector = Some(vector);
    }

    /// Recomputes the cached vector from the current content.
    pub fn refresh_vector(&mut self, vectorizer: &TextVectorizer) {
        self.vector = Some(vectorizer.vectorize(&self.content));
    }
}

/// A record paired with its similarity to a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub record: MemoryRecord,
    pub similarity: f64,
}

/// Statistics derived from the current records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    /// Number of stored records
    pub count: usize,
    /// Configured maximum number of records
    pub limit: usize,
    /// Creation time of the oldest record; `None` when empty
    pub oldest_timestamp: Option<DateTime<Utc>>,
    /// Creation time of the newest record; `None` when empty
    pub newest_timestamp: Option<DateTime<Utc>>,
    /// Number of distinct tags across all records
    pub distinct_tag_count: usize,
    /// Mean content length in characters; 0 when empty
    pub average_content_length: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_dedup_tags_keeps_first_occurrence() {
        assert_eq!(dedup_tags(["b", "a", "b", "c", "a"]), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_patch_ignores_reserved_extra_keys() {
        let patch = MetadataPatch::new()
            .with_extra("timestamp", "2000-01-01T00:00:00Z")
            .with_extra("mood", "happy");

        assert_eq!(patch.extra.len(), 1);
        assert_eq!(patch.extra.get("mood"), Some(&json!("happy")));
    }

    #[test]
    fn test_merge_overwrites_set_fields_only() {
        let mut metadata = RecordMetadata::new(
            at(0),
            MetadataPatch::new()
                .with_tags(["food"])
                .with_category("preference")
                .with_extra("source", "chat")
                .with_extra("score", 1),
        );

        metadata.merge(
            MetadataPatch::new()
                .with_tags(["italian", "food"])
                .with_extra("score", 2),
        );

        assert_eq!(metadata.timestamp, at(0));
        assert_eq!(metadata.tags, vec!["italian", "food"]);
        assert_eq!(metadata.category.as_deref(), Some("preference"));
        assert_eq!(metadata.extra.get("source"), Some(&json!("chat")));
        assert_eq!(metadata.extra.get("score"), Some(&json!(2)));
    }

    #[test]
    fn test_merge_skips_reserved_keys_inserted_directly() {
        let mut metadata = RecordMetadata::new(at(0), MetadataPatch::new());
        let mut patch = MetadataPatch::new();
        patch.extra.insert("tags".to_string(), json!(["sneaky"]));

        metadata.merge(patch);

        assert!(metadata.tags.is_empty());
        assert!(metadata.extra.is_empty());
    }

    #[test]
    fn test_precomputed_vector_is_kept() {
        let vectorizer = TextVectorizer::new();
        let record = MemoryRecord::new(1, "red apple", RecordMetadata::new(at(0), MetadataPatch::new()))
            .with_vector(vectorizer.vectorize("red apple"));
        assert_eq!(record.vector(), Some(&vectorizer.vectorize("red apple")));

        let mut record = record;
        record.replace_content("green pear", vectorizer.vectorize("green pear"));
        assert_eq!(record.content(), "green pear");
        assert_eq!(record.vector(), Some(&vectorizer.vectorize("green pear")));
    }

    #[test]
    fn test_set_content_invalidates_vector() {
        let vectorizer = TextVectorizer::new();
        let mut record = MemoryRecord::new(1, "hello world", RecordMetadata::new(at(0), MetadataPatch::new()));
        assert!(record.vector().is_none());

        record.refresh_vector(&vectorizer);
        assert_eq!(record.vector(), Some(&vectorizer.vectorize("hello world")));

        record.set_content("goodbye");
        assert!(record.vector().is_none());
        assert_eq!(record.content(), "goodbye");
    }

    #[test]
    fn test_touch_stamps_last_updated() {
        let mut record = MemoryRecord::new(7, "text", RecordMetadata::new(at(0), MetadataPatch::new()));
        record.touch(MetadataPatch::new().with_category("note"), at(60));

        assert_eq!(record.timestamp(), at(0));
        assert_eq!(record.metadata().last_updated, Some(at(60)));
        assert_eq!(record.category(), Some("note"));
    }

    #[test]
    fn test_record_serialization_shape() {
        let mut record = MemoryRecord::new(
            3,
            "likes tea",
            RecordMetadata::new(
                at(0),
                MetadataPatch::new().with_tags(["drinks"]).with_extra("source", "chat"),
            ),
        );
        record.refresh_vector(&TextVectorizer::new());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], json!(3));
        assert_eq!(value["content"], json!("likes tea"));
        assert_eq!(value["metadata"]["tags"], json!(["drinks"]));
        assert_eq!(value["metadata"]["source"], json!("chat"));
        assert!(value["metadata"].get("lastUpdated").is_none());
        assert!(value.get("vector").is_none());

        let back: MemoryRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back.metadata(), record.metadata());
        assert!(back.vector().is_none());
    }
}
