//! # In-Memory Memory Store
//!
//! This crate provides the in-memory implementation of the `MemoryStore` trait from
//! `memory-core`, plus the background expiry scheduler.
//!
//! ## InMemoryMemoryStore
//!
//! - Deduplicates on `add`: content whose term vector is close enough to an existing
//!   record is merged into it instead of creating a new record
//! - Evicts the oldest record (lowest id on timestamp ties) when over capacity
//! - Optional age-based expiry, driven by [`ExpiryScheduler`]
//!
//! ## Example
//!
//! ```rust
//! use memory_core::{MemoryConfig, MemoryStore, MetadataPatch};
//! use memory_inmemory::InMemoryMemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), memory_core::MemoryError> {
//!     let store = InMemoryMemoryStore::new(MemoryConfig::default())?;
//!
//!     let first = store.add("the user likes pizza", MetadataPatch::new().with_tags(["food"])).await;
//!     let second = store.add("the user loves pizza", MetadataPatch::new()).await;
//!     assert_eq!(first, second);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Thread Safety
//!
//! The store uses `Arc<RwLock<>>`; every mutation, including expiry sweeps, takes the
//! write lock, so they are serialized against each other and against reads.

pub mod expiry;
pub mod store;

pub use expiry::{ExpiryHandle, ExpiryScheduler};
pub use store::InMemoryMemoryStore;
