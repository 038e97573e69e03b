//! # Memory Crate
//!
//! The `memory` crate is the entry point of the associative memory store: it re-exports
//! the core types, the vectorizer and the in-memory store, and adds process-level
//! plumbing (tracing setup, env-based startup).
//!
//! ## Features
//!
//! - **Deterministic vectors**: bag-of-words term frequencies, no model or network
//! - **Dedup on insert**: near-identical content is merged into the existing record
//! - **Bounded size**: the oldest record is evicted when the store is full
//! - **Optional expiry**: a background sweep drops records older than N days
//! - **Snapshots**: export/import of records, configuration and id counter as JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use memory::{MemoryConfig, MemoryRuntime, MemoryStore, MetadataPatch};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = MemoryRuntime::start(MemoryConfig::default()).await?;
//!     let store = runtime.store();
//!
//!     store.add("the user likes pizza", MetadataPatch::new().with_tags(["food"])).await;
//!     let hits = store.search("pizza", 10).await;
//!     assert_eq!(hits.len(), 1);
//!
//!     runtime.shutdown();
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`logger`] - tracing subscriber setup
//! - [`runtime`] - [`MemoryRuntime`]: store plus its expiry scheduler

pub mod logger;
pub mod runtime;

pub use embedding::{cosine_similarity, tokenize, TermVector, TextVectorizer};
pub use logger::init_tracing;
pub use memory_core::*;
pub use memory_inmemory::{ExpiryHandle, ExpiryScheduler, InMemoryMemoryStore};
pub use runtime::MemoryRuntime;
