//! # Memory Core
//!
//! Core types and traits for the associative memory store.
//! Used by the `memory-inmemory` crate and re-exported by the `memory` facade.
//!
//! ## Modules
//!
//! - [`types`] - MemoryRecord, RecordMetadata, MetadataPatch, ScoredRecord, MemoryStats
//! - [`config`] - MemoryConfig (capacity, merge threshold, expiry)
//! - [`error`] - MemoryError and the crate `Result` alias
//! - [`clock`] - Clock trait with system and manual implementations
//! - [`snapshot`] - MemorySnapshot (export/import format)
//! - [`store`] - MemoryStore trait

pub mod clock;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod store;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{MemoryConfig, MAX_EXPIRY_INTERVAL_SECS};
pub use error::{MemoryError, Result};
pub use snapshot::MemorySnapshot;
pub use store::*;
pub use types::*;
