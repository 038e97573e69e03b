//! Store lifecycle: construction from config or environment, expiry scheduler ownership,
//! and teardown.

use anyhow::{Context, Result};
use memory_core::MemoryConfig;
use memory_inmemory::{ExpiryHandle, InMemoryMemoryStore};
use tracing::info;

/// A memory store together with the expiry scheduler it runs (if any).
///
/// Dropping the runtime stops the scheduler; [`shutdown`](Self::shutdown) does the same
/// explicitly.
#[derive(Debug)]
pub struct MemoryRuntime {
    store: InMemoryMemoryStore,
    expiry: Option<ExpiryHandle>,
}

impl MemoryRuntime {
    /// Creates the store and, when `config.auto_expire` is set, starts the expiry
    /// scheduler. Must be called from within a Tokio runtime.
    pub async fn start(config: MemoryConfig) -> Result<Self> {
        let store = InMemoryMemoryStore::new(config).context("invalid memory store config")?;
        let expiry = store.start_expiry().await;
        info!(expiry_running = expiry.is_some(), "Memory runtime started");
        Ok(Self { store, expiry })
    }

    /// Loads `.env` (if present), reads [`MemoryConfig::from_env`], then [`start`](Self::start)s.
    pub async fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = MemoryConfig::from_env().context("failed to load memory config from env")?;
        Self::start(config).await
    }

    /// The store. Clones share the same records.
    pub fn store(&self) -> &InMemoryMemoryStore {
        &self.store
    }

    pub fn expiry_running(&self) -> bool {
        self.expiry.as_ref().is_some_and(ExpiryHandle::is_running)
    }

    /// Stops the expiry scheduler and hands back the store.
    pub fn shutdown(self) -> InMemoryMemoryStore {
        let Self { store, expiry } = self;
        if let Some(mut expiry) = expiry {
            expiry.stop();
        }
        info!("Memory runtime shut down");
        store
    }
}
