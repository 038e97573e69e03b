//! Store configuration: defaults, validation, and env-based loading.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::error::{MemoryError, Result};

/// Configuration for a memory store.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `max_memories` | `usize` | Record count above which the oldest record is evicted |
/// | `similarity_threshold` | `f64` | `add` merges into the best match when similarity is strictly above this |
/// | `auto_expire` | `bool` | Enables the periodic expiry sweep |
/// | `expire_days` | `u32` | Records older than this many days are removed by a sweep |
/// | `expiry_interval_secs` | `u64` | Period of the background sweep, at most [`MAX_EXPIRY_INTERVAL_SECS`] |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryConfig {
    pub max_memories: usize,
    pub similarity_threshold: f64,
    pub auto_expire: bool,
    pub expire_days: u32,
    #[serde(default = "default_expiry_interval_secs")]
    pub expiry_interval_secs: u64,
}

/// Longest accepted sweep period (one year).
pub const MAX_EXPIRY_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

fn default_expiry_interval_secs() -> u64 {
    24 * 60 * 60
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_memories: 1000,
            similarity_threshold: 0.7,
            auto_expire: false,
            expire_days: 30,
            expiry_interval_secs: default_expiry_interval_secs(),
        }
    }
}

impl MemoryConfig {
    /// Load from environment variables. Unset variables keep their defaults.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `MEMORY_MAX_MEMORIES` | `max_memories` |
    /// | `MEMORY_SIMILARITY_THRESHOLD` | `similarity_threshold` |
    /// | `MEMORY_AUTO_EXPIRE` | `auto_expire` |
    /// | `MEMORY_EXPIRE_DAYS` | `expire_days` |
    /// | `MEMORY_EXPIRY_INTERVAL_SECS` | `expiry_interval_secs` |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a caller-provided variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            max_memories: parse_var(&lookup, "MEMORY_MAX_MEMORIES")?
                .unwrap_or(defaults.max_memories),
            similarity_threshold: parse_var(&lookup, "MEMORY_SIMILARITY_THRESHOLD")?
                .unwrap_or(defaults.similarity_threshold),
            auto_expire: parse_var(&lookup, "MEMORY_AUTO_EXPIRE")?
                .unwrap_or(defaults.auto_expire),
            expire_days: parse_var(&lookup, "MEMORY_EXPIRE_DAYS")?
                .unwrap_or(defaults.expire_days),
            expiry_interval_secs: parse_var(&lookup, "MEMORY_EXPIRY_INTERVAL_SECS")?
                .unwrap_or(defaults.expiry_interval_secs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the store cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_memories == 0 {
            return Err(MemoryError::Config("max_memories must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(MemoryError::Config(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.expire_days == 0 {
            return Err(MemoryError::Config("expire_days must be at least 1".to_string()));
        }
        if !(1..=MAX_EXPIRY_INTERVAL_SECS).contains(&self.expiry_interval_secs) {
            return Err(MemoryError::Config(format!(
                "expiry_interval_secs must be within [1, {}], got {}",
                MAX_EXPIRY_INTERVAL_SECS, self.expiry_interval_secs
            )));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| MemoryError::Config(format!("{} has invalid value {:?}", key, raw))),
    }
}
