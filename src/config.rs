//! Runtime configuration

use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_SCRYFALL_URL: &str = "https://api.scryfall.com";
pub const DEFAULT_USER_AGENT: &str = "D2D-Automations-SetCounter/1.0";
pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

/// Settings for a decklist run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of lookups in flight at once
    pub concurrency: usize,
    /// Upper bound for a single card's lookup
    pub lookup_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
        }
    }
}

impl EngineConfig {
    pub fn new(concurrency: usize, timeout_secs: u64) -> Result<Self> {
        if concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".to_string()));
        }
        if timeout_secs == 0 {
            return Err(Error::Config(
                "lookup timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(Self {
            concurrency,
            lookup_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Settings for the Scryfall client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScryfallConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for ScryfallConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SCRYFALL_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScryfallConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}
