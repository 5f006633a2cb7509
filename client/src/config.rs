//! Configuration management for the sync client.

use std::env;

/// Sync configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Remote store endpoint (http or https)
    pub endpoint: String,
    /// Collections to replicate, in sync order
    pub collections: Vec<String>,
}

impl SyncConfig {
    /// Load configuration from environment variables.
    ///
    /// `SYNC_ENDPOINT` is the remote endpoint URL; `SYNC_COLLECTIONS`
    /// is a comma-separated list of collection names.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = env::var("SYNC_ENDPOINT").map_err(|_| ConfigError::MissingEndpoint)?;

        let collections = env::var("SYNC_COLLECTIONS")
            .map_err(|_| ConfigError::MissingCollections)
            .map(|raw| parse_collections(&raw))?;

        if collections.is_empty() {
            return Err(ConfigError::MissingCollections);
        }

        Ok(Self {
            endpoint,
            collections,
        })
    }

    /// Build a configuration directly, for embedding hosts that manage
    /// their own settings.
    pub fn new(
        endpoint: impl Into<String>,
        collections: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            collections: collections.into_iter().map(Into::into).collect(),
        }
    }
}

fn parse_collections(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SYNC_ENDPOINT environment variable is required")]
    MissingEndpoint,

    #[error("SYNC_COLLECTIONS must name at least one collection")]
    MissingCollections,
}
