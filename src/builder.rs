//! Index builder for flexible configuration
//!
//! This module provides a builder pattern for creating indexes bound to a
//! precision up front, optionally from a configuration file.

use crate::config::IndexConfig;
use crate::error::Result;
use crate::index::MarkerIndex;
#[cfg(feature = "sync")]
use crate::sync::SyncIndex;
use std::path::Path;

/// Builder for index configuration.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    config: IndexConfig,
}

impl IndexBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: IndexConfig::default(),
        }
    }

    /// Set the geohash precision the index is bound to.
    pub fn precision(mut self, precision: usize) -> Self {
        self.config.geohash_precision = precision;
        self
    }

    /// Set the limit on materialised covering cells.
    pub fn max_covering_cells(mut self, limit: usize) -> Self {
        self.config.max_covering_cells = limit;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the configuration from a `.json` or `.toml` file.
    pub fn config_path<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        Ok(self.config(IndexConfig::from_path(path)?))
    }

    /// Build the index. Fails with `InvalidConfig` on out-of-range settings.
    pub fn build(self) -> Result<MarkerIndex> {
        MarkerIndex::with_config(self.config)
    }

    /// Build a thread-safe index.
    #[cfg(feature = "sync")]
    pub fn build_sync(self) -> Result<SyncIndex> {
        SyncIndex::with_config(self.config)
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}
