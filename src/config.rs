//! Index configuration.
//!
//! The configuration is designed to be easily serializable and loadable from
//! JSON or (with the `toml` feature) TOML, with every field optional.

use crate::compute::codec::MAX_PRECISION;
use crate::compute::coverage::DEFAULT_MAX_COVERING_CELLS;
use crate::error::{GeoMarkerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a [`MarkerIndex`](crate::MarkerIndex).
///
/// # Example
///
/// ```rust
/// use geomarker::IndexConfig;
///
/// let config = IndexConfig::default();
/// assert_eq!(config.geohash_precision, 7);
///
/// let json = r#"{ "geohash_precision": 6 }"#;
/// let config = IndexConfig::from_json_str(json).unwrap();
/// assert_eq!(config.geohash_precision, 6);
/// assert_eq!(config.max_covering_cells, 1 << 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Geohash precision the index is bound to (1-12, default: 7)
    /// Higher values = smaller buckets but larger coverings per query
    #[serde(default = "IndexConfig::default_geohash_precision")]
    pub geohash_precision: usize,

    /// Upper bound on cells materialised by `MarkerIndex::covering_cells`
    #[serde(default = "IndexConfig::default_max_covering_cells")]
    pub max_covering_cells: usize,
}

impl IndexConfig {
    const fn default_geohash_precision() -> usize {
        7
    }

    const fn default_max_covering_cells() -> usize {
        DEFAULT_MAX_COVERING_CELLS
    }

    pub fn with_geohash_precision(mut self, precision: usize) -> Self {
        self.geohash_precision = precision;
        self
    }

    pub fn with_max_covering_cells(mut self, limit: usize) -> Self {
        self.max_covering_cells = limit;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.geohash_precision < 1 || self.geohash_precision > MAX_PRECISION {
            return Err(GeoMarkerError::InvalidConfig(format!(
                "geohash_precision must be between 1 and {}, got {}",
                MAX_PRECISION, self.geohash_precision
            )));
        }

        if self.max_covering_cells == 0 {
            return Err(GeoMarkerError::InvalidConfig(
                "max_covering_cells must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML configuration.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, choosing the format by extension
    /// (`.json`, or `.toml` with the `toml` feature).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            #[cfg(feature = "toml")]
            Some("toml") => Self::from_toml_str(&contents),
            other => Err(GeoMarkerError::InvalidConfig(format!(
                "unsupported config file extension: {:?}",
                other
            ))),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            geohash_precision: Self::default_geohash_precision(),
            max_covering_cells: Self::default_max_covering_cells(),
        }
    }
}
