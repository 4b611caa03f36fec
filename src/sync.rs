//! Thread-safe wrapper for concurrent index access.
//!
//! This module provides `SyncIndex`, a thread-safe wrapper around
//! `MarkerIndex` that uses `Arc<RwLock<MarkerIndex>>` internally to allow
//! safe concurrent access from multiple threads.
//!
//! # Features
//!
//! Enabled by the default `sync` feature:
//!
//! ```toml
//! [dependencies]
//! geomarker = { version = "0.1", features = ["sync"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use geomarker::SyncIndex;
//! use std::thread;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let index = SyncIndex::new();
//!
//! // Clone for use in another thread
//! let writer = index.clone();
//! let handle = thread::spawn(move || {
//!     writer.insert(37.0, 33.0, "from thread", 7).unwrap();
//! });
//! handle.join().unwrap();
//!
//! let found = index.query_radius(37.0, 33.0, 1.0, 7)?;
//! assert_eq!(found.len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::config::IndexConfig;
use crate::error::Result;
use crate::index::{IndexStats, MarkerIndex};
use crate::query::{QueryResult, QueryStats};
use geomarker_types::marker::Marker;
use parking_lot::RwLock;
use std::sync::Arc;

/// Thread-safe wrapper around `MarkerIndex` using `Arc<RwLock<MarkerIndex>>`.
///
/// # Thread Safety
///
/// - Implements `Clone` for easy sharing between threads
/// - Inserts hold the write lock
/// - Queries hold the read lock only while collecting candidate markers;
///   distance filtering and sorting run after it is released
#[derive(Clone, Default)]
pub struct SyncIndex {
    inner: Arc<RwLock<MarkerIndex>>,
}

impl SyncIndex {
    /// Creates an empty index that binds to the precision of its first insert.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing index.
    pub fn from_index(index: MarkerIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Creates an empty index bound to `config.geohash_precision`.
    pub fn with_config(config: IndexConfig) -> Result<Self> {
        Ok(Self::from_index(MarkerIndex::with_config(config)?))
    }

    pub fn insert(
        &self,
        latitude: f64,
        longitude: f64,
        label: impl Into<String>,
        precision: usize,
    ) -> Result<()> {
        self.inner
            .write()
            .insert(latitude, longitude, label, precision)
    }

    pub fn insert_marker(&self, marker: Marker, precision: usize) -> Result<()> {
        self.inner.write().insert_marker(marker, precision)
    }

    pub fn query_radius(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        precision: usize,
    ) -> Result<Vec<QueryResult>> {
        self.query_radius_with_stats(latitude, longitude, radius_km, precision)
            .map(|(results, _)| results)
    }

    pub fn query_radius_with_stats(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        precision: usize,
    ) -> Result<(Vec<QueryResult>, QueryStats)> {
        let candidates = {
            let index = self.inner.read();
            index.gather_candidates(latitude, longitude, radius_km, precision)?
        };
        Ok(candidates.refine(latitude, longitude, radius_km))
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn precision(&self) -> Option<usize> {
        self.inner.read().precision()
    }

    pub fn stats(&self) -> IndexStats {
        self.inner.read().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_basic_operations() {
        let index = SyncIndex::new();
        index.insert(37.0, 33.0, "center", 7).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.precision(), Some(7));

        let found = index.query_radius(37.0, 33.0, 0.5, 7).unwrap();
        assert_eq!(found[0].label(), "center");
    }

    #[test]
    fn test_concurrent_writes() {
        let index = SyncIndex::new();

        let handles: Vec<_> = (0..5)
            .map(|i| {
                let index = index.clone();
                thread::spawn(move || {
                    for j in 0..20 {
                        let lat = 10.0 + i as f64;
                        let lon = 20.0 + j as f64 * 0.01;
                        index
                            .insert(lat, lon, format!("thread_{}_{}", i, j), 6)
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(index.stats().marker_count, 100);
    }

    #[test]
    fn test_concurrent_reads_and_writes() {
        let index = SyncIndex::with_config(IndexConfig::default()).unwrap();
        for i in 0..50 {
            index
                .insert(37.0, 33.0 + i as f64 * 0.001, format!("seed_{}", i), 7)
                .unwrap();
        }

        let mut handles = Vec::new();
        for _ in 0..4 {
            let index = index.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..50 {
                    let found = index.query_radius(37.0, 33.0, 10.0, 7).unwrap();
                    assert!(found.len() >= 50);
                }
            }));
        }
        for t in 0..2 {
            let index = index.clone();
            handles.push(thread::spawn(move || {
                for i in 0..25 {
                    index
                        .insert(37.01, 33.0 + i as f64 * 0.001, format!("w{}_{}", t, i), 7)
                        .unwrap();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(index.len(), 100);
        let found = index.query_radius(37.0, 33.0, 10.0, 7).unwrap();
        assert_eq!(found.len(), 100);
    }

    #[test]
    fn test_rejections_propagate() {
        let index = SyncIndex::with_config(IndexConfig::default().with_geohash_precision(5)).unwrap();
        assert!(index.insert(0.0, 0.0, "wrong precision", 7).is_err());
        assert!(index.query_radius(0.0, 0.0, -1.0, 5).is_err());
        assert!(index.is_empty());
    }
}
