//! Geohash-bucketed marker storage.
//!
//! The index maps every geohash (at one fixed precision) to the bucket of
//! markers whose coordinate encodes to it. Radius queries live in
//! [`crate::query`] and build on the buckets kept here.

use crate::compute::codec::encode_unchecked;
use crate::compute::coverage::{Coverage, covering_cells_with_limit};
use crate::compute::validation::{validate_point, validate_precision};
use crate::config::IndexConfig;
use crate::error::{GeoMarkerError, Result};
use crate::query::CandidateStrategy;
use geomarker_types::marker::Marker;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// A marker together with its insertion sequence number.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) seq: u64,
    pub(crate) marker: Arc<Marker>,
}

/// The markers sharing one geohash, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Bucket {
    entries: Vec<Entry>,
}

impl Bucket {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Markers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.entries.iter().map(|entry| entry.marker.as_ref())
    }

    pub(crate) fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

/// Statistics for a single bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketStats {
    /// The geohash string for this bucket
    pub geohash: String,
    /// Number of markers in this bucket
    pub marker_count: usize,
}

/// Overall statistics for the index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexStats {
    /// Total number of non-empty buckets
    pub bucket_count: usize,
    /// Total number of markers
    pub marker_count: usize,
    /// Average markers per bucket
    pub avg_markers_per_bucket: f64,
    /// Size of the fullest bucket
    pub max_bucket_size: usize,
    /// Precision the index is bound to, if any marker has been inserted
    pub precision: Option<usize>,
    /// Per-bucket statistics, fullest first
    pub buckets: Vec<BucketStats>,
}

/// Spatial index of markers keyed by geohash.
///
/// # Architecture
///
/// ```text
/// MarkerIndex
/// ├─ buckets: FxHashMap<String, Bucket>
/// │  ├─ "swx6qzt" -> [marker #1, marker #4]
/// │  ├─ "swx6qzw" -> [marker #2]
/// │  └─ "swx6r8b" -> [marker #3]
/// └─ precision: Some(7)
/// ```
///
/// # Precision binding
///
/// Bucket keys only make sense at one precision, so the index binds to the
/// precision of its first insert (or the one it was configured with). Inserts
/// and queries at any other precision fail with `PrecisionMismatch`.
///
/// # Thread Safety
///
/// Queries take `&self` and inserts `&mut self`. Use
/// [`SyncIndex`](crate::SyncIndex) to share one index between threads.
///
/// # Examples
///
/// ```rust
/// use geomarker::MarkerIndex;
///
/// let mut index = MarkerIndex::new();
/// index.insert(37.0, 33.0, "center", 7)?;
/// index.insert(37.009, 33.0, "1 km north", 7)?;
///
/// let found = index.query_radius(37.0, 33.0, 2.0, 7)?;
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0].label(), "center");
/// # Ok::<(), geomarker::GeoMarkerError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MarkerIndex {
    pub(crate) buckets: FxHashMap<String, Bucket>,
    precision: Option<usize>,
    marker_count: usize,
    next_seq: u64,
    config: IndexConfig,
}

impl MarkerIndex {
    /// Create an empty index. It binds to the precision of its first insert.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index bound to `config.geohash_precision`.
    pub fn with_config(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            precision: Some(config.geohash_precision),
            config,
            ..Self::default()
        })
    }

    /// Create an empty index bound to `precision`.
    pub fn with_precision(precision: usize) -> Result<Self> {
        validate_precision(precision)?;
        Self::with_config(IndexConfig::default().with_geohash_precision(precision))
    }

    /// The precision the index is bound to, or `None` before the first insert.
    pub fn precision(&self) -> Option<usize> {
        self.precision
    }

    /// The index configuration. `geohash_precision` follows the bound
    /// precision once the index binds; before that it holds the default.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Number of markers in the index.
    pub fn len(&self) -> usize {
        self.marker_count
    }

    pub fn is_empty(&self) -> bool {
        self.marker_count == 0
    }

    /// Number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// The bucket stored under a geohash, if any.
    pub fn bucket(&self, geohash: &str) -> Option<&Bucket> {
        self.buckets.get(geohash)
    }

    /// All buckets with their geohash, in no particular order.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &Bucket)> {
        self.buckets
            .iter()
            .map(|(hash, bucket)| (hash.as_str(), bucket))
    }

    /// Insert a marker built from its parts.
    ///
    /// # Errors
    ///
    /// `InvalidCoordinate`, `InvalidPrecision`, or `PrecisionMismatch` when
    /// the index is bound to another precision.
    pub fn insert(
        &mut self,
        latitude: f64,
        longitude: f64,
        label: impl Into<String>,
        precision: usize,
    ) -> Result<()> {
        self.insert_marker(Marker::new(latitude, longitude, label), precision)
    }

    /// Insert a marker into the bucket of its geohash at `precision`.
    ///
    /// Markers are never merged or replaced: inserting the same marker twice
    /// stores it twice.
    pub fn insert_marker(&mut self, marker: Marker, precision: usize) -> Result<()> {
        if let Err(err) = validate_point(marker.coordinate()).and(validate_precision(precision)) {
            log::warn!("Rejecting insert of {:?}: {}", marker.label(), err);
            return Err(err);
        }
        self.check_precision(precision)?;

        let hash = encode_unchecked(marker.latitude(), marker.longitude(), precision);
        if self.precision.is_none() {
            self.precision = Some(precision);
            self.config.geohash_precision = precision;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.marker_count += 1;

        let bucket = self.buckets.entry(hash).or_default();
        bucket.entries.push(Entry {
            seq,
            marker: Arc::new(marker),
        });

        log::trace!("inserted marker #{} (bucket size {})", seq, bucket.len());
        Ok(())
    }

    /// Insert several markers at one precision, stopping at the first error.
    pub fn extend<I>(&mut self, markers: I, precision: usize) -> Result<usize>
    where
        I: IntoIterator<Item = Marker>,
    {
        let mut inserted = 0;
        for marker in markers {
            self.insert_marker(marker, precision)?;
            inserted += 1;
        }
        Ok(inserted)
    }

    /// The covering cells of a search circle, limited by
    /// `config.max_covering_cells`.
    pub fn covering_cells(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        precision: usize,
    ) -> Result<FxHashSet<String>> {
        covering_cells_with_limit(
            latitude,
            longitude,
            radius_km,
            precision,
            self.config.max_covering_cells,
        )
    }

    /// Buckets whose geohash lies in a coverage, with the strategy used and
    /// the number of cells or buckets it examined.
    ///
    /// Walks the smaller side: the coverage's cells when it has no more cells
    /// than the index has buckets, the buckets otherwise. Either way the
    /// result is the same set of buckets.
    pub(crate) fn covered_buckets<'a>(
        &'a self,
        coverage: &Coverage,
    ) -> (Vec<&'a Bucket>, CandidateStrategy, u64) {
        let cells = coverage.cell_count();
        if cells <= self.buckets.len() as u64 {
            let found = coverage
                .cells()
                .filter_map(|cell| self.buckets.get(&cell))
                .collect();
            (found, CandidateStrategy::Enumerate, cells)
        } else {
            let found = self
                .buckets
                .iter()
                .filter(|(hash, _)| coverage.contains(hash))
                .map(|(_, bucket)| bucket)
                .collect();
            (found, CandidateStrategy::Scan, self.buckets.len() as u64)
        }
    }

    /// Get comprehensive statistics about the index.
    pub fn stats(&self) -> IndexStats {
        let bucket_count = self.buckets.len();
        let avg_markers_per_bucket = if bucket_count > 0 {
            self.marker_count as f64 / bucket_count as f64
        } else {
            0.0
        };

        let mut buckets: Vec<BucketStats> = self
            .buckets
            .iter()
            .map(|(hash, bucket)| BucketStats {
                geohash: hash.clone(),
                marker_count: bucket.len(),
            })
            .collect();
        buckets.sort_by(|a, b| {
            b.marker_count
                .cmp(&a.marker_count)
                .then_with(|| a.geohash.cmp(&b.geohash))
        });

        IndexStats {
            bucket_count,
            marker_count: self.marker_count,
            avg_markers_per_bucket,
            max_bucket_size: buckets.first().map_or(0, |b| b.marker_count),
            precision: self.precision,
            buckets,
        }
    }

    /// Fail if the index is bound to a precision other than `precision`.
    pub(crate) fn check_precision(&self, precision: usize) -> Result<()> {
        match self.precision {
            Some(expected) if expected != precision => {
                log::warn!(
                    "Rejecting precision {}: index is bound to {}",
                    precision,
                    expected
                );
                Err(GeoMarkerError::PrecisionMismatch {
                    expected,
                    found: precision,
                })
            }
            _ => Ok(()),
        }
    }
}
