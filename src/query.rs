//! Radius queries over a [`MarkerIndex`].
//!
//! A query runs in two phases: gather every marker stored in a bucket that
//! the search circle's covering can reach, then keep those whose exact
//! haversine distance is within the radius.

use crate::compute::coverage::Coverage;
use crate::compute::distance::distance_km;
use crate::compute::validation::validate_query;
use crate::error::Result;
use crate::index::{Entry, MarkerIndex};
use geomarker_types::marker::Marker;
use std::sync::Arc;

/// How candidate buckets were located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStrategy {
    /// Each covering cell was looked up in the bucket map
    Enumerate,
    /// Every bucket was tested for membership in the covering
    Scan,
}

/// A marker within the search radius.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub marker: Arc<Marker>,
    /// Haversine distance from the query center in kilometers
    pub distance_km: f64,
}

impl QueryResult {
    pub fn latitude(&self) -> f64 {
        self.marker.latitude()
    }

    pub fn longitude(&self) -> f64 {
        self.marker.longitude()
    }

    pub fn label(&self) -> &str {
        self.marker.label()
    }
}

/// Query execution statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryStats {
    pub strategy: CandidateStrategy,
    /// Covering cells looked up, or buckets scanned
    pub cells_examined: u64,
    /// Markers whose distance was computed
    pub candidates_examined: usize,
    pub results_returned: usize,
}

/// Markers gathered from the covered buckets, detached from the index.
#[derive(Debug)]
pub(crate) struct Candidates {
    entries: Vec<Entry>,
    strategy: CandidateStrategy,
    cells_examined: u64,
}

impl Candidates {
    fn empty() -> Self {
        Self {
            entries: Vec::new(),
            strategy: CandidateStrategy::Enumerate,
            cells_examined: 0,
        }
    }

    /// Keep the candidates within `radius_km` of the center, nearest first.
    /// Equal distances keep insertion order.
    pub(crate) fn refine(
        self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> (Vec<QueryResult>, QueryStats) {
        let candidates_examined = self.entries.len();

        let mut hits: Vec<(u64, QueryResult)> = self
            .entries
            .into_iter()
            .filter_map(|entry| {
                let d = distance_km(
                    latitude,
                    longitude,
                    entry.marker.latitude(),
                    entry.marker.longitude(),
                );
                (d <= radius_km).then(|| {
                    (
                        entry.seq,
                        QueryResult {
                            marker: entry.marker,
                            distance_km: d,
                        },
                    )
                })
            })
            .collect();

        hits.sort_by(|(seq_a, a), (seq_b, b)| {
            a.distance_km
                .total_cmp(&b.distance_km)
                .then(seq_a.cmp(seq_b))
        });

        let results: Vec<QueryResult> = hits.into_iter().map(|(_, hit)| hit).collect();
        let stats = QueryStats {
            strategy: self.strategy,
            cells_examined: self.cells_examined,
            candidates_examined,
            results_returned: results.len(),
        };

        log::debug!(
            "radius query ({}, {}) r={}km: {:?} examined {} cells, {} candidates, {} results",
            latitude,
            longitude,
            radius_km,
            stats.strategy,
            stats.cells_examined,
            stats.candidates_examined,
            stats.results_returned
        );

        (results, stats)
    }
}

impl MarkerIndex {
    /// Find all markers within `radius_km` of a point, nearest first.
    ///
    /// Markers at exactly `radius_km` are included. A query that matches
    /// nothing returns an empty vector.
    ///
    /// # Errors
    ///
    /// `InvalidCoordinate`, `InvalidRadius`, `InvalidPrecision`, or
    /// `PrecisionMismatch` when the index is bound to another precision.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use geomarker::MarkerIndex;
    ///
    /// let mut index = MarkerIndex::new();
    /// index.insert(0.0, 179.9995, "east", 7)?;
    ///
    /// // Found from the other side of the antimeridian
    /// let found = index.query_radius(0.0, -179.9995, 1.0, 7)?;
    /// assert_eq!(found.len(), 1);
    /// # Ok::<(), geomarker::GeoMarkerError>(())
    /// ```
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

    /// Like [`query_radius`](Self::query_radius), also reporting how the
    /// query was executed.
    pub fn query_radius_with_stats(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        precision: usize,
    ) -> Result<(Vec<QueryResult>, QueryStats)> {
        let candidates = self.gather_candidates(latitude, longitude, radius_km, precision)?;
        Ok(candidates.refine(latitude, longitude, radius_km))
    }

    /// Validate a query and collect the markers of every covered bucket.
    pub(crate) fn gather_candidates(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        precision: usize,
    ) -> Result<Candidates> {
        if let Err(err) = validate_query(latitude, longitude, radius_km, precision) {
            log::warn!("Rejecting radius query: {}", err);
            return Err(err);
        }
        self.check_precision(precision)?;

        if self.buckets.is_empty() {
            return Ok(Candidates::empty());
        }

        let coverage = Coverage::compute(latitude, longitude, radius_km, precision);
        let (buckets, strategy, cells_examined) = self.covered_buckets(&coverage);

        let entries = buckets
            .into_iter()
            .flat_map(|bucket| bucket.entries().iter().cloned())
            .collect();

        Ok(Candidates {
            entries,
            strategy,
            cells_examined,
        })
    }
}
