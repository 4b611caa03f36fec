//! Covering a search circle with geohash cells.
//!
//! A marker within the radius can sit in any cell whose rectangle overlaps the
//! circle, not just the cell holding the center and its eight neighbors. The
//! calculator therefore:
//!
//! 1. Computes the bounding box of the spherical cap of angular radius
//!    `δ = radius_km / R`. Latitude spans `φ ± δ`. Longitude spans
//!    `λ ± asin(sin δ / cos φ)`, which is the exact extent of the cap; the flat
//!    `δ / cos φ` approximation undershoots at high latitudes. A cap that reaches
//!    a pole spans every longitude.
//! 2. Converts the box to integer row/column ranges of the grid at the requested
//!    precision, splitting the column range in two when it crosses ±180°.
//! 3. Enumerates those cells and encodes each cell's center point.
//!
//! Latitude is clamped at ±90° and never wraps. The result has no false
//! negatives; cells in the box corners that the circle misses are false
//! positives removed later by the exact distance filter.

use crate::compute::codec::{cell_position, encode_unchecked, grid_size};
use crate::compute::distance::EARTH_RADIUS_KM;
use crate::compute::validation::validate_query;
use crate::error::{GeoMarkerError, Result};
use rustc_hash::FxHashSet;
use smallvec::{SmallVec, smallvec};

/// Default cap on the number of cells [`covering_cells`] will materialise.
pub const DEFAULT_MAX_COVERING_CELLS: usize = 1 << 20;

/// Degrees added on every side of the box to absorb rounding at cell edges.
const EDGE_PADDING_DEG: f64 = 1e-9;

/// Smallest `cos(latitude)` used when sizing the longitude span.
const MIN_COS_LATITUDE: f64 = 1e-12;

/// The grid cells covering one search circle.
///
/// The cells are described by a row range and up to two column ranges, so a
/// coverage is cheap to build and to test membership against even when it
/// spans millions of cells. [`Coverage::cells`] enumerates them lazily.
#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    precision: usize,
    rows: (u64, u64),
    cols: SmallVec<[(u64, u64); 2]>,
    lat_range: (f64, f64),
    lon_range: (f64, f64),
    cell_size: (f64, f64),
}

impl Coverage {
    /// Compute the coverage of the circle of `radius_km` around a center.
    ///
    /// # Errors
    ///
    /// `InvalidCoordinate`, `InvalidRadius` or `InvalidPrecision` for bad input.
    ///
    /// # Examples
    ///
    /// ```
    /// use geomarker::compute::codec::encode;
    /// use geomarker::compute::coverage::Coverage;
    ///
    /// let coverage = Coverage::new(37.0, 33.0, 10.0, 5)?;
    /// assert!(coverage.contains(&encode(37.0, 33.0, 5)?));
    /// assert_eq!(coverage.cells().count() as u64, coverage.cell_count());
    /// # Ok::<(), geomarker::GeoMarkerError>(())
    /// ```
    pub fn new(latitude: f64, longitude: f64, radius_km: f64, precision: usize) -> Result<Self> {
        validate_query(latitude, longitude, radius_km, precision)?;
        Ok(Self::compute(latitude, longitude, radius_km, precision))
    }

    /// Build a coverage from already validated arguments.
    pub(crate) fn compute(latitude: f64, longitude: f64, radius_km: f64, precision: usize) -> Self {
        let (n_rows, n_cols) = grid_size(precision);
        let cell_lat = 180.0 / n_rows as f64;
        let cell_lon = 360.0 / n_cols as f64;

        let delta = radius_km / EARTH_RADIUS_KM;
        let delta_deg = delta.to_degrees();

        let lat_min = latitude - delta_deg - EDGE_PADDING_DEG;
        let lat_max = latitude + delta_deg + EDGE_PADDING_DEG;
        let reaches_pole = lat_min <= -90.0 || lat_max >= 90.0;
        let lat_range = (lat_min.max(-90.0), lat_max.min(90.0));

        let rows = (
            first_index(lat_range.0, -90.0, cell_lat, n_rows),
            last_index(lat_range.1, -90.0, cell_lat, n_rows),
        );

        let half_width = if reaches_pole {
            None
        } else {
            let cos_lat = latitude.to_radians().cos().max(MIN_COS_LATITUDE);
            let ratio = delta.sin() / cos_lat;
            (ratio < 1.0).then(|| ratio.asin().to_degrees() + EDGE_PADDING_DEG)
        };

        let full: SmallVec<[(u64, u64); 2]> = smallvec![(0, n_cols - 1)];
        let (cols, lon_range) = match half_width {
            Some(half) => {
                let west = longitude - half;
                let east = longitude + half;
                let cols = if west < -180.0 {
                    smallvec![
                        (first_index(west + 360.0, -180.0, cell_lon, n_cols), n_cols - 1),
                        (0, last_index(east, -180.0, cell_lon, n_cols)),
                    ]
                } else if east > 180.0 {
                    smallvec![
                        (first_index(west, -180.0, cell_lon, n_cols), n_cols - 1),
                        (0, last_index(east - 360.0, -180.0, cell_lon, n_cols)),
                    ]
                } else {
                    smallvec![(
                        first_index(west, -180.0, cell_lon, n_cols),
                        last_index(east, -180.0, cell_lon, n_cols),
                    )]
                };
                (merge_wrapped(cols, n_cols), (west, east))
            }
            None => (full, (-180.0, 180.0)),
        };

        let coverage = Self {
            precision,
            rows,
            cols,
            lat_range,
            lon_range,
            cell_size: (cell_lat, cell_lon),
        };
        debug_assert!(coverage.cell_count() > 0, "coverage produced no cells");
        coverage
    }

    /// Precision of the covering cells.
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Latitude extent of the search box, clamped to [-90, 90].
    pub fn lat_range(&self) -> (f64, f64) {
        self.lat_range
    }

    /// Longitude extent of the search box before wrapping; may reach past ±180°.
    pub fn lon_range(&self) -> (f64, f64) {
        self.lon_range
    }

    /// Whether the box spans every longitude (the cap reaches a pole or is huge).
    pub fn spans_all_longitudes(&self) -> bool {
        let (_, n_cols) = grid_size(self.precision);
        self.cols.as_slice() == [(0, n_cols - 1)]
    }

    /// Number of cells in the coverage.
    pub fn cell_count(&self) -> u64 {
        let rows = self.rows.1 - self.rows.0 + 1;
        let cols: u64 = self.cols.iter().map(|(lo, hi)| hi - lo + 1).sum();
        rows * cols
    }

    /// Whether a geohash of the same precision is one of the covering cells.
    pub fn contains(&self, hash: &str) -> bool {
        if hash.len() != self.precision {
            return false;
        }
        let Ok((row, col)) = cell_position(hash) else {
            return false;
        };
        (self.rows.0..=self.rows.1).contains(&row)
            && self.cols.iter().any(|(lo, hi)| (*lo..=*hi).contains(&col))
    }

    /// Enumerate the covering cells, south to north and west to east.
    ///
    /// Each cell is produced by encoding its center point.
    pub fn cells(&self) -> impl Iterator<Item = String> + '_ {
        let (cell_lat, cell_lon) = self.cell_size;
        (self.rows.0..=self.rows.1).flat_map(move |row| {
            let lat = -90.0 + (row as f64 + 0.5) * cell_lat;
            self.cols
                .iter()
                .flat_map(|(lo, hi)| *lo..=*hi)
                .map(move |col| {
                    let lon = -180.0 + (col as f64 + 0.5) * cell_lon;
                    encode_unchecked(lat, lon, self.precision)
                })
        })
    }
}

/// Geohash cells that may contain a point within `radius_km` of the center.
///
/// Equivalent to [`covering_cells_with_limit`] with [`DEFAULT_MAX_COVERING_CELLS`].
///
/// # Examples
///
/// ```
/// use geomarker::compute::codec::encode;
/// use geomarker::compute::coverage::covering_cells;
///
/// let cells = covering_cells(37.0, 33.0, 10.0, 5)?;
/// assert!(cells.contains(&encode(37.05, 33.05, 5)?));
/// # Ok::<(), geomarker::GeoMarkerError>(())
/// ```
pub fn covering_cells(
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
        DEFAULT_MAX_COVERING_CELLS,
    )
}

/// Geohash cells covering a search circle, failing with `CoverageTooLarge`
/// instead of allocating more than `limit` cells.
pub fn covering_cells_with_limit(
    latitude: f64,
    longitude: f64,
    radius_km: f64,
    precision: usize,
    limit: usize,
) -> Result<FxHashSet<String>> {
    let coverage = Coverage::new(latitude, longitude, radius_km, precision)?;
    let cells = coverage.cell_count();
    if cells > limit as u64 {
        return Err(GeoMarkerError::CoverageTooLarge { cells, limit });
    }
    Ok(coverage.cells().collect())
}

/// Index of the cell holding the lower edge of a range.
///
/// Points exactly on a cell boundary encode into the lower cell, so the cell
/// just below an exact boundary is included.
fn first_index(value: f64, origin: f64, cell: f64, count: u64) -> u64 {
    let idx = ((value - origin) / cell).ceil() - 1.0;
    idx.clamp(0.0, (count - 1) as f64) as u64
}

/// Index of the cell holding the upper edge of a range.
fn last_index(value: f64, origin: f64, cell: f64, count: u64) -> u64 {
    let idx = ((value - origin) / cell).floor();
    idx.clamp(0.0, (count - 1) as f64) as u64
}

/// Collapse two wrapped column ranges that overlap into the full circle.
fn merge_wrapped(cols: SmallVec<[(u64, u64); 2]>, n_cols: u64) -> SmallVec<[(u64, u64); 2]> {
    let overlapping = matches!(
        cols.as_slice(),
        [(west_lo, _), (_, east_hi)] if east_hi + 1 >= *west_lo
    );
    if overlapping {
        smallvec![(0, n_cols - 1)]
    } else {
        cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::codec::encode;
    use crate::compute::distance::{destination, distance_km};

    /// Points on and just inside the circle at every 5° of bearing.
    fn ring(lat: f64, lon: f64, radius_km: f64) -> Vec<(f64, f64)> {
        let mut points = Vec::new();
        for step in 0..72 {
            let bearing = step as f64 * 5.0;
            for fraction in [1.0, 0.999, 0.5] {
                let p = destination(lat, lon, bearing, radius_km * fraction);
                points.push((p.latitude(), p.longitude()));
            }
        }
        points
    }

    fn assert_no_false_negatives(lat: f64, lon: f64, radius_km: f64, precision: usize) {
        let coverage = Coverage::new(lat, lon, radius_km, precision).unwrap();
        for (p_lat, p_lon) in ring(lat, lon, radius_km) {
            if distance_km(lat, lon, p_lat, p_lon) > radius_km {
                continue;
            }
            let hash = encode(p_lat, p_lon, precision).unwrap();
            assert!(
                coverage.contains(&hash),
                "({}, {}) r={} p={}: point ({}, {}) in {} is not covered",
                lat,
                lon,
                radius_km,
                precision,
                p_lat,
                p_lon,
                hash
            );
        }
    }

    #[test]
    fn test_contains_center_cell() {
        for precision in 1..=12 {
            let coverage = Coverage::new(37.0, 33.0, 1.0, precision).unwrap();
            assert!(coverage.contains(&encode(37.0, 33.0, precision).unwrap()));
        }
    }

    #[test]
    fn test_zero_radius_single_cell() {
        let coverage = Coverage::new(37.0, 33.0, 0.0, 7).unwrap();
        assert_eq!(coverage.cell_count(), 1);
        let cells: Vec<String> = coverage.cells().collect();
        assert_eq!(cells, vec!["swx6qzt".to_string()]);
    }

    #[test]
    fn test_no_false_negatives_mid_latitude() {
        for precision in [3, 5, 6, 7] {
            assert_no_false_negatives(37.0, 33.0, 10.0, precision);
            assert_no_false_negatives(-33.8688, 151.2093, 25.0, precision);
        }
    }

    #[test]
    fn test_no_false_negatives_high_latitude() {
        // Longitude spans stretch well beyond δ here
        assert_no_false_negatives(70.0, 25.0, 800.0, 3);
        assert_no_false_negatives(-65.0, -60.0, 300.0, 4);
        assert_no_false_negatives(78.2, 15.6, 50.0, 5);
    }

    #[test]
    fn test_no_false_negatives_across_antimeridian() {
        assert_no_false_negatives(0.0, 179.9995, 1.0, 7);
        assert_no_false_negatives(-16.5, -179.8, 40.0, 5);
        assert_no_false_negatives(52.0, 180.0, 15.0, 6);
    }

    #[test]
    fn test_longitude_wraps() {
        let coverage = Coverage::new(0.0, 179.9995, 1.0, 7).unwrap();
        assert!(coverage.contains(&encode(0.0, -179.9995, 7).unwrap()));
        assert!(coverage.contains(&encode(0.0, 179.9999, 7).unwrap()));
        assert!(coverage.lon_range().1 > 180.0);
        assert!(!coverage.spans_all_longitudes());
    }

    #[test]
    fn test_pole_spans_all_longitudes() {
        let coverage = Coverage::new(89.99, 0.0, 5.0, 3).unwrap();
        assert!(coverage.spans_all_longitudes());
        assert_eq!(coverage.lat_range().1, 90.0);
        // one row of 2^8 columns
        assert_eq!(coverage.cell_count(), 256);
        assert!(coverage.contains(&encode(89.995, 179.0, 3).unwrap()));
        assert!(coverage.contains(&encode(89.995, -179.0, 3).unwrap()));
    }

    #[test]
    fn test_huge_radius_covers_world() {
        let coverage = Coverage::new(10.0, 10.0, 30_000.0, 2).unwrap();
        assert!(coverage.spans_all_longitudes());
        assert_eq!(coverage.cell_count(), 32 * 32);
    }

    #[test]
    fn test_cells_are_unique_and_counted() {
        let coverage = Coverage::new(0.0, 179.99, 30.0, 5).unwrap();
        let cells: Vec<String> = coverage.cells().collect();
        let unique: FxHashSet<&String> = cells.iter().collect();
        assert_eq!(cells.len() as u64, coverage.cell_count());
        assert_eq!(unique.len(), cells.len());
        assert!(cells.iter().all(|c| coverage.contains(c)));
    }

    #[test]
    fn test_contains_rejects_other_precisions() {
        let coverage = Coverage::new(37.0, 33.0, 10.0, 5).unwrap();
        assert!(!coverage.contains(&encode(37.0, 33.0, 6).unwrap()));
        assert!(!coverage.contains("not a hash"));
    }

    #[test]
    fn test_covering_cells_limit() {
        let result = covering_cells_with_limit(37.0, 33.0, 10.0, 7, 100);
        assert!(matches!(
            result,
            Err(GeoMarkerError::CoverageTooLarge { limit: 100, .. })
        ));
        let cells = covering_cells(37.0, 33.0, 10.0, 5).unwrap();
        assert!(cells.contains(&encode(37.0, 33.0, 5).unwrap()));
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(
            Coverage::new(100.0, 0.0, 1.0, 5),
            Err(GeoMarkerError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            Coverage::new(0.0, 0.0, -1.0, 5),
            Err(GeoMarkerError::InvalidRadius(_))
        ));
        assert!(matches!(
            Coverage::new(0.0, 0.0, 1.0, 0),
            Err(GeoMarkerError::InvalidPrecision(0))
        ));
    }

    #[test]
    fn test_superset_of_naive_neighbors() {
        // The eight neighbors of the center cell are covered once the radius
        // exceeds a cell diagonal
        use crate::compute::codec::neighbors;
        let center = encode(37.0, 33.0, 6).unwrap();
        let coverage = Coverage::new(37.0, 33.0, 3.0, 6).unwrap();
        for cell in neighbors(&center).unwrap().iter() {
            assert!(coverage.contains(cell), "{} missing", cell);
        }
    }
}
