use crate::point::Coordinate;
use geo::Rect;
use serde::{Deserialize, Serialize};

/// The latitude/longitude rectangle covered by one geohash cell.
///
/// This is a wrapper around `geo::Rect` (x = longitude, y = latitude) that
/// speaks in latitude/longitude ranges. Bounds are closed on both ends, so a
/// point lying exactly on a shared edge is contained by both neighbouring cells.
///
/// # Examples
///
/// ```
/// use geomarker_types::bbox::CellBounds;
/// use geomarker_types::point::Coordinate;
///
/// let bounds = CellBounds::new((-90.0, 0.0), (-180.0, 0.0));
/// assert!(bounds.contains(&Coordinate::new(-45.0, -90.0)));
/// assert_eq!(bounds.center(), Coordinate::new(-45.0, -90.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellBounds {
    /// The underlying geometric rectangle
    pub rect: Rect<f64>,
}

impl CellBounds {
    /// Create bounds from a `(min, max)` latitude range and a `(min, max)`
    /// longitude range.
    pub fn new(lat_range: (f64, f64), lon_range: (f64, f64)) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: lon_range.0, y: lat_range.0 },
                geo::coord! { x: lon_range.1, y: lat_range.1 },
            ),
        }
    }

    /// Create bounds from a `geo::Rect`.
    pub fn from_rect(rect: Rect<f64>) -> Self {
        Self { rect }
    }

    pub fn min_lat(&self) -> f64 {
        self.rect.min().y
    }

    pub fn max_lat(&self) -> f64 {
        self.rect.max().y
    }

    pub fn min_lon(&self) -> f64 {
        self.rect.min().x
    }

    pub fn max_lon(&self) -> f64 {
        self.rect.max().x
    }

    /// `(min, max)` latitude.
    pub fn lat_range(&self) -> (f64, f64) {
        (self.min_lat(), self.max_lat())
    }

    /// `(min, max)` longitude.
    pub fn lon_range(&self) -> (f64, f64) {
        (self.min_lon(), self.max_lon())
    }

    /// Height of the cell in degrees of latitude.
    pub fn lat_span(&self) -> f64 {
        self.max_lat() - self.min_lat()
    }

    /// Width of the cell in degrees of longitude.
    pub fn lon_span(&self) -> f64 {
        self.max_lon() - self.min_lon()
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat() + self.max_lat()) / 2.0,
            (self.min_lon() + self.max_lon()) / 2.0,
        )
    }

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        let (lat, lon) = (coordinate.latitude(), coordinate.longitude());
        lat >= self.min_lat()
            && lat <= self.max_lat()
            && lon >= self.min_lon()
            && lon <= self.max_lon()
    }

    pub fn intersects(&self, other: &CellBounds) -> bool {
        self.max_lon() >= other.min_lon()
            && self.min_lon() <= other.max_lon()
            && self.max_lat() >= other.min_lat()
            && self.min_lat() <= other.max_lat()
    }

    pub fn to_rect(&self) -> Rect<f64> {
        self.rect
    }
}
