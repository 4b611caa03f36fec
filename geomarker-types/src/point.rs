use geo::Point;
use serde::{Deserialize, Serialize};

/// A geographic coordinate in degrees.
///
/// Stored as a `geo::Point` with x = longitude and y = latitude, but constructed
/// and read in the conventional (latitude, longitude) order.
///
/// No range checking happens here; the index validates coordinates at its
/// API boundary.
///
/// # Examples
///
/// ```
/// use geomarker_types::point::Coordinate;
///
/// let moscow = Coordinate::new(55.7558, 37.6173);
/// assert_eq!(moscow.latitude(), 55.7558);
/// assert_eq!(moscow.longitude(), 37.6173);
///
/// let point = moscow.to_point();
/// assert_eq!(point.x(), 37.6173);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// The underlying point (x = longitude, y = latitude)
    pub point: Point<f64>,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude in degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            point: Point::new(longitude, latitude),
        }
    }

    /// Create a coordinate from a `geo::Point` (x = longitude, y = latitude).
    pub fn from_point(point: Point<f64>) -> Self {
        Self { point }
    }

    /// Latitude in degrees.
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.point.y()
    }

    /// Longitude in degrees.
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.point.x()
    }

    /// The coordinate as a `geo::Point`.
    pub fn to_point(&self) -> Point<f64> {
        self.point
    }

    /// Latitude and longitude converted to radians.
    pub fn to_radians(&self) -> (f64, f64) {
        (self.latitude().to_radians(), self.longitude().to_radians())
    }

    /// Whether both components are finite and inside [-90, 90] x [-180, 180].
    pub fn is_in_range(&self) -> bool {
        let (lat, lon) = (self.latitude(), self.longitude());
        lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon)
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        coordinate.point
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(point: Point<f64>) -> Self {
        Self::from_point(point)
    }
}

impl From<(f64, f64)> for Coordinate {
    /// Interprets the tuple as `(latitude, longitude)`.
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}
