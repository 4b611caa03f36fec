use crate::point::Coordinate;
use serde::{Deserialize, Serialize};

/// A labelled point on the map.
///
/// Markers are immutable once created. The index owns them after insertion
/// and hands out shared references in query results.
///
/// # Examples
///
/// ```
/// use geomarker_types::marker::Marker;
///
/// let marker = Marker::new(22.618423, 33.751244, "Marker #1");
/// assert_eq!(marker.longitude(), 33.751244);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    coordinate: Coordinate,
    label: String,
}

impl Marker {
    /// Create a marker from latitude, longitude and a label.
    pub fn new(latitude: f64, longitude: f64, label: impl Into<String>) -> Self {
        Self::at(Coordinate::new(latitude, longitude), label)
    }

    /// Create a marker at an existing coordinate.
    pub fn at(coordinate: Coordinate, label: impl Into<String>) -> Self {
        Self {
            coordinate,
            label: label.into(),
        }
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn latitude(&self) -> f64 {
        self.coordinate.latitude()
    }

    pub fn longitude(&self) -> f64 {
        self.coordinate.longitude()
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_accessors() {
        let m = Marker::new(55.75, 37.61, "Moscow");
        assert_eq!(m.latitude(), 55.75);
        assert_eq!(m.longitude(), 37.61);
        assert_eq!(m.label(), "Moscow");
        assert_eq!(m.coordinate(), &Coordinate::new(55.75, 37.61));
    }

    #[test]
    fn test_marker_serde() {
        let m = Marker::new(1.5, -2.5, "pin");
        let json = serde_json::to_string(&m).unwrap();
        let back: Marker = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
