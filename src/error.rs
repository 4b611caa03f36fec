//! Error types for index operations.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GeoMarkerError>;

/// Errors reported at the index API boundary.
///
/// Every variant describes bad caller input; none of them is transient, so
/// there is nothing to retry.
#[derive(Debug, Error)]
pub enum GeoMarkerError {
    /// Latitude outside [-90, 90], longitude outside [-180, 180], or a non-finite value
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Geohash precision outside 1..=12
    #[error("Invalid geohash precision {0}: must be between 1 and {max}", max = crate::compute::codec::MAX_PRECISION)]
    InvalidPrecision(usize),

    /// Negative or non-finite search radius
    #[error("Invalid radius {0} km: must be a finite, non-negative number")]
    InvalidRadius(f64),

    /// A string that is not a geohash (bad length or character)
    #[error("Invalid geohash: {0}")]
    InvalidGeohash(String),

    /// An insert or query used a different precision than the index is bound to
    #[error("Precision mismatch: index is bound to precision {expected}, got {found}")]
    PrecisionMismatch { expected: usize, found: usize },

    /// Materialising the covering set would exceed the configured cell limit
    #[error("Covering set of {cells} cells exceeds the limit of {limit}")]
    CoverageTooLarge { cells: u64, limit: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GeoMarkerError {
    /// Whether this error was caused by an invalid query or insert argument.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            GeoMarkerError::InvalidCoordinate(_)
                | GeoMarkerError::InvalidPrecision(_)
                | GeoMarkerError::InvalidRadius(_)
                | GeoMarkerError::InvalidGeohash(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = GeoMarkerError::InvalidPrecision(13);
        assert_eq!(
            err.to_string(),
            "Invalid geohash precision 13: must be between 1 and 12"
        );

        let err = GeoMarkerError::PrecisionMismatch {
            expected: 7,
            found: 5,
        };
        assert!(err.to_string().contains("bound to precision 7"));
    }

    #[test]
    fn test_invalid_input_classification() {
        assert!(GeoMarkerError::InvalidRadius(-1.0).is_invalid_input());
        assert!(GeoMarkerError::InvalidCoordinate("lat".into()).is_invalid_input());
        assert!(
            !GeoMarkerError::PrecisionMismatch {
                expected: 7,
                found: 5
            }
            .is_invalid_input()
        );
    }
}
