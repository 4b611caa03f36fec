//! Validation for coordinates, precisions, radii and geohash strings.
//!
//! Out-of-range input is rejected, never clamped: a clamped coordinate would
//! silently change which markers a query returns.

use crate::compute::codec::{BASE32, MAX_PRECISION};
use crate::error::{GeoMarkerError, Result};
use geomarker_types::point::Coordinate;

/// Validates latitude in [-90.0, 90.0] and longitude in [-180.0, 180.0].
///
/// # Examples
///
/// ```
/// use geomarker::compute::validation::validate_coordinate;
///
/// assert!(validate_coordinate(55.7558, 37.6173).is_ok());
/// assert!(validate_coordinate(95.0, 37.6173).is_err());
/// assert!(validate_coordinate(55.7558, 200.0).is_err());
/// ```
pub fn validate_coordinate(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() {
        return Err(GeoMarkerError::InvalidCoordinate(format!(
            "Latitude must be finite, got: {}",
            latitude
        )));
    }

    if !longitude.is_finite() {
        return Err(GeoMarkerError::InvalidCoordinate(format!(
            "Longitude must be finite, got: {}",
            longitude
        )));
    }

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(GeoMarkerError::InvalidCoordinate(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            latitude
        )));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(GeoMarkerError::InvalidCoordinate(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            longitude
        )));
    }

    Ok(())
}

/// Validates a [`Coordinate`].
pub fn validate_point(coordinate: &Coordinate) -> Result<()> {
    validate_coordinate(coordinate.latitude(), coordinate.longitude())
}

/// Validates a geohash precision (1..=12).
pub fn validate_precision(precision: usize) -> Result<()> {
    if precision == 0 || precision > MAX_PRECISION {
        return Err(GeoMarkerError::InvalidPrecision(precision));
    }
    Ok(())
}

/// Validates a search radius in kilometers: finite and not negative.
///
/// A radius of zero is valid and matches only markers at the exact center.
pub fn validate_radius(radius_km: f64) -> Result<()> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(GeoMarkerError::InvalidRadius(radius_km));
    }
    Ok(())
}

/// Validates a geohash string: length within 1..=12 and every character in
/// the base-32 alphabet. Upper-case letters are accepted.
pub fn validate_geohash(hash: &str) -> Result<()> {
    let len = hash.chars().count();
    if len == 0 || len > MAX_PRECISION {
        return Err(GeoMarkerError::InvalidGeohash(format!(
            "length must be between 1 and {}, got {}: {:?}",
            MAX_PRECISION, len, hash
        )));
    }

    if let Some((idx, c)) = hash
        .char_indices()
        .find(|(_, c)| !c.is_ascii() || !BASE32.contains(&(c.to_ascii_lowercase() as u8)))
    {
        return Err(GeoMarkerError::InvalidGeohash(format!(
            "character {:?} at index {} is not in the geohash alphabet: {:?}",
            c, idx, hash
        )));
    }

    Ok(())
}

/// Validates the full argument list of a radius query.
pub(crate) fn validate_query(
    latitude: f64,
    longitude: f64,
    radius_km: f64,
    precision: usize,
) -> Result<()> {
    validate_coordinate(latitude, longitude)?;
    validate_radius(radius_km)?;
    validate_precision(precision)
}
