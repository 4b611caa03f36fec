//! Great-circle distance.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their latitudes and longitudes.

use geomarker_types::point::Coordinate;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers spanned by one degree of arc on the sphere of radius [`EARTH_RADIUS_KM`].
pub const KM_PER_DEGREE: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// Haversine distance in kilometers between two coordinates given in degrees.
///
/// Symmetric, zero for identical points, and monotonic in angular separation.
/// Longitudes 360° apart and any two longitudes at the same pole name the
/// same point and are 0 km apart. Inputs are not validated.
///
/// # Examples
///
/// ```
/// use geomarker::compute::distance::distance_km;
///
/// // Berlin -> Paris
/// let d = distance_km(52.5200, 13.4050, 48.8566, 2.3522);
/// assert!((d - 878.0).abs() < 10.0);
/// ```
#[inline]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = wrap_longitude_delta(lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + cos_latitude(lat1) * cos_latitude(lat2) * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Longitude difference folded into [-180, 180].
#[inline]
fn wrap_longitude_delta(d_lon: f64) -> f64 {
    if d_lon > 180.0 {
        d_lon - 360.0
    } else if d_lon < -180.0 {
        d_lon + 360.0
    } else {
        d_lon
    }
}

/// `cos(latitude)`, exactly zero at the poles.
#[inline]
fn cos_latitude(latitude: f64) -> f64 {
    if latitude.abs() == 90.0 {
        0.0
    } else {
        latitude.to_radians().cos()
    }
}

/// Haversine distance in kilometers between two [`Coordinate`]s.
#[inline]
pub fn distance_between(from: &Coordinate, to: &Coordinate) -> f64 {
    distance_km(
        from.latitude(),
        from.longitude(),
        to.latitude(),
        to.longitude(),
    )
}

/// The point reached by travelling `distance_km` from a start point along an
/// initial bearing (degrees clockwise from north), on the same sphere.
///
/// The returned longitude is normalised to [-180, 180).
///
/// # Examples
///
/// ```
/// use geomarker::compute::distance::{destination, distance_km};
///
/// let p = destination(37.0, 33.0, 90.0, 5.0);
/// assert!((distance_km(37.0, 33.0, p.latitude(), p.longitude()) - 5.0).abs() < 1e-9);
/// ```
pub fn destination(
    latitude: f64,
    longitude: f64,
    bearing_deg: f64,
    distance_km: f64,
) -> Coordinate {
    let delta = distance_km / EARTH_RADIUS_KM;
    let theta = bearing_deg.to_radians();
    let phi1 = latitude.to_radians();
    let lambda1 = longitude.to_radians();

    let sin_phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos())
        .clamp(-1.0, 1.0);
    let phi2 = sin_phi2.asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * sin_phi2);

    let lon = (lambda2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    Coordinate::new(phi2.to_degrees(), lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Distance, Haversine, Point};

    #[test]
    fn test_identical_points() {
        assert_eq!(distance_km(37.0, 33.0, 37.0, 33.0), 0.0);
        assert_eq!(distance_km(90.0, 0.0, 90.0, 120.0), 0.0);
    }

    #[test]
    fn test_same_point_different_longitude() {
        assert_eq!(distance_km(0.0, 180.0, 0.0, -180.0), 0.0);
        assert_eq!(distance_km(-90.0, -45.0, -90.0, 170.0), 0.0);
        assert_eq!(distance_km(12.5, -180.0, 12.5, 180.0), 0.0);
    }

    #[test]
    fn test_longitude_delta_wraps() {
        // 359.8° of raw difference is 0.2° the short way round
        let wrapped = distance_km(10.0, -179.9, 10.0, 179.9);
        let direct = distance_km(10.0, 0.1, 10.0, -0.1);
        assert!((wrapped - direct).abs() < 1e-9);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ((40.7128, -74.0060), (51.5074, -0.1278)),
            ((-33.8688, 151.2093), (35.6895, 139.6917)),
            ((0.0, 179.9), (0.0, -179.9)),
        ];
        for ((a_lat, a_lon), (b_lat, b_lon)) in pairs {
            assert_eq!(
                distance_km(a_lat, a_lon, b_lat, b_lon),
                distance_km(b_lat, b_lon, a_lat, a_lon)
            );
        }
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = distance_km(0.0, 0.0, 1.0, 0.0);
        assert!((d - KM_PER_DEGREE).abs() < 1e-9);
    }

    #[test]
    fn test_across_antimeridian() {
        // 0.001° of longitude at the equator, straddling ±180°
        let d = distance_km(0.0, 179.9995, 0.0, -179.9995);
        assert!((d - 0.001 * KM_PER_DEGREE).abs() < 1e-6);
    }

    #[test]
    fn test_antipodal() {
        let d = distance_km(0.0, 0.0, 0.0, 180.0);
        assert!((d - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_monotonic_in_separation() {
        let mut last = 0.0;
        for step in 1..=180 {
            let d = distance_km(10.0, 20.0, 10.0 + step as f64 * 0.5, 20.0);
            assert!(d >= last);
            last = d;
        }
    }

    #[test]
    fn test_destination_round_trip() {
        for bearing in [0.0, 45.0, 90.0, 180.0, 270.0, 333.0] {
            let p = destination(-20.0, 179.99, bearing, 12.5);
            let d = distance_km(-20.0, 179.99, p.latitude(), p.longitude());
            assert!((d - 12.5).abs() < 1e-9, "bearing {} gave {}", bearing, d);
            assert!((-180.0..180.0).contains(&p.longitude()));
        }
    }

    #[test]
    fn test_destination_due_north() {
        let p = destination(37.0, 33.0, 0.0, KM_PER_DEGREE);
        assert!((p.latitude() - 38.0).abs() < 1e-9);
        assert!((p.longitude() - 33.0).abs() < 1e-9);
    }

    #[test]
    fn test_matches_geo_haversine() {
        let nyc = Coordinate::new(40.7128, -74.0060);
        let london = Coordinate::new(51.5074, -0.1278);

        let ours = distance_between(&nyc, &london);
        let geo_meters = Haversine.distance(
            Point::new(nyc.longitude(), nyc.latitude()),
            Point::new(london.longitude(), london.latitude()),
        );

        // geo uses the 6371.0088 km mean radius
        let relative = (ours - geo_meters / 1000.0).abs() / ours;
        assert!(relative < 1e-5, "ours {} vs geo {}", ours, geo_meters);
    }
}
