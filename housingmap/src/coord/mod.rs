//! Coordinate projection module
//!
//! Provides conversions between geographic coordinates (longitude/latitude)
//! and the spherical Web Mercator display projection the map engine draws in.
//!
//! [`project`] is total: it never fails and never panics, so non-finite input
//! simply yields a non-finite point. Callers that need a guarantee run
//! [`validate`] first.

mod types;

pub use types::{
    CoordError, GeoPoint, ProjectedPoint, EARTH_RADIUS_M, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON,
};

use std::f64::consts::PI;

/// Projects a geographic coordinate into Web Mercator meters.
///
/// # Arguments
///
/// * `lon` - Longitude in degrees
/// * `lat` - Latitude in degrees
///
/// # Returns
///
/// The projected point. Out-of-range latitudes produce very large or
/// non-finite northings rather than an error.
#[inline]
pub fn project(lon: f64, lat: f64) -> ProjectedPoint {
    let x = EARTH_RADIUS_M * lon.to_radians();
    let y = EARTH_RADIUS_M * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
    ProjectedPoint { x, y }
}

/// Converts a Web Mercator point back to geographic coordinates.
#[inline]
pub fn unproject(point: &ProjectedPoint) -> GeoPoint {
    let lon = (point.x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (point.y / EARTH_RADIUS_M).exp().atan() - PI / 2.0).to_degrees();
    GeoPoint { lon, lat }
}

/// Checks that a coordinate can be displayed.
///
/// # Returns
///
/// The coordinate as a [`GeoPoint`], or the first rule it breaks.
pub fn validate(lon: f64, lat: f64) -> Result<GeoPoint, CoordError> {
    if !lon.is_finite() || !lat.is_finite() {
        return Err(CoordError::NonFinite { lon, lat });
    }
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    Ok(GeoPoint { lon, lat })
}
