//! Core coordinate types for the display projection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum latitude representable in Web Mercator.
pub const MAX_LAT: f64 = 85.05112878;

/// Minimum latitude representable in Web Mercator.
pub const MIN_LAT: f64 = -85.05112878;

/// Maximum longitude.
pub const MAX_LON: f64 = 180.0;

/// Minimum longitude.
pub const MIN_LON: f64 = -180.0;

/// Earth radius used by spherical Web Mercator (EPSG:3857), in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// A geographic coordinate in degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude in degrees, positive east.
    pub lon: f64,
    /// Latitude in degrees, positive north.
    pub lat: f64,
}

impl GeoPoint {
    /// Creates a new geographic point.
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

/// A point in the map engine's display projection (Web Mercator meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    /// Easting in meters.
    pub x: f64,
    /// Northing in meters.
    pub y: f64,
}

impl ProjectedPoint {
    /// Returns true if both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Errors raised when a geographic coordinate cannot be displayed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordError {
    /// Longitude or latitude is NaN or infinite.
    #[error("Non-finite coordinate: lon={lon}, lat={lat}")]
    NonFinite { lon: f64, lat: f64 },

    /// Latitude is outside the Web Mercator range.
    #[error("Invalid latitude: {0} (must be within ±85.05112878)")]
    InvalidLatitude(f64),

    /// Longitude is outside [-180, 180].
    #[error("Invalid longitude: {0} (must be within ±180)")]
    InvalidLongitude(f64),
}
