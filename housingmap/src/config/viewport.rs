//! Map viewport configuration.

use crate::coord::{self, GeoPoint};

use super::ConfigError;

/// Default zoom level.
pub const DEFAULT_ZOOM: f64 = 10.0;

/// Default center: central London.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(0.1278, 51.5074);

/// Default basemap style.
pub const DEFAULT_BASEMAP: &str = "streets-navigation-vector";

/// Basemap styles the engine knows how to draw.
pub const BASEMAP_CATALOG: &[&str] = &[
    "streets",
    "satellite",
    "hybrid",
    "terrain",
    "topo",
    "gray",
    "dark-gray",
    "oceans",
    "national-geographic",
    "osm",
    "streets-vector",
    "streets-navigation-vector",
    "streets-night-vector",
    "streets-relief-vector",
    "topo-vector",
    "gray-vector",
    "dark-gray-vector",
];

/// Returns true if `basemap` is in [`BASEMAP_CATALOG`].
pub fn is_known_basemap(basemap: &str) -> bool {
    BASEMAP_CATALOG.contains(&basemap)
}

/// The map's visible window.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewport {
    pub zoom: f64,
    pub center: GeoPoint,
    pub basemap: String,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            center: DEFAULT_CENTER,
            basemap: DEFAULT_BASEMAP.to_string(),
        }
    }
}

impl MapViewport {
    /// Set the zoom level.
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the center.
    pub fn with_center(mut self, lon: f64, lat: f64) -> Self {
        self.center = GeoPoint::new(lon, lat);
        self
    }

    /// Set the basemap style.
    pub fn with_basemap(mut self, basemap: impl Into<String>) -> Self {
        self.basemap = basemap.into();
        self
    }

    /// Checks zoom, center and basemap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "map.zoom".to_string(),
                value: self.zoom.to_string(),
                reason: "must be a positive number".to_string(),
            });
        }
        coord::validate(self.center.lon, self.center.lat).map_err(|e| {
            ConfigError::InvalidValue {
                key: "map.center".to_string(),
                value: self.center.to_string(),
                reason: e.to_string(),
            }
        })?;
        if !is_known_basemap(&self.basemap) {
            return Err(ConfigError::InvalidValue {
                key: "map.basemap".to_string(),
                value: self.basemap.clone(),
                reason: "not a known basemap".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let viewport = MapViewport::default();
        assert_eq!(viewport.zoom, 10.0);
        assert_eq!(viewport.center, GeoPoint::new(0.1278, 51.5074));
        assert_eq!(viewport.basemap, "streets-navigation-vector");
        assert!(viewport.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let viewport = MapViewport::default()
            .with_zoom(14.0)
            .with_center(-2.24, 53.48)
            .with_basemap("topo-vector");
        assert_eq!(viewport.zoom, 14.0);
        assert_eq!(viewport.center.lat, 53.48);
        assert!(viewport.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_zoom() {
        assert!(MapViewport::default().with_zoom(0.0).validate().is_err());
        assert!(MapViewport::default().with_zoom(-3.0).validate().is_err());
        assert!(MapViewport::default().with_zoom(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_rejects_bad_center() {
        let err = MapViewport::default()
            .with_center(0.0, 95.0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("map.center"));
    }

    #[test]
    fn test_rejects_unknown_basemap() {
        let err = MapViewport::default()
            .with_basemap("watercolor")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("watercolor"));
    }
}
