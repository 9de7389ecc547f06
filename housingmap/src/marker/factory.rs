//! Builds one marker per record.

use crate::coord::{self, CoordError};
use crate::records::{EnergyRecord, HousingRecord, RecordKind, RecordRef};

use super::{Marker, MarkerError, Popup, Symbol};

/// Default prefix for housing popup hyperlinks.
pub const DEFAULT_LINK_BASE: &str = "/product";

/// A borrowed record from either dataset.
#[derive(Debug, Clone, Copy)]
pub enum SourceRecord<'a> {
    Housing(&'a HousingRecord),
    Energy(&'a EnergyRecord),
}

impl SourceRecord<'_> {
    pub fn kind(&self) -> RecordKind {
        match self {
            SourceRecord::Housing(_) => RecordKind::Housing,
            SourceRecord::Energy(_) => RecordKind::Energy,
        }
    }

    fn position(&self) -> (Option<f64>, Option<f64>) {
        match self {
            SourceRecord::Housing(r) => (r.lon, r.lat),
            SourceRecord::Energy(r) => (r.lon, r.lat),
        }
    }
}

/// Turns records into markers.
///
/// Every marker's geometry is projected exactly once, before its symbol and
/// popup are assigned.
#[derive(Debug, Clone)]
pub struct MarkerFactory {
    link_base: String,
}

impl Default for MarkerFactory {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_BASE)
    }
}

impl MarkerFactory {
    /// Creates a factory whose housing popups link to `{link_base}/{id}`.
    pub fn new(link_base: impl Into<String>) -> Self {
        let mut link_base = link_base.into();
        while link_base.ends_with('/') {
            link_base.pop();
        }
        Self { link_base }
    }

    pub fn link_base(&self) -> &str {
        &self.link_base
    }

    /// Builds the marker for `record`, which sits at `index` in its dataset.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::MissingCoordinate`] when the record has no
    /// position, or [`MarkerError::Projection`] when the position cannot be
    /// displayed.
    pub fn build(&self, record: SourceRecord<'_>, index: usize) -> Result<Marker, MarkerError> {
        let source = RecordRef {
            kind: record.kind(),
            index,
        };

        let (lon, lat) = match record.position() {
            (Some(lon), Some(lat)) => (lon, lat),
            _ => return Err(MarkerError::MissingCoordinate { record: source }),
        };
        let point = coord::validate(lon, lat)
            .map_err(|e| MarkerError::Projection { record: source, source: e })?;
        let geometry = coord::project(point.lon, point.lat);
        if !geometry.is_finite() {
            return Err(MarkerError::Projection {
                record: source,
                source: CoordError::NonFinite { lon, lat },
            });
        }

        let (symbol, popup) = match record {
            SourceRecord::Housing(r) => {
                let link = format!("{}/{}", self.link_base, r.id);
                (Symbol::housing(), Popup::housing(&r.name, &r.address, &link))
            }
            SourceRecord::Energy(r) => (
                Symbol::energy(r.color, r.radius, r.rating.clone()),
                Popup::energy(&r.rating),
            ),
        };

        Ok(Marker {
            geometry,
            symbol,
            popup: Some(popup),
            source,
        })
    }

    pub fn build_housing(&self, record: &HousingRecord, index: usize) -> Result<Marker, MarkerError> {
        self.build(SourceRecord::Housing(record), index)
    }

    pub fn build_energy(&self, record: &EnergyRecord, index: usize) -> Result<Marker, MarkerError> {
        self.build(SourceRecord::Energy(record), index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{PopupContent, SymbolStyle, HOUSING_COLOR};
    use crate::records::Rgb;

    #[test]
    fn test_housing_marker_symbol() {
        let factory = MarkerFactory::default();
        let record = HousingRecord::new(1, "Test House", "1 Test St", 0.1278, 51.5074);
        let marker = factory.build_housing(&record, 0).unwrap();

        assert_eq!(marker.symbol.style, SymbolStyle::Square);
        assert_eq!(marker.symbol.color, HOUSING_COLOR);
        assert_eq!(marker.symbol.color, Rgb(251, 52, 153));
        assert_eq!(marker.symbol.size, 15.0);
        assert_eq!(marker.symbol.outline.color, Rgb::BLACK);
        assert_eq!(marker.symbol.outline.width, 1.0);
        assert_eq!(marker.source, RecordRef::housing(0));
    }

    #[test]
    fn test_housing_marker_popup() {
        let factory = MarkerFactory::default();
        let record = HousingRecord::new(1, "Test House", "1 Test St", 0.1278, 51.5074);
        let marker = factory.build_housing(&record, 0).unwrap();

        let popup = marker.popup.unwrap();
        assert!(popup.title.contains("Test House"));
        let body = popup.content.as_str();
        assert!(body.contains("<table"));
        assert!(body.contains("Test House"));
        assert!(body.contains("1 Test St"));
        assert!(body.contains(r#"href="/product/1""#));
    }

    #[test]
    fn test_link_base_trailing_slash_trimmed() {
        let factory = MarkerFactory::new("/listing/");
        assert_eq!(factory.link_base(), "/listing");

        let record = HousingRecord::new(9, "Flat", "9 Road", 0.0, 0.0);
        let marker = factory.build_housing(&record, 0).unwrap();
        assert!(marker.popup.unwrap().content.as_str().contains(r#"href="/listing/9""#));
    }

    #[test]
    fn test_energy_marker_symbol_and_popup() {
        let factory = MarkerFactory::default();
        let record = EnergyRecord::new(-0.1, 51.4, Rgb(0, 136, 60), 9.0, "A");
        let marker = factory.build_energy(&record, 4).unwrap();

        assert_eq!(marker.symbol.style, SymbolStyle::Circle);
        assert_eq!(marker.symbol.color, Rgb(0, 136, 60));
        assert_eq!(marker.symbol.outline.color, Rgb(0, 136, 60));
        assert_eq!(marker.symbol.outline.width, 1.0);
        assert_eq!(marker.symbol.size, 9.0);
        assert_eq!(marker.symbol.label.as_deref(), Some("A"));
        assert_eq!(marker.source, RecordRef::energy(4));

        let popup = marker.popup.unwrap();
        assert_eq!(popup.content, PopupContent::Text("A".to_string()));
    }

    #[test]
    fn test_geometry_is_projected() {
        let factory = MarkerFactory::default();
        let record = HousingRecord::new(1, "Test House", "1 Test St", 0.1278, 51.5074);
        let marker = factory.build_housing(&record, 0).unwrap();

        assert_eq!(marker.geometry, coord::project(0.1278, 51.5074));
        let back = coord::unproject(&marker.geometry);
        assert!((back.lat - 51.5074).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_latitude_rejected() {
        let factory = MarkerFactory::default();
        let record = HousingRecord::new(1, "North", "Pole", 0.0, 95.0);
        let err = factory.build_housing(&record, 2).unwrap_err();

        assert!(matches!(
            err,
            MarkerError::Projection {
                source: CoordError::InvalidLatitude(_),
                ..
            }
        ));
        assert_eq!(err.record(), RecordRef::housing(2));
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        let factory = MarkerFactory::default();
        let record = EnergyRecord::new(f64::INFINITY, 51.0, Rgb(1, 2, 3), 5.0, "D");
        let err = factory.build_energy(&record, 0).unwrap_err();
        assert!(matches!(
            err,
            MarkerError::Projection {
                source: CoordError::NonFinite { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_missing_coordinate_rejected() {
        let factory = MarkerFactory::default();
        let mut record = HousingRecord::new(1, "Nowhere", "?", 0.0, 0.0);
        record.lat = None;
        let err = factory.build_housing(&record, 0).unwrap_err();
        assert!(matches!(err, MarkerError::MissingCoordinate { .. }));
    }
}
