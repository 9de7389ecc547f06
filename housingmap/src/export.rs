//! GeoJSON export of a marker overlay.

use serde_json::{json, Value};

use crate::coord;
use crate::layer::GraphicsOverlay;
use crate::marker::Marker;

/// Converts the overlay into a GeoJSON `FeatureCollection`.
///
/// Features appear in append order. Geometry is converted back to
/// longitude/latitude; the projected point, symbol and popup travel in the
/// feature properties.
pub fn overlay_to_geojson(overlay: &GraphicsOverlay) -> Value {
    let features: Vec<Value> = overlay.with_markers(|markers| markers.iter().map(feature).collect());

    json!({
        "type": "FeatureCollection",
        "name": overlay.title(),
        "features": features,
    })
}

fn feature(marker: &Marker) -> Value {
    let point = coord::unproject(&marker.geometry);
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [point.lon, point.lat],
        },
        "properties": {
            "kind": marker.source.kind,
            "index": marker.source.index,
            "projected": marker.geometry,
            "symbol": marker.symbol,
            "popup": marker.popup,
        },
    })
}
