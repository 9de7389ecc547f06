//! Settings resolution shared across CLI commands.

use std::path::PathBuf;

use housingmap::config::{ConfigFile, MapViewport};
use housingmap::records::RecordSelection;

use crate::error::CliError;

/// Viewport overrides from the command line.
#[derive(Debug, Clone, Default)]
pub struct ViewportOverrides {
    pub zoom: Option<f64>,
    pub center_lon: Option<f64>,
    pub center_lat: Option<f64>,
    pub basemap: Option<String>,
}

/// Resolve the viewport: CLI takes precedence, then config.
pub fn resolve_viewport(overrides: &ViewportOverrides, config: &ConfigFile) -> MapViewport {
    let mut viewport = config.map.viewport();
    if let Some(zoom) = overrides.zoom {
        viewport.zoom = zoom;
    }
    if let Some(lon) = overrides.center_lon {
        viewport.center.lon = lon;
    }
    if let Some(lat) = overrides.center_lat {
        viewport.center.lat = lat;
    }
    if let Some(ref basemap) = overrides.basemap {
        viewport.basemap = basemap.clone();
    }
    viewport
}

/// Resolve a dataset path from CLI args and config.
pub fn resolve_data_path(
    cli_path: Option<PathBuf>,
    config_path: &Option<PathBuf>,
    dataset: &str,
) -> Result<PathBuf, CliError> {
    cli_path.or_else(|| config_path.clone()).ok_or_else(|| {
        CliError::Config(format!(
            "No {dataset} dataset given. Use --{dataset} or set data.{dataset} in config.ini"
        ))
    })
}

/// Resolve the record selection from an optional routing id.
pub fn resolve_selection(record: Option<&str>) -> Result<RecordSelection, CliError> {
    match record {
        Some(id) => Ok(RecordSelection::Housing(id.parse()?)),
        None => Ok(RecordSelection::All),
    }
}
