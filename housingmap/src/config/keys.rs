//! Addressable configuration keys (`section.key`).

use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFile;
use super::viewport::is_known_basemap;
use super::ConfigError;

/// A single setting in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    MapZoom,
    MapCenterLon,
    MapCenterLat,
    MapBasemap,
    DataHousing,
    DataEnergy,
    PopupLinkBase,
    LoggingDirectory,
}

const ALL_KEYS: &[ConfigKey] = &[
    ConfigKey::MapZoom,
    ConfigKey::MapCenterLon,
    ConfigKey::MapCenterLat,
    ConfigKey::MapBasemap,
    ConfigKey::DataHousing,
    ConfigKey::DataEnergy,
    ConfigKey::PopupLinkBase,
    ConfigKey::LoggingDirectory,
];

impl ConfigKey {
    /// Every key, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        ALL_KEYS
    }

    /// Full name in `section.key` form.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::MapZoom
            | ConfigKey::MapCenterLon
            | ConfigKey::MapCenterLat
            | ConfigKey::MapBasemap => "map",
            ConfigKey::DataHousing | ConfigKey::DataEnergy => "data",
            ConfigKey::PopupLinkBase => "popup",
            ConfigKey::LoggingDirectory => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::MapZoom => "zoom",
            ConfigKey::MapCenterLon => "center_lon",
            ConfigKey::MapCenterLat => "center_lat",
            ConfigKey::MapBasemap => "basemap",
            ConfigKey::DataHousing => "housing",
            ConfigKey::DataEnergy => "energy",
            ConfigKey::PopupLinkBase => "link_base",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Current value as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::MapZoom => config.map.zoom.to_string(),
            ConfigKey::MapCenterLon => config.map.center_lon.to_string(),
            ConfigKey::MapCenterLat => config.map.center_lat.to_string(),
            ConfigKey::MapBasemap => config.map.basemap.clone(),
            ConfigKey::DataHousing => path_string(&config.data.housing),
            ConfigKey::DataEnergy => path_string(&config.data.energy),
            ConfigKey::PopupLinkBase => config.popup.link_base.clone(),
            ConfigKey::LoggingDirectory => config.logging.directory.display().to_string(),
        }
    }

    /// Parses and stores `value`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::MapZoom => {
                let zoom = self.parse_f64(value)?;
                if zoom <= 0.0 {
                    return Err(self.invalid(value, "must be a positive number"));
                }
                config.map.zoom = zoom;
            }
            ConfigKey::MapCenterLon => {
                let lon = self.parse_f64(value)?;
                if !(crate::coord::MIN_LON..=crate::coord::MAX_LON).contains(&lon) {
                    return Err(self.invalid(value, "must be within [-180, 180]"));
                }
                config.map.center_lon = lon;
            }
            ConfigKey::MapCenterLat => {
                let lat = self.parse_f64(value)?;
                if !(crate::coord::MIN_LAT..=crate::coord::MAX_LAT).contains(&lat) {
                    return Err(self.invalid(value, "must be within the Web Mercator range"));
                }
                config.map.center_lat = lat;
            }
            ConfigKey::MapBasemap => {
                if !is_known_basemap(value) {
                    return Err(self.invalid(value, "not a known basemap"));
                }
                config.map.basemap = value.to_string();
            }
            ConfigKey::DataHousing => config.data.housing = optional_path(value),
            ConfigKey::DataEnergy => config.data.energy = optional_path(value),
            ConfigKey::PopupLinkBase => config.popup.link_base = value.to_string(),
            ConfigKey::LoggingDirectory => {
                if value.is_empty() {
                    return Err(self.invalid(value, "must not be empty"));
                }
                config.logging.directory = PathBuf::from(value);
            }
        }
        Ok(())
    }

    fn parse_f64(&self, value: &str) -> Result<f64, ConfigError> {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.invalid(value, "expected a number"))
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn path_string(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}
