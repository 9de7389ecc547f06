//! INI configuration file.

use std::path::{Path, PathBuf};

use ini::Ini;

use super::viewport::{MapViewport, DEFAULT_BASEMAP, DEFAULT_CENTER, DEFAULT_ZOOM};
use super::ConfigError;
use crate::coord::GeoPoint;
use crate::marker::DEFAULT_LINK_BASE;

/// Directory holding the config file and logs.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".housingmap")
}

/// Path of the config file.
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// `[map]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub zoom: f64,
    pub center_lon: f64,
    pub center_lat: f64,
    pub basemap: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            center_lon: DEFAULT_CENTER.lon,
            center_lat: DEFAULT_CENTER.lat,
            basemap: DEFAULT_BASEMAP.to_string(),
        }
    }
}

impl MapSettings {
    pub fn viewport(&self) -> MapViewport {
        MapViewport {
            zoom: self.zoom,
            center: GeoPoint::new(self.center_lon, self.center_lat),
            basemap: self.basemap.clone(),
        }
    }
}

/// `[data]` section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSettings {
    pub housing: Option<PathBuf>,
    pub energy: Option<PathBuf>,
}

/// `[popup]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupSettings {
    pub link_base: String,
}

impl Default for PopupSettings {
    fn default() -> Self {
        Self {
            link_base: DEFAULT_LINK_BASE.to_string(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: config_directory().join("logs"),
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub map: MapSettings,
    pub data: DataSettings,
    pub popup: PopupSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Loads from [`config_file_path`], or defaults if the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Loads from `path`, or defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut config = Self::default();

        for key in super::ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|s| s.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }

        Ok(config)
    }

    /// Saves to [`config_file_path`].
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Saves to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut ini = Ini::new();
        for key in super::ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }

        ini.write_to_file(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("none.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.map.viewport(), MapViewport::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.map.zoom = 12.0;
        config.map.basemap = "topo-vector".to_string();
        config.data.housing = Some(PathBuf::from("/data/housing.json"));
        config.popup.link_base = "/listing".to_string();
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded.map.zoom, 12.0);
        assert_eq!(loaded.map.basemap, "topo-vector");
        assert_eq!(loaded.data.housing, Some(PathBuf::from("/data/housing.json")));
        assert_eq!(loaded.data.energy, None);
        assert_eq!(loaded.popup.link_base, "/listing");
    }

    #[test]
    fn test_load_hand_written_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(
            &path,
            "[map]\nzoom = 8\ncenter_lon = -1.5\ncenter_lat = 53.8\n\n[data]\nenergy = /srv/energy.json\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        let viewport = config.map.viewport();
        assert_eq!(viewport.zoom, 8.0);
        assert_eq!(viewport.center, GeoPoint::new(-1.5, 53.8));
        assert_eq!(viewport.basemap, DEFAULT_BASEMAP);
        assert_eq!(config.data.energy, Some(PathBuf::from("/srv/energy.json")));
    }

    #[test]
    fn test_load_rejects_invalid_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[map]\nzoom = lots\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
