//! Configuration
//!
//! [`MapViewport`] is the viewport handed to a map session. [`ConfigFile`]
//! persists defaults for it, plus dataset paths, popup links and the log
//! directory, in `~/.housingmap/config.ini`.

mod file;
mod keys;
mod viewport;

pub use file::{
    config_directory, config_file_path, ConfigFile, DataSettings, LoggingSettings, MapSettings,
    PopupSettings,
};
pub use keys::ConfigKey;
pub use viewport::{
    is_known_basemap, MapViewport, BASEMAP_CATALOG, DEFAULT_BASEMAP, DEFAULT_CENTER, DEFAULT_ZOOM,
};

use thiserror::Error;

/// Errors raised while reading, writing or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}
