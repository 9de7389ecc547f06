//! Session error types.

use std::fmt;

use super::SessionState;
use crate::engine::EngineError;
use crate::layer::LayerError;

/// Errors that can occur while initializing a map session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// `initialize` was called on a session that already started.
    AlreadyStarted(SessionState),

    /// The map or view modules could not be acquired.
    ModuleAcquisition(EngineError),

    /// The engine refused to create the map.
    MapConstruction(EngineError),

    /// The view could not be created or never became ready.
    ViewConstruction(EngineError),

    /// The marker overlay could not be populated.
    LayerPopulation(LayerError),

    /// The session was cancelled while suspended.
    Cancelled,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::AlreadyStarted(state) => {
                write!(f, "Map session already started (state: {})", state)
            }
            SessionError::ModuleAcquisition(e) => {
                write!(f, "Failed to acquire map modules: {}", e)
            }
            SessionError::MapConstruction(e) => {
                write!(f, "Failed to create map: {}", e)
            }
            SessionError::ViewConstruction(e) => {
                write!(f, "Failed to create map view: {}", e)
            }
            SessionError::LayerPopulation(e) => {
                write!(f, "Failed to populate overlay: {}", e)
            }
            SessionError::Cancelled => write!(f, "Map session cancelled"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::ModuleAcquisition(e)
            | SessionError::MapConstruction(e)
            | SessionError::ViewConstruction(e) => Some(e),
            SessionError::LayerPopulation(e) => Some(e),
            SessionError::AlreadyStarted(_) | SessionError::Cancelled => None,
        }
    }
}

impl From<LayerError> for SessionError {
    fn from(e: LayerError) -> Self {
        match e {
            LayerError::Cancelled => SessionError::Cancelled,
            other => SessionError::LayerPopulation(other),
        }
    }
}
