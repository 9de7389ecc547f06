//! Layer builder
//!
//! Aggregates markers for both datasets into a single [`GraphicsOverlay`]
//! attached to the session's map.

mod builder;
mod overlay;

pub use builder::{LayerBuilder, PopulateReport, DEFAULT_OVERLAY_TITLE, OVERLAY_MODULES};
pub use overlay::{GraphicsOverlay, OverlayId};

use thiserror::Error;

use crate::engine::EngineError;
use crate::records::RecordId;

/// Errors that abort a population pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayerError {
    /// Overlay modules could not be loaded.
    #[error("Failed to acquire overlay modules: {0}")]
    ModuleAcquisition(#[source] EngineError),

    /// The overlay could not be attached to the map.
    #[error("Failed to attach overlay: {0}")]
    Attach(#[source] EngineError),

    /// The selected record does not exist.
    #[error("No housing record with id {0}")]
    UnknownRecord(RecordId),

    /// Population was cancelled.
    #[error("Overlay population cancelled")]
    Cancelled,
}
