//! Marker factory
//!
//! Converts a single housing or energy record into a [`Marker`]: a projected
//! point, a visual [`Symbol`] and a [`Popup`].
//!
//! Housing listings are drawn as fixed pink squares with a table popup.
//! Energy sites are drawn as circles in the record's own color, labelled and
//! popped up with their rating.

mod factory;
mod popup;
mod symbol;

pub use factory::{MarkerFactory, SourceRecord, DEFAULT_LINK_BASE};
pub use popup::{Popup, PopupContent, ENERGY_POPUP_TITLE, TITLE_FONT_SIZE_PX};
pub use symbol::{Outline, Symbol, SymbolStyle, HOUSING_COLOR, HOUSING_SIZE, OUTLINE_WIDTH};

use serde::Serialize;
use thiserror::Error;

use crate::coord::{CoordError, ProjectedPoint};
use crate::records::RecordRef;

/// A visual annotation for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Position in display projection.
    pub geometry: ProjectedPoint,
    pub symbol: Symbol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup: Option<Popup>,
    /// The record this marker was built from.
    pub source: RecordRef,
}

/// Errors raised while building a marker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarkerError {
    /// The record has no longitude or latitude.
    #[error("Record {record} has no coordinates")]
    MissingCoordinate { record: RecordRef },

    /// The record's coordinates cannot be projected.
    #[error("Record {record} cannot be projected: {source}")]
    Projection {
        record: RecordRef,
        #[source]
        source: CoordError,
    },
}

impl MarkerError {
    /// The record that failed.
    pub fn record(&self) -> RecordRef {
        match self {
            MarkerError::MissingCoordinate { record } | MarkerError::Projection { record, .. } => {
                *record
            }
        }
    }
}
