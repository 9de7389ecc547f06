//! GeoRecord store
//!
//! Holds the two read-only datasets drawn on the map: housing listings and
//! energy sites. Records are supplied once at construction time and never
//! change afterwards.

mod store;
mod types;

pub use store::RecordStore;
pub use types::{
    EnergyRecord, HousingRecord, RecordId, RecordKind, RecordRef, RecordSelection, Rgb,
};

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or addressing records.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A record id from routing could not be parsed.
    #[error("Invalid record id '{0}': expected a positive integer")]
    InvalidId(String),

    /// A dataset file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A dataset file is not a valid JSON array of records.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
