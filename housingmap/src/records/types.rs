//! Record types for the two datasets shown on the map.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::RecordError;

/// An RGB color triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Opaque black.
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// A housing product listing.
///
/// Coordinates are optional so that a listing with a missing position still
/// loads; the marker factory rejects it later with a logged warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingRecord {
    /// Listing identifier, used to build the popup hyperlink.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Street address.
    #[serde(alias = "Address")]
    pub address: String,
    /// Longitude in degrees.
    #[serde(alias = "lng", default)]
    pub lon: Option<f64>,
    /// Latitude in degrees.
    #[serde(default)]
    pub lat: Option<f64>,
}

impl HousingRecord {
    /// Creates a housing record with a known position.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        address: impl Into<String>,
        lon: f64,
        lat: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
            lon: Some(lon),
            lat: Some(lat),
        }
    }
}

/// An energy site with its efficiency rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyRecord {
    /// Longitude in degrees.
    #[serde(alias = "lng", default)]
    pub lon: Option<f64>,
    /// Latitude in degrees.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Marker fill color.
    pub color: Rgb,
    /// Marker radius in points.
    pub radius: f64,
    /// Energy rating label, e.g. "B".
    pub rating: String,
}

impl EnergyRecord {
    /// Creates an energy record with a known position.
    pub fn new(lon: f64, lat: f64, color: Rgb, radius: f64, rating: impl Into<String>) -> Self {
        Self {
            lon: Some(lon),
            lat: Some(lat),
            color,
            radius,
            rating: rating.into(),
        }
    }
}

/// Which dataset a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Housing,
    Energy,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Housing => write!(f, "housing"),
            RecordKind::Energy => write!(f, "energy"),
        }
    }
}

/// Identity of a record: its dataset and 0-based position within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef {
    pub kind: RecordKind,
    pub index: usize,
}

impl RecordRef {
    pub fn housing(index: usize) -> Self {
        Self {
            kind: RecordKind::Housing,
            index,
        }
    }

    pub fn energy(index: usize) -> Self {
        Self {
            kind: RecordKind::Energy,
            index,
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.index)
    }
}

/// External 1-based record id, as it appears in page routes.
///
/// Id `n` addresses the record at internal index `n - 1`. Zero is never a
/// valid id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u32);

impl RecordId {
    /// Creates an id, rejecting zero.
    pub fn new(id: u32) -> Result<Self, RecordError> {
        if id == 0 {
            return Err(RecordError::InvalidId("0".to_string()));
        }
        Ok(Self(id))
    }

    /// The external 1-based value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// The 0-based index into the source collection.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl FromStr for RecordId {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| RecordError::InvalidId(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which records a layer population pass visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordSelection {
    /// Every housing and energy record.
    #[default]
    All,
    /// A single housing record plus every energy record.
    Housing(RecordId),
}
