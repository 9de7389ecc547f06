//! In-memory record store.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use super::types::{EnergyRecord, HousingRecord, RecordId};
use super::RecordError;

/// Read-only collections of housing and energy records.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    housing: Vec<HousingRecord>,
    energy: Vec<EnergyRecord>,
}

impl RecordStore {
    /// Creates a store from pre-loaded collections.
    pub fn new(housing: Vec<HousingRecord>, energy: Vec<EnergyRecord>) -> Self {
        Self { housing, energy }
    }

    /// Loads both datasets from JSON array files.
    pub fn from_json_files(housing_path: &Path, energy_path: &Path) -> Result<Self, RecordError> {
        let housing: Vec<HousingRecord> = read_json(housing_path)?;
        let energy: Vec<EnergyRecord> = read_json(energy_path)?;

        info!(
            housing = housing.len(),
            energy = energy.len(),
            "Loaded record datasets"
        );

        Ok(Self::new(housing, energy))
    }

    pub fn housing(&self) -> &[HousingRecord] {
        &self.housing
    }

    pub fn energy(&self) -> &[EnergyRecord] {
        &self.energy
    }

    /// Total number of records across both datasets.
    pub fn len(&self) -> usize {
        self.housing.len() + self.energy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.housing.is_empty() && self.energy.is_empty()
    }

    /// Looks up a housing record by its external 1-based id.
    ///
    /// Returns the 0-based index alongside the record.
    pub fn housing_by_id(&self, id: RecordId) -> Option<(usize, &HousingRecord)> {
        let index = id.index();
        self.housing.get(index).map(|record| (index, record))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, RecordError> {
    let contents = std::fs::read_to_string(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| RecordError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
