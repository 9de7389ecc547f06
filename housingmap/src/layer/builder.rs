//! Populates one overlay from both record datasets.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{GraphicsOverlay, LayerError};
use crate::engine::{EngineModule, MapEngine, MapHandle};
use crate::marker::{MarkerError, MarkerFactory, SourceRecord};
use crate::records::{HousingRecord, RecordSelection, RecordStore};

/// Modules needed to build and attach an overlay.
pub const OVERLAY_MODULES: &[EngineModule] = &[
    EngineModule::GraphicsLayer,
    EngineModule::Point,
    EngineModule::Graphic,
    EngineModule::PopupTemplate,
];

/// Default overlay title.
pub const DEFAULT_OVERLAY_TITLE: &str = "Housing and energy sites";

/// Outcome of a population pass.
#[derive(Debug, Clone)]
pub struct PopulateReport {
    /// The overlay that was filled and attached.
    pub overlay: Arc<GraphicsOverlay>,
    /// Markers appended.
    pub built: usize,
    /// Records skipped because no marker could be built for them.
    pub skipped: Vec<MarkerError>,
}

/// Builds the marker overlay for a map.
///
/// Energy markers are appended before housing markers; within a dataset the
/// source order is kept. Records that cannot be projected are skipped with a
/// warning and never abort the pass.
#[derive(Debug, Clone)]
pub struct LayerBuilder {
    factory: MarkerFactory,
    title: String,
}

impl Default for LayerBuilder {
    fn default() -> Self {
        Self::new(MarkerFactory::default())
    }
}

impl LayerBuilder {
    pub fn new(factory: MarkerFactory) -> Self {
        Self {
            factory,
            title: DEFAULT_OVERLAY_TITLE.to_string(),
        }
    }

    /// Set the overlay title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Creates an overlay, attaches it to `map` and fills it.
    ///
    /// The overlay is attached before any marker is appended, so the engine
    /// may draw it while it fills.
    ///
    /// # Errors
    ///
    /// Fails if the selection names an unknown record, if the overlay
    /// modules cannot be acquired, if the overlay cannot be attached, or if
    /// `cancel` fires while modules load.
    pub async fn populate<E: MapEngine + ?Sized>(
        &self,
        engine: &E,
        map: MapHandle,
        store: &RecordStore,
        selection: RecordSelection,
        cancel: &CancellationToken,
    ) -> Result<PopulateReport, LayerError> {
        let housing = select_housing(store, selection)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(LayerError::Cancelled),
            loaded = engine.load_modules(OVERLAY_MODULES) => {
                loaded.map_err(LayerError::ModuleAcquisition)?
            }
        }

        let overlay = Arc::new(GraphicsOverlay::new(self.title.clone()));
        engine
            .add_layer(map, Arc::clone(&overlay))
            .map_err(LayerError::Attach)?;
        debug!(map = %map, overlay = %overlay.id(), "Overlay attached, populating");

        let mut report = PopulateReport {
            overlay,
            built: 0,
            skipped: Vec::new(),
        };

        for (index, record) in store.energy().iter().enumerate() {
            self.append(&mut report, SourceRecord::Energy(record), index);
        }
        for (index, record) in housing {
            self.append(&mut report, SourceRecord::Housing(record), index);
        }

        info!(
            overlay = %report.overlay.id(),
            built = report.built,
            skipped = report.skipped.len(),
            "Overlay populated"
        );

        Ok(report)
    }

    fn append(&self, report: &mut PopulateReport, record: SourceRecord<'_>, index: usize) {
        match self.factory.build(record, index) {
            Ok(marker) => {
                report.overlay.push(marker);
                report.built += 1;
            }
            Err(e) => {
                warn!(record = %e.record(), error = %e, "Skipping record");
                report.skipped.push(e);
            }
        }
    }
}

/// Resolves the housing records visited under `selection`, with their indices.
fn select_housing(
    store: &RecordStore,
    selection: RecordSelection,
) -> Result<Vec<(usize, &HousingRecord)>, LayerError> {
    match selection {
        RecordSelection::All => Ok(store.housing().iter().enumerate().collect()),
        RecordSelection::Housing(id) => store
            .housing_by_id(id)
            .map(|found| vec![found])
            .ok_or(LayerError::UnknownRecord(id)),
    }
}
