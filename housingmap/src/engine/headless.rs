//! In-process map engine without a rendering surface.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::types::{
    BoxFuture, EngineError, EngineModule, MapHandle, MapProperties, ViewHandle, ViewProperties,
};
use super::MapEngine;
use crate::config::is_known_basemap;
use crate::coord;
use crate::layer::{GraphicsOverlay, OverlayId};

struct MapEntry {
    basemap: String,
    layers: Vec<Arc<GraphicsOverlay>>,
}

struct ViewEntry {
    map: MapHandle,
}

#[derive(Default)]
struct EngineState {
    maps: HashMap<MapHandle, MapEntry>,
    views: HashMap<ViewHandle, ViewEntry>,
    loaded: HashSet<EngineModule>,
    module_requests: usize,
}

/// A map engine that keeps everything in memory.
///
/// Module loading and view readiness can be delayed, and individual modules
/// or the readiness signal can be made to fail, which makes it suitable for
/// exercising the session's suspension points.
pub struct HeadlessEngine {
    next_id: AtomicU64,
    state: Mutex<EngineState>,
    module_delay: Duration,
    ready_delay: Duration,
    unavailable: HashSet<EngineModule>,
    ready_failure: Option<String>,
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessEngine {
    /// Creates an engine that loads instantly and never fails.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            state: Mutex::new(EngineState::default()),
            module_delay: Duration::ZERO,
            ready_delay: Duration::ZERO,
            unavailable: HashSet::new(),
            ready_failure: None,
        }
    }

    /// Delay every module load by `delay`.
    pub fn with_module_delay(mut self, delay: Duration) -> Self {
        self.module_delay = delay;
        self
    }

    /// Delay view readiness by `delay`.
    pub fn with_ready_delay(mut self, delay: Duration) -> Self {
        self.ready_delay = delay;
        self
    }

    /// Make `module` fail to load.
    pub fn with_unavailable_module(mut self, module: EngineModule) -> Self {
        self.unavailable.insert(module);
        self
    }

    /// Make every view fail its readiness wait with `reason`.
    pub fn with_ready_failure(mut self, reason: impl Into<String>) -> Self {
        self.ready_failure = Some(reason.into());
        self
    }

    /// Overlays currently attached to `map`, in attachment order.
    pub fn layers(&self, map: MapHandle) -> Vec<Arc<GraphicsOverlay>> {
        self.state
            .lock()
            .maps
            .get(&map)
            .map(|entry| entry.layers.clone())
            .unwrap_or_default()
    }

    /// Basemap of `map`, if it exists.
    pub fn basemap(&self, map: MapHandle) -> Option<String> {
        self.state.lock().maps.get(&map).map(|e| e.basemap.clone())
    }

    /// Number of live maps.
    pub fn map_count(&self) -> usize {
        self.state.lock().maps.len()
    }

    /// Number of live views.
    pub fn view_count(&self) -> usize {
        self.state.lock().views.len()
    }

    /// Number of `load_modules` calls received.
    pub fn module_requests(&self) -> usize {
        self.state.lock().module_requests
    }

    /// Whether `module` has been loaded successfully.
    pub fn is_loaded(&self, module: EngineModule) -> bool {
        self.state.lock().loaded.contains(&module)
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl MapEngine for HeadlessEngine {
    fn name(&self) -> &str {
        "headless"
    }

    fn load_modules<'a>(&'a self, modules: &'a [EngineModule]) -> BoxFuture<'a, Result<(), EngineError>> {
        Box::pin(async move {
            self.state.lock().module_requests += 1;

            if !self.module_delay.is_zero() {
                tokio::time::sleep(self.module_delay).await;
            }

            if let Some(missing) = modules.iter().find(|m| self.unavailable.contains(*m)) {
                return Err(EngineError::ModuleUnavailable(*missing));
            }

            let mut state = self.state.lock();
            for module in modules {
                trace!(module = %module, "Module loaded");
                state.loaded.insert(*module);
            }
            Ok(())
        })
    }

    fn create_map(&self, properties: &MapProperties) -> Result<MapHandle, EngineError> {
        if !is_known_basemap(&properties.basemap) {
            return Err(EngineError::UnknownBasemap(properties.basemap.clone()));
        }

        let handle = MapHandle(self.next_id());
        self.state.lock().maps.insert(
            handle,
            MapEntry {
                basemap: properties.basemap.clone(),
                layers: Vec::new(),
            },
        );
        debug!(map = %handle, basemap = %properties.basemap, "Map created");
        Ok(handle)
    }

    fn add_layer(&self, map: MapHandle, overlay: Arc<GraphicsOverlay>) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        let entry = state.maps.get_mut(&map).ok_or(EngineError::UnknownMap(map))?;
        debug!(map = %map, overlay = %overlay.id(), "Layer attached");
        entry.layers.push(overlay);
        Ok(())
    }

    fn remove_layer(&self, map: MapHandle, overlay: OverlayId) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        let entry = state.maps.get_mut(&map).ok_or(EngineError::UnknownMap(map))?;
        entry.layers.retain(|layer| layer.id() != overlay);
        Ok(())
    }

    fn create_view(&self, properties: &ViewProperties) -> Result<ViewHandle, EngineError> {
        if properties.container.id().trim().is_empty() {
            return Err(EngineError::InvalidContainer(
                properties.container.id().to_string(),
            ));
        }
        if !(properties.zoom.is_finite() && properties.zoom > 0.0) {
            return Err(EngineError::InvalidViewport(format!(
                "zoom {} must be positive",
                properties.zoom
            )));
        }
        coord::validate(properties.center.lon, properties.center.lat)
            .map_err(|e| EngineError::InvalidViewport(e.to_string()))?;

        let mut state = self.state.lock();
        if !state.maps.contains_key(&properties.map) {
            return Err(EngineError::UnknownMap(properties.map));
        }

        let handle = ViewHandle(self.next_id());
        state.views.insert(
            handle,
            ViewEntry {
                map: properties.map,
            },
        );
        debug!(
            view = %handle,
            map = %properties.map,
            container = properties.container.id(),
            zoom = properties.zoom,
            "View created"
        );
        Ok(handle)
    }

    fn when(&self, view: ViewHandle) -> BoxFuture<'_, Result<(), EngineError>> {
        Box::pin(async move {
            if !self.ready_delay.is_zero() {
                tokio::time::sleep(self.ready_delay).await;
            }

            if !self.state.lock().views.contains_key(&view) {
                return Err(EngineError::UnknownView(view));
            }
            if let Some(reason) = &self.ready_failure {
                return Err(EngineError::ViewNotReady(reason.clone()));
            }
            Ok(())
        })
    }

    fn destroy_view(&self, view: ViewHandle) {
        if let Some(entry) = self.state.lock().views.remove(&view) {
            debug!(view = %view, map = %entry.map, "View destroyed");
        }
    }

    fn destroy_map(&self, map: MapHandle) {
        let mut state = self.state.lock();
        state.views.retain(|_, v| v.map != map);
        if state.maps.remove(&map).is_some() {
            debug!(map = %map, "Map destroyed");
        }
    }
}
