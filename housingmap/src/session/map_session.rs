//! Map session implementation.
//!
//! Two chains run per session: view construction (module acquisition, view
//! creation, readiness wait) and overlay population. Population starts first
//! and runs concurrently with the view chain, and readiness is only reported
//! once both have finished.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::error::SessionError;
use super::state::SessionState;
use crate::config::MapViewport;
use crate::engine::{
    ContainerHandle, EngineError, EngineModule, MapEngine, MapHandle, MapProperties, ViewHandle,
    ViewProperties,
};
use crate::layer::{GraphicsOverlay, LayerBuilder};
use crate::marker::MarkerError;
use crate::records::{RecordSelection, RecordStore};

/// Modules acquired before the map and view are constructed.
pub const SESSION_MODULES: &[EngineModule] = &[EngineModule::Map, EngineModule::MapView];

/// Result of a successful initialization.
#[derive(Debug, Clone)]
pub struct MapReady {
    pub map: MapHandle,
    pub view: ViewHandle,
    /// The populated marker overlay.
    pub overlay: Arc<GraphicsOverlay>,
    /// Markers appended to the overlay.
    pub markers: usize,
    /// Records that produced no marker.
    pub skipped: Vec<MarkerError>,
}

/// Options fixed for the lifetime of a session.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Which records are drawn.
    pub selection: RecordSelection,
    /// Builder used to fill the overlay.
    pub layer_builder: LayerBuilder,
}

impl SessionOptions {
    /// Set the record selection.
    pub fn with_selection(mut self, selection: RecordSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Set the layer builder.
    pub fn with_layer_builder(mut self, layer_builder: LayerBuilder) -> Self {
        self.layer_builder = layer_builder;
        self
    }
}

/// Engine objects owned by the session.
struct SessionResources {
    map: MapHandle,
    view: Option<ViewHandle>,
    overlay: Option<Arc<GraphicsOverlay>>,
}

/// Owns one map, its view and its marker overlay.
///
/// A session initializes at most once. The "map loaded" notification is a
/// oneshot channel: it receives `true` on success, and its sender is dropped
/// unsent on failure.
///
/// # Example
///
/// ```ignore
/// use housingmap::session::MapSession;
///
/// let session = MapSession::new(engine, store);
/// let loaded = session.take_loaded_listener().unwrap();
///
/// let ready = session.initialize(&viewport, container).await?;
/// assert_eq!(loaded.await, Ok(true));
///
/// // Later: release the overlay, view and map
/// session.teardown();
/// ```
pub struct MapSession<E: MapEngine + ?Sized> {
    engine: Arc<E>,
    store: Arc<RecordStore>,
    options: SessionOptions,
    state: Mutex<SessionState>,
    resources: Mutex<Option<SessionResources>>,
    loaded_tx: Mutex<Option<oneshot::Sender<bool>>>,
    loaded_rx: Mutex<Option<oneshot::Receiver<bool>>>,
    cancellation: CancellationToken,
}

impl<E: MapEngine + ?Sized> MapSession<E> {
    /// Create a session drawing every record.
    pub fn new(engine: Arc<E>, store: Arc<RecordStore>) -> Self {
        Self::with_options(engine, store, SessionOptions::default())
    }

    /// Create a session with explicit options.
    pub fn with_options(engine: Arc<E>, store: Arc<RecordStore>, options: SessionOptions) -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            engine,
            store,
            options,
            state: Mutex::new(SessionState::Uninitialized),
            resources: Mutex::new(None),
            loaded_tx: Mutex::new(Some(tx)),
            loaded_rx: Mutex::new(Some(rx)),
            cancellation: CancellationToken::new(),
        }
    }

    /// Initialize the map, its view and the marker overlay.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyStarted`] if called more than once.
    /// Every other error leaves the session in [`SessionState::Failed`] with
    /// all engine objects released.
    pub async fn initialize(
        &self,
        viewport: &MapViewport,
        container: ContainerHandle,
    ) -> Result<MapReady, SessionError> {
        self.begin()?;

        info!(
            engine = self.engine.name(),
            zoom = viewport.zoom,
            center = %viewport.center,
            basemap = %viewport.basemap,
            "Initializing map session"
        );

        match self.run(viewport, container).await {
            Ok(ready) => {
                self.settle(SessionState::Ready);
                if let Some(tx) = self.loaded_tx.lock().take() {
                    // The host may have dropped its listener; that is not an error.
                    let _ = tx.send(true);
                }
                info!(
                    map = %ready.map,
                    view = %ready.view,
                    markers = ready.markers,
                    skipped = ready.skipped.len(),
                    "Map loaded"
                );
                Ok(ready)
            }
            Err(e) => {
                error!(error = %e, "Map session failed");
                self.release();
                self.loaded_tx.lock().take();
                self.settle(SessionState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        viewport: &MapViewport,
        container: ContainerHandle,
    ) -> Result<MapReady, SessionError> {
        viewport
            .validate()
            .map_err(|e| SessionError::ViewConstruction(EngineError::InvalidViewport(e.to_string())))?;

        self.guard(self.engine.load_modules(SESSION_MODULES))
            .await?
            .map_err(SessionError::ModuleAcquisition)?;

        let map = self
            .engine
            .create_map(&MapProperties {
                basemap: viewport.basemap.clone(),
            })
            .map_err(SessionError::MapConstruction)?;
        *self.resources.lock() = Some(SessionResources {
            map,
            view: None,
            overlay: None,
        });

        let population = async {
            self.options
                .layer_builder
                .populate(
                    self.engine.as_ref(),
                    map,
                    &self.store,
                    self.options.selection,
                    &self.cancellation,
                )
                .await
                .map_err(SessionError::from)
        };

        let view_ready = async {
            let view = self
                .engine
                .create_view(&ViewProperties {
                    map,
                    container,
                    center: viewport.center,
                    zoom: viewport.zoom,
                })
                .map_err(SessionError::ViewConstruction)?;

            let owned = match self.resources.lock().as_mut() {
                Some(resources) => {
                    resources.view = Some(view);
                    true
                }
                None => false,
            };
            if !owned {
                // Torn down while the view was being created.
                self.engine.destroy_view(view);
                return Err(SessionError::Cancelled);
            }

            self.guard(self.engine.when(view))
                .await?
                .map_err(SessionError::ViewConstruction)?;
            debug!(view = %view, "View ready");
            Ok::<_, SessionError>(view)
        };

        let (report, view) = tokio::try_join!(population, view_ready)?;

        if let Some(resources) = self.resources.lock().as_mut() {
            resources.overlay = Some(Arc::clone(&report.overlay));
        }

        Ok(MapReady {
            map,
            view,
            overlay: report.overlay,
            markers: report.built,
            skipped: report.skipped,
        })
    }

    /// Runs `fut` unless the session is cancelled first.
    async fn guard<T>(&self, fut: impl Future<Output = T>) -> Result<T, SessionError> {
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(SessionError::Cancelled),
            out = fut => Ok(out),
        }
    }

    /// Uninitialized → Initializing, or report the current state.
    fn begin(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        if *state != SessionState::Uninitialized {
            warn!(state = %state, "Ignoring repeated map initialization");
            return Err(SessionError::AlreadyStarted(state.clone()));
        }
        *state = SessionState::Initializing;
        Ok(())
    }

    /// Leaves Initializing for `next`; a concurrent teardown wins.
    fn settle(&self, next: SessionState) {
        let mut state = self.state.lock();
        if *state == SessionState::Initializing {
            *state = next;
        }
    }

    /// Detach the overlay and destroy the view and map, if any.
    fn release(&self) {
        let Some(resources) = self.resources.lock().take() else {
            return;
        };

        if let Some(overlay) = resources.overlay {
            overlay.clear();
            if let Err(e) = self.engine.remove_layer(resources.map, overlay.id()) {
                warn!(overlay = %overlay.id(), error = %e, "Failed to detach overlay");
            }
        }
        if let Some(view) = resources.view {
            self.engine.destroy_view(view);
        }
        self.engine.destroy_map(resources.map);
        debug!(map = %resources.map, "Session resources released");
    }

    /// Cancel pending work and release every engine object.
    ///
    /// The session moves to [`SessionState::Closed`] and cannot be reused.
    pub fn teardown(&self) {
        self.cancellation.cancel();
        self.release();
        self.loaded_tx.lock().take();
        *self.state.lock() = SessionState::Closed;
        info!("Map session closed");
    }

    /// Request cancellation of an in-progress initialization.
    pub fn cancel(&self) {
        info!("Map session cancellation requested");
        self.cancellation.cancel();
    }

    /// Token that cancels this session when triggered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Take the "map loaded" listener. Returns `None` after the first call.
    pub fn take_loaded_listener(&self) -> Option<oneshot::Receiver<bool>> {
        self.loaded_rx.lock().take()
    }

    /// Whether the map finished loading.
    pub fn map_loaded(&self) -> bool {
        *self.state.lock() == SessionState::Ready
    }

    pub fn state(&self) -> SessionState {
        self.state.lock().clone()
    }

    /// The attached overlay, once the session is ready.
    pub fn overlay(&self) -> Option<Arc<GraphicsOverlay>> {
        self.resources
            .lock()
            .as_ref()
            .and_then(|r| r.overlay.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::HeadlessEngine;
    use crate::records::{EnergyRecord, HousingRecord, RecordId, Rgb};
    use std::time::Duration;

    fn store() -> Arc<RecordStore> {
        Arc::new(RecordStore::new(
            vec![
                HousingRecord::new(1, "Test House", "1 Test St", 0.1278, 51.5074),
                HousingRecord::new(2, "Other House", "2 Test St", 0.13, 51.51),
            ],
            vec![EnergyRecord::new(0.12, 51.5, Rgb(0, 136, 60), 8.0, "B")],
        ))
    }

    fn container() -> ContainerHandle {
        ContainerHandle::new("mapViewNode")
    }

    #[tokio::test]
    async fn test_initialize_ready() {
        let engine = Arc::new(HeadlessEngine::new());
        let session = MapSession::new(Arc::clone(&engine), store());
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(!session.map_loaded());

        let ready = session
            .initialize(&MapViewport::default(), container())
            .await
            .unwrap();

        assert_eq!(ready.markers, 3);
        assert!(ready.skipped.is_empty());
        assert!(session.map_loaded());
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(engine.layers(ready.map).len(), 1);
        assert_eq!(
            engine.basemap(ready.map).as_deref(),
            Some("streets-navigation-vector")
        );
        assert_eq!(session.overlay().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_loaded_event_fires_once() {
        let session = MapSession::new(Arc::new(HeadlessEngine::new()), store());
        let listener = session.take_loaded_listener().unwrap();
        assert!(session.take_loaded_listener().is_none());

        session
            .initialize(&MapViewport::default(), container())
            .await
            .unwrap();

        assert_eq!(listener.await, Ok(true));
    }

    #[tokio::test]
    async fn test_second_initialize_rejected() {
        let engine = Arc::new(HeadlessEngine::new());
        let session = MapSession::new(Arc::clone(&engine), store());
        session
            .initialize(&MapViewport::default(), container())
            .await
            .unwrap();
        let requests = engine.module_requests();

        let err = session
            .initialize(&MapViewport::default(), container())
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::AlreadyStarted(SessionState::Ready));
        assert_eq!(engine.module_requests(), requests);
        assert_eq!(engine.map_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_initialize_rejected() {
        let engine = Arc::new(HeadlessEngine::new().with_module_delay(Duration::from_millis(10)));
        let session = MapSession::new(engine, store());
        let viewport = MapViewport::default();

        let (first, second) = tokio::join!(
            session.initialize(&viewport, container()),
            session.initialize(&viewport, container())
        );

        assert!(first.is_ok());
        assert_eq!(
            second.unwrap_err(),
            SessionError::AlreadyStarted(SessionState::Initializing)
        );
    }

    #[tokio::test]
    async fn test_module_failure_is_reported() {
        let engine = Arc::new(HeadlessEngine::new().with_unavailable_module(EngineModule::MapView));
        let session = MapSession::new(Arc::clone(&engine), store());
        let listener = session.take_loaded_listener().unwrap();

        let err = session
            .initialize(&MapViewport::default(), container())
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::ModuleAcquisition(_)));
        assert!(!session.map_loaded());
        assert!(matches!(session.state(), SessionState::Failed(_)));
        assert!(listener.await.is_err(), "no event on failure");
        assert_eq!(engine.map_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_basemap_fails_map_construction() {
        let session = MapSession::new(Arc::new(HeadlessEngine::new()), store());
        let mut viewport = MapViewport::default();
        viewport.basemap = "watercolor".to_string();

        // Viewport validation catches the basemap before the engine is asked
        let err = session.initialize(&viewport, container()).await.unwrap_err();
        assert!(matches!(err, SessionError::ViewConstruction(_)));
    }

    #[tokio::test]
    async fn test_view_failure_releases_map() {
        let engine = Arc::new(HeadlessEngine::new().with_ready_failure("context lost"));
        let session = MapSession::new(Arc::clone(&engine), store());

        let err = session
            .initialize(&MapViewport::default(), container())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SessionError::ViewConstruction(EngineError::ViewNotReady(_))
        ));
        assert_eq!(engine.map_count(), 0);
        assert_eq!(engine.view_count(), 0);
        assert!(session.overlay().is_none());
    }

    #[tokio::test]
    async fn test_empty_container_fails() {
        let session = MapSession::new(Arc::new(HeadlessEngine::new()), store());
        let err = session
            .initialize(&MapViewport::default(), ContainerHandle::new(""))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::ViewConstruction(EngineError::InvalidContainer(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_selection_fails_population() {
        let options =
            SessionOptions::default().with_selection(RecordSelection::Housing(RecordId::new(5).unwrap()));
        let session =
            MapSession::with_options(Arc::new(HeadlessEngine::new()), store(), options);

        let err = session
            .initialize(&MapViewport::default(), container())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::LayerPopulation(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_module_acquisition() {
        let engine = Arc::new(HeadlessEngine::new().with_module_delay(Duration::from_secs(5)));
        let session = MapSession::new(Arc::clone(&engine), store());
        let viewport = MapViewport::default();

        let (result, _) = tokio::join!(session.initialize(&viewport, container()), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            session.cancel();
        });

        assert_eq!(result.unwrap_err(), SessionError::Cancelled);
        assert!(!session.map_loaded());
        assert_eq!(engine.map_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_view_ready_wait() {
        let engine = Arc::new(HeadlessEngine::new().with_ready_delay(Duration::from_secs(5)));
        let session = MapSession::new(Arc::clone(&engine), store());
        let viewport = MapViewport::default();

        let (result, _) = tokio::join!(session.initialize(&viewport, container()), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            session.cancel();
        });

        assert_eq!(result.unwrap_err(), SessionError::Cancelled);
        assert_eq!(engine.map_count(), 0);
        assert_eq!(engine.view_count(), 0);
    }

    #[tokio::test]
    async fn test_teardown_releases_everything() {
        let engine = Arc::new(HeadlessEngine::new());
        let session = MapSession::new(Arc::clone(&engine), store());
        let ready = session
            .initialize(&MapViewport::default(), container())
            .await
            .unwrap();

        session.teardown();

        assert_eq!(session.state(), SessionState::Closed);
        assert!(!session.map_loaded());
        assert!(ready.overlay.is_empty());
        assert_eq!(engine.map_count(), 0);
        assert_eq!(engine.view_count(), 0);
        assert!(session.overlay().is_none());

        let err = session
            .initialize(&MapViewport::default(), container())
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::AlreadyStarted(SessionState::Closed));
    }

    #[tokio::test]
    async fn test_dyn_engine() {
        let engine: Arc<dyn MapEngine> = Arc::new(HeadlessEngine::new());
        let session = MapSession::new(engine, store());
        let ready = session
            .initialize(&MapViewport::default(), container())
            .await
            .unwrap();
        assert_eq!(ready.markers, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_during_view_ready_wait() {
        let engine = Arc::new(HeadlessEngine::new().with_ready_delay(Duration::from_secs(5)));
        let session = MapSession::new(Arc::clone(&engine), store());
        let listener = session.take_loaded_listener().unwrap();
        let viewport = MapViewport::default();

        let (result, _) = tokio::join!(session.initialize(&viewport, container()), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert_eq!(engine.view_count(), 1);
            session.teardown();
        });

        assert_eq!(result.unwrap_err(), SessionError::Cancelled);
        assert_eq!(session.state(), SessionState::Closed);
        assert!(listener.await.is_err());
        assert_eq!(engine.map_count(), 0);
        assert_eq!(engine.view_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_during_overlay_module_load() {
        // Session modules finish at 5s; overlay modules would finish at 10s
        let engine = Arc::new(HeadlessEngine::new().with_module_delay(Duration::from_secs(5)));
        let session = MapSession::new(Arc::clone(&engine), store());
        let listener = session.take_loaded_listener().unwrap();
        let viewport = MapViewport::default();

        let (result, _) = tokio::join!(session.initialize(&viewport, container()), async {
            tokio::time::sleep(Duration::from_secs(7)).await;
            assert_eq!(engine.map_count(), 1);
            assert!(!engine.is_loaded(EngineModule::GraphicsLayer));
            session.teardown();
        });

        assert_eq!(result.unwrap_err(), SessionError::Cancelled);
        assert_eq!(session.state(), SessionState::Closed);
        assert!(listener.await.is_err());
        assert_eq!(engine.map_count(), 0);
        assert_eq!(engine.view_count(), 0);
        assert!(session.overlay().is_none());
    }
}
