//! Types shared between the map core and engine implementations.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::coord::GeoPoint;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Engine modules the core acquires before using the matching capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineModule {
    Map,
    MapView,
    GraphicsLayer,
    Graphic,
    Point,
    PopupTemplate,
}

impl EngineModule {
    /// The engine-side module path.
    pub fn path(&self) -> &'static str {
        match self {
            EngineModule::Map => "esri/Map",
            EngineModule::MapView => "esri/views/MapView",
            EngineModule::GraphicsLayer => "esri/layers/GraphicsLayer",
            EngineModule::Graphic => "esri/Graphic",
            EngineModule::Point => "esri/geometry/Point",
            EngineModule::PopupTemplate => "esri/PopupTemplate",
        }
    }
}

impl fmt::Display for EngineModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Engine-assigned identifier of a map instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapHandle(pub u64);

/// Engine-assigned identifier of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewHandle(pub u64);

impl fmt::Display for MapHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "map#{}", self.0)
    }
}

impl fmt::Display for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Opaque reference to the drawable surface supplied by the host page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerHandle(String);

impl ContainerHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Properties used to construct a map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapProperties {
    pub basemap: String,
}

/// Properties used to construct a view onto a map.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewProperties {
    pub map: MapHandle,
    pub container: ContainerHandle,
    pub center: GeoPoint,
    pub zoom: f64,
}

/// Errors reported by a map engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A module could not be loaded.
    #[error("Module '{0}' is unavailable")]
    ModuleUnavailable(EngineModule),

    /// The basemap key is not in the engine's catalog.
    #[error("Unknown basemap '{0}'")]
    UnknownBasemap(String),

    /// The container handle does not reference a drawable surface.
    #[error("Invalid container '{0}'")]
    InvalidContainer(String),

    /// The view properties are unusable.
    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),

    /// The map handle is not known to the engine.
    #[error("Unknown {0}")]
    UnknownMap(MapHandle),

    /// The view handle is not known to the engine.
    #[error("Unknown {0}")]
    UnknownView(ViewHandle),

    /// The view never became ready.
    #[error("View failed to become ready: {0}")]
    ViewNotReady(String),
}
