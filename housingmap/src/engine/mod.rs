//! Map engine abstraction
//!
//! The core never draws anything itself. It drives a [`MapEngine`], which
//! owns maps, views and attached overlays. [`HeadlessEngine`] is an
//! in-process implementation with no rendering surface, used by the CLI and
//! by tests.

mod headless;
mod types;

pub use headless::HeadlessEngine;
pub use types::{
    BoxFuture, ContainerHandle, EngineError, EngineModule, MapHandle, MapProperties,
    ViewHandle, ViewProperties,
};

use std::sync::Arc;

use crate::layer::{GraphicsOverlay, OverlayId};

/// Capability set of the mapping engine.
///
/// Async methods return boxed futures so the trait stays object-safe and a
/// session can hold an `Arc<dyn MapEngine>`.
pub trait MapEngine: Send + Sync {
    /// Human-readable engine name for logging.
    fn name(&self) -> &str;

    /// Loads the given modules. May suspend.
    fn load_modules<'a>(&'a self, modules: &'a [EngineModule]) -> BoxFuture<'a, Result<(), EngineError>>;

    /// Creates a map with the given basemap.
    fn create_map(&self, properties: &MapProperties) -> Result<MapHandle, EngineError>;

    /// Attaches an overlay to a map. The overlay may still be filling.
    fn add_layer(&self, map: MapHandle, overlay: Arc<GraphicsOverlay>) -> Result<(), EngineError>;

    /// Detaches an overlay from a map.
    fn remove_layer(&self, map: MapHandle, overlay: OverlayId) -> Result<(), EngineError>;

    /// Creates a view bound to a container.
    fn create_view(&self, properties: &ViewProperties) -> Result<ViewHandle, EngineError>;

    /// Resolves once the view has finished initializing.
    fn when(&self, view: ViewHandle) -> BoxFuture<'_, Result<(), EngineError>>;

    /// Releases a view. Unknown handles are ignored.
    fn destroy_view(&self, view: ViewHandle);

    /// Releases a map and every layer attached to it. Unknown handles are ignored.
    fn destroy_map(&self, map: MapHandle);
}
