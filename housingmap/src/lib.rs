//! Housing Map - marker overlays for housing and energy sites
//!
//! This library builds the interactive map shown on the housing search
//! page: it starts a map session against a mapping engine, projects every
//! housing listing and energy site into the engine's display projection,
//! and attaches the resulting markers and popups as a single overlay.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use housingmap::config::MapViewport;
//! use housingmap::engine::{ContainerHandle, HeadlessEngine};
//! use housingmap::records::RecordStore;
//! use housingmap::session::MapSession;
//!
//! let store = Arc::new(RecordStore::from_json_files(housing, energy)?);
//! let session = MapSession::new(Arc::new(HeadlessEngine::new()), store);
//! let ready = session
//!     .initialize(&MapViewport::default(), ContainerHandle::new("mapViewNode"))
//!     .await?;
//! println!("{} markers", ready.markers);
//! ```

pub mod config;
pub mod coord;
pub mod engine;
pub mod export;
pub mod layer;
pub mod logging;
pub mod marker;
pub mod records;
pub mod session;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
