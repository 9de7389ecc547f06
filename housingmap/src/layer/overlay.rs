//! Graphics overlay: an ordered, shared collection of markers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::marker::Marker;

static NEXT_OVERLAY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique overlay identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(u64);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}

/// A named collection of markers attached to a map.
///
/// The overlay is shared between the session, the layer builder and the
/// engine, so markers sit behind a lock. Only the layer builder appends.
pub struct GraphicsOverlay {
    id: OverlayId,
    title: String,
    markers: RwLock<Vec<Marker>>,
}

impl GraphicsOverlay {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: OverlayId(NEXT_OVERLAY_ID.fetch_add(1, Ordering::Relaxed)),
            title: title.into(),
            markers: RwLock::new(Vec::new()),
        }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Appends a marker and returns its index.
    pub fn push(&self, marker: Marker) -> usize {
        let mut markers = self.markers.write();
        markers.push(marker);
        markers.len() - 1
    }

    pub fn len(&self) -> usize {
        self.markers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.read().is_empty()
    }

    /// Snapshot of the markers in append order.
    pub fn markers(&self) -> Vec<Marker> {
        self.markers.read().clone()
    }

    /// Runs `f` over the markers without cloning them.
    pub fn with_markers<R>(&self, f: impl FnOnce(&[Marker]) -> R) -> R {
        f(&self.markers.read())
    }

    /// Removes every marker.
    pub fn clear(&self) {
        self.markers.write().clear();
    }
}

impl fmt::Debug for GraphicsOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphicsOverlay")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("markers", &self.len())
            .finish()
    }
}
