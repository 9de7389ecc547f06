//! Map session lifecycle management.
//!
//! [`MapSession`] owns the map instance and its viewport. It acquires the
//! engine modules, creates the map, fills the marker overlay through the
//! [`LayerBuilder`](crate::layer::LayerBuilder), constructs the view and
//! reports readiness once.
//!
//! # Lifecycle
//!
//! ```text
//! initialize()
//!   ├── load map + view modules          (suspends, cancellable)
//!   ├── create map (basemap)
//!   ├── populate overlay ─────────────┐   (concurrent, cancellable)
//!   ├── create view (container,       │
//!   │   center, zoom)                 │
//!   ├── wait for view ready           │   (suspends, cancellable)
//!   └── join ◄────────────────────────┘
//!        └── Ready + "map loaded" event
//! ```

mod error;
mod map_session;
mod state;

pub use error::SessionError;
pub use map_session::{MapReady, MapSession, SessionOptions, SESSION_MODULES};
pub use state::SessionState;
