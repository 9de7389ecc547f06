//! Session lifecycle states.

use std::fmt;

/// Lifecycle of a [`MapSession`](super::MapSession).
///
/// ```text
/// Uninitialized ──► Initializing ──► Ready
///                        │
///                        └─────────► Failed
///
/// any state ──teardown()──► Closed
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready,
    Failed(String),
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Uninitialized => write!(f, "uninitialized"),
            SessionState::Initializing => write!(f, "initializing"),
            SessionState::Ready => write!(f, "ready"),
            SessionState::Failed(reason) => write!(f, "failed ({})", reason),
            SessionState::Closed => write!(f, "closed"),
        }
    }
}
