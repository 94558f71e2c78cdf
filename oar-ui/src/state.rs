//! Shared application state
//!
//! One operator, at most one active session. The session lives behind an
//! async RwLock: read handlers take the read half, anything that stores a
//! judgment, moves the cursor, or swaps the session takes the write half.

use oar_core::Session;
use tokio::sync::RwLock;
use tracing::debug;

/// State shared by all HTTP handlers.
pub struct SharedState {
    /// Active review session; `None` until an upload installs one
    pub session: RwLock<Option<Session>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            session: RwLock::new(None),
        }
    }

    /// Install a session, replacing any active one. Returns true when an
    /// existing session was thrown away.
    pub async fn install(&self, session: Session) -> bool {
        let mut guard = self.session.write().await;
        let replaced = guard.is_some();
        *guard = Some(session);
        debug!(replaced, "session installed");
        replaced
    }

    /// Discard the active session. Returns true when one existed.
    pub async fn clear(&self) -> bool {
        let existed = self.session.write().await.take().is_some();
        debug!(existed, "session cleared");
        existed
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
