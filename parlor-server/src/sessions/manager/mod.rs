//! Session manager for tracking connected clients

mod broadcasts;
mod mutations;
mod queries;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use tokio::sync::RwLock;

use super::session::Session;

/// Manages all connected sessions
#[derive(Debug, Clone)]
pub struct SessionManager {
    pub(super) sessions: Arc<RwLock<HashMap<u32, Session>>>,
    pub(super) next_id: Arc<AtomicU32>,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU32::new(1)),
        }
    }

    /// Generate the next session ID
    pub(super) fn next_session_id(&self) -> u32 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
