//! The chat room: presence registry behind a shared handle
//!
//! [`Room`] is cheap to clone and serializes every roster mutation through a
//! single async mutex. It never talks to sessions; callers turn the returned
//! [`Announcement`]s into broadcasts.

mod debounce;
mod identity;
mod registry;
mod sweep;
mod types;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use debounce::DebounceSlot;
pub use identity::resolve_identity;
pub use registry::{PresenceRegistry, SweepTicket};
pub use types::{Announcement, AnnouncementKind, Roster, RoomConfig, RoomError};

#[derive(Debug, Clone)]
pub struct Room {
    registry: Arc<Mutex<PresenceRegistry>>,
    sweep: Arc<DebounceSlot>,
    config: RoomConfig,
}

impl Room {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            registry: Arc::new(Mutex::new(PresenceRegistry::new())),
            sweep: Arc::new(DebounceSlot::new()),
            config,
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Current roster, in entry order
    pub async fn snapshot(&self) -> Roster {
        self.registry.lock().await.snapshot()
    }

    /// Resolve a requested name against the live roster
    pub async fn resolve_identity(&self, requested: &str) -> String {
        self.registry.lock().await.resolve_identity(requested)
    }

    pub async fn admit(&self, identity: String) -> Result<Announcement, RoomError> {
        self.registry.lock().await.admit(identity)
    }

    pub async fn dismiss(&self, identity: &str) -> Option<Announcement> {
        self.registry.lock().await.dismiss(identity)
    }

    pub async fn contains(&self, identity: &str) -> bool {
        self.registry.lock().await.contains(identity)
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
