//! Liveness sweep
//!
//! A disconnect cannot always say who left, so the room asks everyone still
//! connected to assert their identity. Whoever has not asserted when the
//! debounce window closes is dismissed.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info};

use super::{Announcement, Room};

impl Room {
    /// Record a liveness assertion and (re)start the sweep timer
    ///
    /// `asserter` is the identity of a live session answering a probe, or
    /// `None` when the trigger was a disconnect. Returns true if this call
    /// opened a new window, in which case the caller should broadcast a
    /// liveness probe.
    ///
    /// When the window closes, `on_sweep` receives the `left` announcements
    /// of every dismissed identity, in roster order. It runs with the roster
    /// still locked, so no one can enter under a dismissed name until it
    /// returns; it must not call back into the room.
    pub async fn begin_liveness_sweep<F, Fut>(&self, asserter: Option<&str>, on_sweep: F) -> bool
    where
        F: FnOnce(Vec<Announcement>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        // Scheduling under the registry lock keeps the slot's pending task
        // on the latest generation
        let mut guard = self.registry.lock().await;
        let ticket = guard.record_assertion(asserter);
        let registry = Arc::clone(&self.registry);

        self.sweep.schedule(self.config.sweep_interval, async move {
            let mut registry = registry.lock().await;
            let Some(announcements) = registry.sweep(ticket.generation) else {
                debug!(generation = ticket.generation, "liveness sweep superseded");
                return;
            };

            if !announcements.is_empty() {
                info!(
                    dismissed = announcements.len(),
                    "liveness sweep dismissed unresponsive identities"
                );
            }
            on_sweep(announcements).await;
            drop(registry);
        });
        drop(guard);

        ticket.opened
    }

    /// Whether a liveness window is waiting to close
    pub fn sweep_pending(&self) -> bool {
        self.sweep.is_pending()
    }
}
