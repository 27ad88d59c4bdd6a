//! Outbound delivery capability
//!
//! Handlers only ever push events through this trait; the session manager is
//! the production implementation. Delivery is best-effort: a closed or
//! failing session never surfaces an error to the caller.

use async_trait::async_trait;
use parlor_common::protocol::ServerMessage;

#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Deliver to one session, if it is still connected
    async fn send_to(&self, session_id: u32, message: ServerMessage);

    /// Deliver to every connected session, entered or not
    async fn send_to_all(&self, message: ServerMessage);
}
