//! Handler for a closed connection

use tracing::info;

use super::HandlerContext;
use super::liveness::begin_sweep;
use crate::broadcaster::Broadcaster;

/// Handle a connection that has gone away
///
/// The session must already be removed from the session manager, so none of
/// the resulting events are queued for it. If the session had entered, its
/// identity leaves immediately. Either way the liveness sweep is armed so
/// that identities orphaned by earlier lost disconnects are reconciled too.
pub async fn handle_disconnect<B>(identity: Option<String>, ctx: &HandlerContext<'_, B>)
where
    B: Broadcaster + Clone + 'static,
{
    if let Some(identity) = identity.as_deref()
        && let Some(announcement) = ctx.room.dismiss(identity).await
    {
        info!(
            session_id = ctx.session_id,
            peer = %ctx.peer_addr,
            identity = %identity,
            present = announcement.roster.len(),
            "left"
        );
        ctx.broadcast(announcement.into_message()).await;
    }

    begin_sweep(None, ctx).await;
}
