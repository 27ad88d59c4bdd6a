//! Handler for a freshly accepted connection

use std::io;

use parlor_common::protocol::ServerMessage;
use tracing::debug;

use super::HandlerContext;
use crate::broadcaster::Broadcaster;

/// Send the current roster to a new session
///
/// The snapshot is also remembered on the session so that its entry request
/// resolves against the roster the user was actually shown.
pub async fn handle_connect<B>(ctx: &HandlerContext<'_, B>) -> io::Result<()>
where
    B: Broadcaster,
{
    let roster = ctx.room.snapshot().await;
    let connected = ctx.sessions.session_count().await;
    let entered = ctx.sessions.entered_count().await;
    debug!(
        session_id = ctx.session_id,
        peer = %ctx.peer_addr,
        present = roster.len(),
        connected,
        entered,
        "sending roster snapshot"
    );

    ctx.sessions
        .record_observed_roster(ctx.session_id, roster.clone())
        .await;
    ctx.reply(ServerMessage::RosterSnapshot { roster }).await;
    Ok(())
}
