//! Handler for liveness assertions and the shared sweep trigger

use std::io;

use parlor_common::protocol::ServerMessage;
use tracing::debug;

use super::HandlerContext;
use crate::broadcaster::Broadcaster;

/// Handle a liveness assertion from a live session
///
/// The session's bound identity is what gets recorded; the identity named in
/// the message is only compared for logging. Assertions from sessions that
/// have not entered are ignored.
pub async fn handle_liveness_assertion<B>(
    claimed: String,
    ctx: &HandlerContext<'_, B>,
) -> io::Result<()>
where
    B: Broadcaster + Clone + 'static,
{
    let Some(identity) = ctx.sessions.identity_of(ctx.session_id).await else {
        debug!(
            session_id = ctx.session_id,
            "ignoring liveness assertion from a session that has not entered"
        );
        return Ok(());
    };

    if claimed != identity {
        debug!(
            session_id = ctx.session_id,
            claimed = %claimed,
            identity = %identity,
            "liveness assertion names another identity, recording the bound one"
        );
    }

    begin_sweep(Some(&identity), ctx).await;
    Ok(())
}

/// Record an assertion (or a bare disconnect) and arm the liveness sweep
///
/// Broadcasts a `LivenessProbe` when this opens a new window. When the
/// window closes, every dismissed identity is unbound from any session
/// still holding it and its `left` announcement is broadcast.
pub(super) async fn begin_sweep<B>(asserter: Option<&str>, ctx: &HandlerContext<'_, B>)
where
    B: Broadcaster + Clone + 'static,
{
    let broadcaster = ctx.broadcaster.clone();
    let sessions = ctx.sessions.clone();

    let opened = ctx
        .room
        .begin_liveness_sweep(asserter, move |announcements| async move {
            for announcement in announcements {
                sessions.clear_identity(&announcement.subject).await;
                broadcaster.send_to_all(announcement.into_message()).await;
            }
        })
        .await;

    if opened {
        debug!("liveness window opened, probing sessions");
        ctx.broadcast(ServerMessage::LivenessProbe).await;
    }
}
