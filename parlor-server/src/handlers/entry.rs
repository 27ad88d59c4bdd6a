//! Handler for entry requests

use std::io;

use parlor_common::protocol::ServerMessage;
use parlor_common::validators::{self, NicknameError};
use tracing::{debug, info, warn};

use super::{
    HandlerContext, err_identity_conflict, err_nickname_empty, err_nickname_invalid,
    err_nickname_too_long,
};
use crate::broadcaster::Broadcaster;
use crate::room::{Announcement, RoomError, resolve_identity};

/// Handle an entry request: resolve, admit and announce an identity
///
/// The requested name is resolved against the roster this session was shown
/// on connect, so the user gets the name their client predicted. If that name
/// was taken in the meantime, resolution is retried once against the live
/// roster; losing that race too rejects the request. The connect snapshot is
/// consumed here, so a later re-entry resolves against the live roster only.
pub async fn handle_entry_request<B>(
    requested: String,
    ctx: &HandlerContext<'_, B>,
) -> io::Result<()>
where
    B: Broadcaster,
{
    let requested = requested.trim();

    if let Some(current) = ctx.sessions.identity_of(ctx.session_id).await
        && ctx.room.contains(&current).await
    {
        debug!(
            session_id = ctx.session_id,
            identity = %current,
            "ignoring entry request from a session that has already entered"
        );
        return Ok(());
    }

    if let Err(e) = validators::validate_nickname(requested) {
        let error = match e {
            NicknameError::Empty => err_nickname_empty(),
            NicknameError::TooLong => err_nickname_too_long(validators::MAX_NICKNAME_LENGTH),
            NicknameError::InvalidCharacters => err_nickname_invalid(),
        };
        debug!(session_id = ctx.session_id, peer = %ctx.peer_addr, "rejecting entry: {e}");
        ctx.reply(ServerMessage::EntryRejected { error }).await;
        return Ok(());
    }

    let observed = ctx.sessions.take_observed_roster(ctx.session_id).await;
    let candidate = resolve_identity(requested, &observed);

    let announcement = match admit_with_retry(requested, candidate, ctx).await {
        Ok(announcement) => announcement,
        Err(RoomError::IdentityConflict(identity)) => {
            warn!(
                session_id = ctx.session_id,
                identity = %identity,
                "entry rejected after losing the identity race twice"
            );
            ctx.reply(ServerMessage::EntryRejected {
                error: err_identity_conflict(&identity),
            })
            .await;
            return Ok(());
        }
        Err(e) => {
            warn!(session_id = ctx.session_id, "entry failed: {e}");
            ctx.reply(ServerMessage::EntryRejected {
                error: e.to_string(),
            })
            .await;
            return Ok(());
        }
    };

    ctx.sessions
        .bind_identity(ctx.session_id, announcement.subject.clone())
        .await;

    info!(
        session_id = ctx.session_id,
        peer = %ctx.peer_addr,
        identity = %announcement.subject,
        present = announcement.roster.len(),
        "entered"
    );
    ctx.broadcast(announcement.into_message()).await;

    Ok(())
}

async fn admit_with_retry<B>(
    requested: &str,
    candidate: String,
    ctx: &HandlerContext<'_, B>,
) -> Result<Announcement, RoomError> {
    match ctx.room.admit(candidate).await {
        Err(RoomError::IdentityConflict(stale)) => {
            let fresh = ctx.room.resolve_identity(requested).await;
            debug!(
                session_id = ctx.session_id,
                stale = %stale,
                fresh = %fresh,
                "identity taken since snapshot, retrying"
            );
            ctx.room.admit(fresh).await
        }
        result => result,
    }
}
