//! Handler for chat messages

use std::io;

use parlor_common::protocol::{ChatMessage, ServerMessage};
use parlor_common::validators;
use tracing::debug;

use super::HandlerContext;
use crate::broadcaster::Broadcaster;
use crate::room::RoomError;

/// Relay a chat message to every connected session
///
/// The message goes out exactly as received. Messages from sessions that have
/// not entered, or with an invalid body, are dropped without a reply.
pub async fn handle_chat_message<B>(
    message: ChatMessage,
    ctx: &HandlerContext<'_, B>,
) -> io::Result<()>
where
    B: Broadcaster,
{
    if ctx.sessions.identity_of(ctx.session_id).await.is_none() {
        debug!(
            session_id = ctx.session_id,
            peer = %ctx.peer_addr,
            "dropping chat message: {}",
            RoomError::NotEntered
        );
        return Ok(());
    }

    if let Err(e) = validators::validate_message(&message.body) {
        debug!(session_id = ctx.session_id, "dropping chat message: {e}");
        return Ok(());
    }

    ctx.broadcast(ServerMessage::ChatMessage(message)).await;
    Ok(())
}
