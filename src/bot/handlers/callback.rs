use tracing::info;

use crate::bot::commands::{profile, CallbackAction};
use crate::bot::event::{Actor, Outgoing};
use crate::bot::handlers::BotHandler;
use crate::error::StorageError;

pub async fn handle_callback(
    handler: &BotHandler,
    actor: &Actor,
    data: &str,
    anchor_message_id: i32,
) -> Result<Vec<Outgoing>, StorageError> {
    info!(
        "Callback received: '{}' from user {} ({}) in chat {}",
        data, actor.handle, actor.id, actor.chat_id
    );

    match CallbackAction::parse(data) {
        Some(CallbackAction::SetInfoStart) => {
            profile::start_flow(handler, actor, anchor_message_id).await
        }
        Some(CallbackAction::SetInfoCancel) => Ok(profile::cancel_flow(handler, actor, anchor_message_id)),
        // Stale or foreign buttons: the query is already answered, nothing else to do
        None => Ok(Vec::new()),
    }
}
