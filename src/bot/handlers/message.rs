use teloxide::utils::command::BotCommands;

use crate::bot::commands::{help, invite, profile, start, Command};
use crate::bot::event::{Actor, Outgoing};
use crate::bot::handlers::BotHandler;
use crate::error::StorageError;
use crate::utils::logging::{log_command_start, log_command_success};

/// Text messages, in order of precedence: an open input flow takes the
/// message whatever it says, then `/start <token>`, then known commands,
/// then the unknown-command fallback.
pub async fn handle_message(
    handler: &BotHandler,
    actor: &Actor,
    message_id: i32,
    text: &str,
) -> Result<Vec<Outgoing>, StorageError> {
    if handler.flows.is_active(actor.id) {
        return profile::handle_flow_input(handler, actor, text).await;
    }

    let bot_username = handler.bot_username.as_deref().unwrap_or_default();
    let Ok(command) = Command::parse(text, bot_username) else {
        return handle_unknown(handler, actor).await;
    };

    log_command_start(command.name(), &actor.handle, actor.id, actor.chat_id);

    let outgoing = match &command {
        Command::Start(arg) if !arg.trim().is_empty() => {
            start::handle_start_with_token(handler, actor, message_id, arg.trim()).await?
        }
        Command::Start(_) => start::handle_start(handler, actor, message_id).await?,
        Command::Help => help::handle_help(handler, actor).await?,
        Command::Join => vec![help::join_instructions(actor.chat_id)],
        Command::Admin => profile::handle_admin_status(handler, actor).await?,
        Command::CreateInvite => invite::handle_create_invite(handler, actor).await?,
        Command::InviteInfo => invite::handle_invite_info(handler, actor).await?,
        Command::Info => profile::handle_info(handler, actor).await?,
        Command::Setinfo => profile::handle_setinfo(handler, actor).await?,
    };

    log_command_success(command.name(), &actor.handle, actor.id, actor.chat_id, None);
    Ok(outgoing)
}

async fn handle_unknown(handler: &BotHandler, actor: &Actor) -> Result<Vec<Outgoing>, StorageError> {
    if let Some(denied) = handler.deny_unless_registered(actor, "unknown").await {
        return Ok(vec![denied]);
    }

    Ok(vec![Outgoing::text(
        actor.chat_id,
        "Unknown command. Use /help to see what I can do.",
    )])
}
