use chrono::Utc;

use crate::bot::event::{Actor, Outgoing};
use crate::bot::handlers::BotHandler;
use crate::database::models::InviteToken;
use crate::error::{IssueError, StorageError};
use crate::services::InviteService;
use crate::utils::datetime::{format_datetime, format_time_left};
use crate::utils::logging::{log_command_error, log_invite_event};

pub async fn handle_create_invite(handler: &BotHandler, actor: &Actor) -> Result<Vec<Outgoing>, StorageError> {
    if let Some(denied) = handler.deny_unless_registered(actor, "/create_invite").await {
        return Ok(vec![denied]);
    }
    if let Some(denied) = handler.deny_unless_admin(actor, "/create_invite").await {
        return Ok(vec![denied]);
    }

    let defaults = handler.invite_defaults;
    let invite = match handler
        .invites
        .create_invite(actor.id, defaults.validity_hours, defaults.max_usage)
        .await
    {
        Ok(invite) => invite,
        Err(IssueError::Storage(e)) => return Err(e),
        Err(e) => {
            log_command_error("/create_invite", &actor.handle, actor.id, actor.chat_id, &e.to_string());
            return Ok(vec![Outgoing::text(
                actor.chat_id,
                "❌ Invite settings are out of range. Check INVITE_VALIDITY_HOURS and INVITE_MAX_USAGE.",
            )]);
        }
    };

    let text = format!(
        "✅ <b>New invite created</b>\n\n\
        {}\n\n\
        ⏰ Valid for: {} hours\n\
        👥 Max uses: {}\n\
        📅 Expires: {}\n\n\
        ⚠️ The previous invite link no longer works.",
        render_link(handler.bot_username.as_deref(), &invite),
        defaults.validity_hours,
        invite.max_usage,
        format_datetime(&invite.expires_at),
    );

    Ok(vec![Outgoing::html(actor.chat_id, text)])
}

pub async fn handle_invite_info(handler: &BotHandler, actor: &Actor) -> Result<Vec<Outgoing>, StorageError> {
    if let Some(denied) = handler.deny_unless_registered(actor, "/invite_info").await {
        return Ok(vec![denied]);
    }
    if let Some(denied) = handler.deny_unless_admin(actor, "/invite_info").await {
        return Ok(vec![denied]);
    }

    let now = Utc::now();
    let Some(invite) = handler.invites.current_invite().await? else {
        log_invite_event("INFO", "no active invite");
        return Ok(vec![Outgoing::text(
            actor.chat_id,
            "❌ There are no active invites.\n\nUse /create_invite to create one.",
        )]);
    };

    let time_left = invite
        .remaining_at(now)
        .map(format_time_left)
        .unwrap_or_else(|| "expired".to_string());

    let text = format!(
        "📋 <b>Current invite</b>\n\n\
        {}\n\n\
        ⏰ Time left: {}\n\
        👥 Used: {}/{}\n\
        📅 Created: {}\n\
        📅 Expires: {}",
        render_link(handler.bot_username.as_deref(), &invite),
        time_left,
        invite.usage_count,
        invite.max_usage,
        format_datetime(&invite.created_at),
        format_datetime(&invite.expires_at),
    );

    Ok(vec![Outgoing::html(actor.chat_id, text)])
}

/// Tokens are hex, so they need no HTML escaping.
fn render_link(bot_username: Option<&str>, invite: &InviteToken) -> String {
    match bot_username {
        Some(bot) => format!(
            "🔗 Link: {}\n🔑 Token: <code>{}</code>",
            InviteService::format_invite_link(bot, &invite.token),
            invite.token
        ),
        None => format!(
            "🔑 Token: <code>{}</code>\n\nNew members join by sending <code>/start {}</code>",
            invite.token, invite.token
        ),
    }
}
