use crate::bot::commands::help::join_instructions;
use crate::bot::commands::profile::personal_info_reminder;
use crate::bot::event::{Actor, Outgoing};
use crate::bot::handlers::BotHandler;
use crate::database::models::User;
use crate::error::{RedeemError, StorageError};
use crate::services::Registration;
use crate::utils::html::escape_html;
use crate::utils::logging::log_invite_event;

/// Plain `/start`.
///
/// Known users get their handle and chat refreshed (admin flag untouched).
/// Unknown users become members only if their handle is a configured admin
/// handle; everyone else is told how to join.
pub async fn handle_start(
    handler: &BotHandler,
    actor: &Actor,
    message_id: i32,
) -> Result<Vec<Outgoing>, StorageError> {
    let registered = handler.directory.exists(actor.id).await?;
    let configured_admin = handler.gate.is_configured_admin_handle(&actor.handle);

    if !registered && !configured_admin {
        return Ok(vec![join_instructions(actor.chat_id)]);
    }

    let user = handler
        .directory
        .register(actor.id, &actor.handle, actor.chat_id, configured_admin)
        .await?;

    let text = if registered {
        format!("👋 Welcome back, {}!", greeting_name(&actor.handle))
    } else {
        format!(
            "👋 Hello, {}! I am the team management bot.\n✅ You are registered as an administrator.",
            greeting_name(&actor.handle)
        )
    };

    Ok(with_reminder(
        Outgoing::html(actor.chat_id, text).replying_to(message_id),
        &user,
    ))
}

/// `/start <token>` from an invite link.
pub async fn handle_start_with_token(
    handler: &BotHandler,
    actor: &Actor,
    message_id: i32,
    token: &str,
) -> Result<Vec<Outgoing>, StorageError> {
    // Members already in do not use up an invite
    if handler.directory.exists(actor.id).await? {
        return handle_start(handler, actor, message_id).await;
    }

    let registration = Registration {
        actor_id: actor.id,
        username: actor.handle.clone(),
        chat_id: actor.chat_id,
        admin_if_new: handler.gate.is_configured_admin_handle(&actor.handle),
    };

    match handler.invites.redeem_and_register(token, &registration).await {
        Ok((invite, user)) => {
            log_invite_event(
                "JOINED",
                &format!("user {}({}) via token #{}", actor.handle, actor.id, invite.id),
            );
            let text = format!(
                "🎉 Welcome to the team, {}!\n\n✅ You have joined the team.\n🔗 Invite uses: {}/{}",
                greeting_name(&actor.handle),
                invite.usage_count,
                invite.max_usage
            );
            Ok(with_reminder(
                Outgoing::html(actor.chat_id, text).replying_to(message_id),
                &user,
            ))
        }
        Err(RedeemError::Storage(e)) => Err(e),
        Err(err) => {
            let mut outgoing = vec![Outgoing::text(
                actor.chat_id,
                format!("❌ Could not join the team: {}", err.user_message()),
            )];
            outgoing.extend(handle_start(handler, actor, message_id).await?);
            Ok(outgoing)
        }
    }
}

fn greeting_name(handle: &str) -> String {
    if handle.is_empty() {
        "there".to_string()
    } else {
        escape_html(handle)
    }
}

fn with_reminder(first: Outgoing, user: &User) -> Vec<Outgoing> {
    let mut outgoing = vec![first];
    outgoing.extend(personal_info_reminder(user));
    outgoing
}
