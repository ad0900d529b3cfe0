use crate::bot::commands::CallbackAction;
use crate::bot::event::{Actor, Outgoing};
use crate::bot::flow::{FlowOutcome, FlowStep};
use crate::bot::handlers::BotHandler;
use crate::database::models::User;
use crate::error::{DirectoryError, StorageError};
use crate::utils::html::escape_html;
use crate::utils::logging::{log_database_error, log_validation_error};

const CANCEL_LABEL: &str = "❌ Cancel";
const FIRST_NAME_PROMPT: &str = "✏️ Enter your first name:";
const LAST_NAME_PROMPT: &str = "✏️ Enter your last name:";

/// Nudge shown to members whose first or last name is still missing.
pub fn personal_info_reminder(user: &User) -> Option<Outgoing> {
    if user.has_personal_info() {
        return None;
    }

    Some(
        Outgoing::text(
            user.chat_id,
            "📝 Your first and last name are not set yet.\n\nUse /setinfo so the team knows who you are.",
        )
        .with_button("✏️ Set name", CallbackAction::SetInfoStart.id()),
    )
}

pub async fn handle_admin_status(handler: &BotHandler, actor: &Actor) -> Result<Vec<Outgoing>, StorageError> {
    if let Some(denied) = handler.deny_unless_registered(actor, "/admin").await {
        return Ok(vec![denied]);
    }

    let text = if handler.directory.is_admin(actor.id).await? {
        "👑 You are an administrator."
    } else {
        "👤 You are a team member without admin rights."
    };

    Ok(vec![Outgoing::text(actor.chat_id, text)])
}

pub async fn handle_info(handler: &BotHandler, actor: &Actor) -> Result<Vec<Outgoing>, StorageError> {
    if let Some(denied) = handler.deny_unless_registered(actor, "/info").await {
        return Ok(vec![denied]);
    }

    let Some(user) = handler.directory.get_by_id(actor.id).await? else {
        return Ok(vec![Outgoing::text(actor.chat_id, "❌ User not found.")]);
    };

    let show = |value: &Option<String>| {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(escape_html)
            .unwrap_or_else(|| "<i>not set</i>".to_string())
    };
    let handle = if user.username.is_empty() {
        "<i>none</i>".to_string()
    } else {
        format!("@{}", escape_html(&user.username))
    };

    let mut text = format!(
        "👤 <b>Your info</b>\n\n\
        First name: {}\n\
        Last name: {}\n\
        Username: {}",
        show(&user.first_name),
        show(&user.last_name),
        handle
    );
    if !user.has_personal_info() {
        text.push_str("\n\nUse /setinfo to fill in your name.");
    }

    Ok(vec![Outgoing::html(actor.chat_id, text)])
}

pub async fn handle_setinfo(handler: &BotHandler, actor: &Actor) -> Result<Vec<Outgoing>, StorageError> {
    if let Some(denied) = handler.deny_unless_registered(actor, "/setinfo").await {
        return Ok(vec![denied]);
    }

    Ok(vec![Outgoing::text(
        actor.chat_id,
        "📝 Set your first and last name.\n\nPress the button below to start.",
    )
    .with_button("✏️ Start input", CallbackAction::SetInfoStart.id())])
}

/// Opens the name flow on the message that carried the button.
pub async fn start_flow(
    handler: &BotHandler,
    actor: &Actor,
    anchor_message_id: i32,
) -> Result<Vec<Outgoing>, StorageError> {
    if let Some(denied) = handler.deny_unless_registered(actor, "setinfo_start").await {
        return Ok(vec![denied]);
    }

    handler.flows.begin(actor.id, anchor_message_id);

    Ok(vec![Outgoing::edit(actor.chat_id, anchor_message_id, FIRST_NAME_PROMPT)
        .with_button(CANCEL_LABEL, CallbackAction::SetInfoCancel.id())])
}

pub fn cancel_flow(handler: &BotHandler, actor: &Actor, anchor_message_id: i32) -> Vec<Outgoing> {
    handler.flows.cancel(actor.id);
    vec![Outgoing::edit(
        actor.chat_id,
        anchor_message_id,
        "❌ Personal info update cancelled.",
    )]
}

/// Feeds a text message into the actor's open flow.
pub async fn handle_flow_input(
    handler: &BotHandler,
    actor: &Actor,
    text: &str,
) -> Result<Vec<Outgoing>, StorageError> {
    match handler.flows.advance(actor.id, text) {
        FlowOutcome::NoFlow => Ok(vec![Outgoing::text(
            actor.chat_id,
            "Nothing to fill in right now. Use /setinfo to set your name.",
        )]),
        FlowOutcome::Rejected { step, reason } => {
            let (field, prompt) = match step {
                FlowStep::WaitingName => ("first_name", "First name"),
                FlowStep::WaitingSurname { .. } => ("last_name", "Last name"),
            };
            log_validation_error("setinfo", field, &reason, actor.id, actor.chat_id);
            Ok(vec![Outgoing::text(
                actor.chat_id,
                format!("❌ {prompt} {reason}. Please try again:"),
            )
            .with_button(CANCEL_LABEL, CallbackAction::SetInfoCancel.id())])
        }
        FlowOutcome::NameCaptured { first_name } => Ok(vec![Outgoing::text(
            actor.chat_id,
            format!("✅ First name: {first_name}\n\n{LAST_NAME_PROMPT}"),
        )
        .with_button(CANCEL_LABEL, CallbackAction::SetInfoCancel.id())]),
        FlowOutcome::Completed {
            first_name,
            last_name,
            anchor_message_id,
        } => {
            // The flow is already closed; whatever happens below, the next
            // attempt starts from /setinfo.
            match handler
                .directory
                .set_personal_info(actor.id, &first_name, &last_name)
                .await
            {
                Ok(()) => Ok(vec![Outgoing::edit(
                    actor.chat_id,
                    anchor_message_id,
                    format!(
                        "✅ Personal info saved!\n\n👤 First name: {first_name}\n👤 Last name: {last_name}"
                    ),
                )]),
                Err(DirectoryError::NotFound(_)) => Ok(vec![Outgoing::text(
                    actor.chat_id,
                    "❌ You are not registered. Use /join to learn how to join the team.",
                )]),
                Err(DirectoryError::Storage(e)) => {
                    log_database_error("SET_PERSONAL_INFO", "users", &e.to_string());
                    Ok(vec![Outgoing::text(
                        actor.chat_id,
                        "❌ Failed to save your personal info. Please try /setinfo again.",
                    )])
                }
            }
        }
    }
}
