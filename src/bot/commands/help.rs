use crate::bot::commands::profile::personal_info_reminder;
use crate::bot::event::{Actor, Outgoing};
use crate::bot::handlers::BotHandler;
use crate::config::InviteDefaults;
use crate::error::StorageError;
use crate::services::Role;
use crate::utils::logging::log_database_error;

/// Help text matching the actor's role. A storage failure falls back to the
/// guest text instead of an error.
pub async fn handle_help(handler: &BotHandler, actor: &Actor) -> Result<Vec<Outgoing>, StorageError> {
    let user = match handler.directory.get_by_id(actor.id).await {
        Ok(user) => user,
        Err(e) => {
            log_database_error("GET_BY_ID", "users", &e.to_string());
            None
        }
    };

    let role = Role::of(user.as_ref());
    let mut outgoing = vec![Outgoing::html(actor.chat_id, help_text(role, handler.invite_defaults))];
    if let Some(user) = &user {
        outgoing.extend(personal_info_reminder(user));
    }

    Ok(outgoing)
}

pub fn help_text(role: Role, defaults: InviteDefaults) -> String {
    match role {
        Role::Guest => "🤖 <b>Help: Guest</b>\n\n\
            <b>Available commands:</b>\n\n\
            /start - Start the bot and register\n\
            /help - Show this help\n\
            /join - How to join the team\n\n\
            <b>How to join the team:</b>\n\
            1. Get an invite link from an administrator\n\
            2. Open it, or send /start with the token\n\n\
            <b>Example:</b> <code>/start abc123def456</code>"
            .to_string(),
        Role::Member => "🤖 <b>Help: Team member</b>\n\n\
            <b>Available commands:</b>\n\n\
            /start - Restart the bot\n\
            /help - Show this help\n\
            /admin - Check your admin status\n\
            /info - Show your personal info\n\
            /setinfo - Set your first and last name\n\n\
            <b>Status:</b> ✅ You are a registered team member"
            .to_string(),
        Role::Admin => format!(
            "🤖 <b>Help: Administrator</b>\n\n\
            <b>Available commands:</b>\n\n\
            /start - Restart the bot\n\
            /help - Show this help\n\
            /admin - Check your admin status\n\
            /info - Show your personal info\n\
            /setinfo - Set your first and last name\n\n\
            <b>Invite management:</b>\n\
            /create_invite - Create an invite link\n\
            /invite_info - Show the current invite link\n\n\
            <b>General:</b>\n\
            /join - How to join the team\n\n\
            <b>Status:</b> 👑 You are an administrator\n\n\
            New invite links are valid for {} hours and up to {} uses. \
            Creating a link disables the previous one.",
            defaults.validity_hours, defaults.max_usage
        ),
    }
}

pub fn join_instructions(chat_id: i64) -> Outgoing {
    Outgoing::html(
        chat_id,
        "🔗 <b>Joining the team</b>\n\n\
        You need an invite link from an administrator to join.\n\n\
        <b>How to join:</b>\n\
        1. Get an invite link from an administrator\n\
        2. Open it, or send /start with the token\n\n\
        <b>Example:</b> <code>/start abc123def456</code>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_text_per_role() {
        let defaults = InviteDefaults::default();
        let guest = help_text(Role::Guest, defaults);
        let member = help_text(Role::Member, defaults);
        let admin = help_text(Role::Admin, defaults);

        assert!(guest.contains("/join"));
        assert!(!guest.contains("/create_invite"));
        assert!(member.contains("/setinfo"));
        assert!(!member.contains("/create_invite"));
        assert!(admin.contains("/create_invite"));
        assert!(admin.contains("24 hours and up to 50 uses"));
    }
}
