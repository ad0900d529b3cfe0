pub mod help;
pub mod invite;
pub mod profile;
pub mod start;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Team bot commands:")]
pub enum Command {
    #[command(description = "Start the bot or join with an invite token")]
    Start(String),
    #[command(description = "Show help for your role")]
    Help,
    #[command(description = "How to join the team")]
    Join,
    #[command(description = "Check your admin status")]
    Admin,
    #[command(description = "Create a new invite link (admins only)")]
    CreateInvite,
    #[command(description = "Show the current invite link (admins only)")]
    InviteInfo,
    #[command(description = "Show your personal info")]
    Info,
    #[command(description = "Set your first and last name")]
    Setinfo,
}

impl Command {
    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start(_) => "/start",
            Command::Help => "/help",
            Command::Join => "/join",
            Command::Admin => "/admin",
            Command::CreateInvite => "/create_invite",
            Command::InviteInfo => "/invite_info",
            Command::Info => "/info",
            Command::Setinfo => "/setinfo",
        }
    }
}

/// Inline keyboard actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    SetInfoStart,
    SetInfoCancel,
}

impl CallbackAction {
    pub fn id(self) -> &'static str {
        match self {
            CallbackAction::SetInfoStart => "setinfo_start",
            CallbackAction::SetInfoCancel => "setinfo_cancel",
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "setinfo_start" => Some(CallbackAction::SetInfoStart),
            "setinfo_cancel" => Some(CallbackAction::SetInfoCancel),
            _ => None,
        }
    }
}
