use team_invite_bot::bot::commands::{CallbackAction, Command};
use teloxide::utils::command::BotCommands;

#[cfg(test)]
mod command_parsing_tests {
    use super::*;

    #[test]
    fn test_start_without_token() {
        let result = Command::parse("/start", "testbot");
        assert_eq!(result.unwrap(), Command::Start(String::new()));
    }

    #[test]
    fn test_start_with_token() {
        let result = Command::parse("/start 0123456789abcdef", "testbot");
        assert_eq!(result.unwrap(), Command::Start("0123456789abcdef".to_string()));
    }

    #[test]
    fn test_snake_case_commands() {
        assert_eq!(Command::parse("/create_invite", "testbot").unwrap(), Command::CreateInvite);
        assert_eq!(Command::parse("/invite_info", "testbot").unwrap(), Command::InviteInfo);
        assert_eq!(Command::parse("/setinfo", "testbot").unwrap(), Command::Setinfo);
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(Command::parse("/help", "testbot").unwrap(), Command::Help);
        assert_eq!(Command::parse("/join", "testbot").unwrap(), Command::Join);
        assert_eq!(Command::parse("/admin", "testbot").unwrap(), Command::Admin);
        assert_eq!(Command::parse("/info", "testbot").unwrap(), Command::Info);
    }

    #[test]
    fn test_command_with_bot_mention() {
        let result = Command::parse("/help@testbot", "testbot");
        assert_eq!(result.unwrap(), Command::Help);
    }

    #[test]
    fn test_command_for_other_bot_is_rejected() {
        assert!(Command::parse("/help@otherbot", "testbot").is_err());
    }

    #[test]
    fn test_invalid_command_parsing() {
        assert!(Command::parse("/invalid", "testbot").is_err());
        assert!(Command::parse("/schedule", "testbot").is_err());
    }

    #[test]
    fn test_non_command_text() {
        assert!(Command::parse("hello there", "testbot").is_err());
        assert!(Command::parse("", "testbot").is_err());
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::Start(String::new()).name(), "/start");
        assert_eq!(Command::CreateInvite.name(), "/create_invite");
        assert_eq!(Command::InviteInfo.name(), "/invite_info");
    }

    #[test]
    fn test_command_list_contains_all_commands() {
        let names: Vec<String> = Command::bot_commands()
            .into_iter()
            .map(|c| c.command)
            .collect();

        for expected in ["start", "help", "join", "admin", "create_invite", "invite_info", "info", "setinfo"] {
            assert!(
                names.iter().any(|n| n.trim_start_matches('/') == expected),
                "missing {expected} in {names:?}"
            );
        }
    }

    #[test]
    fn test_callback_actions() {
        for action in [CallbackAction::SetInfoStart, CallbackAction::SetInfoCancel] {
            assert_eq!(CallbackAction::parse(action.id()), Some(action));
        }
        assert_eq!(CallbackAction::parse("unknown"), None);
        assert_eq!(CallbackAction::parse(""), None);
    }
}
