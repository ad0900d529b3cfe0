use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode};
use tracing::warn;

use crate::bot::event::{Button, Outgoing};

/// Sends each message in order. A failed send is logged and does not stop
/// the rest.
pub async fn deliver(bot: &Bot, outgoing: Vec<Outgoing>) {
    for item in outgoing {
        if let Err(e) = send_one(bot, item).await {
            warn!("TRANSPORT_ERROR: {}", e);
        }
    }
}

async fn send_one(bot: &Bot, item: Outgoing) -> ResponseResult<()> {
    match item {
        Outgoing::Send {
            chat_id,
            text,
            html,
            buttons,
            reply_to,
        } => {
            let mut request = bot.send_message(ChatId(chat_id), text);
            if html {
                request = request.parse_mode(ParseMode::Html);
            }
            if let Some(keyboard) = keyboard(&buttons) {
                request = request.reply_markup(keyboard);
            }
            if let Some(message_id) = reply_to {
                request = request.reply_to_message_id(MessageId(message_id));
            }
            request.await?;
        }
        Outgoing::Edit {
            chat_id,
            message_id,
            text,
            buttons,
        } => {
            let mut request = bot.edit_message_text(ChatId(chat_id), MessageId(message_id), text);
            if let Some(keyboard) = keyboard(&buttons) {
                request = request.reply_markup(keyboard);
            }
            request.await?;
        }
    }

    Ok(())
}

fn keyboard(buttons: &[Button]) -> Option<InlineKeyboardMarkup> {
    if buttons.is_empty() {
        return None;
    }

    let rows = buttons
        .iter()
        .map(|b| vec![InlineKeyboardButton::callback(b.label.clone(), b.action.clone())]);
    Some(InlineKeyboardMarkup::new(rows))
}
