//! Transport-independent shapes of what the bot receives and sends.

/// The chat participant an event came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    /// Telegram username without `@`; empty when the user has none.
    pub handle: String,
    pub chat_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Any text message, command or not.
    Command {
        actor: Actor,
        message_id: i32,
        text: String,
    },
    /// An inline keyboard button press on `anchor_message_id`.
    CallbackAction {
        actor: Actor,
        action: String,
        anchor_message_id: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: String,
}

/// A message to send or an existing message to rewrite in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Send {
        chat_id: i64,
        text: String,
        html: bool,
        buttons: Vec<Button>,
        reply_to: Option<i32>,
    },
    Edit {
        chat_id: i64,
        message_id: i32,
        text: String,
        buttons: Vec<Button>,
    },
}

impl Outgoing {
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Outgoing::Send {
            chat_id,
            text: text.into(),
            html: false,
            buttons: Vec::new(),
            reply_to: None,
        }
    }

    pub fn html(chat_id: i64, text: impl Into<String>) -> Self {
        Outgoing::Send {
            chat_id,
            text: text.into(),
            html: true,
            buttons: Vec::new(),
            reply_to: None,
        }
    }

    pub fn edit(chat_id: i64, message_id: i32, text: impl Into<String>) -> Self {
        Outgoing::Edit {
            chat_id,
            message_id,
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    /// Adds a button on its own keyboard row.
    pub fn with_button(mut self, label: impl Into<String>, action: impl Into<String>) -> Self {
        let button = Button {
            label: label.into(),
            action: action.into(),
        };
        match &mut self {
            Outgoing::Send { buttons, .. } | Outgoing::Edit { buttons, .. } => buttons.push(button),
        }
        self
    }

    /// Only meaningful for new messages; edits ignore it.
    pub fn replying_to(mut self, message_id: i32) -> Self {
        if let Outgoing::Send { reply_to, .. } = &mut self {
            *reply_to = Some(message_id);
        }
        self
    }

    pub fn body(&self) -> &str {
        match self {
            Outgoing::Send { text, .. } | Outgoing::Edit { text, .. } => text,
        }
    }

    pub fn buttons(&self) -> &[Button] {
        match self {
            Outgoing::Send { buttons, .. } | Outgoing::Edit { buttons, .. } => buttons,
        }
    }
}
