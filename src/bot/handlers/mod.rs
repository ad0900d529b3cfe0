pub mod callback;
pub mod message;
pub mod transport;

use teloxide::{dispatching::UpdateHandler, prelude::*};
use tracing::warn;

use crate::bot::event::{Actor, InboundEvent, Outgoing};
use crate::bot::flow::FlowStore;
use crate::config::InviteDefaults;
use crate::database::connection::DatabaseManager;
use crate::services::{AccessGate, InviteService, UserDirectory};
use crate::utils::logging::{log_access_denied, log_command_error};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

/// Shown whenever a command aborts on a storage failure.
pub const TRY_AGAIN_TEXT: &str = "❌ Something went wrong. Please try again later.";

/// Routes every incoming event to exactly one command handler.
///
/// [`BotHandler::handle`] is independent of Telegram: it takes an
/// [`InboundEvent`] and returns the messages to deliver. [`BotHandler::schema`]
/// wires it into a teloxide dispatcher.
#[derive(Clone)]
pub struct BotHandler {
    pub db: DatabaseManager,
    pub(crate) directory: UserDirectory,
    pub(crate) invites: InviteService,
    pub(crate) gate: AccessGate,
    pub(crate) flows: FlowStore,
    pub(crate) invite_defaults: InviteDefaults,
    pub(crate) bot_username: Option<String>,
}

impl BotHandler {
    pub fn new(db: DatabaseManager, admin_usernames: Vec<String>, invite_defaults: InviteDefaults) -> Self {
        let directory = UserDirectory::new(db.pool.clone());
        Self {
            invites: InviteService::new(db.pool.clone()),
            gate: AccessGate::new(directory.clone(), admin_usernames),
            directory,
            flows: FlowStore::new(),
            invite_defaults,
            bot_username: None,
            db,
        }
    }

    /// Username used for invite links and `/cmd@bot` parsing.
    pub fn with_bot_username(mut self, bot_username: Option<String>) -> Self {
        self.bot_username = bot_username.filter(|name| !name.is_empty());
        self
    }

    pub fn bot_username(&self) -> Option<&str> {
        self.bot_username.as_deref()
    }

    pub fn flows(&self) -> &FlowStore {
        &self.flows
    }

    pub async fn handle(&self, event: InboundEvent) -> Vec<Outgoing> {
        let (actor, label, result) = match event {
            InboundEvent::CallbackAction {
                actor,
                action,
                anchor_message_id,
            } => {
                let result = callback::handle_callback(self, &actor, &action, anchor_message_id).await;
                (actor, action, result)
            }
            InboundEvent::Command {
                actor,
                message_id,
                text,
            } => {
                let result = message::handle_message(self, &actor, message_id, &text).await;
                let label = text.split_whitespace().next().unwrap_or("<text>").to_string();
                (actor, label, result)
            }
        };

        match result {
            Ok(outgoing) => outgoing,
            Err(e) => {
                log_command_error(&label, &actor.handle, actor.id, actor.chat_id, &e.to_string());
                vec![Outgoing::text(actor.chat_id, TRY_AGAIN_TEXT)]
            }
        }
    }

    /// The denial to send if `actor` is not registered.
    pub(crate) async fn deny_unless_registered(&self, actor: &Actor, command: &str) -> Option<Outgoing> {
        if self.gate.check_registered(actor.id).await {
            return None;
        }
        log_access_denied(command, &actor.handle, actor.id, "not registered");
        Some(Outgoing::text(
            actor.chat_id,
            "❌ Access denied. You are not registered.\n\nUse /join to learn how to join the team.",
        ))
    }

    /// The denial to send if `actor` is not an admin.
    pub(crate) async fn deny_unless_admin(&self, actor: &Actor, command: &str) -> Option<Outgoing> {
        if self.gate.check_admin(actor.id).await {
            return None;
        }
        log_access_denied(command, &actor.handle, actor.id, "not an admin");
        Some(Outgoing::text(
            actor.chat_id,
            "❌ Access denied. This command is only available to admins.",
        ))
    }

    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        let on_message = self.clone();
        let on_callback = self.clone();

        dptree::entry()
            .branch(Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                let handler = on_message.clone();
                async move { handler.receive_message(bot, msg).await }
            }))
            .branch(Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                let handler = on_callback.clone();
                async move { handler.receive_callback(bot, q).await }
            }))
    }

    async fn receive_message(&self, bot: Bot, msg: Message) -> HandlerResult {
        let Some(user) = msg.from() else {
            return Ok(());
        };

        let event = InboundEvent::Command {
            actor: Actor {
                id: user.id.0 as i64,
                handle: user.username.clone().unwrap_or_default(),
                chat_id: msg.chat.id.0,
            },
            message_id: msg.id.0,
            text: msg.text().or_else(|| msg.caption()).unwrap_or_default().to_string(),
        };

        transport::deliver(&bot, self.handle(event).await).await;
        Ok(())
    }

    async fn receive_callback(&self, bot: Bot, q: CallbackQuery) -> HandlerResult {
        if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
            warn!("Failed to answer callback query: {}", e);
        }

        let (Some(message), Some(action)) = (q.message.as_ref(), q.data.clone()) else {
            return Ok(());
        };

        let event = InboundEvent::CallbackAction {
            actor: Actor {
                id: q.from.id.0 as i64,
                handle: q.from.username.clone().unwrap_or_default(),
                chat_id: message.chat.id.0,
            },
            action,
            anchor_message_id: message.id.0,
        };

        transport::deliver(&bot, self.handle(event).await).await;
        Ok(())
    }
}
