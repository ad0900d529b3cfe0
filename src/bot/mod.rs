/// Command definitions and their handlers
pub mod commands;
/// Transport-independent inbound and outbound messages
pub mod event;
/// Per-actor interactive input state
pub mod flow;
/// Dispatch of incoming events and the Telegram adapter
pub mod handlers;
