/// Date and duration formatting
pub mod datetime;
/// Escaping for Telegram HTML messages
pub mod html;
/// Structured log helpers
pub mod logging;
/// User input validation
pub mod validation;
