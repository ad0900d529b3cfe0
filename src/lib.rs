//! # Team Invite Bot
//!
//! A Telegram bot that gates a small set of team-management commands behind
//! invite links.
//!
//! ## Features
//! - One active invite link at a time, with expiry and a usage ceiling
//! - Registration through invite links or a configured admin list
//! - Role-aware help and admin-only invite management
//! - Interactive first/last name capture
//! - Persistent storage with SQLite

/// Command handlers, dispatch and the interactive flow state
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Error types shared across the services
pub mod error;
/// User directory, invite lifecycle, access gate and health endpoints
pub mod services;
/// Utility functions for formatting, validation and logging
pub mod utils;
