/// Access decisions per incoming command
pub mod access;
/// Registered users and their admin flag
pub mod directory;
/// HTTP health endpoints
pub mod health;
/// Invite token issuance and redemption
pub mod invite;

pub use access::{AccessGate, Role};
pub use directory::UserDirectory;
pub use invite::{InviteService, Registration};
