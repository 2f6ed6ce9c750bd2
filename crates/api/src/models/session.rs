//! Session-stored identity.

use serde::{Deserialize, Serialize};

use clementine_core::{Role, UserId};

/// Session keys used to store values in tower-sessions.
pub mod session_keys {
    /// The authenticated user (`CurrentUser`).
    pub const CURRENT_USER: &str = "current_user";
}

/// The already-authenticated identity every protected operation receives.
///
/// Stored in the session at login and read back by the auth extractors;
/// core operations only ever see the `(id, role)` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Unique user ID.
    pub id: UserId,
    /// Role captured at login.
    pub role: Role,
    /// Email, kept for logging context.
    pub email: String,
}
