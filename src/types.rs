//! Data model shared by the session and content stores.
//!
//! DESIGN
//! ======
//! Field names serialize in camelCase so a persisted session and a post
//! dumped by the CLI keep the shape the browser front-end used
//! (`userId`, `createdAt`, `isAuthenticated`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// USER / SESSION
// =============================================================================

/// The identity established by a successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    /// Display name.
    pub name: String,
}

/// Authentication state of the current user.
///
/// `authenticated` is true exactly when both `user` and `token` are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    #[serde(rename = "isAuthenticated", default)]
    pub authenticated: bool,
}

impl Session {
    /// Build an authenticated session for `user` holding `token`.
    #[must_use]
    pub fn authenticated(user: User, token: String) -> Self {
        Self { user: Some(user), token: Some(token), authenticated: true }
    }

    /// Recompute `authenticated` from the presence of user and token.
    ///
    /// Used when restoring a session from storage that may have been
    /// edited or truncated by hand.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.authenticated = self.user.is_some() && self.token.is_some();
        self
    }
}

/// Result of a login or register attempt.
///
/// Validation failures are reported here rather than as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthOutcome {
    #[must_use]
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, error: Some(message.into()) }
    }
}

// =============================================================================
// POST
// =============================================================================

/// A blog post held in the content collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique within the in-memory collection.
    pub id: u64,
    /// Owning user.
    pub user_id: u64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
