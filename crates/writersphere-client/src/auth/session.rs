//! Signed-in user and token state.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use writersphere_core::{Role, UserId};

/// Refresh this many seconds before the access token actually expires.
pub const EXPIRY_MARGIN_SECS: i64 = 30;

/// An authenticated user as returned by the auth API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User id; the `writer_id` on every owned row.
    pub id: UserId,
    /// Email address, when known.
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form metadata set at sign-up. Carries `role`.
    #[serde(default)]
    pub user_metadata: Value,
}

impl User {
    /// The role stored in user metadata, if it is a known one.
    pub fn role(&self) -> Option<Role> {
        Role::from_metadata(&self.user_metadata)
    }
}

/// Access and refresh tokens for a signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for table and storage requests.
    pub access_token: String,
    /// Token used to obtain a new access token.
    pub refresh_token: String,
    /// Usually `bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds at issue time.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix timestamp at which the access token expires.
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// The user this session belongs to.
    pub user: User,
}

impl Session {
    /// Fill `expires_at` from `expires_in` when the server sent only the latter.
    pub(crate) fn stamped(mut self) -> Self {
        if self.expires_at.is_none()
            && let Some(expires_in) = self.expires_in
        {
            self.expires_at = Some(Utc::now().timestamp() + expires_in);
        }
        self
    }

    /// Whether the access token is expired (or about to be) at `now`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at
            .is_some_and(|at| now + EXPIRY_MARGIN_SECS >= at)
    }

    /// Whether the access token is expired (or about to be) right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Shortcut for the user id.
    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    /// Shortcut for the user's role.
    pub fn role(&self) -> Option<Role> {
        self.user.role()
    }
}
