//! Session types supplied by the authentication backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated session.
///
/// Owned by the authentication backend; this application only reads the
/// user's email for display and treats the rest as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque access token issued by the backend.
    pub access_token: String,
    /// When the token expires, if the backend reported it.
    pub expires_at: Option<DateTime<Utc>>,
    /// The user this session belongs to.
    pub user: UserProfile,
}

/// The display-safe subset of the backend's user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The signed-in user's email address.
    pub email: String,
}

impl Session {
    /// Creates a session from an access token and the user's email.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        email: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
            user: UserProfile {
                email: email.into(),
            },
        }
    }

    /// The signed-in user's email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.user.email
    }

    /// Whether the session has passed its reported expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() >= at)
    }
}
