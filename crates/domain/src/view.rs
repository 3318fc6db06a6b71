//! Login screen view state.
//!
//! This module defines the state machine the screen renders from,
//! enabling the UI to display exactly one of five views at a time.

use serde::{Deserialize, Serialize};

use crate::session::Session;

/// The current view of the login screen.
///
/// Exactly one variant is active at any time:
/// - `Verifying`: a magic-link token is being verified, show a spinner
/// - `AuthFailed`: verification failed, show the error until dismissed
/// - `AuthSucceeded`: verified, waiting for the session to arrive
/// - `Authenticated`: a session is current, show the welcome view
/// - `Unauthenticated`: no session, show the login form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewState {
    /// A verification token from the launch location is in flight.
    Verifying,

    /// Token verification failed.
    AuthFailed {
        /// The backend's error message, verbatim.
        reason: String,
    },

    /// Verification succeeded but the session notification has not
    /// fired yet.
    AuthSucceeded,

    /// A session is current.
    Authenticated {
        /// The session delivered by the backend.
        session: Session,
    },

    /// No token at mount and no current session.
    #[default]
    Unauthenticated,
}

impl ViewState {
    /// Creates an `AuthFailed` state from an error message.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::AuthFailed {
            reason: reason.into(),
        }
    }

    /// Creates an `Authenticated` state.
    #[must_use]
    pub const fn authenticated(session: Session) -> Self {
        Self::Authenticated { session }
    }

    /// Returns true while a token verification is in flight.
    #[must_use]
    pub const fn is_verifying(&self) -> bool {
        matches!(self, Self::Verifying)
    }

    /// Returns true if verification failed and the error is showing.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::AuthFailed { .. })
    }

    /// Returns true if verified and waiting for the session.
    #[must_use]
    pub const fn is_succeeded(&self) -> bool {
        matches!(self, Self::AuthSucceeded)
    }

    /// Returns true if a session is current.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Returns true if the login form is showing.
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// The current session, if authenticated.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated { session } => Some(session),
            _ => None,
        }
    }

    /// The verification error message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::AuthFailed { reason } => Some(reason),
            _ => None,
        }
    }
}
