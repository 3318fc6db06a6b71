//! Authentication error and token types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned by the authentication backend.
///
/// The backend does not distinguish network failures from credential
/// failures or rate limiting; all surface as one opaque kind carrying
/// the human-readable message to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthError {
    message: String,
}

impl AuthError {
    /// Creates an error from the backend's message text.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable message, verbatim from the backend.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type alias for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// One-time-password kind carried by a magic-link callback.
///
/// The backend accepts several OTP flavors; a callback without an
/// explicit `type` parameter is treated as `Email`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OtpKind {
    /// Email OTP (the default for magic-link callbacks).
    #[default]
    Email,
    /// Magic-link token.
    Magiclink,
    /// Password recovery token.
    Recovery,
    /// Invitation token.
    Invite,
    /// Signup confirmation token.
    Signup,
    /// Email change confirmation token.
    EmailChange,
}

impl OtpKind {
    /// Parses the `type` query parameter, defaulting to `Email` when the
    /// parameter is absent or unrecognized.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("magiclink") => Self::Magiclink,
            Some("recovery") => Self::Recovery,
            Some("invite") => Self::Invite,
            Some("signup") => Self::Signup,
            Some("email_change") => Self::EmailChange,
            _ => Self::Email,
        }
    }

    /// The wire name expected by the verification endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Magiclink => "magiclink",
            Self::Recovery => "recovery",
            Self::Invite => "invite",
            Self::Signup => "signup",
            Self::EmailChange => "email_change",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_auth_error_message_verbatim() {
        let err = AuthError::new("Token expired");
        assert_eq!(err.message(), "Token expired");
        assert_eq!(err.to_string(), "Token expired");
    }

    #[test]
    fn test_otp_kind_defaults_to_email() {
        assert_eq!(OtpKind::from_query(None), OtpKind::Email);
        assert_eq!(OtpKind::from_query(Some("bogus")), OtpKind::Email);
    }

    #[test]
    fn test_otp_kind_known_values() {
        assert_eq!(OtpKind::from_query(Some("magiclink")), OtpKind::Magiclink);
        assert_eq!(OtpKind::from_query(Some("recovery")), OtpKind::Recovery);
        assert_eq!(OtpKind::Magiclink.as_str(), "magiclink");
        assert_eq!(OtpKind::EmailChange.as_str(), "email_change");
    }
}
