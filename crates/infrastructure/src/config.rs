//! Environment-sourced configuration.
//!
//! The authentication client needs the backend endpoint and the public
//! API key before anything else is constructed; a missing or malformed
//! value is a startup error, not something the screen handles.

use thiserror::Error;
use url::Url;

/// Environment variable naming the backend's base URL.
pub const AUTH_URL_VAR: &str = "SESAME_AUTH_URL";

/// Environment variable carrying the public API key.
pub const AUTH_KEY_VAR: &str = "SESAME_AUTH_KEY";

/// Environment variable overriding the magic-link redirect address.
pub const REDIRECT_URL_VAR: &str = "SESAME_REDIRECT_URL";

/// Where magic links send the user back to unless configured otherwise.
const DEFAULT_REDIRECT_URL: &str = "sesame://auth/callback";

/// Configuration error raised at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("missing required environment variable {0}")]
    MissingVariable(&'static str),

    /// An environment variable does not hold a valid URL.
    #[error("invalid URL in {variable}: {message}")]
    InvalidUrl {
        /// The offending variable.
        variable: &'static str,
        /// The parser's message.
        message: String,
    },
}

/// Connection settings for the managed authentication backend.
#[derive(Debug, Clone)]
pub struct AuthBackendConfig {
    base_url: Url,
    api_key: String,
    redirect_url: Url,
}

impl AuthBackendConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is absent or
    /// a URL fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_url(AUTH_URL_VAR, &required(AUTH_URL_VAR)?)?;
        let api_key = required(AUTH_KEY_VAR)?;
        let redirect_url = match optional(REDIRECT_URL_VAR) {
            Some(value) => parse_url(REDIRECT_URL_VAR, &value)?,
            None => parse_url(REDIRECT_URL_VAR, DEFAULT_REDIRECT_URL)?,
        };

        Ok(Self {
            base_url,
            api_key,
            redirect_url,
        })
    }

    /// Builds a configuration from explicit values (tests, tooling).
    #[must_use]
    pub const fn new(base_url: Url, api_key: String, redirect_url: Url) -> Self {
        Self {
            base_url,
            api_key,
            redirect_url,
        }
    }

    /// The backend's base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The public API key sent with every request.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The address magic links send the user back to.
    #[must_use]
    pub const fn redirect_url(&self) -> &Url {
        &self.redirect_url
    }
}

fn required(variable: &'static str) -> Result<String, ConfigError> {
    optional(variable).ok_or(ConfigError::MissingVariable(variable))
}

fn optional(variable: &'static str) -> Option<String> {
    std::env::var(variable).ok().filter(|v| !v.trim().is_empty())
}

fn parse_url(variable: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        variable,
        message: e.to_string(),
    })
}
