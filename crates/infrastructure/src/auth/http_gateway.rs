//! HTTP authentication gateway.
//!
//! Speaks the managed backend's wire protocol: `POST /auth/v1/otp` to
//! send a magic link, `POST /auth/v1/verify` to exchange a token hash
//! for a session, `POST /auth/v1/logout` to sign out. Every request
//! carries the public API key.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sesame_application::{AuthGateway, SessionEvents};
use sesame_domain::{AuthError, AuthResult, OtpKind, Session};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::AuthBackendConfig;

use super::SessionHub;

/// Header carrying the public API key.
const API_KEY_HEADER: &str = "apikey";

/// Magic-link send request body.
#[derive(Debug, Serialize)]
struct OtpRequest<'a> {
    email: &'a str,
    create_user: bool,
}

/// Token verification request body.
#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    token_hash: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

/// Session payload returned by the verification endpoint.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: WireUser,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    #[serde(default)]
    email: String,
}

impl SessionResponse {
    fn into_session(self) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .or_else(|| {
                self.expires_in
                    .map(|secs| Utc::now() + chrono::Duration::seconds(secs.cast_signed()))
            });
        Session::new(self.access_token, self.user.email, expires_at)
    }
}

/// Error payload shapes the backend is known to produce.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Maps an error body to the message shown to the user, preferring the
/// most descriptive field and falling back to the raw body or status.
fn auth_error_from_body(status: reqwest::StatusCode, body: &str) -> AuthError {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        if let Some(message) = parsed
            .error_description
            .or(parsed.msg)
            .or(parsed.error)
        {
            return AuthError::new(message);
        }
    }
    if body.trim().is_empty() {
        AuthError::new(format!("request failed with status {status}"))
    } else {
        AuthError::new(body.trim())
    }
}

fn transport_error(error: &reqwest::Error) -> AuthError {
    AuthError::new(error.to_string())
}

/// Gateway adapter over the backend's HTTP API.
///
/// The current session lives only in the embedded [`SessionHub`];
/// nothing is persisted, so a restart starts signed out.
pub struct HttpAuthGateway {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    hub: SessionHub,
}

impl HttpAuthGateway {
    /// Creates a gateway from backend configuration.
    #[must_use]
    pub fn new(config: &AuthBackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url().clone(),
            api_key: config.api_key().to_string(),
            hub: SessionHub::new(),
        }
    }

    /// The session hub backing this gateway.
    #[must_use]
    pub const fn hub(&self) -> &SessionHub {
        &self.hub
    }

    fn endpoint(&self, path: &str) -> AuthResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AuthError::new(format!("invalid endpoint {path}: {e}")))
    }

    async fn failure(response: reqwest::Response) -> AuthError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        auth_error_from_body(status, &body)
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn send_magic_link(&self, email: &str, redirect_to: &Url) -> AuthResult<()> {
        let mut url = self.endpoint("auth/v1/otp")?;
        url.query_pairs_mut()
            .append_pair("redirect_to", redirect_to.as_str());

        tracing::debug!(%url, "requesting magic link");
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&OtpRequest {
                email,
                create_user: true,
            })
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::failure(response).await)
        }
    }

    async fn verify_token(&self, token_hash: &str, kind: OtpKind) -> AuthResult<Session> {
        let url = self.endpoint("auth/v1/verify")?;

        tracing::debug!(kind = kind.as_str(), "verifying token hash");
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&VerifyRequest {
                token_hash,
                kind: kind.as_str(),
            })
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }

        let payload: SessionResponse = response
            .json()
            .await
            .map_err(|e| AuthError::new(format!("malformed session payload: {e}")))?;
        let session = payload.into_session();
        self.hub.replace(Some(session.clone()));
        Ok(session)
    }

    async fn current_session(&self) -> Option<Session> {
        self.hub.current().filter(|session| !session.is_expired())
    }

    fn subscribe(&self) -> SessionEvents {
        self.hub.subscribe()
    }

    async fn sign_out(&self) -> AuthResult<()> {
        let token = self.hub.current().map(|session| session.access_token);

        let outcome = match token {
            None => Ok(()),
            Some(token) => {
                let url = self.endpoint("auth/v1/logout")?;
                match self
                    .http
                    .post(url)
                    .header(API_KEY_HEADER, &self.api_key)
                    .bearer_auth(token)
                    .send()
                    .await
                {
                    Ok(response) if response.status().is_success() => Ok(()),
                    Ok(response) => Err(Self::failure(response).await),
                    Err(e) => Err(transport_error(&e)),
                }
            }
        };

        // The local session is gone either way; the backend may still
        // consider the token valid.
        self.hub.replace(None);
        outcome
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gateway() -> HttpAuthGateway {
        let config = AuthBackendConfig::new(
            Url::parse("https://auth.example.com").unwrap(),
            "public-key".to_string(),
            Url::parse("sesame://auth/callback").unwrap(),
        );
        HttpAuthGateway::new(&config)
    }

    #[test]
    fn test_endpoints_join_base_url() {
        let gateway = gateway();
        assert_eq!(
            gateway.endpoint("auth/v1/otp").unwrap().as_str(),
            "https://auth.example.com/auth/v1/otp"
        );
        assert_eq!(
            gateway.endpoint("auth/v1/verify").unwrap().as_str(),
            "https://auth.example.com/auth/v1/verify"
        );
    }

    #[test]
    fn test_verify_request_wire_shape() {
        let body = serde_json::to_value(VerifyRequest {
            token_hash: "abc123",
            kind: OtpKind::Email.as_str(),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "token_hash": "abc123", "type": "email" })
        );
    }

    #[test]
    fn test_session_payload_maps_to_session() {
        let payload: SessionResponse = serde_json::from_str(
            r#"{
                "access_token": "jwt-token",
                "token_type": "bearer",
                "expires_in": 3600,
                "expires_at": 1767225600,
                "user": { "id": "u1", "email": "user@example.com" }
            }"#,
        )
        .unwrap();

        let session = payload.into_session();
        assert_eq!(session.email(), "user@example.com");
        assert_eq!(session.access_token, "jwt-token");
        assert_eq!(
            session.expires_at,
            DateTime::from_timestamp(1_767_225_600, 0)
        );
    }

    #[test]
    fn test_session_payload_without_expiry() {
        let payload: SessionResponse = serde_json::from_str(
            r#"{ "access_token": "jwt-token", "user": {} }"#,
        )
        .unwrap();

        let session = payload.into_session();
        assert_eq!(session.email(), "");
        assert!(session.expires_at.is_none());
    }

    #[test]
    fn test_error_body_precedence() {
        let status = reqwest::StatusCode::FORBIDDEN;

        let err = auth_error_from_body(
            status,
            r#"{ "error": "access_denied", "error_description": "Token expired" }"#,
        );
        assert_eq!(err.message(), "Token expired");

        let err = auth_error_from_body(status, r#"{ "msg": "Token has expired or is invalid" }"#);
        assert_eq!(err.message(), "Token has expired or is invalid");

        let err = auth_error_from_body(status, r#"{ "error": "access_denied" }"#);
        assert_eq!(err.message(), "access_denied");
    }

    #[test]
    fn test_error_body_fallbacks() {
        let status = reqwest::StatusCode::BAD_GATEWAY;

        let err = auth_error_from_body(status, "upstream unavailable");
        assert_eq!(err.message(), "upstream unavailable");

        let err = auth_error_from_body(status, "");
        assert_eq!(err.message(), "request failed with status 502 Bad Gateway");
    }

    #[tokio::test]
    async fn test_current_session_filters_expired() {
        let gateway = gateway();
        let expired = Session::new(
            "tok",
            "user@example.com",
            Some(Utc::now() - chrono::Duration::seconds(10)),
        );
        gateway.hub().replace(Some(expired));

        assert!(gateway.current_session().await.is_none());
    }
}
