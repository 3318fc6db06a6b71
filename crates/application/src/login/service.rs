//! Login use case wrapper around the authentication gateway.

use std::sync::Arc;

use sesame_domain::{AuthResult, CallbackParams, Session};
use url::Url;

use crate::ports::{AuthGateway, SessionEvents};

/// Use case for driving the magic-link login flow.
///
/// Holds the injected gateway and the redirect address from
/// configuration; the screen's async loop calls these methods and feeds
/// the outcomes into the state machine.
#[derive(Clone)]
pub struct LoginService {
    gateway: Arc<dyn AuthGateway>,
    redirect_url: Url,
}

impl LoginService {
    /// Creates the use case with an explicit gateway and the address
    /// magic links should send the user back to.
    #[must_use]
    pub fn new(gateway: Arc<dyn AuthGateway>, redirect_url: Url) -> Self {
        Self {
            gateway,
            redirect_url,
        }
    }

    /// Sends a magic link to `email`, pointing back at this
    /// application.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, message intact.
    pub async fn send_magic_link(&self, email: &str) -> AuthResult<()> {
        tracing::debug!(email, "sending magic link");
        self.gateway
            .send_magic_link(email, &self.redirect_url)
            .await
    }

    /// Verifies the callback's token hash.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, message intact.
    pub async fn verify(&self, params: &CallbackParams) -> AuthResult<Session> {
        tracing::debug!(kind = params.kind.as_str(), "verifying magic-link token");
        self.gateway
            .verify_token(&params.token_hash, params.kind)
            .await
    }

    /// Looks up an existing session.
    pub async fn current_session(&self) -> Option<Session> {
        self.gateway.current_session().await
    }

    /// Subscribes to session changes for the screen's lifetime.
    #[must_use]
    pub fn subscribe(&self) -> SessionEvents {
        self.gateway.subscribe()
    }

    /// Signs the current user out.
    ///
    /// # Errors
    ///
    /// Returns the backend's error; the caller proceeds to the
    /// unauthenticated view regardless.
    pub async fn sign_out(&self) -> AuthResult<()> {
        tracing::debug!("signing out");
        self.gateway.sign_out().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sesame_domain::{AuthError, OtpKind};
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    use crate::ports::SubscriptionGuard;

    /// Records the arguments the service forwards to the gateway.
    #[derive(Default)]
    struct RecordingGateway {
        sent: Mutex<Vec<(String, String)>>,
        verified: Mutex<Vec<(String, OtpKind)>>,
    }

    #[async_trait]
    impl AuthGateway for RecordingGateway {
        async fn send_magic_link(&self, email: &str, redirect_to: &Url) -> AuthResult<()> {
            self.sent
                .lock()
                .unwrap()
                .push((email.to_string(), redirect_to.to_string()));
            Ok(())
        }

        async fn verify_token(&self, token_hash: &str, kind: OtpKind) -> AuthResult<Session> {
            self.verified
                .lock()
                .unwrap()
                .push((token_hash.to_string(), kind));
            Err(AuthError::new("Token expired"))
        }

        async fn current_session(&self) -> Option<Session> {
            None
        }

        fn subscribe(&self) -> SessionEvents {
            let (_tx, rx) = mpsc::unbounded_channel();
            SessionEvents::new(rx, SubscriptionGuard::new(|| {}))
        }

        async fn sign_out(&self) -> AuthResult<()> {
            Ok(())
        }
    }

    fn service(gateway: Arc<RecordingGateway>) -> LoginService {
        LoginService::new(
            gateway,
            Url::parse("sesame://auth/callback").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_send_includes_redirect_url() {
        let gateway = Arc::new(RecordingGateway::default());
        let service = service(Arc::clone(&gateway));

        service.send_magic_link("user@example.com").await.unwrap();

        let sent = gateway.sent.lock().unwrap();
        assert_eq!(
            sent.as_slice(),
            &[(
                "user@example.com".to_string(),
                "sesame://auth/callback".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_verify_forwards_params_and_error() {
        let gateway = Arc::new(RecordingGateway::default());
        let service = service(Arc::clone(&gateway));

        let params = CallbackParams {
            token_hash: "abc123".to_string(),
            kind: OtpKind::Magiclink,
        };
        let outcome = service.verify(&params).await;

        assert_eq!(outcome, Err(AuthError::new("Token expired")));
        let verified = gateway.verified.lock().unwrap();
        assert_eq!(
            verified.as_slice(),
            &[("abc123".to_string(), OtpKind::Magiclink)]
        );
    }
}
