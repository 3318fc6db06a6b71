//! Authentication gateway port and the session-change subscription.
//!
//! The gateway is the capability set offered by the managed
//! authentication backend. Session changes are delivered as messages on
//! a channel rather than through a raw callback, so the consumer decides
//! where they are applied; the subscription itself is a scoped resource
//! released exactly once.

use async_trait::async_trait;
use sesame_domain::{AuthResult, OtpKind, Session};
use tokio::sync::mpsc;
use url::Url;

/// Capability set of the authentication backend.
///
/// Implementations handle transport, token issuance, and session
/// bookkeeping; the application only consumes the results.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Sends a passwordless login link to `email`.
    ///
    /// `redirect_to` is the address the link sends the user back to.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, message intact, on any failure.
    async fn send_magic_link(&self, email: &str, redirect_to: &Url) -> AuthResult<()>;

    /// Verifies a magic-link token hash.
    ///
    /// On success the established session is also broadcast to every
    /// subscriber.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, message intact, on any failure.
    async fn verify_token(&self, token_hash: &str, kind: OtpKind) -> AuthResult<Session>;

    /// The current session, if one exists.
    async fn current_session(&self) -> Option<Session>;

    /// Subscribes to session changes for the lifetime of the returned
    /// value. Dropping or cancelling it releases the registration.
    fn subscribe(&self) -> SessionEvents;

    /// Signs the current user out.
    ///
    /// The local session is cleared and subscribers are notified even
    /// when the backend call fails.
    ///
    /// # Errors
    ///
    /// Returns the backend's error; callers are expected to proceed to
    /// the unauthenticated view regardless.
    async fn sign_out(&self) -> AuthResult<()>;
}

/// A live session-change subscription.
///
/// Each change arrives as `Some(session)` (signed in) or `None`
/// (signed out). The registration is released when the subscription is
/// cancelled or dropped, whichever comes first.
pub struct SessionEvents {
    receiver: mpsc::UnboundedReceiver<Option<Session>>,
    guard: SubscriptionGuard,
}

impl SessionEvents {
    /// Pairs a change receiver with the guard that releases its
    /// registration.
    #[must_use]
    pub const fn new(
        receiver: mpsc::UnboundedReceiver<Option<Session>>,
        guard: SubscriptionGuard,
    ) -> Self {
        Self { receiver, guard }
    }

    /// Receives the next session change.
    ///
    /// Returns `None` once the gateway side has gone away.
    pub async fn recv(&mut self) -> Option<Option<Session>> {
        self.receiver.recv().await
    }

    /// Cancels the subscription, releasing the registration.
    pub fn cancel(self) {
        self.guard.cancel();
    }
}

/// Scoped release of a session-change registration.
///
/// The release closure runs exactly once: on explicit [`cancel`], or on
/// drop if `cancel` was never called.
///
/// [`cancel`]: SubscriptionGuard::cancel
pub struct SubscriptionGuard {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionGuard {
    /// Creates a guard that runs `release` when cancelled or dropped.
    #[must_use]
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Releases the registration now.
    pub fn cancel(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl std::fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("released", &self.release.is_none())
            .finish()
    }
}
