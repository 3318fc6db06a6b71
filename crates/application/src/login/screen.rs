//! The login screen state machine.
//!
//! The screen renders exactly one of five views; this machine decides
//! which. All inputs are resolved outcomes (verification finished, a
//! session change arrived, a send finished), so every transition is
//! synchronous and the machine is testable without any I/O.

use sesame_domain::{AuthResult, Session, ViewState};

/// Acknowledgement shown after a magic link was sent.
const LINK_SENT_NOTICE: &str = "Check your email for the login link!";

/// The login screen's state.
///
/// Besides the rendered [`ViewState`] the screen tracks whether a send
/// is in flight (the submit control is disabled while it is) and any
/// session that arrived before it may be shown. A session notification
/// received while the screen is verifying or showing a verification
/// error must not override that view; it is stashed and only promoted
/// once verification resolves successfully.
#[derive(Debug, Default)]
pub struct LoginScreen {
    view: ViewState,
    send_in_flight: bool,
    pending_session: Option<Session>,
}

/// Transient notice produced by a finished send.
///
/// Notices are shown once and are not part of the view state; a failed
/// send leaves the screen where it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendNotice {
    /// The link was sent; tell the user to check their inbox.
    LinkSent,
    /// The send failed with the backend's message.
    SendFailed(String),
}

impl SendNotice {
    /// The user-facing text of the notice.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::LinkSent => LINK_SENT_NOTICE,
            Self::SendFailed(reason) => reason,
        }
    }
}

impl LoginScreen {
    /// Computes the initial state from a single capture of the launch
    /// location, before the first render.
    ///
    /// With a verification token present the screen starts verifying;
    /// otherwise it shows the login form while the existing-session
    /// query resolves in the background.
    #[must_use]
    pub fn mount(has_callback: bool) -> Self {
        Self {
            view: if has_callback {
                ViewState::Verifying
            } else {
                ViewState::Unauthenticated
            },
            send_in_flight: false,
            pending_session: None,
        }
    }

    /// The currently rendered view.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Whether a magic-link send is in flight.
    #[must_use]
    pub const fn is_send_in_flight(&self) -> bool {
        self.send_in_flight
    }

    /// Marks a send as started, disabling the submit control.
    ///
    /// Returns false if a send is already in flight; sends are
    /// serialized by refusing to start another.
    pub fn begin_send(&mut self) -> bool {
        if self.send_in_flight {
            return false;
        }
        self.send_in_flight = true;
        true
    }

    /// Applies a finished send and yields the notice to show.
    ///
    /// Send outcomes never change the view; a failure surfaces once and
    /// the user retries from the same form.
    pub fn finish_send(&mut self, outcome: AuthResult<()>) -> SendNotice {
        self.send_in_flight = false;
        match outcome {
            Ok(()) => SendNotice::LinkSent,
            Err(error) => SendNotice::SendFailed(error.message().to_string()),
        }
    }

    /// Applies the verification outcome.
    ///
    /// Only meaningful while verifying; the verifying view never
    /// re-enters once resolved. Returns true when the caller should
    /// clear the callback parameters from the visible location.
    pub fn verify_resolved(&mut self, outcome: AuthResult<()>) -> bool {
        if !self.view.is_verifying() {
            return false;
        }
        match outcome {
            Ok(()) => {
                // A session stashed during verification is authoritative
                // now that the outcome is known.
                self.view = self.pending_session.take().map_or(
                    ViewState::AuthSucceeded,
                    ViewState::authenticated,
                );
                true
            }
            Err(error) => {
                self.view = ViewState::failed(error.message());
                false
            }
        }
    }

    /// Applies a session-change notification (or the result of the
    /// initial session query).
    pub fn session_changed(&mut self, session: Option<Session>) {
        match (&self.view, session) {
            // Never override the verifying or error view; hold the
            // session until verification resolves.
            (ViewState::Verifying | ViewState::AuthFailed { .. }, session) => {
                self.pending_session = session;
            }
            (
                ViewState::AuthSucceeded
                | ViewState::Unauthenticated
                | ViewState::Authenticated { .. },
                Some(session),
            ) => {
                self.view = ViewState::authenticated(session);
            }
            (ViewState::Authenticated { .. }, None) => {
                self.view = ViewState::Unauthenticated;
            }
            // Signed-out notification while already signed out, or while
            // waiting for the session to arrive: nothing to show yet.
            (ViewState::AuthSucceeded | ViewState::Unauthenticated, None) => {}
        }
    }

    /// Dismisses a verification error, returning to the login form.
    ///
    /// Returns true when the caller should clear any leftover callback
    /// parameters from the visible location.
    pub fn dismiss_error(&mut self) -> bool {
        if !self.view.is_failed() {
            return false;
        }
        self.view = ViewState::Unauthenticated;
        self.pending_session = None;
        true
    }

    /// Applies a completed sign-out, regardless of the call outcome.
    pub fn sign_out_completed(&mut self) {
        self.view = ViewState::Unauthenticated;
        self.pending_session = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sesame_domain::AuthError;

    fn session(email: &str) -> Session {
        Session::new("tok", email, None)
    }

    #[test]
    fn test_mount_without_token_never_verifies() {
        let screen = LoginScreen::mount(false);
        assert!(screen.view().is_unauthenticated());
        assert!(!screen.view().is_verifying());
    }

    #[test]
    fn test_mount_with_token_starts_verifying() {
        let screen = LoginScreen::mount(true);
        assert!(screen.view().is_verifying());
    }

    #[test]
    fn test_verify_success_then_session_notification() {
        let mut screen = LoginScreen::mount(true);

        let clear = screen.verify_resolved(Ok(()));
        assert!(clear, "callback params are cleared on success");
        assert!(screen.view().is_succeeded());

        screen.session_changed(Some(session("user@example.com")));
        assert_eq!(
            screen.view().session().map(Session::email),
            Some("user@example.com")
        );
    }

    #[test]
    fn test_verify_failure_shows_error_until_dismissed() {
        let mut screen = LoginScreen::mount(true);

        let clear = screen.verify_resolved(Err(AuthError::new("Token expired")));
        assert!(!clear);
        assert_eq!(screen.view().error_message(), Some("Token expired"));

        let clear = screen.dismiss_error();
        assert!(clear, "dismissing clears leftover callback params");
        assert!(screen.view().is_unauthenticated());
        assert_eq!(screen.view().error_message(), None);
    }

    #[test]
    fn test_verify_never_reenters_once_resolved() {
        let mut screen = LoginScreen::mount(true);
        screen.verify_resolved(Ok(()));
        assert!(screen.view().is_succeeded());

        // A late duplicate resolution is ignored.
        screen.verify_resolved(Err(AuthError::new("late")));
        assert!(screen.view().is_succeeded());
    }

    #[test]
    fn test_session_during_verification_is_stashed_not_shown() {
        let mut screen = LoginScreen::mount(true);

        screen.session_changed(Some(session("stale@example.com")));
        assert!(screen.view().is_verifying(), "session must not override verifying");

        // The stash becomes authoritative once the outcome is known.
        screen.verify_resolved(Ok(()));
        assert_eq!(
            screen.view().session().map(Session::email),
            Some("stale@example.com")
        );
    }

    #[test]
    fn test_session_does_not_override_error_view() {
        let mut screen = LoginScreen::mount(true);
        screen.verify_resolved(Err(AuthError::new("Token expired")));

        screen.session_changed(Some(session("stale@example.com")));
        assert!(screen.view().is_failed());

        // Dismissing returns to the form; the stale session is dropped.
        screen.dismiss_error();
        assert!(screen.view().is_unauthenticated());

        // Only a fresh notification signs the user in.
        screen.session_changed(Some(session("fresh@example.com")));
        assert_eq!(
            screen.view().session().map(Session::email),
            Some("fresh@example.com")
        );
    }

    #[test]
    fn test_initial_session_query_signs_in() {
        let mut screen = LoginScreen::mount(false);
        screen.session_changed(Some(session("user@example.com")));
        assert!(screen.view().is_authenticated());
    }

    #[test]
    fn test_send_serialization_and_notices() {
        let mut screen = LoginScreen::mount(false);

        assert!(screen.begin_send());
        assert!(screen.is_send_in_flight());
        assert!(!screen.begin_send(), "only one send may be in flight");

        let notice = screen.finish_send(Ok(()));
        assert!(!screen.is_send_in_flight());
        assert_eq!(notice.message(), "Check your email for the login link!");
        assert!(
            screen.view().is_unauthenticated(),
            "send outcomes never change the view"
        );

        assert!(screen.begin_send());
        let notice = screen.finish_send(Err(AuthError::new("Rate limited")));
        assert_eq!(notice, SendNotice::SendFailed("Rate limited".to_string()));
        assert!(screen.view().is_unauthenticated());
    }

    #[test]
    fn test_sign_out_always_lands_unauthenticated() {
        let mut screen = LoginScreen::mount(false);
        screen.session_changed(Some(session("user@example.com")));
        assert!(screen.view().is_authenticated());

        // The underlying call may have failed; the view proceeds anyway.
        screen.sign_out_completed();
        assert!(screen.view().is_unauthenticated());
    }

    #[test]
    fn test_signed_out_notification_returns_to_form() {
        let mut screen = LoginScreen::mount(false);
        screen.session_changed(Some(session("user@example.com")));
        screen.session_changed(None);
        assert!(screen.view().is_unauthenticated());
    }

    #[test]
    fn test_dismiss_only_applies_to_error_view() {
        let mut screen = LoginScreen::mount(false);
        assert!(!screen.dismiss_error());
        assert!(screen.view().is_unauthenticated());
    }
}
