//! UI Bridge Module
//!
//! Defines the communication protocol between the Slint UI thread and
//! the async Tokio runtime.

use sesame_domain::ViewState;

/// Commands sent from UI to the async runtime.
#[derive(Debug, Clone)]
pub enum UiCommand {
    /// User submitted the login form.
    SubmitLogin {
        /// The email address typed into the form.
        email: String,
    },

    /// User dismissed the verification error.
    DismissError,

    /// User clicked Sign Out.
    SignOut,
}

/// Updates sent from the async runtime to the UI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// The rendered view changed.
    View(ViewState),

    /// A magic-link send started or finished (disables/enables the
    /// submit control).
    SendInFlight(bool),

    /// Show a transient notice (send acknowledgement or error text).
    Notice(String),
}
