//! Application window management
//!
//! Wires the Slint login window to the async runtime: UI callbacks
//! become commands on a channel, the runtime's updates are drained on
//! the UI thread by a repeating timer, and the session-change
//! subscription lives exactly as long as the runtime loop.

use std::sync::Arc;

use slint::ComponentHandle;
use tokio::sync::mpsc;

use sesame_application::{Location, LoginScreen, LoginService};
use sesame_domain::{AuthResult, CallbackParams, Session, ViewState};

use crate::bridge::{UiCommand, UiUpdate};
use crate::{LoginWindow, ViewKind};

/// Application window wrapper with the login flow bound to it.
pub struct AppWindow {
    window: LoginWindow,
}

impl AppWindow {
    /// Creates the window with an explicitly injected login service and
    /// location.
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be created.
    pub fn new(
        service: LoginService,
        location: Arc<dyn Location>,
    ) -> Result<Self, slint::PlatformError> {
        let window = LoginWindow::new()?;
        let ui_weak = window.as_weak();

        // Channels for UI <-> async communication
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();
        let (update_tx, mut update_rx) = mpsc::unbounded_channel::<UiUpdate>();

        let cmd_tx_submit = cmd_tx.clone();
        window.on_submit_login(move |email| {
            let _ = cmd_tx_submit.send(UiCommand::SubmitLogin {
                email: email.to_string(),
            });
        });

        let cmd_tx_dismiss = cmd_tx.clone();
        window.on_dismiss_error(move || {
            let _ = cmd_tx_dismiss.send(UiCommand::DismissError);
        });

        let cmd_tx_sign_out = cmd_tx;
        window.on_sign_out(move || {
            let _ = cmd_tx_sign_out.send(UiCommand::SignOut);
        });

        // Spawn the async runtime in a separate thread
        std::thread::spawn(move || {
            run_async_runtime(service, location, cmd_rx, update_tx);
        });

        // Process UI updates on the main thread using a timer
        let timer = slint::Timer::default();
        timer.start(
            slint::TimerMode::Repeated,
            std::time::Duration::from_millis(16), // ~60fps
            move || {
                while let Ok(update) = update_rx.try_recv() {
                    if let Some(ui) = ui_weak.upgrade() {
                        apply_update(&ui, update);
                    }
                }
            },
        );

        // Keep the timer alive for the lifetime of the window
        std::mem::forget(timer);

        Ok(Self { window })
    }

    /// Runs the application event loop.
    ///
    /// This method blocks until the window is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the event loop fails.
    pub fn run(&self) -> Result<(), slint::PlatformError> {
        self.window.run()
    }

    /// Returns a reference to the underlying Slint window.
    #[must_use]
    pub const fn window(&self) -> &LoginWindow {
        &self.window
    }
}

/// Applies one update to the window's properties.
fn apply_update(ui: &LoginWindow, update: UiUpdate) {
    match update {
        UiUpdate::View(view) => {
            ui.set_error_message(view.error_message().unwrap_or_default().into());
            ui.set_user_email(view.session().map(Session::email).unwrap_or_default().into());
            ui.set_view_kind(view_kind(&view));
            if !view.is_unauthenticated() {
                ui.set_notice("".into());
            }
        }
        UiUpdate::SendInFlight(in_flight) => ui.set_send_in_flight(in_flight),
        UiUpdate::Notice(message) => ui.set_notice(message.into()),
    }
}

const fn view_kind(view: &ViewState) -> ViewKind {
    match view {
        ViewState::Verifying => ViewKind::Verifying,
        ViewState::AuthFailed { .. } => ViewKind::AuthFailed,
        ViewState::AuthSucceeded => ViewKind::AuthSucceeded,
        ViewState::Authenticated { .. } => ViewKind::Authenticated,
        ViewState::Unauthenticated => ViewKind::Unauthenticated,
    }
}

/// Runs the async runtime driving the login flow.
///
/// The loop ends when the UI side goes away; the session subscription
/// set up here is cancelled on the way out, exactly once.
fn run_async_runtime(
    service: LoginService,
    location: Arc<dyn Location>,
    mut cmd_rx: mpsc::UnboundedReceiver<UiCommand>,
    update_tx: mpsc::UnboundedSender<UiUpdate>,
) {
    let Ok(rt) = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    else {
        tracing::error!("failed to create Tokio runtime");
        return;
    };

    rt.block_on(async move {
        // Single capture of the launch location, before the first render.
        let callback = location.current().as_ref().and_then(CallbackParams::from_url);
        let mut screen = LoginScreen::mount(callback.is_some());
        let _ = update_tx.send(UiUpdate::View(screen.view().clone()));

        // Subscribed before any outcome can fire, torn down when the
        // loop ends.
        let mut events = service.subscribe();

        // Outcomes of spawned magic-link sends.
        let (send_tx, mut send_rx) = mpsc::unbounded_channel::<AuthResult<()>>();

        if let Some(params) = callback {
            let outcome = service.verify(&params).await.map(|_session| ());
            if screen.verify_resolved(outcome) {
                location.clear_callback();
            }
            let _ = update_tx.send(UiUpdate::View(screen.view().clone()));
        } else if let Some(session) = service.current_session().await {
            screen.session_changed(Some(session));
            let _ = update_tx.send(UiUpdate::View(screen.view().clone()));
        }

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break };
                    match cmd {
                        UiCommand::SubmitLogin { email } => {
                            if !screen.begin_send() {
                                continue;
                            }
                            let _ = update_tx.send(UiUpdate::SendInFlight(true));
                            let service = service.clone();
                            let send_tx = send_tx.clone();
                            tokio::spawn(async move {
                                let _ = send_tx.send(service.send_magic_link(&email).await);
                            });
                        }
                        UiCommand::DismissError => {
                            if screen.dismiss_error() {
                                location.clear_callback();
                            }
                            let _ = update_tx.send(UiUpdate::View(screen.view().clone()));
                        }
                        UiCommand::SignOut => {
                            if let Err(error) = service.sign_out().await {
                                tracing::warn!(%error, "sign-out reported an error");
                            }
                            screen.sign_out_completed();
                            let _ = update_tx.send(UiUpdate::View(screen.view().clone()));
                        }
                    }
                }
                outcome = send_rx.recv() => {
                    let Some(outcome) = outcome else { break };
                    let notice = screen.finish_send(outcome);
                    let _ = update_tx.send(UiUpdate::SendInFlight(false));
                    let _ = update_tx.send(UiUpdate::Notice(notice.message().to_string()));
                }
                change = events.recv() => {
                    let Some(change) = change else { break };
                    screen.session_changed(change);
                    let _ = update_tx.send(UiUpdate::View(screen.view().clone()));
                }
            }
        }

        events.cancel();
    });
}
