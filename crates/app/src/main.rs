//! Sesame - Main Entry Point
//!
//! This is the desktop application entry point that reads the backend
//! configuration, constructs the authentication client, and starts the
//! UI event loop.

use std::sync::Arc;

use sesame_application::LoginService;
use sesame_infrastructure::{AuthBackendConfig, HttpAuthGateway, LaunchLocation};
use sesame_ui::AppWindow;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Missing configuration aborts startup; the screen never handles it.
    let config = AuthBackendConfig::from_env()?;

    let gateway = Arc::new(HttpAuthGateway::new(&config));
    let location = Arc::new(LaunchLocation::from_args(std::env::args().skip(1)));
    let service = LoginService::new(gateway, config.redirect_url().clone());

    tracing::info!(backend = %config.base_url(), "starting login screen");

    // Initialize the application window with its dependencies
    let app = AppWindow::new(service, location)?;

    // Run the event loop (blocks until window closes)
    app.run()?;

    Ok(())
}
