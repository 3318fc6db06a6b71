//! Sesame Application - Ports and use cases
//!
//! This crate defines the boundaries between the login screen's core
//! logic and external systems: the authentication gateway port, the
//! location port, and the state machine that drives the screen.

pub mod login;
pub mod ports;

pub use login::{LoginScreen, LoginService, SendNotice};
pub use ports::{AuthGateway, Location, SessionEvents, SubscriptionGuard};
