//! Login screen logic.
//!
//! This module provides:
//! - The view state machine driven by resolved outcomes
//! - The use case wrapper that calls the authentication gateway

mod screen;
mod service;

pub use screen::{LoginScreen, SendNotice};
pub use service::LoginService;
