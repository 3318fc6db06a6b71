//! Sesame Domain - Core business types
//!
//! This crate defines the domain model for the Sesame login client.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod location;
pub mod session;
pub mod view;

pub use auth::{AuthError, AuthResult, OtpKind};
pub use location::CallbackParams;
pub use session::{Session, UserProfile};
pub use view::ViewState;
