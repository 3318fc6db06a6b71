//! Sesame Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in
//! the application layer: the HTTP authentication gateway, the launch
//! location, and environment-sourced configuration.

pub mod auth;
pub mod config;
pub mod location;

pub use auth::{HttpAuthGateway, SessionHub};
pub use config::{AuthBackendConfig, ConfigError};
pub use location::LaunchLocation;
