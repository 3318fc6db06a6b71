//! Authentication gateway adapter.
//!
//! This module provides:
//! - An in-process session hub fanning change notifications out to
//!   subscribers
//! - The HTTP gateway speaking the managed backend's wire protocol

mod http_gateway;
mod session_hub;

pub use http_gateway::HttpAuthGateway;
pub use session_hub::SessionHub;
