//! Mirra Server Library
//!
//! A Mirra peer: exposes one directory tree per user over the peer protocol,
//! so a sync run on another machine can use it as source or destination.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use api::create_router;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{auth::AuthService, storage::PeerStorage};
pub use state::AppState;
