/// Shared application state
use crate::services::{AuthService, PeerStorage};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub storage: Arc<PeerStorage>,
}

impl AppState {
    pub fn new(auth_service: Arc<AuthService>, storage: Arc<PeerStorage>) -> Self {
        Self {
            auth_service,
            storage,
        }
    }
}
