/// Sync protocol API routes
use crate::middleware::AuthenticatedUser;
use axum::Json;
use mirra_core::protocol::{current_handshake_protocol, HandshakeProtocol};

/// GET /api/sync/v1/handshake - Protocol version this peer speaks
pub async fn handshake(auth: AuthenticatedUser) -> Json<HandshakeProtocol> {
    let protocol = current_handshake_protocol();
    tracing::debug!(
        "Handshake from {} (protocol v{})",
        auth.user_id(),
        protocol.version
    );
    Json(protocol)
}
