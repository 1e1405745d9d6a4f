/// API route modules
pub mod health;
pub mod path;
pub mod sync;

use crate::{middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use mirra_core::protocol::{HEALTH_ROUTE, PATH_API_BASE, SYNC_API_BASE};
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

/// Build the peer router. Everything but the health check needs a bearer token.
pub fn create_router(app_state: AppState) -> Router {
    let path_routes = Router::new()
        .route("/exists", get(path::exists))
        .route("/path-type", get(path::path_type))
        .route("/directory/read", get(path::read_directory))
        .route(
            "/directory",
            post(path::create_directory).delete(path::delete_directory),
        )
        .route("/file", delete(path::delete_file))
        .route("/file/hash", get(path::file_hash))
        .route("/file/upload", post(path::upload_file))
        .route("/file/move-uploaded", post(path::move_uploaded_file))
        .route("/file/download", get(path::download_file));

    let sync_routes = Router::new().route("/handshake", get(sync::handshake));

    let protected_routes = Router::new()
        .nest(PATH_API_BASE, path_routes)
        .nest(SYNC_API_BASE, sync_routes)
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.auth_service),
            middleware::auth_middleware,
        ));

    Router::new()
        .route(HEALTH_ROUTE, get(health::health))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .with_state(app_state)
}
