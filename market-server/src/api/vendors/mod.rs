//! Vendor API module

mod handler;

use axum::middleware as axum_middleware;
use axum::{
    Router,
    routing::{get, post},
};

use crate::auth::middleware;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/vendors", vendor_routes())
}

fn vendor_routes() -> Router<ServerState> {
    // Moderation surface - admin only
    let admin_routes = Router::new()
        .route("/applications", get(handler::list_applications))
        .route("/applications/{id}/decision", post(handler::decide))
        .route_layer(axum_middleware::from_fn(middleware::require_admin));

    Router::new()
        .route("/apply", post(handler::apply))
        .route("/{id}/stats", get(handler::stats))
        .merge(admin_routes)
}
