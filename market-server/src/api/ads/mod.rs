//! Ad API module

mod handler;

use axum::middleware as axum_middleware;
use axum::{
    Router,
    routing::{get, post},
};

use crate::auth::middleware;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/ads", ad_routes())
}

fn ad_routes() -> Router<ServerState> {
    // Moderation surface - admin only
    let admin_routes = Router::new()
        .route("/pending", get(handler::list_pending))
        .route("/{id}/decision", post(handler::decide))
        .route_layer(axum_middleware::from_fn(middleware::require_admin));

    // Requesting an ad requires a publishing role
    let vendor_routes = Router::new()
        .route("/request", post(handler::request))
        .route_layer(axum_middleware::from_fn(middleware::require_vendor));

    Router::new()
        .route("/active", get(handler::list_active))
        .merge(admin_routes)
        .merge(vendor_routes)
}
