//! Account API module

mod handler;

use axum::middleware as axum_middleware;
use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::auth::middleware;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/accounts", account_routes())
}

fn account_routes() -> Router<ServerState> {
    // Administration surface
    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .route("/stats", get(handler::admin_stats))
        .route("/{id}/role", patch(handler::set_role))
        .route("/{id}/ban", patch(handler::set_ban))
        .route("/{id}/orders", get(handler::account_orders))
        .route_layer(axum_middleware::from_fn(middleware::require_admin));

    Router::new()
        .route("/me", put(handler::update_profile))
        .route("/me/wishlist", get(handler::wishlist))
        .route(
            "/me/wishlist/{product_id}",
            post(handler::add_wishlist).delete(handler::remove_wishlist),
        )
        .merge(admin_routes)
}
