//! Product API module

mod handler;

use axum::middleware as axum_middleware;
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::auth::middleware;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", product_routes())
}

fn product_routes() -> Router<ServerState> {
    // Moderation surface - admin only
    let admin_routes = Router::new()
        .route("/pending", get(handler::list_pending))
        .route("/{id}/decision", post(handler::decide))
        .route_layer(axum_middleware::from_fn(middleware::require_admin));

    // Publishing surface - vendors and admins
    let vendor_routes = Router::new()
        .route("/", post(handler::create))
        .route("/mine", get(handler::list_mine))
        .route_layer(axum_middleware::from_fn(middleware::require_vendor));

    Router::new()
        .route("/approved", get(handler::list_approved))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update_details)
                .delete(handler::delete),
        )
        .route("/{id}/price", put(handler::update_price))
        .route("/{id}/availability", put(handler::set_availability))
        .merge(admin_routes)
        .merge(vendor_routes)
}
