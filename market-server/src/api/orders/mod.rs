//! Order API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::my_orders).post(handler::create_order))
        .route("/payment-intent", post(handler::create_payment_intent))
}
