//! Auth API module

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth", post(handler::sign_in))
        .route("/api/auth/refresh", post(handler::refresh))
        .route("/api/auth/signout", post(handler::sign_out))
        .route("/api/auth/me", get(handler::me))
}
