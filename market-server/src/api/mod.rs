//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health checks
//! - [`auth`] - identity sign-in, token refresh, sign-out
//! - [`accounts`] - profile, wishlist, admin account management
//! - [`products`] - catalog CRUD and product moderation
//! - [`vendors`] - vendor applications and moderation
//! - [`ads`] - ad slot requests and moderation
//! - [`orders`] - payment intents and order recording
//! - [`upload`] - image upload to the asset host

pub mod convert;

pub mod accounts;
pub mod ads;
pub mod auth;
pub mod health;
pub mod orders;
pub mod products;
pub mod upload;
pub mod vendors;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::middleware;
use crate::core::ServerState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(auth::router())
        .merge(accounts::router())
        .merge(products::router())
        .merge(vendors::router())
        .merge(ads::router())
        .merge(orders::router())
        .merge(upload::router())
        // Health API - public route
        .merge(health::router())
}

/// Build the fully configured application with all middleware
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - gzip responses
        .layer(CompressionLayer::new())
        // Trace - request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // ========== Application Middleware ==========
        // Request ID - unique id per request, propagated to the response
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // Session authentication - injects CurrentUser before routing
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
}
