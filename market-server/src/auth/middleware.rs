//! Authentication middleware
//!
//! Axum middleware for session authentication and role checks.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::utils::{AppError, ErrorCode};

/// Routes that do not require a session.
///
/// The identity-backed sign-in and refresh endpoints must be reachable
/// without one; the approved catalog, single product lookups and active
/// ads are the public marketplace surface.
fn is_public_route(method: &http::Method, path: &str) -> bool {
    if path == "/api/auth" || path == "/api/auth/refresh" {
        return *method == http::Method::POST;
    }

    if *method == http::Method::GET {
        if path == "/api/products/approved" || path == "/api/ads/active" {
            return true;
        }
        // Single product lookup: /api/products/{id}
        if let Some(rest) = path.strip_prefix("/api/products/") {
            return !rest.is_empty()
                && !rest.contains('/')
                && !matches!(rest, "pending" | "mine");
        }
    }

    false
}

/// Authentication middleware - requires a valid access token
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>`,
/// then injects [`CurrentUser`] into the request extensions.
///
/// Skipped for CORS preflight, non-API paths (they 404 normally) and the
/// public routes listed in [`is_public_route`].
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // Allow CORS preflight
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes skip authentication (they 404 normally)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(target: "security", uri = %req.uri(), "Missing authorization header");
            return Err(AppError::unauthorized());
        }
    };

    match jwt_service.validate_access_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(
                target: "security",
                error = %e,
                uri = %req.uri(),
                "Authentication failed"
            );

            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Admin middleware - requires the admin role
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_admin() {
        tracing::warn!(
            target: "security",
            user_id = %user.id,
            role = %user.role,
            "Admin role required"
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}

/// Vendor middleware - requires a role that may publish (vendor or admin)
pub async fn require_vendor(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.can_publish() {
        tracing::warn!(
            target: "security",
            user_id = %user.id,
            role = %user.role,
            "Vendor role required"
        );
        return Err(AppError::new(ErrorCode::VendorRequired));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        let get = http::Method::GET;
        let post = http::Method::POST;

        assert!(is_public_route(&post, "/api/auth"));
        assert!(is_public_route(&post, "/api/auth/refresh"));
        assert!(!is_public_route(&get, "/api/auth"));

        assert!(is_public_route(&get, "/api/products/approved"));
        assert!(is_public_route(&get, "/api/products/product:abc"));
        assert!(is_public_route(&get, "/api/ads/active"));

        assert!(!is_public_route(&get, "/api/products/pending"));
        assert!(!is_public_route(&get, "/api/products/mine"));
        assert!(!is_public_route(&post, "/api/products"));
        assert!(!is_public_route(&get, "/api/accounts"));
        assert!(!is_public_route(&get, "/api/products/product:abc/history"));
    }
}
