//! Authentication Handlers
//!
//! Sign-in resolves the caller's verified identity to an account,
//! creating it on first login, and issues the session credential pair.
//! Refresh rotates the stored refresh credential; sign-out revokes it.

use axum::{Extension, Json, extract::State};
use http::HeaderMap;

use crate::api::convert::account_info;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::db::models::AccountCreate;
use crate::db::repository::AccountRepository;
use crate::utils::{AppError, AppResult, ErrorCode, repo_error};
use shared::client::{AccountInfo, AuthRequest, AuthResponse, RefreshRequest, SessionTokens};

fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(AppError::unauthorized)?;
    JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))
}

/// POST /api/auth - sign in with an identity-provider token
///
/// Verifies the provider token, resolves or creates the account
/// (upsert-on-first-login) and returns a fresh access/refresh pair.
pub async fn sign_in(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Option<Json<AuthRequest>>,
) -> AppResult<Json<AuthResponse>> {
    let token = bearer_token(&headers)?;
    let identity = state.identity.verify(token).await?;

    let profile = body.map(|Json(b)| b).unwrap_or_default();
    let display_name = identity.display_name(profile.display_name.as_deref());
    let photo_url = profile.photo_url.or_else(|| identity.photo_url.clone());

    let repo = AccountRepository::new(state.db.clone());
    let (account, created) = repo
        .resolve_or_create(AccountCreate {
            subject_id: identity.subject_id,
            email: identity.email,
            display_name,
            photo_url,
        })
        .await
        .map_err(repo_error)?;

    if account.banned {
        tracing::warn!(
            target: "security",
            email = %account.email,
            "Banned account attempted sign-in"
        );
        let mut err = AppError::new(ErrorCode::AccountBanned);
        if let Some(reason) = &account.ban_reason {
            err = err.with_detail("reason", reason.clone());
        }
        return Err(err);
    }

    let tokens = state
        .jwt_service
        .generate_token_pair(&account)
        .map_err(|e| AppError::internal(format!("Failed to generate tokens: {e}")))?;

    if let Some(id) = &account.id {
        repo.set_refresh_token(id, Some(tokens.refresh_token.clone()))
            .await
            .map_err(repo_error)?;
    }

    tracing::info!(
        email = %account.email,
        role = %account.role,
        created,
        "Sign-in successful"
    );

    Ok(Json(AuthResponse {
        account: account_info(&account),
        tokens,
        created,
    }))
}

/// POST /api/auth/refresh - rotate the session credential pair
///
/// The presented refresh token must match the one stored on the account;
/// anything else (revoked, rotated away, forged) is rejected.
pub async fn refresh(
    State(state): State<ServerState>,
    Json(req): Json<RefreshRequest>,
) -> AppResult<Json<SessionTokens>> {
    let claims = state
        .jwt_service
        .validate_refresh_token(&req.refresh_token)
        .map_err(|e| match e {
            crate::auth::JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid refresh token"),
        })?;

    let repo = AccountRepository::new(state.db.clone());
    let account = repo
        .find_by_id(&claims.sub)
        .await
        .map_err(repo_error)?
        .ok_or_else(|| AppError::new(ErrorCode::AccountNotFound))?;

    if account.refresh_token.as_deref() != Some(req.refresh_token.as_str()) {
        tracing::warn!(
            target: "security",
            email = %account.email,
            "Refresh token reuse or revocation detected"
        );
        return Err(AppError::invalid_token("Refresh token has been revoked"));
    }

    if account.banned {
        return Err(AppError::new(ErrorCode::AccountBanned));
    }

    let tokens = state
        .jwt_service
        .generate_token_pair(&account)
        .map_err(|e| AppError::internal(format!("Failed to generate tokens: {e}")))?;

    if let Some(id) = &account.id {
        repo.set_refresh_token(id, Some(tokens.refresh_token.clone()))
            .await
            .map_err(repo_error)?;
    }

    Ok(Json(tokens))
}

/// POST /api/auth/signout - revoke the stored refresh credential
pub async fn sign_out(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<()>> {
    let repo = AccountRepository::new(state.db.clone());
    if let Some(account) = repo.find_by_id(&user.id).await.map_err(repo_error)?
        && let Some(id) = &account.id
    {
        repo.set_refresh_token(id, None).await.map_err(repo_error)?;
    }

    tracing::info!(user_id = %user.id, "Signed out");
    Ok(Json(()))
}

/// GET /api/auth/me - current account info
pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AccountInfo>> {
    let repo = AccountRepository::new(state.db.clone());
    let account = repo
        .find_by_id(&user.id)
        .await
        .map_err(repo_error)?
        .ok_or_else(|| AppError::new(ErrorCode::AccountNotFound))?;

    Ok(Json(account_info(&account)))
}
