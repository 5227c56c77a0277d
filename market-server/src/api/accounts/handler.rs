//! Account Handlers
//!
//! Profile and wishlist for the caller, plus the admin surface: account
//! listing, role overrides, ban state and marketplace statistics.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::api::convert::account_info;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, ProfileUpdate, Product};
use crate::db::repository::{
    AccountRepository, AdRepository, ProductRepository, RepoError, VendorApplicationRepository,
    make_thing,
};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
};
use crate::utils::{AppError, AppResult, ErrorCode, repo_error};
use shared::client::AccountInfo;
use shared::{ModerationStatus, Role};

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct BanRequest {
    pub banned: bool,
    pub reason: Option<String>,
}

/// Marketplace-wide counters for the admin dashboard
#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub total_accounts: u64,
    pub total_vendors: u64,
    pub total_products: u64,
    pub approved_products: u64,
    pub pending_products: u64,
    pub pending_applications: u64,
    pub pending_ads: u64,
    pub total_orders: u64,
}

fn map_err(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(_) => AppError::new(ErrorCode::AccountNotFound),
        other => repo_error(other),
    }
}

/// PUT /api/accounts/me - update the caller's profile
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<AccountInfo>> {
    validate_optional_text(&payload.display_name, "display_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.photo_url, "photo_url", MAX_URL_LEN)?;
    if let Some(name) = &payload.display_name
        && name.trim().is_empty()
    {
        return Err(AppError::validation("display_name must not be empty"));
    }

    let repo = AccountRepository::new(state.db.clone());
    let account = repo
        .update_profile(&user.id, payload)
        .await
        .map_err(map_err)?;
    Ok(Json(account_info(&account)))
}

/// GET /api/accounts/me/wishlist - the caller's wishlist, resolved to
/// products (dangling references are skipped)
pub async fn wishlist(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Product>>> {
    let accounts = AccountRepository::new(state.db.clone());
    let account = accounts
        .find_by_id(&user.id)
        .await
        .map_err(map_err)?
        .ok_or_else(|| AppError::new(ErrorCode::AccountNotFound))?;

    let products = ProductRepository::new(state.db.clone());
    let mut resolved = Vec::new();
    for product_ref in &account.wishlist {
        if let Some(product) = products
            .find_by_id(&product_ref.to_string())
            .await
            .map_err(repo_error)?
        {
            resolved.push(product);
        }
    }

    Ok(Json(resolved))
}

/// POST /api/accounts/me/wishlist/{product_id} - add a product
pub async fn add_wishlist(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(product_id): Path<String>,
) -> AppResult<Json<AccountInfo>> {
    let products = ProductRepository::new(state.db.clone());
    products
        .find_by_id(&product_id)
        .await
        .map_err(repo_error)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    let repo = AccountRepository::new(state.db.clone());
    let account = repo
        .add_wishlist(&user.id, make_thing("product", &product_id))
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::WishlistDuplicate),
            other => map_err(other),
        })?;
    Ok(Json(account_info(&account)))
}

/// DELETE /api/accounts/me/wishlist/{product_id} - remove a product
pub async fn remove_wishlist(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(product_id): Path<String>,
) -> AppResult<Json<AccountInfo>> {
    let repo = AccountRepository::new(state.db.clone());
    let account = repo
        .remove_wishlist(&user.id, make_thing("product", &product_id))
        .await
        .map_err(map_err)?;
    Ok(Json(account_info(&account)))
}

/// GET /api/accounts - list accounts (admin)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<AccountInfo>>> {
    let repo = AccountRepository::new(state.db.clone());
    let accounts = repo.find_all().await.map_err(map_err)?;
    Ok(Json(accounts.iter().map(account_info).collect()))
}

/// PATCH /api/accounts/{id}/role - admin role override
///
/// The only role transitions besides this override are vendor-application
/// approvals.
pub async fn set_role(
    State(state): State<ServerState>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<RoleRequest>,
) -> AppResult<Json<AccountInfo>> {
    let repo = AccountRepository::new(state.db.clone());
    let account = repo.set_role(&id, payload.role).await.map_err(map_err)?;

    tracing::info!(
        target: "security",
        account = %id,
        role = %payload.role,
        admin = %admin.id,
        "Account role changed"
    );
    Ok(Json(account_info(&account)))
}

/// PATCH /api/accounts/{id}/ban - set the ban state (admin)
///
/// Ban fields are co-mutated: banning requires a reason and stamps the
/// date; unbanning clears both.
pub async fn set_ban(
    State(state): State<ServerState>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<BanRequest>,
) -> AppResult<Json<AccountInfo>> {
    validate_optional_text(&payload.reason, "reason", MAX_TEXT_LEN)?;

    let repo = AccountRepository::new(state.db.clone());
    let account = repo
        .set_ban_state(&id, payload.banned, payload.reason)
        .await
        .map_err(|e| match e {
            RepoError::Validation(_) => AppError::new(ErrorCode::BanReasonRequired),
            other => map_err(other),
        })?;

    tracing::info!(
        target: "security",
        account = %id,
        banned = payload.banned,
        admin = %admin.id,
        "Account ban state changed"
    );
    Ok(Json(account_info(&account)))
}

/// GET /api/accounts/{id}/orders - an account's order history (admin)
pub async fn account_orders(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = AccountRepository::new(state.db.clone());
    let account = repo
        .find_by_id(&id)
        .await
        .map_err(map_err)?
        .ok_or_else(|| AppError::new(ErrorCode::AccountNotFound))?;
    Ok(Json(account.orders))
}

/// GET /api/accounts/stats - marketplace counters (admin)
pub async fn admin_stats(State(state): State<ServerState>) -> AppResult<Json<AdminStats>> {
    let accounts = AccountRepository::new(state.db.clone());
    let products = ProductRepository::new(state.db.clone());
    let applications = VendorApplicationRepository::new(state.db.clone());
    let ads = AdRepository::new(state.db.clone());

    let stats = AdminStats {
        total_accounts: accounts.count(None).await.map_err(repo_error)?,
        total_vendors: accounts
            .count(Some(Role::Vendor))
            .await
            .map_err(repo_error)?,
        total_products: products.count(None, None).await.map_err(repo_error)?,
        approved_products: products
            .count(None, Some(ModerationStatus::Approved))
            .await
            .map_err(repo_error)?,
        pending_products: products
            .count(None, Some(ModerationStatus::Pending))
            .await
            .map_err(repo_error)?,
        pending_applications: applications
            .count(Some(ModerationStatus::Pending))
            .await
            .map_err(repo_error)?,
        pending_ads: ads
            .count(None, Some(ModerationStatus::Pending))
            .await
            .map_err(repo_error)?,
        total_orders: accounts.count_orders().await.map_err(repo_error)?,
    };

    Ok(Json(stats))
}
