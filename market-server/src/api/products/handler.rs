//! Product API Handlers
//!
//! Catalog CRUD plus the product half of the moderation workflow. Only
//! approved products are publicly listable; price changes go through the
//! dedicated price endpoint so the price history stays consistent.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::{ProductRepository, RepoError, make_thing};
use crate::moderation::Decision;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_TEXT_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode, repo_error};
use shared::{AvailabilityStatus, PageQuery, PaginatedResponse};

/// Query parameters for the approved listing
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PriceUpdateRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub availability: AvailabilityStatus,
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub decision: Decision,
}

fn map_err(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(_) => AppError::new(ErrorCode::ProductNotFound),
        RepoError::Conflict(_) => AppError::new(ErrorCode::ProductAlreadyDecided),
        other => repo_error(other),
    }
}

fn ensure_owner_or_admin(product: &Product, user: &CurrentUser) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    let caller = make_thing("account", &user.id);
    if product.owner == caller {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::NotResourceOwner))
    }
}

/// GET /api/products/approved - public marketplace listing
///
/// Approved products only, newest first, optional category filter.
/// Without `page_size` the whole matching set comes back as one page.
pub async fn list_approved(
    State(state): State<ServerState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<PaginatedResponse<Product>>> {
    let paging = PageQuery {
        page: query.page,
        page_size: query.page_size,
    };
    let repo = ProductRepository::new(state.db.clone());
    let page = repo
        .list_approved(query.category, paging.page(), paging.page_size)
        .await
        .map_err(map_err)?;
    Ok(Json(page))
}

/// GET /api/products/{id} - single product lookup
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await
        .map_err(map_err)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(product))
}

/// POST /api/products - create a listing (enters moderation as pending)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.description, "description", MAX_TEXT_LEN)?;
    validate_required_text(&payload.category, "category", MAX_NAME_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    if payload.price < Decimal::ZERO {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice));
    }
    if payload.stock < 0 {
        return Err(AppError::new(ErrorCode::ProductInvalidStock));
    }

    let owner = make_thing("account", &user.id);
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.create(owner, payload).await.map_err(map_err)?;

    tracing::info!(
        product = %product.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
        owner = %user.id,
        "Product submitted for moderation"
    );
    Ok(Json(product))
}

/// GET /api/products/pending - moderation queue
pub async fn list_pending(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.list_pending().await.map_err(map_err)?;
    Ok(Json(products))
}

/// GET /api/products/mine - the caller's own listings
pub async fn list_mine(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Product>>> {
    let owner = make_thing("account", &user.id);
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.list_by_owner(&owner).await.map_err(map_err)?;
    Ok(Json(products))
}

/// PUT /api/products/{id} - update details (owner or admin)
pub async fn update_details(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_TEXT_LEN)?;
    validate_optional_text(&payload.category, "category", MAX_NAME_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await
        .map_err(map_err)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    ensure_owner_or_admin(&product, &user)?;

    let product = repo.update_details(&id, payload).await.map_err(map_err)?;
    Ok(Json(product))
}

/// PUT /api/products/{id}/price - change the price (owner or admin)
///
/// The previous price lands on the history before the overwrite.
pub async fn update_price(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<PriceUpdateRequest>,
) -> AppResult<Json<Product>> {
    if payload.price < Decimal::ZERO {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice));
    }

    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await
        .map_err(map_err)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    ensure_owner_or_admin(&product, &user)?;

    let product = repo.update_price(&id, payload.price).await.map_err(map_err)?;
    Ok(Json(product))
}

/// PUT /api/products/{id}/availability - toggle active / out of stock
///
/// Independent of the moderation axis.
pub async fn set_availability(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<AvailabilityRequest>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await
        .map_err(map_err)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    ensure_owner_or_admin(&product, &user)?;

    let product = repo
        .set_availability(&id, payload.availability)
        .await
        .map_err(map_err)?;
    Ok(Json(product))
}

/// POST /api/products/{id}/decision - approve or reject (admin)
pub async fn decide(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DecisionRequest>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.decide(&id, payload.decision).await.map_err(map_err)?;

    tracing::info!(
        product = %id,
        decision = %payload.decision,
        status = %product.application_status,
        "Product moderation decision"
    );
    Ok(Json(product))
}

/// DELETE /api/products/{id} - hard delete (owner or admin)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await
        .map_err(map_err)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    ensure_owner_or_admin(&product, &user)?;

    repo.delete(&id).await.map_err(map_err)?;
    Ok(Json(true))
}
