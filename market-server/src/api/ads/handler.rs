//! Ad Slot Request Handlers
//!
//! Ads follow the same moderation workflow as products and vendor
//! applications, scoped to one vendor and one product. One active ad per
//! product; approved ads are the public banner rotation.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Ad, AdCreate};
use crate::db::repository::{AdRepository, RepoError, make_thing};
use crate::moderation::Decision;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_TEXT_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode, repo_error};
use serde::Deserialize;
use shared::ModerationStatus;
use shared::util::now_millis;

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub decision: Decision,
}

fn map_err(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) if msg.contains("product") => {
            AppError::new(ErrorCode::ProductNotFound)
        }
        RepoError::NotFound(_) => AppError::new(ErrorCode::AdNotFound),
        RepoError::Conflict(msg) if msg.contains("active ad") => {
            AppError::new(ErrorCode::AdExistsForProduct)
        }
        RepoError::Conflict(_) => AppError::new(ErrorCode::AdAlreadyDecided),
        other => repo_error(other),
    }
}

/// POST /api/ads/request - request an ad slot (vendor)
pub async fn request(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<AdCreate>,
) -> AppResult<Json<Ad>> {
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_required_text(&payload.image, "image", MAX_URL_LEN)?;
    validate_required_text(&payload.product_id, "product_id", MAX_NAME_LEN)?;
    validate_optional_text(&payload.notes, "notes", MAX_TEXT_LEN)?;
    if payload.end_date <= payload.start_date {
        return Err(AppError::new(ErrorCode::AdDatesInvalid));
    }

    let ad = Ad {
        id: None,
        vendor: make_thing("account", &user.id),
        product: make_thing("product", &payload.product_id),
        title: payload.title,
        image: payload.image,
        notes: payload.notes,
        start_date: payload.start_date,
        end_date: payload.end_date,
        application_status: ModerationStatus::Pending,
        created_at: now_millis(),
    };

    let repo = AdRepository::new(state.db.clone());
    let ad = repo.submit(ad).await.map_err(map_err)?;

    tracing::info!(
        ad = %ad.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
        vendor = %user.id,
        "Ad request submitted"
    );
    Ok(Json(ad))
}

/// GET /api/ads/pending - moderation queue (admin)
pub async fn list_pending(State(state): State<ServerState>) -> AppResult<Json<Vec<Ad>>> {
    let repo = AdRepository::new(state.db.clone());
    let ads = repo.list_pending().await.map_err(map_err)?;
    Ok(Json(ads))
}

/// GET /api/ads/active - public banner rotation (approved ads)
pub async fn list_active(State(state): State<ServerState>) -> AppResult<Json<Vec<Ad>>> {
    let repo = AdRepository::new(state.db.clone());
    let ads = repo.list_active().await.map_err(map_err)?;
    Ok(Json(ads))
}

/// POST /api/ads/{id}/decision - approve or reject (admin)
pub async fn decide(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DecisionRequest>,
) -> AppResult<Json<Ad>> {
    let repo = AdRepository::new(state.db.clone());
    let ad = repo.decide(&id, payload.decision).await.map_err(map_err)?;

    tracing::info!(
        ad = %id,
        decision = %payload.decision,
        status = %ad.application_status,
        "Ad moderation decision"
    );
    Ok(Json(ad))
}
