//! Vendor Application Handlers
//!
//! Submission requires the caller to still be a plain user; approval
//! promotes the account to the vendor role atomically with the status
//! flip (the repository runs both in one transaction).

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{VendorApplication, VendorApplicationCreate};
use crate::db::repository::{
    AccountRepository, AdRepository, ProductRepository, RepoError, VendorApplicationRepository,
    make_thing,
};
use crate::moderation::Decision;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_TEXT_LEN, MAX_URL_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode, repo_error};
use shared::{ModerationStatus, Role};

#[derive(Debug, Deserialize)]
pub struct ApplicationListQuery {
    pub status: Option<ModerationStatus>,
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub decision: Decision,
}

/// Product and ad counts for a vendor dashboard
#[derive(Debug, Serialize)]
pub struct VendorStats {
    pub total_products: u64,
    pub pending_products: u64,
    pub approved_products: u64,
    pub total_ads: u64,
    pub pending_ads: u64,
    pub approved_ads: u64,
}

/// POST /api/vendors/apply - submit a vendor application
///
/// Only plain users may apply; at most one active (pending or approved)
/// application per applicant, enforced by the store. A rejected prior
/// application does not block a new one.
pub async fn apply(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<VendorApplicationCreate>,
) -> AppResult<Json<VendorApplication>> {
    if user.role != Role::User {
        return Err(AppError::with_message(
            ErrorCode::RoleRequired,
            "Only regular users can apply to become vendors",
        ));
    }

    validate_required_text(&payload.business_name, "business_name", MAX_NAME_LEN)?;
    validate_required_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.cover_image, "cover_image", MAX_URL_LEN)?;
    validate_required_text(&payload.location, "location", MAX_NAME_LEN)?;
    validate_required_text(&payload.description, "description", MAX_TEXT_LEN)?;

    let accounts = AccountRepository::new(state.db.clone());
    let account = accounts
        .find_by_id(&user.id)
        .await
        .map_err(repo_error)?
        .ok_or_else(|| AppError::new(ErrorCode::AccountNotFound))?;

    let repo = VendorApplicationRepository::new(state.db.clone());
    let application = repo.submit(&account, payload).await.map_err(|e| match e {
        RepoError::Conflict(_) | RepoError::Duplicate(_) => {
            AppError::new(ErrorCode::VendorApplicationExists)
        }
        other => repo_error(other),
    })?;

    tracing::info!(
        applicant = %user.id,
        application = %application.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
        "Vendor application submitted"
    );
    Ok(Json(application))
}

/// GET /api/vendors/applications - list applications (admin)
///
/// Optional status filter, newest first. Moderation listings are not
/// paginated.
pub async fn list_applications(
    State(state): State<ServerState>,
    Query(query): Query<ApplicationListQuery>,
) -> AppResult<Json<Vec<VendorApplication>>> {
    let repo = VendorApplicationRepository::new(state.db.clone());
    let applications = repo.list(query.status).await.map_err(repo_error)?;
    Ok(Json(applications))
}

/// POST /api/vendors/applications/{id}/decision - approve or reject (admin)
///
/// Approval promotes the applicant's account to vendor in the same store
/// transaction; repeating a decision is a no-op.
pub async fn decide(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DecisionRequest>,
) -> AppResult<Json<VendorApplication>> {
    let repo = VendorApplicationRepository::new(state.db.clone());
    let application = repo.decide(&id, payload.decision).await.map_err(|e| match e {
        RepoError::NotFound(msg) if msg.contains("account") => {
            AppError::new(ErrorCode::AccountNotFound)
        }
        RepoError::NotFound(_) => AppError::new(ErrorCode::VendorApplicationNotFound),
        RepoError::Conflict(_) => AppError::new(ErrorCode::VendorApplicationClosed),
        other => repo_error(other),
    })?;

    tracing::info!(
        application = %id,
        decision = %payload.decision,
        status = %application.application_status,
        "Vendor application decision"
    );
    Ok(Json(application))
}

/// GET /api/vendors/{id}/stats - dashboard counts (self or admin)
pub async fn stats(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<VendorStats>> {
    let vendor = make_thing("account", &id);
    let caller = make_thing("account", &user.id);
    if !user.is_admin() && vendor != caller {
        return Err(AppError::new(ErrorCode::NotResourceOwner));
    }

    let products = ProductRepository::new(state.db.clone());
    let ads = AdRepository::new(state.db.clone());

    let stats = VendorStats {
        total_products: products.count(Some(&vendor), None).await.map_err(repo_error)?,
        pending_products: products
            .count(Some(&vendor), Some(ModerationStatus::Pending))
            .await
            .map_err(repo_error)?,
        approved_products: products
            .count(Some(&vendor), Some(ModerationStatus::Approved))
            .await
            .map_err(repo_error)?,
        total_ads: ads.count(Some(&vendor), None).await.map_err(repo_error)?,
        pending_ads: ads
            .count(Some(&vendor), Some(ModerationStatus::Pending))
            .await
            .map_err(repo_error)?,
        approved_ads: ads
            .count(Some(&vendor), Some(ModerationStatus::Approved))
            .await
            .map_err(repo_error)?,
    };

    Ok(Json(stats))
}
