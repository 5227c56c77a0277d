//! Order Handlers
//!
//! Checkout creates a payment intent at the gateway; once the client has
//! completed the payment, the order endpoint re-verifies the confirmation
//! id with the gateway before appending the order to the account. An
//! unconfirmed or unknown confirmation id never produces an order.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate};
use crate::db::repository::{AccountRepository, RepoError};
use crate::utils::{AppError, AppResult, ErrorCode, repo_error};

#[derive(Debug, Deserialize)]
pub struct PaymentIntentRequest {
    /// Amount in the currency's minor unit
    pub amount: i64,
    /// ISO currency code, defaults to usd
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentIntentResponse {
    pub payment_intent_id: String,
    pub client_secret: String,
}

/// POST /api/orders/payment-intent - start a checkout
pub async fn create_payment_intent(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PaymentIntentRequest>,
) -> AppResult<Json<PaymentIntentResponse>> {
    if payload.amount <= 0 {
        return Err(AppError::new(ErrorCode::OrderAmountInvalid));
    }

    let currency = payload.currency.as_deref().unwrap_or("usd");
    let intent = state
        .payments
        .create_payment_intent(payload.amount, currency)
        .await?;

    tracing::info!(
        user = %user.id,
        intent = %intent.id,
        amount = payload.amount,
        "Payment intent created"
    );

    let client_secret = intent.client_secret.ok_or_else(|| {
        AppError::dependency(
            ErrorCode::PaymentProviderError,
            "Payment gateway did not return a client secret",
        )
    })?;

    Ok(Json(PaymentIntentResponse {
        payment_intent_id: intent.id,
        client_secret,
    }))
}

/// POST /api/orders - record an order after a confirmed payment
///
/// The confirmation id is re-verified against the gateway; the order is
/// appended with status `pending` and stamped with the current time.
pub async fn create_order(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    if payload.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    if payload.order_id.trim().is_empty() {
        return Err(AppError::new(ErrorCode::PaymentReferenceRequired));
    }

    let intent = state
        .payments
        .retrieve_payment_intent(&payload.order_id)
        .await?;
    if !intent.is_succeeded() {
        tracing::warn!(
            user = %user.id,
            intent = %intent.id,
            status = %intent.status,
            "Order rejected: payment not confirmed"
        );
        return Err(AppError::new(ErrorCode::PaymentNotConfirmed));
    }

    let repo = AccountRepository::new(state.db.clone());
    let order = repo
        .record_order(&user.subject_id, payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => AppError::new(ErrorCode::AccountNotFound),
            RepoError::Validation(msg) if msg.contains("amount") => {
                AppError::new(ErrorCode::OrderAmountInvalid)
            }
            RepoError::Validation(msg) if msg.contains("item") => {
                AppError::new(ErrorCode::OrderEmpty)
            }
            other => repo_error(other),
        })?;

    tracing::info!(
        user = %user.id,
        order = %order.order_id,
        "Order recorded"
    );
    Ok(Json(order))
}

/// GET /api/orders - the caller's order history
pub async fn my_orders(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = AccountRepository::new(state.db.clone());
    let account = repo
        .find_by_id(&user.id)
        .await
        .map_err(repo_error)?
        .ok_or_else(|| AppError::new(ErrorCode::AccountNotFound))?;
    Ok(Json(account.orders))
}
