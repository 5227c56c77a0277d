//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{AvailabilityStatus, ModerationStatus};
use surrealdb::sql::Thing;

pub type ProductId = Thing;

/// Product model
///
/// `application_status` governs marketplace visibility (only approved
/// products are publicly listable); `availability` is an independent axis
/// the owner may toggle freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    /// Record link to the owning account (vendor or admin)
    pub owner: Thing,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub application_status: ModerationStatus,
    #[serde(default)]
    pub availability: AvailabilityStatus,
    /// Previous prices, pushed immediately before each price change.
    /// Never contains the current price.
    #[serde(default)]
    pub price_history: Vec<PricePoint>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub created_at: i64,
}

/// One entry of a product's price history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub changed_at: i64,
}

/// A customer review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Record link to the reviewing account
    pub reviewer: Thing,
    /// 1 to 5
    pub rating: u8,
    pub text: String,
    pub review_date: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
    pub image: Option<String>,
}

/// Update product details payload (price changes go through the dedicated
/// price operation so the history is maintained)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub stock: Option<i64>,
    pub image: Option<String>,
}
