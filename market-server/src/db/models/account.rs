//! Account Model
//!
//! The account aggregate: identity, role, ban state, wishlist and the
//! embedded order history. Orders are append-only; no order is ever
//! deleted or reordered.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{OrderStatus, Role};
use surrealdb::sql::Thing;

pub type AccountId = Thing;

/// Account model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<AccountId>,
    /// Subject id issued by the external identity provider
    pub subject_id: String,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub banned: bool,
    /// Set together with `banned`; empty when not banned
    #[serde(default)]
    pub ban_reason: Option<String>,
    #[serde(default)]
    pub ban_date: Option<i64>,
    /// Record links to products
    #[serde(default)]
    pub wishlist: Vec<Thing>,
    /// Embedded order history, append-only
    #[serde(default)]
    pub orders: Vec<Order>,
    /// Current refresh credential; written via explicit queries only
    #[serde(skip_serializing, default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

impl Account {
    pub fn new(subject_id: String, email: String, display_name: String) -> Self {
        Self {
            id: None,
            subject_id,
            email,
            display_name,
            photo_url: None,
            role: Role::User,
            banned: false,
            ban_reason: None,
            ban_date: None,
            wishlist: Vec::new(),
            orders: Vec::new(),
            refresh_token: None,
            created_at: shared::util::now_millis(),
        }
    }
}

/// Order embedded in an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// External payment-confirmation identifier (natural key)
    pub order_id: String,
    pub order_items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    /// Set at creation, immutable
    pub order_date: i64,
}

/// A single order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Record link to product
    pub product: Thing,
    pub quantity: u32,
}

/// Create account payload (first login)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCreate {
    pub subject_id: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: Option<String>,
}

/// Record order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    /// Payment confirmation id from the gateway
    pub order_id: String,
    pub items: Vec<OrderItemCreate>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

/// Order line payload; the product reference travels as a plain id string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub product_id: String,
    pub quantity: u32,
}

/// Profile update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}
