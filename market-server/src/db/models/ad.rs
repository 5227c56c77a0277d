//! Ad Slot Request Model

use serde::{Deserialize, Serialize};
use shared::ModerationStatus;
use surrealdb::sql::Thing;

pub type AdId = Thing;

/// An advertisement slot request for one product by one vendor
///
/// At most one active (pending or approved) ad may exist per product; a
/// rejected ad frees the slot for a new request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ad {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<AdId>,
    /// Record link to the requesting vendor's account
    pub vendor: Thing,
    /// Record link to the advertised product
    pub product: Thing,
    pub title: String,
    pub image: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub start_date: i64,
    /// Must be strictly after `start_date`
    pub end_date: i64,
    #[serde(default)]
    pub application_status: ModerationStatus,
    #[serde(default)]
    pub created_at: i64,
}

/// Request ad payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdCreate {
    pub product_id: String,
    pub title: String,
    pub image: String,
    pub notes: Option<String>,
    pub start_date: i64,
    pub end_date: i64,
}
