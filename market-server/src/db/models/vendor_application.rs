//! Vendor Application Model

use serde::{Deserialize, Serialize};
use shared::ModerationStatus;
use surrealdb::sql::Thing;

pub type VendorApplicationId = Thing;

/// A pending upgrade request from `user` role to `vendor` role
///
/// At most one active (pending or approved) application may exist per
/// applicant. Approval promotes the linked account to `vendor` in the same
/// store transaction as the status flip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorApplication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<VendorApplicationId>,
    /// Record link to the applying account
    pub applicant: Thing,
    /// Denormalized from the account at submission time
    pub applicant_name: String,
    pub applicant_email: String,
    pub phone: String,
    pub business_name: String,
    pub cover_image: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub application_status: ModerationStatus,
    #[serde(default)]
    pub created_at: i64,
}

/// Submit application payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorApplicationCreate {
    pub phone: String,
    pub business_name: String,
    pub cover_image: String,
    pub location: String,
    pub description: String,
}
