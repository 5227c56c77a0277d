//! Shared types for the marketplace backend
//!
//! Common types used across the server and its clients: error codes and
//! the API response envelope, domain enums (roles, moderation states),
//! pagination types and auth DTOs.

pub mod client;
pub mod error;
pub mod models;
pub mod query;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{AvailabilityStatus, ModerationStatus, OrderStatus, Role};
pub use query::{PageQuery, PaginatedResponse};
pub use serde::{Deserialize, Serialize};
