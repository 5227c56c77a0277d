//! Unified error system for the marketplace backend
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Product errors (65xx: file upload)
//! - 7xxx: Ad errors
//! - 8xxx: Vendor application errors
//! - 9xxx: System errors (91xx: external dependencies)
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! // Create a simple error
//! let err = AppError::new(ErrorCode::ProductNotFound);
//!
//! // Create an error with custom message and details
//! let err = AppError::validation("Missing required field")
//!     .with_detail("field", "email");
//!
//! // Convert to an API response
//! let response = ApiResponse::<()>::error(&err);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
