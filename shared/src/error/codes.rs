//! Unified error codes for the marketplace backend
//!
//! Error codes are organized by category:
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

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient
/// serialization and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials
    InvalidCredentials = 1002,
    /// Session token has expired
    TokenExpired = 1003,
    /// Session token is invalid
    TokenInvalid = 1004,
    /// Identity provider rejected the presented token
    IdentityTokenInvalid = 1005,
    /// Account is banned
    AccountBanned = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Vendor role required
    VendorRequired = 2004,
    /// Caller does not own the resource
    NotResourceOwner = 2005,

    // ==================== 3xxx: Account ====================
    /// Account not found
    AccountNotFound = 3001,
    /// Email already registered
    EmailExists = 3002,
    /// Ban requires a reason
    BanReasonRequired = 3003,
    /// Product already on the wishlist
    WishlistDuplicate = 3004,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Order amount must be positive
    OrderAmountInvalid = 4003,
    /// Payment confirmation id is required
    PaymentReferenceRequired = 4004,

    // ==================== 5xxx: Payment ====================
    /// Payment processing failed
    PaymentFailed = 5001,
    /// Payment has not been confirmed by the gateway
    PaymentNotConfirmed = 5002,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product price must be non-negative
    ProductInvalidPrice = 6002,
    /// Product stock must be non-negative
    ProductInvalidStock = 6003,
    /// Product is not approved for the marketplace
    ProductNotApproved = 6004,
    /// Product moderation has already been decided
    ProductAlreadyDecided = 6005,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// No file provided in request
    NoFileProvided = 6503,
    /// Invalid/corrupted image file
    InvalidImageFile = 6504,

    // ==================== 7xxx: Ad ====================
    /// Ad not found
    AdNotFound = 7001,
    /// An active ad already exists for this product
    AdExistsForProduct = 7002,
    /// Ad end date must be after start date
    AdDatesInvalid = 7003,
    /// Ad moderation has already been decided
    AdAlreadyDecided = 7004,

    // ==================== 8xxx: Vendor ====================
    /// Vendor application not found
    VendorApplicationNotFound = 8001,
    /// An active vendor application already exists
    VendorApplicationExists = 8002,
    /// Vendor application has already been decided
    VendorApplicationClosed = 8003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,

    // ==================== 91xx: External Dependencies ====================
    /// Identity provider failed or timed out
    IdentityProviderError = 9101,
    /// Payment gateway failed or timed out
    PaymentProviderError = 9102,
    /// Asset host failed or timed out
    AssetHostError = 9103,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Caller is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid credentials",
            ErrorCode::TokenExpired => "Session token has expired",
            ErrorCode::TokenInvalid => "Session token is invalid",
            ErrorCode::IdentityTokenInvalid => "Identity token was rejected",
            ErrorCode::AccountBanned => "Account is banned",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::VendorRequired => "Vendor role is required",
            ErrorCode::NotResourceOwner => "Caller does not own this resource",

            // Account
            ErrorCode::AccountNotFound => "Account not found",
            ErrorCode::EmailExists => "Email is already registered",
            ErrorCode::BanReasonRequired => "Banning an account requires a reason",
            ErrorCode::WishlistDuplicate => "Product is already on the wishlist",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::OrderAmountInvalid => "Order amount must be positive",
            ErrorCode::PaymentReferenceRequired => "Payment confirmation id is required",

            // Payment
            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::PaymentNotConfirmed => "Payment has not been confirmed",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product price must be non-negative",
            ErrorCode::ProductInvalidStock => "Product stock must be non-negative",
            ErrorCode::ProductNotApproved => "Product is not approved",
            ErrorCode::ProductAlreadyDecided => "Product moderation has already been decided",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::InvalidImageFile => "Invalid image file",

            // Ad
            ErrorCode::AdNotFound => "Ad not found",
            ErrorCode::AdExistsForProduct => "An active ad already exists for this product",
            ErrorCode::AdDatesInvalid => "Ad end date must be after its start date",
            ErrorCode::AdAlreadyDecided => "Ad moderation has already been decided",

            // Vendor
            ErrorCode::VendorApplicationNotFound => "Vendor application not found",
            ErrorCode::VendorApplicationExists => {
                "An active vendor application already exists"
            }
            ErrorCode::VendorApplicationClosed => {
                "Vendor application has already been decided"
            }

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",

            // External dependencies
            ErrorCode::IdentityProviderError => "Identity provider request failed",
            ErrorCode::PaymentProviderError => "Payment gateway request failed",
            ErrorCode::AssetHostError => "Asset host request failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::IdentityTokenInvalid),
            1006 => Ok(ErrorCode::AccountBanned),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),
            2004 => Ok(ErrorCode::VendorRequired),
            2005 => Ok(ErrorCode::NotResourceOwner),

            // Account
            3001 => Ok(ErrorCode::AccountNotFound),
            3002 => Ok(ErrorCode::EmailExists),
            3003 => Ok(ErrorCode::BanReasonRequired),
            3004 => Ok(ErrorCode::WishlistDuplicate),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderAmountInvalid),
            4004 => Ok(ErrorCode::PaymentReferenceRequired),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5002 => Ok(ErrorCode::PaymentNotConfirmed),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductInvalidStock),
            6004 => Ok(ErrorCode::ProductNotApproved),
            6005 => Ok(ErrorCode::ProductAlreadyDecided),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::NoFileProvided),
            6504 => Ok(ErrorCode::InvalidImageFile),

            // Ad
            7001 => Ok(ErrorCode::AdNotFound),
            7002 => Ok(ErrorCode::AdExistsForProduct),
            7003 => Ok(ErrorCode::AdDatesInvalid),
            7004 => Ok(ErrorCode::AdAlreadyDecided),

            // Vendor
            8001 => Ok(ErrorCode::VendorApplicationNotFound),
            8002 => Ok(ErrorCode::VendorApplicationExists),
            8003 => Ok(ErrorCode::VendorApplicationClosed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            // External dependencies
            9101 => Ok(ErrorCode::IdentityProviderError),
            9102 => Ok(ErrorCode::PaymentProviderError),
            9103 => Ok(ErrorCode::AssetHostError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        // General
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::AlreadyExists.code(), 4);

        // Auth
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::TokenExpired.code(), 1003);
        assert_eq!(ErrorCode::IdentityTokenInvalid.code(), 1005);
        assert_eq!(ErrorCode::AccountBanned.code(), 1006);

        // Permission
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);
        assert_eq!(ErrorCode::NotResourceOwner.code(), 2005);

        // Account
        assert_eq!(ErrorCode::AccountNotFound.code(), 3001);
        assert_eq!(ErrorCode::EmailExists.code(), 3002);

        // Order
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::OrderEmpty.code(), 4002);

        // Payment
        assert_eq!(ErrorCode::PaymentFailed.code(), 5001);
        assert_eq!(ErrorCode::PaymentNotConfirmed.code(), 5002);

        // Product
        assert_eq!(ErrorCode::ProductNotFound.code(), 6001);
        assert_eq!(ErrorCode::ProductAlreadyDecided.code(), 6005);
        assert_eq!(ErrorCode::FileTooLarge.code(), 6501);

        // Ad
        assert_eq!(ErrorCode::AdNotFound.code(), 7001);
        assert_eq!(ErrorCode::AdExistsForProduct.code(), 7002);

        // Vendor
        assert_eq!(ErrorCode::VendorApplicationNotFound.code(), 8001);
        assert_eq!(ErrorCode::VendorApplicationExists.code(), 8002);

        // System
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::IdentityProviderError.code(), 9101);
        assert_eq!(ErrorCode::AssetHostError.code(), 9103);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::NotFound.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::NotAuthenticated));
        assert_eq!(ErrorCode::try_from(4001), Ok(ErrorCode::OrderNotFound));
        assert_eq!(
            ErrorCode::try_from(8002),
            Ok(ErrorCode::VendorApplicationExists)
        );
        assert_eq!(ErrorCode::try_from(9101), Ok(ErrorCode::IdentityProviderError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_u16() {
        let json = serde_json::to_string(&ErrorCode::NotFound).unwrap();
        assert_eq!(json, "3");

        let json = serde_json::to_string(&ErrorCode::AdNotFound).unwrap();
        assert_eq!(json, "7001");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("3").unwrap();
        assert_eq!(code, ErrorCode::NotFound);

        let code: ErrorCode = serde_json::from_str("8003").unwrap();
        assert_eq!(code, ErrorCode::VendorApplicationClosed);

        let result: Result<ErrorCode, _> = serde_json::from_str("1234");
        assert!(result.is_err());
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::NotAuthenticated,
            ErrorCode::PermissionDenied,
            ErrorCode::OrderEmpty,
            ErrorCode::ProductAlreadyDecided,
            ErrorCode::VendorApplicationExists,
            ErrorCode::PaymentProviderError,
        ];

        for code in codes {
            let json = serde_json::to_string(&code).unwrap();
            let parsed: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(code, parsed);
        }
    }
}
