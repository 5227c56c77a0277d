//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the thousands digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Account errors
/// - 4xxx: Order errors
/// - 5xxx: Payment errors
/// - 6xxx: Product errors
/// - 7xxx: Ad errors
/// - 8xxx: Vendor application errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Account errors (3xxx)
    Account,
    /// Order errors (4xxx)
    Order,
    /// Payment errors (5xxx)
    Payment,
    /// Product errors (6xxx)
    Product,
    /// Ad errors (7xxx)
    Ad,
    /// Vendor application errors (8xxx)
    Vendor,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Account,
            4000..5000 => Self::Order,
            5000..6000 => Self::Payment,
            6000..7000 => Self::Product,
            7000..8000 => Self::Ad,
            8000..9000 => Self::Vendor,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Account => "account",
            Self::Order => "order",
            Self::Payment => "payment",
            Self::Product => "product",
            Self::Ad => "ad",
            Self::Vendor => "vendor",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
