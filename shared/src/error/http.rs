//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::AccountNotFound
            | Self::OrderNotFound
            | Self::ProductNotFound
            | Self::AdNotFound
            | Self::VendorApplicationNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::EmailExists
            | Self::WishlistDuplicate
            | Self::ProductAlreadyDecided
            | Self::AdExistsForProduct
            | Self::AdAlreadyDecided
            | Self::VendorApplicationExists
            | Self::VendorApplicationClosed => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::IdentityTokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::RoleRequired
            | Self::AdminRequired
            | Self::VendorRequired
            | Self::NotResourceOwner
            | Self::AccountBanned => StatusCode::FORBIDDEN,

            // 402 Payment Required
            Self::PaymentNotConfirmed => StatusCode::PAYMENT_REQUIRED,

            // 502 Bad Gateway (external collaborator failed)
            Self::IdentityProviderError
            | Self::PaymentProviderError
            | Self::AssetHostError => StatusCode::BAD_GATEWAY,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::AccountNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::ProductNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::VendorApplicationNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::AlreadyExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::EmailExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::VendorApplicationExists.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::AdExistsForProduct.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_unauthorized_status() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TokenExpired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::IdentityTokenInvalid.http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_forbidden_status() {
        assert_eq!(
            ErrorCode::PermissionDenied.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ErrorCode::AdminRequired.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ErrorCode::NotResourceOwner.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ErrorCode::AccountBanned.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_dependency_status() {
        assert_eq!(
            ErrorCode::IdentityProviderError.http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ErrorCode::PaymentProviderError.http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ErrorCode::AssetHostError.http_status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::OrderEmpty.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::AdDatesInvalid.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::ProductInvalidPrice.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_payment_required_status() {
        assert_eq!(
            ErrorCode::PaymentNotConfirmed.http_status(),
            StatusCode::PAYMENT_REQUIRED
        );
    }
}
