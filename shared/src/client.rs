//! Client-facing request/response types
//!
//! Common DTOs used in API communication between the server and its
//! web/mobile clients.

use serde::{Deserialize, Serialize};

use crate::models::Role;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Sign-in request body
///
/// The identity-provider token travels in the `Authorization` header;
/// these fields only carry optional profile overrides for first login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Issued session credential pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Account information returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: String,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub role: Role,
    pub banned: bool,
    pub created_at: i64,
}

/// Sign-in response: the account plus a fresh credential pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub account: AccountInfo,
    pub tokens: SessionTokens,
    /// True when this sign-in created the account
    pub created: bool,
}

/// Token refresh request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_request_optional_fields() {
        let req: AuthRequest = serde_json::from_str("{}").unwrap();
        assert!(req.display_name.is_none());
        assert!(req.photo_url.is_none());

        let req: AuthRequest =
            serde_json::from_str(r#"{"display_name":"Ada"}"#).unwrap();
        assert_eq!(req.display_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_auth_response_roundtrip() {
        let resp = AuthResponse {
            account: AccountInfo {
                id: "account:1".into(),
                email: "ada@example.com".into(),
                display_name: "Ada".into(),
                photo_url: None,
                role: Role::User,
                banned: false,
                created_at: 0,
            },
            tokens: SessionTokens {
                access_token: "a".into(),
                refresh_token: "r".into(),
            },
            created: true,
        };

        let json = serde_json::to_string(&resp).unwrap();
        let parsed: AuthResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.account.role, Role::User);
        assert!(parsed.created);
    }
}
