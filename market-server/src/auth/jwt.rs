//! JWT token service
//!
//! Issues and validates the access/refresh session credential pair handed
//! out after the external identity provider has verified a caller. The
//! refresh token is additionally persisted on the account and rotated on
//! every refresh, so a stolen token dies at its first reuse.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::Role;
use shared::client::SessionTokens;
use thiserror::Error;

use crate::db::models::Account;

const TOKEN_TYPE_ACCESS: &str = "access";
const TOKEN_TYPE_REFRESH: &str = "refresh";

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Access token lifetime (minutes)
    pub access_minutes: i64,
    /// Refresh token lifetime (days)
    pub refresh_days: i64,
    /// Token issuer
    pub issuer: String,
    /// Token audience
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match load_jwt_secret() {
            Ok(secret) => secret,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT configuration error: {}, using generated key", e);
                    generate_printable_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: JWT_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            access_minutes: std::env::var("JWT_ACCESS_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            refresh_days: std::env::var("JWT_REFRESH_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "market-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "market-clients".to_string()),
        }
    }
}

/// JWT claims stored in session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account record id (subject)
    pub sub: String,
    /// External identity provider subject id
    pub subject_id: String,
    /// Account email
    pub email: String,
    /// Account role name
    pub role: String,
    /// "access" or "refresh"
    pub token_type: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued-at timestamp
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Wrong token type: expected {0}")]
    WrongTokenType(&'static str),

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Generate a printable random secret (development fallback)
fn generate_printable_secret() -> String {
    use rand::Rng;
    const CHARSET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*-_=+";
    let mut rng = rand::thread_rng();
    (0..64)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Load the JWT secret from the environment
fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(JwtError::ConfigError(
                    "JWT_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("JWT_SECRET not set, generating temporary key for development");
                Ok(generate_printable_secret())
            }
            #[cfg(not(debug_assertions))]
            {
                Err(JwtError::ConfigError(
                    "JWT_SECRET environment variable must be set in production".to_string(),
                ))
            }
        }
    }
}

/// JWT token service
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Create a new JWT service with the default configuration
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// Create a new JWT service with the given configuration
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn generate_token(
        &self,
        account: &Account,
        token_type: &str,
        lifetime: Duration,
    ) -> Result<String, JwtError> {
        let account_id = account
            .id
            .as_ref()
            .map(|t| t.to_string())
            .ok_or_else(|| JwtError::GenerationFailed("Account without id".to_string()))?;

        let now = Utc::now();
        let claims = Claims {
            sub: account_id,
            subject_id: account.subject_id.clone(),
            email: account.email.clone(),
            role: account.role.to_string(),
            token_type: token_type.to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Issue a fresh access/refresh credential pair for an account
    pub fn generate_token_pair(&self, account: &Account) -> Result<SessionTokens, JwtError> {
        let access_token = self.generate_token(
            account,
            TOKEN_TYPE_ACCESS,
            Duration::minutes(self.config.access_minutes),
        )?;
        let refresh_token = self.generate_token(
            account,
            TOKEN_TYPE_REFRESH,
            Duration::days(self.config.refresh_days),
        )?;
        Ok(SessionTokens {
            access_token,
            refresh_token,
        })
    }

    fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Validate an access token and return its claims
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate(token)?;
        if claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(JwtError::WrongTokenType(TOKEN_TYPE_ACCESS));
        }
        Ok(claims)
    }

    /// Validate a refresh token and return its claims
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate(token)?;
        if claims.token_type != TOKEN_TYPE_REFRESH {
            return Err(JwtError::WrongTokenType(TOKEN_TYPE_REFRESH));
        }
        Ok(claims)
    }

    /// Extract the bearer token from an Authorization header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Current caller context, parsed from validated access-token claims
///
/// Created by the authentication middleware and injected into request
/// extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Account record id
    pub id: String,
    /// External identity provider subject id
    pub subject_id: String,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        let role = claims.role.parse().unwrap_or(Role::User);
        Self {
            id: claims.sub,
            subject_id: claims.subject_id,
            email: claims.email,
            role,
        }
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Vendors and admins may publish products and request ads
    pub fn can_publish(&self) -> bool {
        self.role.can_publish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::sql::Thing;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-key-that-is-long-enough!".to_string(),
            access_minutes: 60,
            refresh_days: 30,
            issuer: "market-server".to_string(),
            audience: "market-clients".to_string(),
        })
    }

    fn test_account() -> Account {
        let mut account = Account::new(
            "firebase-uid-1".to_string(),
            "ada@example.com".to_string(),
            "Ada".to_string(),
        );
        account.id = Some(Thing::from(("account", "a1")));
        account
    }

    #[test]
    fn test_token_pair_roundtrip() {
        let service = test_service();
        let account = test_account();

        let tokens = service.generate_token_pair(&account).unwrap();

        let claims = service.validate_access_token(&tokens.access_token).unwrap();
        assert_eq!(claims.sub, "account:a1");
        assert_eq!(claims.subject_id, "firebase-uid-1");
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.role, "user");

        let claims = service
            .validate_refresh_token(&tokens.refresh_token)
            .unwrap();
        assert_eq!(claims.token_type, "refresh");
    }

    #[test]
    fn test_token_type_is_enforced() {
        let service = test_service();
        let account = test_account();
        let tokens = service.generate_token_pair(&account).unwrap();

        // Refresh token is not valid as an access token and vice versa
        assert!(matches!(
            service.validate_access_token(&tokens.refresh_token),
            Err(JwtError::WrongTokenType("access"))
        ));
        assert!(matches!(
            service.validate_refresh_token(&tokens.access_token),
            Err(JwtError::WrongTokenType("refresh"))
        ));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = test_service();
        let account = test_account();
        let tokens = service.generate_token_pair(&account).unwrap();

        let mut tampered = tokens.access_token.clone();
        tampered.push('x');
        assert!(service.validate_access_token(&tampered).is_err());

        let other = JwtService::with_config(JwtConfig {
            secret: "another-secret-key-that-is-long-enough".to_string(),
            ..service.config.clone()
        });
        assert!(other.validate_access_token(&tokens.access_token).is_err());
    }

    #[test]
    fn test_current_user_from_claims() {
        let service = test_service();
        let mut account = test_account();
        account.role = Role::Vendor;
        let tokens = service.generate_token_pair(&account).unwrap();
        let claims = service.validate_access_token(&tokens.access_token).unwrap();

        let user = CurrentUser::from(claims);
        assert_eq!(user.role, Role::Vendor);
        assert!(user.can_publish());
        assert!(!user.is_admin());
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
