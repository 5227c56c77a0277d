//! Identity Resolver
//!
//! Maps an opaque identity-provider token to a verified subject identity.
//! The backend never verifies provider tokens itself — it asks the
//! provider's lookup endpoint and consumes the result.

use crate::utils::{AppError, ErrorCode};

/// A verified caller identity as reported by the provider
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// Provider-issued unique subject id
    pub subject_id: String,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

impl VerifiedIdentity {
    /// Display-name fallback chain: explicit profile name, provider name,
    /// then the local part of the email address.
    pub fn display_name(&self, explicit: Option<&str>) -> String {
        if let Some(name) = explicit
            && !name.trim().is_empty()
        {
            return name.trim().to_string();
        }
        if let Some(name) = &self.name
            && !name.trim().is_empty()
        {
            return name.trim().to_string();
        }
        self.email
            .split('@')
            .next()
            .unwrap_or(&self.email)
            .to_string()
    }
}

/// Client for the external identity provider's token lookup endpoint
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    http: reqwest::Client,
    lookup_url: String,
    api_key: String,
}

impl IdentityResolver {
    pub fn new(lookup_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            lookup_url,
            api_key,
        }
    }

    /// Verify a provider token and return the subject identity.
    ///
    /// A rejected token is 401; a failing provider is 502 — never silently
    /// treated as a success.
    pub async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, AppError> {
        let url = format!("{}?key={}", self.lookup_url, self.api_key);
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "idToken": id_token }))
            .send()
            .await
            .map_err(|e| {
                AppError::dependency(
                    ErrorCode::IdentityProviderError,
                    format!("Identity provider request failed: {e}"),
                )
            })?;

        let status = resp.status();
        let body: serde_json::Value = resp.json().await.map_err(|e| {
            AppError::dependency(
                ErrorCode::IdentityProviderError,
                format!("Identity provider returned an unreadable response: {e}"),
            )
        })?;

        if status.is_client_error() {
            tracing::warn!(target: "security", status = %status, "Identity token rejected");
            return Err(AppError::new(ErrorCode::IdentityTokenInvalid));
        }
        if !status.is_success() {
            return Err(AppError::dependency(
                ErrorCode::IdentityProviderError,
                format!("Identity provider returned {status}"),
            ));
        }

        let user = &body["users"][0];
        let subject_id = user["localId"]
            .as_str()
            .ok_or_else(|| AppError::new(ErrorCode::IdentityTokenInvalid))?
            .to_string();
        let email = user["email"]
            .as_str()
            .ok_or_else(|| AppError::new(ErrorCode::IdentityTokenInvalid))?
            .to_string();

        Ok(VerifiedIdentity {
            subject_id,
            email,
            name: user["displayName"].as_str().map(String::from),
            photo_url: user["photoUrl"].as_str().map(String::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(name: Option<&str>) -> VerifiedIdentity {
        VerifiedIdentity {
            subject_id: "uid-1".into(),
            email: "ada.lovelace@example.com".into(),
            name: name.map(String::from),
            photo_url: None,
        }
    }

    #[test]
    fn test_display_name_prefers_explicit() {
        let id = identity(Some("Provider Name"));
        assert_eq!(id.display_name(Some("Explicit")), "Explicit");
    }

    #[test]
    fn test_display_name_falls_back_to_provider() {
        let id = identity(Some("Provider Name"));
        assert_eq!(id.display_name(None), "Provider Name");
        assert_eq!(id.display_name(Some("  ")), "Provider Name");
    }

    #[test]
    fn test_display_name_falls_back_to_email_local_part() {
        let id = identity(None);
        assert_eq!(id.display_name(None), "ada.lovelace");
    }
}
