use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Server configuration
///
/// Every field can be overridden through environment variables:
///
/// | Environment variable | Default | Description |
/// |----------------------|---------|-------------|
/// | WORK_DIR | /var/lib/market/server | Work directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development / staging / production |
/// | IDENTITY_LOOKUP_URL | provider lookup endpoint | Identity token verification |
/// | IDENTITY_API_KEY | (empty) | Identity provider API key |
/// | PAYMENT_API_BASE | https://api.stripe.com/v1 | Payment gateway base URL |
/// | PAYMENT_SECRET_KEY | (empty) | Payment gateway secret key |
/// | ASSET_UPLOAD_URL | (empty) | Asset host upload endpoint |
/// | ASSET_UPLOAD_PRESET | marketplace | Asset host upload preset |
#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory for the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Session token configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,

    // === External collaborators ===
    /// Identity provider token lookup endpoint
    pub identity_lookup_url: String,
    /// Identity provider API key
    pub identity_api_key: String,
    /// Payment gateway API base URL
    pub payment_api_base: String,
    /// Payment gateway secret key
    pub payment_secret_key: String,
    /// Asset host upload endpoint
    pub asset_upload_url: String,
    /// Asset host upload preset
    pub asset_upload_preset: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/market/server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            identity_lookup_url: std::env::var("IDENTITY_LOOKUP_URL").unwrap_or_else(|_| {
                "https://identitytoolkit.googleapis.com/v1/accounts:lookup".into()
            }),
            identity_api_key: std::env::var("IDENTITY_API_KEY").unwrap_or_default(),
            payment_api_base: std::env::var("PAYMENT_API_BASE")
                .unwrap_or_else(|_| "https://api.stripe.com/v1".into()),
            payment_secret_key: std::env::var("PAYMENT_SECRET_KEY").unwrap_or_default(),
            asset_upload_url: std::env::var("ASSET_UPLOAD_URL").unwrap_or_default(),
            asset_upload_preset: std::env::var("ASSET_UPLOAD_PRESET")
                .unwrap_or_else(|_| "marketplace".into()),
        }
    }

    /// Directory holding the embedded database
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Directory holding log files
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Ensure the work directory structure exists
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}
