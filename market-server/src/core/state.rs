use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::services::{AssetHost, IdentityResolver, PaymentGateway};
use crate::utils::AppError;

/// Server state - shared references to every service
///
/// Holds the configuration, the embedded database handle and the three
/// external collaborators. All collaborators are constructed exactly once
/// at startup and shared by reference; cloning the state is cheap.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | Configuration (immutable) |
/// | db | Surreal<Db> | Embedded database |
/// | jwt_service | Arc<JwtService> | Session token service |
/// | identity | Arc<IdentityResolver> | Identity provider client |
/// | payments | Arc<PaymentGateway> | Payment gateway client |
/// | assets | Arc<AssetHost> | Asset host client |
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// Session token service
    pub jwt_service: Arc<JwtService>,
    /// External identity provider client
    pub identity: Arc<IdentityResolver>,
    /// External payment gateway client
    pub payments: Arc<PaymentGateway>,
    /// External asset host client
    pub assets: Arc<AssetHost>,
}

impl ServerState {
    /// Initialize the server state
    ///
    /// 1. Ensure the work directory structure exists
    /// 2. Open the database (work_dir/database/market.db)
    /// 3. Construct the session token service and collaborator clients
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("market.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let identity = Arc::new(IdentityResolver::new(
            config.identity_lookup_url.clone(),
            config.identity_api_key.clone(),
        ));
        let payments = Arc::new(PaymentGateway::new(
            config.payment_api_base.clone(),
            config.payment_secret_key.clone(),
        ));
        let assets = Arc::new(AssetHost::new(
            config.asset_upload_url.clone(),
            config.asset_upload_preset.clone(),
        ));

        Ok(Self {
            config: config.clone(),
            db: db_service.db,
            jwt_service,
            identity,
            payments,
            assets,
        })
    }

    /// Get the database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Get the session token service
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
