//! Database Module
//!
//! Embedded SurrealDB storage: four schemaless collections (account,
//! product, vendor_application, ad) referencing each other by record id.
//! Identity uniqueness (email, subject id) is enforced with unique
//! indexes so concurrent first logins cannot create duplicate accounts.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "market";
const DATABASE: &str = "market";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at the given path and apply the schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!(path = %db_path, "Database ready");
        Ok(Self { db })
    }
}

/// Define tables and unique indexes. Idempotent; runs at every startup.
///
/// Also used by the integration tests to prepare throwaway databases.
pub async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "DEFINE TABLE IF NOT EXISTS account SCHEMALESS;
         DEFINE INDEX IF NOT EXISTS account_email_idx ON TABLE account COLUMNS email UNIQUE;
         DEFINE INDEX IF NOT EXISTS account_subject_idx ON TABLE account COLUMNS subject_id UNIQUE;
         DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
         DEFINE TABLE IF NOT EXISTS vendor_application SCHEMALESS;
         DEFINE TABLE IF NOT EXISTS ad SCHEMALESS;",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
    .check()
    .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;

    Ok(())
}
