//! Repository Module
//!
//! CRUD operations for the SurrealDB collections. Cross-record invariants
//! (one active vendor application per applicant, one active ad per
//! product, the approve-and-promote side effect) run inside multi-statement
//! database transactions rather than application-level check-then-act, so
//! two racing requests cannot both pass an existence check.

pub mod account;
pub mod ad;
pub mod product;
pub mod vendor_application;

// Re-exports
pub use account::AccountRepository;
pub use ad::AdRepository;
pub use product::ProductRepository;
pub use vendor_application::VendorApplicationRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations surface as "already contains" errors
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Strip a `table:` prefix from an id if present
pub fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    match id.split_once(':') {
        Some((t, rest)) if t == table => rest,
        _ => id,
    }
}

/// Build a record id from a table name and a raw or prefixed id
pub fn make_thing(table: &str, id: &str) -> Thing {
    Thing::from((table, strip_table_prefix(table, id)))
}

/// Row shape for `SELECT count() ... GROUP ALL` queries
#[derive(Debug, serde::Deserialize)]
pub(crate) struct CountRow {
    pub count: u64,
}

/// Surface transaction errors from a multi-statement response.
///
/// A `THROW` inside a transaction cancels every statement; the thrown
/// marker (`not_found: ...` / `conflict: ...`) is buried among generic
/// rollback notices, so scan all statement errors for it.
pub(crate) fn txn_error(response: &mut surrealdb::Response) -> Option<RepoError> {
    let errors = response.take_errors();
    if errors.is_empty() {
        return None;
    }

    let mut fallback = None;
    for (_, err) in errors {
        let msg = err.to_string();
        if let Some(rest) = msg.split("not_found:").nth(1) {
            return Some(RepoError::NotFound(rest.trim().to_string()));
        }
        if let Some(rest) = msg.split("conflict:").nth(1) {
            return Some(RepoError::Conflict(rest.trim().to_string()));
        }
        if fallback.is_none() {
            fallback = Some(RepoError::Database(msg));
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_table_prefix() {
        assert_eq!(strip_table_prefix("product", "product:abc"), "abc");
        assert_eq!(strip_table_prefix("product", "abc"), "abc");
        assert_eq!(strip_table_prefix("product", "account:abc"), "account:abc");
    }

    #[test]
    fn test_make_thing() {
        let thing = make_thing("product", "abc");
        assert_eq!(thing.tb, "product");

        let thing = make_thing("product", "product:abc");
        assert_eq!(thing.tb, "product");
        assert_eq!(thing.id.to_string(), "abc");
    }
}
