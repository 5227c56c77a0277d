//! Error re-exports and repository error mapping

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::db::repository::RepoError;

/// Map a repository error onto the API error space with generic codes.
///
/// Handlers that need entity-specific codes (product vs account not-found,
/// submit-conflict vs decide-conflict) match the variants at the call site
/// instead.
pub fn repo_error(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
        RepoError::Duplicate(msg) | RepoError::Conflict(msg) => {
            AppError::with_message(ErrorCode::AlreadyExists, msg)
        }
        RepoError::Validation(msg) => AppError::validation(msg),
        RepoError::Database(msg) => AppError::database(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_mapping() {
        let err = repo_error(RepoError::NotFound("Product x not found".into()));
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = repo_error(RepoError::Duplicate("email taken".into()));
        assert_eq!(err.code, ErrorCode::AlreadyExists);

        let err = repo_error(RepoError::Validation("bad input".into()));
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = repo_error(RepoError::Database("io".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
