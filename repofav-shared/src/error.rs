/// Domain error taxonomy
///
/// Services return [`ServiceError`]; the HTTP layer maps each variant to one
/// status code. Lower-level errors convert in via `From` so services can use `?`.

use thiserror::Error;

use crate::auth::password::PasswordError;
use crate::github::GithubError;
use crate::store::StoreError;

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or missing input
    #[error("{0}")]
    InvalidInput(String),

    /// No valid session, or bad credentials
    #[error("{0}")]
    Unauthenticated(String),

    /// Uniqueness or state precondition failed
    #[error("{0}")]
    Conflict(String),

    /// GitHub failed or answered unexpectedly
    #[error("upstream error: {0}")]
    Upstream(String),

    /// A feature needs settings that are absent
    #[error("{0}")]
    NotConfigured(String),

    /// Anything else; never shown to clients verbatim
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(constraint) => ServiceError::Conflict(constraint),
            StoreError::Database(e) => ServiceError::Internal(format!("Database error: {}", e)),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<GithubError> for ServiceError {
    fn from(err: GithubError) -> Self {
        ServiceError::Upstream(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_conflict_maps_to_conflict() {
        let err: ServiceError = StoreError::Conflict("users_email_unique".to_string()).into();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn test_database_error_maps_to_internal() {
        let err: ServiceError = StoreError::Database(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(err, ServiceError::Internal(msg) if msg.contains("Database error")));
    }

    #[test]
    fn test_github_error_maps_to_upstream() {
        let err: ServiceError = GithubError::Timeout.into();
        assert!(matches!(err, ServiceError::Upstream(msg) if msg.contains("timed out")));
    }
}
