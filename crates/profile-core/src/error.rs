//! Domain errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    #[error("Unauthenticated: no member identity in the caller context")]
    Unauthenticated,

    #[error("{0}")]
    InvalidOperation(String),

    #[error("{0}")]
    StorageError(String),

    #[error("{0}")]
    PersistenceError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}
