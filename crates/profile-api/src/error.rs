use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use profile_core::DomainError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    /// Mutations answer 400 rather than 404 when the caller's member is gone.
    pub fn for_mutation(err: DomainError) -> Self {
        match err {
            DomainError::MemberNotFound(id) => {
                ApiError::BadRequest(format!("Could not find member {}", id))
            }
            other => other.into(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MemberNotFound(id) => ApiError::NotFound(format!("Member {} not found", id)),
            DomainError::Unauthenticated => {
                ApiError::Unauthorized("Could not resolve a member from the token".to_string())
            }
            DomainError::InvalidOperation(msg)
            | DomainError::StorageError(msg)
            | DomainError::PersistenceError(msg)
            | DomainError::ValidationError(msg) => ApiError::BadRequest(msg),
            DomainError::DatabaseError(_) | DomainError::InternalError(_) => {
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, "Unauthorized", msg)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "NotFound", msg)
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "BadRequest", msg)
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_status() {
        let cases = [
            (DomainError::MemberNotFound("x".into()), StatusCode::NOT_FOUND),
            (DomainError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (DomainError::InvalidOperation("no".into()), StatusCode::BAD_REQUEST),
            (DomainError::StorageError("down".into()), StatusCode::BAD_REQUEST),
            (DomainError::PersistenceError("no-op".into()), StatusCode::BAD_REQUEST),
            (DomainError::DatabaseError("pool".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_missing_member_on_mutation_is_bad_request() {
        let response = ApiError::for_mutation(DomainError::MemberNotFound("x".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
