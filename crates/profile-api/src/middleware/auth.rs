//! Bearer token extraction

use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};

use profile_core::{resolve_member_id, CallerContext};
use profile_security::JwtService;

use crate::error::ApiError;
use crate::state::AppState;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verified caller context from the `Authorization` header, `None` when no
/// bearer token was sent.
pub fn caller_from_headers(headers: &HeaderMap, jwt: &JwtService) -> Result<Option<CallerContext>, ApiError> {
    let Some(token) = bearer_token(headers) else {
        return Ok(None);
    };

    let claims = jwt
        .validate_token(token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;
    Ok(Some(CallerContext::new(claims.sub)))
}

/// Caller with a resolvable member id. Rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthMember {
    pub member_id: String,
    pub caller: CallerContext,
}

impl FromRequestParts<AppState> for AuthMember {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = caller_from_headers(&parts.headers, &state.jwt)?
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;
        let member_id = resolve_member_id(&caller)?;
        Ok(Self { member_id, caller })
    }
}

/// Caller context for endpoints that do not require authentication. Missing
/// or invalid tokens yield an anonymous context.
#[derive(Debug, Clone, Default)]
pub struct OptionalCaller(pub CallerContext);

impl FromRequestParts<AppState> for OptionalCaller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = caller_from_headers(&parts.headers, &state.jwt)
            .ok()
            .flatten()
            .unwrap_or_default();
        Ok(Self(caller))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[test]
    fn test_caller_from_valid_token() {
        let jwt = JwtService::new("test-secret", 3600);
        let token = jwt.generate_access_token("lisa-id", None).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token)).unwrap());

        let caller = caller_from_headers(&headers, &jwt).unwrap().unwrap();
        assert_eq!(caller.subject(), Some("lisa-id"));
    }

    #[test]
    fn test_invalid_token_is_unauthorized() {
        let jwt = JwtService::new("test-secret", 3600);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer nope"));

        assert!(matches!(caller_from_headers(&headers, &jwt), Err(ApiError::Unauthorized(_))));
    }
}
