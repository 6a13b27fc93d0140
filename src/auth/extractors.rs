use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::warn;

use crate::auth::claims::Claims;
use crate::auth::jwt::TokenKeys;
use crate::errors::ServiceError;

/// Extracts and verifies the bearer token, exposing the caller's claims.
///
/// Every rejection is the same unauthorized response, whether the header was
/// missing, malformed, forged or expired.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenKeys: FromRef<S>,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = TokenKeys::from_ref(state);
        let auth = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ServiceError::InvalidToken)?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or(ServiceError::InvalidToken)?;

        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ServiceError::InvalidToken
        })?;

        Ok(AuthUser(claims))
    }
}
