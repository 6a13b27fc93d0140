use std::time::Duration;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::errors::{ServiceError, ServiceResult};

/// Tokens are accepted for one hour after issuance. There is no refresh and
/// no revocation: an issued token stays valid for the full window even if
/// the account changes underneath it.
pub const TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// HS256 signing and verification keys derived from the configured secret.
/// Constructed once at startup and cloned into whoever needs them.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Signs a fresh identity assertion for the given user.
    pub fn issue(&self, user_id: Uuid, name: &str, email: &str) -> ServiceResult<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(TOKEN_TTL.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            name: name.to_owned(),
            email: email.to_owned(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(ServiceError::TokenSigning)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    /// Checks signature, structure and expiry. Every failure collapses into
    /// [`ServiceError::InvalidToken`] so callers cannot tell a forged token
    /// from an expired one.
    pub fn verify(&self, token: &str) -> ServiceResult<Claims> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| ServiceError::InvalidToken)?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}
