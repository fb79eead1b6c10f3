//! Token Authority
//!
//! Issues and verifies HS256 JWTs binding a username to a user id. Tokens are
//! stateless bearer credentials: there is no server-side session or
//! revocation list, only the `exp` claim limits their lifetime.

use std::time::Duration;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, get_current_timestamp, Algorithm, DecodingKey,
    EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Why a request's credentials were rejected.
///
/// Every message starts with "invalid token" so clients can match on it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid token: authorization header missing")]
    Missing,
    #[error("invalid token: expected `Bearer <token>`")]
    WrongFormat,
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid token: expired")]
    Expired,
}

/// JWT claims embedded in issued tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    /// User id
    pub id: String,
    /// Issued at (seconds since epoch)
    pub iat: u64,
    /// Expiry (seconds since epoch)
    pub exp: u64,
}

/// The identity a verified token asserts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub username: String,
    pub user_id: String,
}

pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenAuthority {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Sign a token for the given user.
    pub fn issue(&self, username: &str, user_id: &str) -> anyhow::Result<String> {
        let iat = get_current_timestamp();
        let exp = iat.checked_add(self.ttl.as_secs()).ok_or_else(|| {
            anyhow::anyhow!("token lifetime {:?} overflows the expiry", self.ttl)
        })?;
        let claims = Claims {
            username: username.to_owned(),
            id: user_id.to_owned(),
            iat,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("JWT encoding failed: {e}"))
    }

    /// Check signature, expiry and claim shape.
    pub fn verify(&self, token: &str) -> Result<TokenIdentity, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!("Token rejected: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken,
            }
        })?;

        let claims = data.claims;
        if claims.username.is_empty() || claims.id.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        Ok(TokenIdentity {
            username: claims.username,
            user_id: claims.id,
        })
    }
}

/// Pull the token out of an `authorization` header value.
pub fn bearer_token(header_value: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header_value
        .trim()
        .split_once(' ')
        .ok_or(AuthError::WrongFormat)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::WrongFormat);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::WrongFormat);
    }
    Ok(token)
}
