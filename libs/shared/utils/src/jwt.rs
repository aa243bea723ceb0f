use chrono::{TimeZone, Utc};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{JwtClaims, User};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("JWT secret is not set")]
    MissingSecret,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Invalid token: {0}")]
    Malformed(String),
}

/// Validates an HS256 access token issued by the auth provider and
/// returns the user it identifies.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<User, TokenError> {
    if jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    // Provider tokens carry aud="authenticated"; audience is not checked here.
    validation.validate_aud = false;

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        debug!("Token rejected: {}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            other => TokenError::Malformed(format!("{:?}", other)),
        }
    })?;

    let claims = data.claims;
    let created_at = claims
        .iat
        .and_then(|ts| i64::try_from(ts).ok())
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single());

    Ok(User {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
        metadata: claims.user_metadata,
        created_at,
    })
}
