use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::OffsetDateTime;

use super::claims::{Claims, TokenType};
use crate::domain::roles::UserRole;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Access and refresh tokens minted together.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn mint(
    user_id: i64,
    role: UserRole,
    typ: TokenType,
    now: OffsetDateTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let ttl = match typ {
        TokenType::Access => security.access_ttl,
        TokenType::Refresh => security.refresh_ttl,
    };
    let iat = now.unix_timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        role,
        typ,
        iat,
        exp: (now + ttl).unix_timestamp(),
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

pub fn mint_access_token(
    user_id: i64,
    role: UserRole,
    now: OffsetDateTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    mint(user_id, role, TokenType::Access, now, security)
}

pub fn mint_refresh_token(
    user_id: i64,
    role: UserRole,
    now: OffsetDateTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    mint(user_id, role, TokenType::Refresh, now, security)
}

pub fn mint_token_pair(
    user_id: i64,
    role: UserRole,
    now: OffsetDateTime,
    security: &SecurityConfig,
) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        access_token: mint_access_token(user_id, role, now, security)?,
        refresh_token: mint_refresh_token(user_id, role, now, security)?,
    })
}

/// Verify signature and expiry, then require the expected token type.
///
/// Expired tokens map to `UNAUTHORIZED_EXPIRED_JWT`; everything else,
/// including a token of the wrong type, to `UNAUTHORIZED_INVALID_JWT`.
pub fn verify_token(
    token: &str,
    expected: TokenType,
    security: &SecurityConfig,
) -> Result<Claims, AppError> {
    let validation = Validation::new(security.algorithm);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::unauthorized_expired_jwt(),
        _ => AppError::unauthorized_invalid_jwt(),
    })?;

    if claims.typ != expected {
        return Err(AppError::unauthorized_invalid_jwt());
    }
    Ok(claims)
}

pub fn verify_access_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    verify_token(token, TokenType::Access, security)
}

pub fn verify_refresh_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    verify_token(token, TokenType::Refresh, security)
}
