use std::env;

use jsonwebtoken::Algorithm;
use time::Duration;

use crate::config::app::parse_env;
use crate::error::AppError;

/// Token signing settings
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// HMAC secret for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    pub algorithm: Algorithm,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            access_ttl: Duration::minutes(30),
            refresh_ttl: Duration::days(7),
        }
    }

    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    /// Reads `BACKEND_JWT_SECRET` (required) and the token TTLs.
    pub fn from_env() -> Result<Self, AppError> {
        let secret = env::var("BACKEND_JWT_SECRET")
            .map_err(|_| AppError::config("BACKEND_JWT_SECRET must be set"))?;
        if secret.trim().is_empty() {
            return Err(AppError::config("BACKEND_JWT_SECRET must not be empty"));
        }
        let access_minutes: i64 = parse_env("ACCESS_TOKEN_TTL_MINUTES", 30)?;
        let refresh_days: i64 = parse_env("REFRESH_TOKEN_TTL_DAYS", 7)?;
        if access_minutes <= 0 || refresh_days <= 0 {
            return Err(AppError::config("token TTLs must be positive"));
        }

        Ok(Self::new(secret.into_bytes())
            .with_ttls(Duration::minutes(access_minutes), Duration::days(refresh_days)))
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
