//! Bearer tokens for seeded users.

use food_backend::auth::jwt::mint_access_token;
use food_backend::domain::UserRole;
use food_backend::state::security_config::SecurityConfig;
use time::{Duration, OffsetDateTime};

pub fn bearer(user_id: i64, role: UserRole, sec: &SecurityConfig) -> String {
    let token = mint_access_token(user_id, role, OffsetDateTime::now_utc(), sec)
        .expect("should mint token successfully");
    format!("Bearer {token}")
}

/// Issued far enough in the past that it has already expired.
pub fn expired_bearer(user_id: i64, role: UserRole, sec: &SecurityConfig) -> String {
    let issued = OffsetDateTime::now_utc() - sec.access_ttl - Duration::hours(1);
    let token =
        mint_access_token(user_id, role, issued, sec).expect("should mint expired token");
    format!("Bearer {token}")
}
