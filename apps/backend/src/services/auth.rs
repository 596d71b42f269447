//! Signup, login and token refresh.

use lazy_regex::regex_is_match;
use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::info;
use unicode_normalization::UnicodeNormalization;

use crate::adapters::users_sea::UserCreate;
use crate::auth::jwt::{mint_token_pair, verify_refresh_token, TokenPair};
use crate::auth::password::{hash_password, verify_password};
use crate::domain::UserRole;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::repos::users::{self, User};
use crate::state::security_config::SecurityConfig;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone)]
pub enum LoginIdentifier {
    Email(String),
    Phone(String),
}

#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: User,
    pub tokens: TokenPair,
}

/// Trim, NFKC-normalize and lowercase, then check the shape.
pub fn normalize_email(raw: &str) -> Result<String, DomainError> {
    let email = raw.trim().nfkc().collect::<String>().to_lowercase();
    if !regex_is_match!(r"^[^@\s]+@[^@\s]+\.[^@\s]+$", &email) {
        return Err(DomainError::validation(
            ValidationKind::InvalidEmail,
            "Email address is not valid",
        ));
    }
    Ok(email)
}

pub fn normalize_phone(raw: &str) -> Result<String, DomainError> {
    let phone = raw.trim();
    if !regex_is_match!(r"^\+?[0-9]{7,15}$", phone) {
        return Err(DomainError::validation(
            ValidationKind::InvalidPhone,
            "Phone must be 7-15 digits with an optional leading +",
        ));
    }
    Ok(phone.to_string())
}

pub fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(
            ValidationKind::InvalidPassword,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

fn signup_role(raw: Option<&str>) -> Result<UserRole, DomainError> {
    let Some(raw) = raw else {
        return Ok(UserRole::Customer);
    };
    let role: UserRole = raw
        .parse()
        .map_err(|e: String| DomainError::validation(ValidationKind::InvalidRole, e))?;
    if !role.self_assignable() {
        return Err(DomainError::validation(
            ValidationKind::InvalidRole,
            format!("Role '{role}' cannot be self-assigned"),
        ));
    }
    Ok(role)
}

pub async fn signup<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    input: SignupInput,
    security: &SecurityConfig,
) -> Result<AuthOutcome, AppError> {
    let email = input.email.as_deref().map(normalize_email).transpose()?;
    let phone = input.phone.as_deref().map(normalize_phone).transpose()?;
    if email.is_none() && phone.is_none() {
        return Err(DomainError::validation_other("Either email or phone is required").into());
    }
    validate_password(&input.password)?;
    let role = signup_role(input.role.as_deref())?;

    if let Some(email) = email.as_deref() {
        if users::find_credentials_by_email(conn, email).await?.is_some() {
            return Err(
                DomainError::conflict(ConflictKind::UniqueEmail, "Email already registered").into(),
            );
        }
    }
    if let Some(phone) = phone.as_deref() {
        if users::find_credentials_by_phone(conn, phone).await?.is_some() {
            return Err(
                DomainError::conflict(ConflictKind::UniquePhone, "Phone already registered").into(),
            );
        }
    }

    let password_hash = hash_password(&input.password)?;
    let user = users::create_user(
        conn,
        UserCreate {
            email,
            phone,
            first_name: input.first_name,
            last_name: input.last_name,
            role: role.as_str().to_string(),
            password_hash,
        },
    )
    .await?;

    info!(user_id = user.id, role = %user.role, "user.signed_up");

    let tokens = mint_token_pair(user.id, user.role, OffsetDateTime::now_utc(), security)?;
    Ok(AuthOutcome { user, tokens })
}

pub async fn login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    identifier: LoginIdentifier,
    password: &str,
    security: &SecurityConfig,
) -> Result<AuthOutcome, AppError> {
    let (credentials, shown) = match &identifier {
        LoginIdentifier::Email(raw) => {
            let email = raw.trim().nfkc().collect::<String>().to_lowercase();
            (users::find_credentials_by_email(conn, &email).await?, email)
        }
        LoginIdentifier::Phone(raw) => {
            let phone = raw.trim().to_string();
            (users::find_credentials_by_phone(conn, &phone).await?, phone)
        }
    };

    let Some(credentials) = credentials else {
        security::login_failed("unknown_identifier", &shown);
        return Err(AppError::invalid_credentials());
    };
    if !verify_password(password, &credentials.password_hash) {
        security::login_failed("bad_password", &shown);
        return Err(AppError::invalid_credentials());
    }
    if !credentials.user.is_active {
        security::login_failed("account_disabled", &shown);
        return Err(AppError::account_disabled());
    }

    let user = credentials.user;
    info!(user_id = user.id, identifier = %Redacted(&shown), "user.logged_in");

    let tokens = mint_token_pair(user.id, user.role, OffsetDateTime::now_utc(), security)?;
    Ok(AuthOutcome { user, tokens })
}

/// Exchange a refresh token for a fresh pair. The role is re-read from
/// the database so promotions take effect on refresh.
pub async fn refresh<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    refresh_token: &str,
    security: &SecurityConfig,
) -> Result<AuthOutcome, AppError> {
    let claims = verify_refresh_token(refresh_token, security)?;
    let user_id = claims.user_id()?;

    let user = users::find_by_id(conn, user_id)
        .await?
        .ok_or_else(AppError::unauthorized_invalid_jwt)?;
    if !user.is_active {
        return Err(AppError::account_disabled());
    }

    let tokens = mint_token_pair(user.id, user.role, OffsetDateTime::now_utc(), security)?;
    Ok(AuthOutcome { user, tokens })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        assert_eq!(
            normalize_email("  Alice@Example.COM ").unwrap(),
            "alice@example.com"
        );
        // fullwidth letters fold under NFKC
        assert_eq!(normalize_email("ｂｏｂ@example.com").unwrap(), "bob@example.com");
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("a@b").is_err());
        assert!(normalize_email("a b@example.com").is_err());
    }

    #[test]
    fn phone_shape() {
        assert_eq!(normalize_phone(" +4915112345678 ").unwrap(), "+4915112345678");
        assert!(normalize_phone("1234567").is_ok());
        assert!(normalize_phone("123456").is_err());
        assert!(normalize_phone("+1234567890123456").is_err());
        assert!(normalize_phone("12-34-567").is_err());
    }

    #[test]
    fn password_length() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("1234567").is_err());
    }

    #[test]
    fn admin_is_not_self_assignable() {
        assert_eq!(signup_role(None).unwrap(), UserRole::Customer);
        assert_eq!(signup_role(Some("driver")).unwrap(), UserRole::Driver);
        assert!(matches!(
            signup_role(Some("admin")),
            Err(DomainError::Validation(ValidationKind::InvalidRole, _))
        ));
        assert!(signup_role(Some("wizard")).is_err());
    }
}
