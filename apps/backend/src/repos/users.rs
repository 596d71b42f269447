//! User repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use utoipa::ToSchema;

use super::parse_column;
use crate::adapters::users_sea as users_adapter;
use crate::domain::UserRole;
use crate::entities::users;
use crate::errors::domain::DomainError;

pub use users_adapter::{UserCreate, UserProfileUpdate};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// User domain model
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct User {
    pub id: i64,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(with = "iso_date::option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_birth: Option<Date>,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A user together with the stored password hash, for login checks only.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<User>, DomainError> {
    users_adapter::find_by_id(conn, id)
        .await?
        .map(User::try_from)
        .transpose()
}

pub async fn find_credentials_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<UserCredentials>, DomainError> {
    users_adapter::find_by_email(conn, email)
        .await?
        .map(UserCredentials::try_from)
        .transpose()
}

pub async fn find_credentials_by_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    phone: &str,
) -> Result<Option<UserCredentials>, DomainError> {
    users_adapter::find_by_phone(conn, phone)
        .await?
        .map(UserCredentials::try_from)
        .transpose()
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<User, DomainError> {
    let user = users_adapter::create_user(conn, dto).await?;
    User::try_from(user)
}

pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    dto: UserProfileUpdate,
) -> Result<Option<User>, DomainError> {
    let Some(model) = users_adapter::find_by_id(conn, user_id).await? else {
        return Ok(None);
    };
    let updated = users_adapter::update_profile(conn, model, dto).await?;
    User::try_from(updated).map(Some)
}

/// Soft delete. Returns `false` when the user does not exist.
pub async fn deactivate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<bool, DomainError> {
    let Some(model) = users_adapter::find_by_id(conn, user_id).await? else {
        return Ok(false);
    };
    users_adapter::set_active(conn, model, false).await?;
    Ok(true)
}

/// Create an admin, or promote the account already holding `email`.
pub async fn upsert_admin<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Result<(User, bool), DomainError> {
    if let Some(existing) = users_adapter::find_by_email(conn, email).await? {
        let updated = users_adapter::set_role_and_password(
            conn,
            existing,
            UserRole::Admin.as_str(),
            password_hash,
        )
        .await?;
        return Ok((User::try_from(updated)?, false));
    }

    let created = users_adapter::create_user(
        conn,
        UserCreate {
            email: Some(email.to_string()),
            phone: None,
            first_name,
            last_name,
            role: UserRole::Admin.as_str().to_string(),
            password_hash,
        },
    )
    .await?;
    Ok((User::try_from(created)?, true))
}

impl TryFrom<users::Model> for User {
    type Error = DomainError;

    fn try_from(model: users::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            email: model.email,
            phone: model.phone,
            first_name: model.first_name,
            last_name: model.last_name,
            date_of_birth: model.date_of_birth,
            role: parse_column(&model.role, "users.role")?,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<users::Model> for UserCredentials {
    type Error = DomainError;

    fn try_from(mut model: users::Model) -> Result<Self, Self::Error> {
        let password_hash = std::mem::take(&mut model.password_hash);
        Ok(Self {
            user: User::try_from(model)?,
            password_hash,
        })
    }
}
