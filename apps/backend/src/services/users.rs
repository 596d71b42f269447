//! Customer profile operations.

use sea_orm::ConnectionTrait;
use tracing::info;

use super::auth::normalize_phone;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::repos::users::{self, User, UserProfileUpdate};

pub async fn get_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<User, DomainError> {
    users::find_by_id(conn, user_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::User, "User not found"))
}

pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    mut update: UserProfileUpdate,
) -> Result<User, DomainError> {
    if let Some(Some(phone)) = update.phone.as_ref() {
        let phone = normalize_phone(phone)?;
        if let Some(other) = users::find_credentials_by_phone(conn, &phone).await? {
            if other.user.id != user_id {
                return Err(DomainError::conflict(
                    ConflictKind::UniquePhone,
                    "Phone already registered",
                ));
            }
        }
        update.phone = Some(Some(phone));
    }

    if update.is_empty() {
        return get_profile(conn, user_id).await;
    }

    let user = users::update_profile(conn, user_id, update)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::User, "User not found"))?;
    info!(user_id, "user.profile_updated");
    Ok(user)
}

pub async fn deactivate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<(), DomainError> {
    if !users::deactivate(conn, user_id).await? {
        return Err(DomainError::not_found(NotFoundKind::User, "User not found"));
    }
    info!(user_id, "user.deactivated");
    Ok(())
}
