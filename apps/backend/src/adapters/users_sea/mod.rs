//! SeaORM adapter for users.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
};

use crate::entities::users;

pub mod dto;

pub use dto::{UserCreate, UserProfileUpdate};

// Adapter functions return DbErr; repos map to DomainError via From<DbErr>.

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find_by_id(id).one(conn).await
}

pub async fn find_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await
}

pub async fn find_by_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    phone: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Phone.eq(phone))
        .one(conn)
        .await
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<users::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let user_active = users::ActiveModel {
        id: NotSet,
        email: Set(dto.email),
        phone: Set(dto.phone),
        first_name: Set(dto.first_name),
        last_name: Set(dto.last_name),
        date_of_birth: Set(None),
        role: Set(dto.role),
        password_hash: Set(dto.password_hash),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    user_active.insert(conn).await
}

pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user: users::Model,
    dto: UserProfileUpdate,
) -> Result<users::Model, sea_orm::DbErr> {
    let mut active: users::ActiveModel = user.into();
    if let Some(first_name) = dto.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = dto.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(phone) = dto.phone {
        active.phone = Set(phone);
    }
    if let Some(date_of_birth) = dto.date_of_birth {
        active.date_of_birth = Set(date_of_birth);
    }
    active.updated_at = Set(time::OffsetDateTime::now_utc());
    active.update(conn).await
}

pub async fn set_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user: users::Model,
    is_active: bool,
) -> Result<users::Model, sea_orm::DbErr> {
    let mut active: users::ActiveModel = user.into();
    active.is_active = Set(is_active);
    active.updated_at = Set(time::OffsetDateTime::now_utc());
    active.update(conn).await
}

/// Used by the admin bootstrap to promote an existing account.
pub async fn set_role_and_password<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user: users::Model,
    role: &str,
    password_hash: String,
) -> Result<users::Model, sea_orm::DbErr> {
    let mut active: users::ActiveModel = user.into();
    active.role = Set(role.to_string());
    active.password_hash = Set(password_hash);
    active.is_active = Set(true);
    active.updated_at = Set(time::OffsetDateTime::now_utc());
    active.update(conn).await
}
