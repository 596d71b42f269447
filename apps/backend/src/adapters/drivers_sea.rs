//! SeaORM adapter for driver profiles.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;

use crate::entities::drivers;

#[derive(Debug, Clone, Default)]
pub struct DriverUpdate {
    pub vehicle_type: Option<String>,
    pub license_plate: Option<Option<String>>,
    pub hourly_rate_cents: Option<i64>,
    pub is_active: Option<bool>,
    pub is_available: Option<bool>,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    vehicle_type: &str,
    license_plate: Option<String>,
) -> Result<drivers::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    drivers::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        vehicle_type: Set(vehicle_type.to_string()),
        hourly_rate_cents: Set(0),
        license_plate: Set(license_plate),
        is_available: Set(false),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<drivers::Model>, sea_orm::DbErr> {
    drivers::Entity::find_by_id(id).one(conn).await
}

pub async fn find_by_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<drivers::Model>, sea_orm::DbErr> {
    drivers::Entity::find()
        .filter(drivers::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: drivers::Model,
    dto: DriverUpdate,
) -> Result<drivers::Model, sea_orm::DbErr> {
    let mut active: drivers::ActiveModel = model.into();
    if let Some(vehicle_type) = dto.vehicle_type {
        active.vehicle_type = Set(vehicle_type);
    }
    if let Some(license_plate) = dto.license_plate {
        active.license_plate = Set(license_plate);
    }
    if let Some(rate) = dto.hourly_rate_cents {
        active.hourly_rate_cents = Set(rate);
    }
    if let Some(is_active) = dto.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(is_available) = dto.is_available {
        active.is_available = Set(is_available);
    }
    active.updated_at = Set(OffsetDateTime::now_utc());
    active.update(conn).await
}

pub async fn set_available<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: drivers::Model,
    is_available: bool,
) -> Result<drivers::Model, sea_orm::DbErr> {
    update(
        conn,
        model,
        DriverUpdate {
            is_available: Some(is_available),
            ..Default::default()
        },
    )
    .await
}

/// Active and available drivers, by id.
pub async fn list_available<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<drivers::Model>, sea_orm::DbErr> {
    drivers::Entity::find()
        .filter(drivers::Column::IsActive.eq(true))
        .filter(drivers::Column::IsAvailable.eq(true))
        .order_by_asc(drivers::Column::Id)
        .all(conn)
        .await
}
