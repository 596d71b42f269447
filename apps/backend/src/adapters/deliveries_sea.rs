//! SeaORM adapter for deliveries.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::deliveries;

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
    driver_id: i64,
    distance_km: f64,
    now: OffsetDateTime,
) -> Result<deliveries::Model, sea_orm::DbErr> {
    deliveries::ActiveModel {
        id: NotSet,
        order_id: Set(order_id),
        driver_id: Set(driver_id),
        assigned_at: Set(now),
        picked_at: Set(None),
        delivered_at: Set(None),
        distance_km: Set(distance_km),
        driver_earning_cents: Set(0),
    }
    .insert(conn)
    .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<deliveries::Model>, sea_orm::DbErr> {
    deliveries::Entity::find_by_id(id).one(conn).await
}

pub async fn find_by_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
) -> Result<Option<deliveries::Model>, sea_orm::DbErr> {
    deliveries::Entity::find()
        .filter(deliveries::Column::OrderId.eq(order_id))
        .one(conn)
        .await
}

pub async fn mark_picked<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: deliveries::Model,
    now: OffsetDateTime,
) -> Result<deliveries::Model, sea_orm::DbErr> {
    let mut active: deliveries::ActiveModel = model.into();
    active.picked_at = Set(Some(now));
    active.update(conn).await
}

pub async fn mark_delivered<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: deliveries::Model,
    now: OffsetDateTime,
    earning_cents: i64,
) -> Result<deliveries::Model, sea_orm::DbErr> {
    let mut active: deliveries::ActiveModel = model.into();
    active.delivered_at = Set(Some(now));
    active.driver_earning_cents = Set(earning_cents);
    active.update(conn).await
}

/// Drop the not-yet-delivered delivery of `order_id`; returns rows removed.
pub async fn delete_open_for_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = deliveries::Entity::delete_many()
        .filter(deliveries::Column::OrderId.eq(order_id))
        .filter(deliveries::Column::DeliveredAt.is_null())
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Assigned to the driver and not yet delivered, oldest first.
pub async fn list_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver_id: i64,
) -> Result<Vec<deliveries::Model>, sea_orm::DbErr> {
    deliveries::Entity::find()
        .filter(deliveries::Column::DriverId.eq(driver_id))
        .filter(deliveries::Column::DeliveredAt.is_null())
        .order_by_asc(deliveries::Column::AssignedAt)
        .order_by_asc(deliveries::Column::Id)
        .all(conn)
        .await
}

/// Delivered, newest first.
pub async fn list_delivered<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver_id: i64,
) -> Result<Vec<deliveries::Model>, sea_orm::DbErr> {
    deliveries::Entity::find()
        .filter(deliveries::Column::DriverId.eq(driver_id))
        .filter(deliveries::Column::DeliveredAt.is_not_null())
        .order_by_desc(deliveries::Column::DeliveredAt)
        .order_by_desc(deliveries::Column::Id)
        .all(conn)
        .await
}

pub async fn count_delivered_between<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver_id: i64,
    since: OffsetDateTime,
    until: OffsetDateTime,
) -> Result<u64, sea_orm::DbErr> {
    deliveries::Entity::find()
        .filter(deliveries::Column::DriverId.eq(driver_id))
        .filter(deliveries::Column::DeliveredAt.gte(since))
        .filter(deliveries::Column::DeliveredAt.lte(until))
        .count(conn)
        .await
}
