//! SeaORM adapter for driver shifts.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::shifts;

pub async fn find_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver_id: i64,
) -> Result<Option<shifts::Model>, sea_orm::DbErr> {
    shifts::Entity::find()
        .filter(shifts::Column::DriverId.eq(driver_id))
        .filter(shifts::Column::EndsAt.is_null())
        .one(conn)
        .await
}

pub async fn start<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver_id: i64,
    now: OffsetDateTime,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<shifts::Model, sea_orm::DbErr> {
    shifts::ActiveModel {
        id: NotSet,
        driver_id: Set(driver_id),
        starts_at: Set(now),
        ends_at: Set(None),
        start_lat: Set(lat),
        start_lon: Set(lon),
        end_lat: Set(None),
        end_lon: Set(None),
    }
    .insert(conn)
    .await
}

pub async fn end<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: shifts::Model,
    now: OffsetDateTime,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<shifts::Model, sea_orm::DbErr> {
    let mut active: shifts::ActiveModel = model.into();
    active.ends_at = Set(Some(now));
    active.end_lat = Set(lat);
    active.end_lon = Set(lon);
    active.update(conn).await
}

/// Newest first.
pub async fn history<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver_id: i64,
    limit: u64,
) -> Result<Vec<shifts::Model>, sea_orm::DbErr> {
    shifts::Entity::find()
        .filter(shifts::Column::DriverId.eq(driver_id))
        .order_by_desc(shifts::Column::StartsAt)
        .order_by_desc(shifts::Column::Id)
        .limit(limit)
        .all(conn)
        .await
}

/// Shifts that touch `[since, until]`, including ones still open.
pub async fn overlapping<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver_id: i64,
    since: OffsetDateTime,
    until: OffsetDateTime,
) -> Result<Vec<shifts::Model>, sea_orm::DbErr> {
    shifts::Entity::find()
        .filter(shifts::Column::DriverId.eq(driver_id))
        .filter(shifts::Column::StartsAt.lt(until))
        .filter(
            Condition::any()
                .add(shifts::Column::EndsAt.is_null())
                .add(shifts::Column::EndsAt.gt(since)),
        )
        .order_by_asc(shifts::Column::StartsAt)
        .all(conn)
        .await
}
