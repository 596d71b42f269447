//! SeaORM adapter for geofence polygons.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;

use crate::entities::geofences;

/// `polygon` is the serialized JSON vertex list.
pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
    polygon: String,
) -> Result<geofences::Model, sea_orm::DbErr> {
    geofences::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        polygon: Set(polygon),
        is_active: Set(true),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<geofences::Model>, sea_orm::DbErr> {
    geofences::Entity::find_by_id(id).one(conn).await
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    active_only: bool,
) -> Result<Vec<geofences::Model>, sea_orm::DbErr> {
    let mut query = geofences::Entity::find();
    if active_only {
        query = query.filter(geofences::Column::IsActive.eq(true));
    }
    query.order_by_asc(geofences::Column::Id).all(conn).await
}

pub async fn set_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: geofences::Model,
    is_active: bool,
) -> Result<geofences::Model, sea_orm::DbErr> {
    let mut active: geofences::ActiveModel = model.into();
    active.is_active = Set(is_active);
    active.update(conn).await
}
