//! Delivery repository functions.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::adapters::deliveries_sea as deliveries_adapter;
use crate::entities::deliveries;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Delivery {
    pub id: i64,
    pub order_id: i64,
    pub driver_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub assigned_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub picked_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub delivered_at: Option<OffsetDateTime>,
    pub distance_km: f64,
    pub driver_earning_cents: i64,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
    driver_id: i64,
    distance_km: f64,
    now: OffsetDateTime,
) -> Result<Delivery, DomainError> {
    Ok(deliveries_adapter::create(conn, order_id, driver_id, distance_km, now)
        .await?
        .into())
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Delivery>, DomainError> {
    Ok(deliveries_adapter::find_by_id(conn, id).await?.map(Delivery::from))
}

pub async fn find_by_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
) -> Result<Option<Delivery>, DomainError> {
    Ok(deliveries_adapter::find_by_order(conn, order_id)
        .await?
        .map(Delivery::from))
}

pub async fn mark_picked<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    now: OffsetDateTime,
) -> Result<Option<Delivery>, DomainError> {
    let Some(model) = deliveries_adapter::find_by_id(conn, id).await? else {
        return Ok(None);
    };
    Ok(Some(deliveries_adapter::mark_picked(conn, model, now).await?.into()))
}

pub async fn mark_delivered<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    now: OffsetDateTime,
    earning_cents: i64,
) -> Result<Option<Delivery>, DomainError> {
    let Some(model) = deliveries_adapter::find_by_id(conn, id).await? else {
        return Ok(None);
    };
    let row = deliveries_adapter::mark_delivered(conn, model, now, earning_cents).await?;
    Ok(Some(row.into()))
}

/// Frees an order's open delivery so it no longer shows for the driver.
pub async fn release_for_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
) -> Result<u64, DomainError> {
    Ok(deliveries_adapter::delete_open_for_order(conn, order_id).await?)
}

pub async fn list_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver_id: i64,
) -> Result<Vec<Delivery>, DomainError> {
    let rows = deliveries_adapter::list_active(conn, driver_id).await?;
    Ok(rows.into_iter().map(Delivery::from).collect())
}

pub async fn list_delivered<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver_id: i64,
) -> Result<Vec<Delivery>, DomainError> {
    let rows = deliveries_adapter::list_delivered(conn, driver_id).await?;
    Ok(rows.into_iter().map(Delivery::from).collect())
}

pub async fn count_delivered_between<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver_id: i64,
    since: OffsetDateTime,
    until: OffsetDateTime,
) -> Result<u64, DomainError> {
    Ok(deliveries_adapter::count_delivered_between(conn, driver_id, since, until).await?)
}

impl From<deliveries::Model> for Delivery {
    fn from(model: deliveries::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            driver_id: model.driver_id,
            assigned_at: model.assigned_at,
            picked_at: model.picked_at,
            delivered_at: model.delivered_at,
            distance_km: model.distance_km,
            driver_earning_cents: model.driver_earning_cents,
        }
    }
}
