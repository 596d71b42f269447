//! Shift repository functions.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::adapters::shifts_sea as shifts_adapter;
use crate::domain::payout::ShiftSpan;
use crate::entities::shifts;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Shift {
    pub id: i64,
    pub driver_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub ends_at: Option<OffsetDateTime>,
    pub start_lat: Option<f64>,
    pub start_lon: Option<f64>,
    pub end_lat: Option<f64>,
    pub end_lon: Option<f64>,
}

impl Shift {
    pub fn span(&self) -> ShiftSpan {
        ShiftSpan {
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        }
    }
}

pub async fn find_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver_id: i64,
) -> Result<Option<Shift>, DomainError> {
    Ok(shifts_adapter::find_active(conn, driver_id).await?.map(Shift::from))
}

pub async fn start<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver_id: i64,
    now: OffsetDateTime,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<Shift, DomainError> {
    Ok(shifts_adapter::start(conn, driver_id, now, lat, lon).await?.into())
}

/// Close the driver's active shift, if any.
pub async fn end_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver_id: i64,
    now: OffsetDateTime,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<Option<Shift>, DomainError> {
    let Some(model) = shifts_adapter::find_active(conn, driver_id).await? else {
        return Ok(None);
    };
    Ok(Some(shifts_adapter::end(conn, model, now, lat, lon).await?.into()))
}

pub async fn history<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver_id: i64,
    limit: u64,
) -> Result<Vec<Shift>, DomainError> {
    let rows = shifts_adapter::history(conn, driver_id, limit).await?;
    Ok(rows.into_iter().map(Shift::from).collect())
}

pub async fn overlapping<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver_id: i64,
    since: OffsetDateTime,
    until: OffsetDateTime,
) -> Result<Vec<Shift>, DomainError> {
    let rows = shifts_adapter::overlapping(conn, driver_id, since, until).await?;
    Ok(rows.into_iter().map(Shift::from).collect())
}

impl From<shifts::Model> for Shift {
    fn from(model: shifts::Model) -> Self {
        Self {
            id: model.id,
            driver_id: model.driver_id,
            starts_at: model.starts_at,
            ends_at: model.ends_at,
            start_lat: model.start_lat,
            start_lon: model.start_lon,
            end_lat: model.end_lat,
            end_lon: model.end_lon,
        }
    }
}
