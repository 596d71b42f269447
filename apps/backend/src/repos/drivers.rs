//! Driver profile repository functions.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use super::parse_column;
use crate::adapters::drivers_sea as drivers_adapter;
use crate::domain::VehicleType;
use crate::entities::drivers;
use crate::errors::domain::DomainError;

pub use drivers_adapter::DriverUpdate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Driver {
    pub id: i64,
    pub user_id: i64,
    pub vehicle_type: VehicleType,
    pub hourly_rate_cents: i64,
    pub license_plate: Option<String>,
    pub is_available: bool,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    vehicle_type: VehicleType,
    license_plate: Option<String>,
) -> Result<Driver, DomainError> {
    let row = drivers_adapter::create(conn, user_id, vehicle_type.as_str(), license_plate).await?;
    Driver::try_from(row)
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Driver>, DomainError> {
    drivers_adapter::find_by_id(conn, id)
        .await?
        .map(Driver::try_from)
        .transpose()
}

pub async fn find_by_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<Driver>, DomainError> {
    drivers_adapter::find_by_user(conn, user_id)
        .await?
        .map(Driver::try_from)
        .transpose()
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    dto: DriverUpdate,
) -> Result<Option<Driver>, DomainError> {
    let Some(model) = drivers_adapter::find_by_id(conn, id).await? else {
        return Ok(None);
    };
    Driver::try_from(drivers_adapter::update(conn, model, dto).await?).map(Some)
}

pub async fn set_available<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    is_available: bool,
) -> Result<Option<Driver>, DomainError> {
    let Some(model) = drivers_adapter::find_by_id(conn, id).await? else {
        return Ok(None);
    };
    Driver::try_from(drivers_adapter::set_available(conn, model, is_available).await?).map(Some)
}

pub async fn list_available<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Driver>, DomainError> {
    drivers_adapter::list_available(conn)
        .await?
        .into_iter()
        .map(Driver::try_from)
        .collect()
}

impl TryFrom<drivers::Model> for Driver {
    type Error = DomainError;

    fn try_from(model: drivers::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            vehicle_type: parse_column(&model.vehicle_type, "drivers.vehicle_type")?,
            hourly_rate_cents: model.hourly_rate_cents,
            license_plate: model.license_plate,
            is_available: model.is_available,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
