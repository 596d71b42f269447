//! Driver shifts.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::info;

use super::drivers::my_profile;
use super::page_limit;
use crate::domain::geo::point_from;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::drivers;
use crate::repos::shifts::{self, Shift};

fn no_active_shift() -> DomainError {
    DomainError::not_found(NotFoundKind::Shift, "No active shift")
}

fn check_point(lat: Option<f64>, lon: Option<f64>) -> Result<(), DomainError> {
    match (lat, lon, point_from(lat, lon)) {
        (None, None, _) => Ok(()),
        (_, _, Some(p)) if p.is_valid() => Ok(()),
        _ => Err(DomainError::validation(
            ValidationKind::InvalidCoordinates,
            "lat and lon must be given together and be in range",
        )),
    }
}

pub async fn start<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<Shift, DomainError> {
    check_point(lat, lon)?;
    let driver = my_profile(conn, user_id).await?;
    if shifts::find_active(conn, driver.id).await?.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::ShiftAlreadyActive,
            "A shift is already active",
        ));
    }

    let shift = shifts::start(conn, driver.id, OffsetDateTime::now_utc(), lat, lon).await?;
    drivers::set_available(conn, driver.id, true).await?;
    info!(driver_id = driver.id, shift_id = shift.id, "shift.started");
    Ok(shift)
}

pub async fn end<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<Shift, DomainError> {
    check_point(lat, lon)?;
    let driver = my_profile(conn, user_id).await?;
    let shift = shifts::end_active(conn, driver.id, OffsetDateTime::now_utc(), lat, lon)
        .await?
        .ok_or_else(no_active_shift)?;
    drivers::set_available(conn, driver.id, false).await?;

    let minutes = shift
        .ends_at
        .map(|end| (end - shift.starts_at).whole_minutes())
        .unwrap_or(0);
    info!(driver_id = driver.id, shift_id = shift.id, minutes, "shift.ended");
    Ok(shift)
}

pub async fn active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Shift, DomainError> {
    let driver = my_profile(conn, user_id).await?;
    shifts::find_active(conn, driver.id)
        .await?
        .ok_or_else(no_active_shift)
}

pub async fn history<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    limit: Option<u64>,
) -> Result<Vec<Shift>, DomainError> {
    let driver = my_profile(conn, user_id).await?;
    shifts::history(conn, driver.id, page_limit(limit)).await
}
