//! Driver profiles and admin dispatch views.

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::config::DispatchConfig;
use crate::domain::dispatch::driver_eligible;
use crate::domain::VehicleType;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::drivers::{self, Driver, DriverUpdate};

fn not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Driver, "Driver profile not found")
}

pub async fn create_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    vehicle_type: VehicleType,
    license_plate: Option<String>,
) -> Result<Driver, DomainError> {
    if drivers::find_by_user(conn, user_id).await?.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::DriverProfileExists,
            "Driver profile already exists",
        ));
    }
    let driver = drivers::create(conn, user_id, vehicle_type, license_plate).await?;
    info!(driver_id = driver.id, user_id, vehicle = %vehicle_type, "driver.created");
    Ok(driver)
}

/// The caller's driver profile, or 404.
pub async fn my_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Driver, DomainError> {
    drivers::find_by_user(conn, user_id).await?.ok_or_else(not_found)
}

pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    vehicle_type: Option<VehicleType>,
    license_plate: Option<Option<String>>,
) -> Result<Driver, DomainError> {
    let driver = my_profile(conn, user_id).await?;
    drivers::update(
        conn,
        driver.id,
        DriverUpdate {
            vehicle_type: vehicle_type.map(|v| v.as_str().to_string()),
            license_plate,
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(not_found)
}

pub async fn toggle_availability<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Driver, DomainError> {
    let driver = my_profile(conn, user_id).await?;
    let driver = drivers::set_available(conn, driver.id, !driver.is_available)
        .await?
        .ok_or_else(not_found)?;
    info!(driver_id = driver.id, is_available = driver.is_available, "driver.availability_changed");
    Ok(driver)
}

pub async fn eligible_for<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    distance_km: f64,
    config: &DispatchConfig,
) -> Result<Vec<Driver>, DomainError> {
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(DomainError::validation_other("distance_km must be a non-negative number"));
    }
    let drivers = drivers::list_available(conn).await?;
    Ok(drivers
        .into_iter()
        .filter(|d| driver_eligible(d.vehicle_type, distance_km, config))
        .collect())
}

pub async fn admin_update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver_id: i64,
    hourly_rate_cents: Option<i64>,
    is_active: Option<bool>,
) -> Result<Driver, DomainError> {
    if hourly_rate_cents.is_some_and(|r| r < 0) {
        return Err(DomainError::validation(
            ValidationKind::InvalidPrice,
            "hourly_rate_cents must not be negative",
        ));
    }
    let driver = drivers::update(
        conn,
        driver_id,
        DriverUpdate {
            hourly_rate_cents,
            is_active,
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(not_found)?;
    info!(driver_id, hourly_rate_cents = driver.hourly_rate_cents, is_active = driver.is_active, "driver.admin_updated");
    Ok(driver)
}
