//! Delivery dispatch for drivers: browse, accept, pick up, deliver.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::info;
use utoipa::ToSchema;

use super::drivers::my_profile;
use super::orders::set_status;
use crate::config::DispatchConfig;
use crate::domain::dispatch::{driver_earning_cents, driver_eligible, vehicle_max_km};
use crate::domain::pricing::round_cents;
use crate::domain::{OrderStatus, OrderType};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::deliveries::{self, Delivery};
use crate::repos::drivers::Driver;
use crate::repos::orders::{self, Order};
use crate::repos::shifts;

fn not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Delivery, "Delivery not found")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct EarningsSummary {
    pub completed_deliveries: u64,
    pub total_earning_cents: i64,
    pub average_earning_cents: i64,
}

pub fn summarize(deliveries: &[Delivery]) -> EarningsSummary {
    let completed = deliveries.iter().filter(|d| d.delivered_at.is_some());
    let (count, total) = completed.fold((0u64, 0i64), |(n, sum), d| {
        (n + 1, sum + d.driver_earning_cents)
    });
    EarningsSummary {
        completed_deliveries: count,
        total_earning_cents: total,
        average_earning_cents: if count == 0 {
            0
        } else {
            round_cents(total as f64 / count as f64)
        },
    }
}

/// Delivery belonging to the calling driver, or 404.
async fn my_delivery<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver: &Driver,
    delivery_id: i64,
) -> Result<Delivery, DomainError> {
    deliveries::find_by_id(conn, delivery_id)
        .await?
        .filter(|d| d.driver_id == driver.id)
        .ok_or_else(not_found)
}

pub async fn available<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    config: &DispatchConfig,
) -> Result<Vec<Order>, DomainError> {
    let driver = my_profile(conn, user_id).await?;
    let orders = orders::ready_unassigned_deliveries(conn).await?;
    Ok(orders
        .into_iter()
        .filter(|o| {
            o.distance_km
                .is_some_and(|km| driver_eligible(driver.vehicle_type, km, config))
        })
        .collect())
}

pub async fn accept<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    order_id: i64,
    config: &DispatchConfig,
) -> Result<Delivery, DomainError> {
    let driver = my_profile(conn, user_id).await?;
    assign(conn, &driver, order_id, config).await
}

/// Hand a ready delivery order to `driver`. Shared by self-service accept
/// and dispatcher assignment.
pub async fn assign<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    driver: &Driver,
    order_id: i64,
    config: &DispatchConfig,
) -> Result<Delivery, DomainError> {
    let on_shift = shifts::find_active(conn, driver.id).await?.is_some();
    if !driver.is_active || !driver.is_available || !on_shift {
        return Err(DomainError::validation(
            ValidationKind::DriverUnavailable,
            "Driver must be available with an active shift",
        ));
    }

    let order = orders::find_by_id(conn, order_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Order, "Order not found"))?;
    if deliveries::find_by_order(conn, order.id).await?.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::DeliveryAlreadyAssigned,
            "Order already has a driver",
        ));
    }
    if order.order_type != OrderType::Delivery || order.status != OrderStatus::Ready {
        return Err(DomainError::conflict(
            ConflictKind::InvalidStatusTransition,
            format!("Order in status {} is not ready for delivery", order.status),
        ));
    }

    let distance_km = order.distance_km.unwrap_or(0.0);
    if !driver_eligible(driver.vehicle_type, distance_km, config) {
        return Err(DomainError::validation(
            ValidationKind::DistanceExceeded,
            format!(
                "{distance_km} km exceeds the {} km limit for a {}",
                vehicle_max_km(driver.vehicle_type, config),
                driver.vehicle_type
            ),
        ));
    }

    let delivery =
        deliveries::create(conn, order.id, driver.id, distance_km, OffsetDateTime::now_utc())
            .await?;
    set_status(conn, order.id, OrderStatus::Assigned).await?;

    info!(delivery_id = delivery.id, order_id, driver_id = driver.id, distance_km, "delivery.assigned");
    Ok(delivery)
}

pub async fn pickup<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    delivery_id: i64,
) -> Result<Delivery, DomainError> {
    let driver = my_profile(conn, user_id).await?;
    let delivery = my_delivery(conn, &driver, delivery_id).await?;
    if delivery.picked_at.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::InvalidStatusTransition,
            "Delivery was already picked up",
        ));
    }

    let delivery = deliveries::mark_picked(conn, delivery.id, OffsetDateTime::now_utc())
        .await?
        .ok_or_else(not_found)?;
    set_status(conn, delivery.order_id, OrderStatus::PickedUp).await?;

    info!(delivery_id, order_id = delivery.order_id, "delivery.picked_up");
    Ok(delivery)
}

pub async fn deliver<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    delivery_id: i64,
    config: &DispatchConfig,
) -> Result<Delivery, DomainError> {
    let driver = my_profile(conn, user_id).await?;
    let delivery = my_delivery(conn, &driver, delivery_id).await?;
    if delivery.delivered_at.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::InvalidStatusTransition,
            "Delivery was already completed",
        ));
    }
    if delivery.picked_at.is_none() {
        return Err(DomainError::conflict(
            ConflictKind::InvalidStatusTransition,
            "Delivery must be picked up first",
        ));
    }

    let earning = driver_earning_cents(delivery.distance_km, config);
    let delivery =
        deliveries::mark_delivered(conn, delivery.id, OffsetDateTime::now_utc(), earning)
            .await?
            .ok_or_else(not_found)?;
    set_status(conn, delivery.order_id, OrderStatus::Delivered).await?;

    info!(
        delivery_id,
        order_id = delivery.order_id,
        driver_earning_cents = earning,
        "delivery.completed"
    );
    Ok(delivery)
}

pub async fn active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<Delivery>, DomainError> {
    let driver = my_profile(conn, user_id).await?;
    deliveries::list_active(conn, driver.id).await
}

pub async fn history<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<Delivery>, DomainError> {
    let driver = my_profile(conn, user_id).await?;
    deliveries::list_delivered(conn, driver.id).await
}

pub async fn earnings_summary<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<EarningsSummary, DomainError> {
    Ok(summarize(&history(conn, user_id).await?))
}
