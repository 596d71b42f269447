//! Staff consoles narrowed by [`AccessScopes`]: orders and restaurants a
//! city admin, dispatcher, support agent or restaurant admin may act on.

use std::collections::BTreeMap;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use super::{deliveries as delivery_service, page_limit, payments};
use crate::config::DispatchConfig;
use crate::domain::scopes::{self, AccessScopes};
use crate::domain::OrderStatus;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::deliveries::Delivery;
use crate::repos::drivers;
use crate::repos::orders::{self, Order, OrderFilter, OrderStatsFilter};
use crate::repos::restaurants::{self as restaurants_repo, Restaurant, RestaurantFilter};

fn order_not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Order, "Order not found")
}

fn restaurant_not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Restaurant, "Restaurant not found")
}

fn require_staff(scopes: &AccessScopes) -> Result<(), DomainError> {
    if scopes.is_staff() {
        return Ok(());
    }
    Err(DomainError::forbidden("Staff access required"))
}

/// Explicit city or restaurant filters must lie inside the caller's scope.
fn check_filters(
    scopes: &AccessScopes,
    city_id: Option<i64>,
    restaurant: Option<&Restaurant>,
) -> Result<(), DomainError> {
    if let Some(city_id) = city_id {
        if !scopes.can_access_city(city_id) {
            return Err(DomainError::forbidden(format!("No access to city {city_id}")));
        }
    }
    if let Some(restaurant) = restaurant {
        if !scopes.can_access_restaurant(restaurant.id, restaurant.city_id) {
            return Err(DomainError::forbidden(format!(
                "No access to restaurant {}",
                restaurant.id
            )));
        }
    }
    Ok(())
}

async fn scoped_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
    order_id: i64,
) -> Result<Order, DomainError> {
    let order = orders::find_by_id(conn, order_id)
        .await?
        .ok_or_else(order_not_found)?;
    if !scopes.can_access_restaurant(order.restaurant_id, order.city_id) {
        return Err(DomainError::forbidden(format!("No access to order {order_id}")));
    }
    Ok(order)
}

async fn restaurant_filter<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    restaurant_id: Option<i64>,
) -> Result<Option<Restaurant>, DomainError> {
    match restaurant_id {
        Some(id) => restaurants_repo::find_by_id(conn, id)
            .await?
            .ok_or_else(restaurant_not_found)
            .map(Some),
        None => Ok(None),
    }
}

// ----- orders -----

#[derive(Debug, Clone, Default)]
pub struct StaffOrderQuery {
    pub city_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    pub status: Option<OrderStatus>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

pub async fn list_orders<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
    query: StaffOrderQuery,
) -> Result<Vec<Order>, DomainError> {
    require_staff(scopes)?;
    let restaurant = restaurant_filter(conn, query.restaurant_id).await?;
    check_filters(scopes, query.city_id, restaurant.as_ref())?;

    orders::list(
        conn,
        OrderFilter {
            restaurant_id: query.restaurant_id,
            city_id: query.city_id,
            scope: scopes.filter(),
            status: query.status.map(|s| s.as_str().to_string()),
            limit: Some(page_limit(query.limit)),
            offset: query.offset,
            ..Default::default()
        },
    )
    .await
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StaffOrderStats {
    pub total_orders: i64,
    /// Sum of delivered order totals
    pub total_revenue_cents: i64,
    /// Created through ready
    pub pending_orders: i64,
    pub completed_orders: i64,
    pub by_status: BTreeMap<String, i64>,
}

pub async fn order_stats<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
    city_id: Option<i64>,
    restaurant_id: Option<i64>,
) -> Result<StaffOrderStats, DomainError> {
    require_staff(scopes)?;
    let restaurant = restaurant_filter(conn, restaurant_id).await?;
    check_filters(scopes, city_id, restaurant.as_ref())?;

    let stats = orders::stats_within(
        conn,
        &OrderStatsFilter {
            restaurant_id,
            city_id,
            scope: scopes.filter(),
        },
    )
    .await?;
    let pending_orders = [
        OrderStatus::Created,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
    ]
    .into_iter()
    .map(|s| stats.count(s))
    .sum();

    Ok(StaffOrderStats {
        total_orders: stats.total(),
        total_revenue_cents: stats.revenue_cents,
        pending_orders,
        completed_orders: stats.count(OrderStatus::Delivered),
        by_status: stats
            .by_status
            .iter()
            .map(|(status, count)| (status.as_str().to_string(), *count))
            .collect(),
    })
}

/// Dispatcher hands a ready order to a specific driver.
pub async fn assign_driver<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
    order_id: i64,
    driver_id: i64,
    config: &DispatchConfig,
) -> Result<Delivery, DomainError> {
    if !scopes.is_super_admin && !scopes.has_role(&[scopes::DISPATCHER]) {
        return Err(DomainError::forbidden("Dispatcher access required"));
    }
    let order = scoped_order(conn, scopes, order_id).await?;
    let driver = drivers::find_by_id(conn, driver_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Driver, "Driver not found"))?;

    let delivery = delivery_service::assign(conn, &driver, order.id, config).await?;
    info!(order_id, driver_id, dispatcher_id = scopes.user_id, "delivery.dispatched");
    Ok(delivery)
}

pub async fn refund<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
    order_id: i64,
    amount_cents: Option<i64>,
    reason: Option<String>,
) -> Result<payments::RefundOutcome, DomainError> {
    if !scopes.is_super_admin && !scopes.has_role(&[scopes::SUPPORT]) {
        return Err(DomainError::forbidden("Support access required"));
    }
    scoped_order(conn, scopes, order_id).await?;
    let outcome = payments::refund_order(conn, order_id, amount_cents, reason).await?;
    info!(order_id, agent_id = scopes.user_id, "order.refunded_by_staff");
    Ok(outcome)
}

// ----- restaurants -----

#[derive(Debug, Clone, Default)]
pub struct StaffRestaurantQuery {
    pub city_id: Option<i64>,
    pub pending_approval: bool,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

pub async fn list_restaurants<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
    query: StaffRestaurantQuery,
) -> Result<Vec<Restaurant>, DomainError> {
    require_staff(scopes)?;
    check_filters(scopes, query.city_id, None)?;
    restaurants_repo::list(
        conn,
        RestaurantFilter {
            approved: query.pending_approval.then_some(false),
            city_id: query.city_id,
            scope: scopes.filter(),
            limit: page_limit(query.limit),
            offset: query.offset.unwrap_or(0),
            ..Default::default()
        },
    )
    .await
}

/// Approve or reject. Super admins review anything, city admins their
/// cities, restaurant admins their own restaurants.
pub async fn review_restaurant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
    restaurant_id: i64,
    approve: bool,
    notes: Option<String>,
) -> Result<Restaurant, DomainError> {
    let restaurant = restaurants_repo::find_by_id(conn, restaurant_id)
        .await?
        .ok_or_else(restaurant_not_found)?;
    let in_city = scopes.has_role(&[scopes::CITY_ADMIN])
        && restaurant.city_id.is_some_and(|id| scopes.can_access_city(id));
    let holds_restaurant = scopes.has_role(&[scopes::RESTAURANT_ADMIN])
        && scopes.restaurant_ids.contains(&restaurant_id);
    if !scopes.is_super_admin && !in_city && !holds_restaurant {
        return Err(DomainError::forbidden(format!(
            "Not allowed to review restaurant {restaurant_id}"
        )));
    }

    let reviewed = restaurants_repo::set_approval(conn, restaurant_id, scopes.user_id, approve)
        .await?
        .ok_or_else(restaurant_not_found)?;
    info!(
        restaurant_id,
        approve,
        reviewer_id = scopes.user_id,
        notes = notes.as_deref().unwrap_or(""),
        "restaurant.reviewed"
    );
    Ok(reviewed)
}

pub async fn set_restaurant_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
    restaurant_id: i64,
    is_active: bool,
) -> Result<Restaurant, DomainError> {
    let restaurant = restaurants_repo::find_by_id(conn, restaurant_id)
        .await?
        .ok_or_else(restaurant_not_found)?;
    let in_city = scopes.has_role(&[scopes::CITY_ADMIN])
        && restaurant.city_id.is_some_and(|id| scopes.can_access_city(id));
    if !scopes.is_super_admin && !in_city {
        return Err(DomainError::forbidden(format!(
            "Not allowed to change restaurant {restaurant_id}"
        )));
    }

    let updated = restaurants_repo::set_active(conn, restaurant_id, is_active)
        .await?
        .ok_or_else(restaurant_not_found)?;
    info!(restaurant_id, is_active, changed_by = scopes.user_id, "restaurant.active_changed");
    Ok(updated)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CityPendingCount {
    pub city_id: Option<i64>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PendingApprovalCounts {
    pub total_pending: i64,
    pub by_city: Vec<CityPendingCount>,
}

pub async fn pending_approval_counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
) -> Result<PendingApprovalCounts, DomainError> {
    if !scopes.is_super_admin && !scopes.has_city_scope() {
        return Err(DomainError::forbidden("City or admin access required"));
    }
    let filter = scopes.filter();
    let by_city: Vec<CityPendingCount> =
        restaurants_repo::pending_approval_by_city(conn, filter.as_ref())
            .await?
            .into_iter()
            .map(|(city_id, count)| CityPendingCount { city_id, count })
            .collect();
    Ok(PendingApprovalCounts {
        total_pending: by_city.iter().map(|c| c.count).sum(),
        by_city,
    })
}
