//! Order placement, customer tracking, the restaurant workflow and admin views.

use std::collections::BTreeMap;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use super::cart::{price_lines, RequestedItem};
use super::{geofences, page_limit, payments, restaurants};
use crate::config::AppConfig;
use crate::domain::dispatch::max_delivery_km;
use crate::domain::geo::{haversine_km, point_from, round_km};
use crate::domain::pricing::quote;
use crate::domain::{OrderStatus, OrderType, PaymentProvider};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::cart;
use crate::repos::deliveries;
use crate::repos::menu;
use crate::repos::orders::{self, Order, OrderCreate, OrderFilter, OrderItemCreate, OrderStats};
use crate::repos::restaurants as restaurants_repo;

fn not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Order, "Order not found")
}

#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub restaurant_id: i64,
    pub order_type: OrderType,
    pub items: Vec<RequestedItem>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub customer_lat: Option<f64>,
    pub customer_lon: Option<f64>,
    pub delivery_note: Option<String>,
    pub tip_cents: i64,
    pub pay_with: Option<PaymentProvider>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OrderSummary {
    pub total: i64,
    pub by_status: BTreeMap<String, i64>,
    pub revenue_cents: i64,
}

pub async fn place<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
    input: PlaceOrder,
    config: &AppConfig,
) -> Result<Order, DomainError> {
    if input.tip_cents < 0 {
        return Err(DomainError::validation(
            ValidationKind::InvalidPrice,
            "tip_cents must not be negative",
        ));
    }

    let restaurant = restaurants::get_public(conn, input.restaurant_id).await?;
    let (lines, items) = price_lines(conn, &restaurant, &input.items).await?;

    let distance_km = match input.order_type {
        OrderType::Pickup => None,
        OrderType::Delivery => {
            let customer = point_from(input.customer_lat, input.customer_lon)
                .filter(|p| p.is_valid())
                .ok_or_else(|| {
                    DomainError::validation(
                        ValidationKind::InvalidCoordinates,
                        "Delivery orders need valid customer_lat and customer_lon",
                    )
                })?;
            let origin = restaurant.location().ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::InvalidCoordinates,
                    "Restaurant has no coordinates for delivery",
                )
            })?;

            let km = round_km(haversine_km(origin, customer));
            let max_km = max_delivery_km(&config.dispatch);
            if km > max_km {
                return Err(DomainError::validation(
                    ValidationKind::DistanceExceeded,
                    format!("Delivery distance {km} km exceeds the {max_km} km limit"),
                ));
            }
            geofences::ensure_in_service_area(conn, customer).await?;
            Some(km)
        }
    };

    let priced = quote(&lines, input.order_type, distance_km, &config.pricing);

    let order_items: Vec<OrderItemCreate> = input
        .items
        .iter()
        .zip(lines.iter())
        .map(|(req, line)| OrderItemCreate {
            menu_item_id: req.menu_item_id,
            name: items
                .get(&req.menu_item_id)
                .map(|i| i.name.clone())
                .unwrap_or_default(),
            quantity: line.quantity,
            unit_price_cents: line.unit_price_cents,
            line_total_cents: line.line_total_cents(),
        })
        .collect();

    let order = orders::create(
        conn,
        OrderCreate {
            customer_id,
            restaurant_id: restaurant.id,
            city_id: restaurant.city_id,
            order_type: input.order_type.as_str().to_string(),
            status: OrderStatus::Created.as_str().to_string(),
            customer_name: input.customer_name,
            customer_phone: input.customer_phone,
            customer_address: input.customer_address,
            customer_lat: input.customer_lat,
            customer_lon: input.customer_lon,
            delivery_note: input.delivery_note,
            subtotal_cents: priced.subtotal_cents,
            service_fee_cents: priced.service_fee_cents,
            delivery_fee_cents: priced.delivery_fee_cents,
            tip_cents: input.tip_cents,
            total_cents: priced.total_cents + input.tip_cents,
            distance_km,
        },
        order_items,
    )
    .await?;

    for req in &input.items {
        menu::increment_sales(conn, req.menu_item_id, req.quantity).await?;
    }

    if let Some(provider) = input.pay_with {
        payments::create_intent(conn, &order, provider, config.payment_enabled).await?;
    }

    cart::clear(conn, customer_id).await?;

    info!(
        order_id = order.id,
        customer_id,
        restaurant_id = order.restaurant_id,
        order_type = %order.order_type,
        total_cents = order.total_cents,
        items = order.items.len(),
        "order.created"
    );
    Ok(order)
}

// ----- customer -----

pub async fn list_mine<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
) -> Result<Vec<Order>, DomainError> {
    orders::list(
        conn,
        OrderFilter {
            customer_id: Some(customer_id),
            ..Default::default()
        },
    )
    .await
}

pub async fn get_mine<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
    order_id: i64,
) -> Result<Order, DomainError> {
    orders::find_by_id(conn, order_id)
        .await?
        .filter(|o| o.customer_id == customer_id)
        .ok_or_else(not_found)
}

pub async fn cancel_mine<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
    order_id: i64,
) -> Result<Order, DomainError> {
    let order = get_mine(conn, customer_id, order_id).await?;
    if !order.status.customer_may_cancel() {
        return Err(DomainError::conflict(
            ConflictKind::InvalidStatusTransition,
            format!("Order in status {} can no longer be cancelled", order.status),
        ));
    }
    set_status(conn, order.id, OrderStatus::Cancelled).await
}

// ----- restaurant workflow -----

/// Order placed at a restaurant owned by `owner_id`, or 404.
pub async fn get_for_owner<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    order_id: i64,
) -> Result<Order, DomainError> {
    let order = orders::find_by_id(conn, order_id).await?.ok_or_else(not_found)?;
    let owned = restaurants_repo::find_by_id(conn, order.restaurant_id)
        .await?
        .is_some_and(|r| r.owner_id == owner_id);
    if !owned {
        return Err(not_found());
    }
    Ok(order)
}

pub async fn list_for_restaurant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    restaurant_id: i64,
    status: Option<OrderStatus>,
) -> Result<Vec<Order>, DomainError> {
    restaurants::get_owned(conn, owner_id, restaurant_id).await?;
    orders::list(
        conn,
        OrderFilter {
            restaurant_id: Some(restaurant_id),
            status: status.map(|s| s.as_str().to_string()),
            ..Default::default()
        },
    )
    .await
}

/// Owner-driven status change: confirm, preparing, ready, complete, cancel.
pub async fn advance<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    order_id: i64,
    next: OrderStatus,
) -> Result<Order, DomainError> {
    let order = get_for_owner(conn, owner_id, order_id).await?;
    set_status(conn, order.id, next).await
}

/// Apply a workflow transition and log it.
pub(crate) async fn set_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
    next: OrderStatus,
) -> Result<Order, DomainError> {
    let order = orders::transition(conn, order_id, next)
        .await?
        .ok_or_else(not_found)?;
    if next == OrderStatus::Cancelled {
        let released = deliveries::release_for_order(conn, order_id).await?;
        if released > 0 {
            info!(order_id, "delivery.released");
        }
    }
    info!(order_id, status = %next, "order.status_changed");
    Ok(order)
}

// ----- admin -----

pub async fn admin_list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    status: Option<OrderStatus>,
    restaurant_id: Option<i64>,
    limit: Option<u64>,
    offset: Option<u64>,
) -> Result<Vec<Order>, DomainError> {
    orders::list(
        conn,
        OrderFilter {
            restaurant_id,
            status: status.map(|s| s.as_str().to_string()),
            limit: Some(page_limit(limit)),
            offset,
            ..Default::default()
        },
    )
    .await
}

pub async fn summary<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<OrderSummary, DomainError> {
    let stats = orders::stats(conn, None).await?;
    Ok(OrderSummary::from(stats))
}

impl From<OrderStats> for OrderSummary {
    fn from(stats: OrderStats) -> Self {
        Self {
            total: stats.total(),
            by_status: stats
                .by_status
                .iter()
                .map(|(status, count)| (status.as_str().to_string(), *count))
                .collect(),
            revenue_cents: stats.revenue_cents,
        }
    }
}
