//! Order repository functions. Orders are always returned with their items.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use super::parse_column;
use crate::adapters::orders_sea as orders_adapter;
use crate::domain::geo::point_from;
use crate::domain::{GeoPoint, OrderStatus, OrderType};
use crate::entities::{order_items, orders};
use crate::errors::domain::DomainError;

pub use orders_adapter::{OrderCreate, OrderFilter, OrderItemCreate, OrderStatsFilter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OrderItem {
    pub id: i64,
    pub menu_item_id: i64,
    pub name: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub city_id: Option<i64>,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub customer_lat: Option<f64>,
    pub customer_lon: Option<f64>,
    pub delivery_note: Option<String>,
    pub subtotal_cents: i64,
    pub service_fee_cents: i64,
    pub delivery_fee_cents: i64,
    pub tip_cents: i64,
    pub total_cents: i64,
    pub distance_km: Option<f64>,
    pub items: Vec<OrderItem>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Order {
    pub fn customer_location(&self) -> Option<GeoPoint> {
        point_from(self.customer_lat, self.customer_lon)
    }
}

/// Order status counts plus delivered revenue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderStats {
    pub by_status: HashMap<OrderStatus, i64>,
    pub revenue_cents: i64,
}

impl OrderStats {
    pub fn total(&self) -> i64 {
        self.by_status.values().sum()
    }

    pub fn count(&self, status: OrderStatus) -> i64 {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: OrderCreate,
    items: Vec<OrderItemCreate>,
) -> Result<Order, DomainError> {
    let (order, rows) = orders_adapter::create_order(conn, dto, items).await?;
    assemble(order, rows)
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Order>, DomainError> {
    let Some(order) = orders_adapter::find_by_id(conn, id).await? else {
        return Ok(None);
    };
    let rows = orders_adapter::items_for_orders(conn, &[order.id]).await?;
    assemble(order, rows).map(Some)
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: OrderFilter,
) -> Result<Vec<Order>, DomainError> {
    let orders = orders_adapter::list(conn, filter).await?;
    with_items(conn, orders).await
}

pub async fn ready_unassigned_deliveries<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Order>, DomainError> {
    let orders = orders_adapter::ready_unassigned_deliveries(conn).await?;
    with_items(conn, orders).await
}

/// Move an order along the workflow, rejecting illegal transitions.
pub async fn transition<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    next: OrderStatus,
) -> Result<Option<Order>, DomainError> {
    let Some(model) = orders_adapter::find_by_id(conn, id).await? else {
        return Ok(None);
    };
    let current: OrderStatus = parse_column(&model.status, "orders.status")?;
    let order_type: OrderType = parse_column(&model.order_type, "orders.order_type")?;
    current.ensure_transition(next, order_type)?;

    let updated = orders_adapter::update_status(conn, model, next.as_str()).await?;
    let rows = orders_adapter::items_for_orders(conn, &[updated.id]).await?;
    assemble(updated, rows).map(Some)
}

pub async fn stats<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    restaurant_id: Option<i64>,
) -> Result<OrderStats, DomainError> {
    stats_within(
        conn,
        &OrderStatsFilter {
            restaurant_id,
            ..Default::default()
        },
    )
    .await
}

pub async fn stats_within<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &OrderStatsFilter,
) -> Result<OrderStats, DomainError> {
    let mut by_status = HashMap::new();
    for (status, count) in orders_adapter::count_by_status(conn, filter).await? {
        let status: OrderStatus = parse_column(&status, "orders.status")?;
        by_status.insert(status, count);
    }
    let revenue_cents =
        orders_adapter::sum_total_by_status(conn, OrderStatus::Delivered.as_str(), filter).await?;
    Ok(OrderStats {
        by_status,
        revenue_cents,
    })
}

async fn with_items<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    orders: Vec<orders::Model>,
) -> Result<Vec<Order>, DomainError> {
    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let mut grouped: HashMap<i64, Vec<order_items::Model>> = HashMap::new();
    for row in orders_adapter::items_for_orders(conn, &ids).await? {
        grouped.entry(row.order_id).or_default().push(row);
    }
    orders
        .into_iter()
        .map(|order| {
            let rows = grouped.remove(&order.id).unwrap_or_default();
            assemble(order, rows)
        })
        .collect()
}

fn assemble(model: orders::Model, rows: Vec<order_items::Model>) -> Result<Order, DomainError> {
    Ok(Order {
        id: model.id,
        customer_id: model.customer_id,
        restaurant_id: model.restaurant_id,
        city_id: model.city_id,
        order_type: parse_column(&model.order_type, "orders.order_type")?,
        status: parse_column(&model.status, "orders.status")?,
        customer_name: model.customer_name,
        customer_phone: model.customer_phone,
        customer_address: model.customer_address,
        customer_lat: model.customer_lat,
        customer_lon: model.customer_lon,
        delivery_note: model.delivery_note,
        subtotal_cents: model.subtotal_cents,
        service_fee_cents: model.service_fee_cents,
        delivery_fee_cents: model.delivery_fee_cents,
        tip_cents: model.tip_cents,
        total_cents: model.total_cents,
        distance_km: model.distance_km,
        items: rows.into_iter().map(OrderItem::from).collect(),
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

impl From<order_items::Model> for OrderItem {
    fn from(model: order_items::Model) -> Self {
        Self {
            id: model.id,
            menu_item_id: model.menu_item_id,
            name: model.name,
            quantity: model.quantity,
            unit_price_cents: model.unit_price_cents,
            line_total_cents: model.line_total_cents,
        }
    }
}
