//! SeaORM adapter for orders and order items.

use sea_orm::sea_query::{Alias, Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use super::scope_condition;
use crate::entities::{deliveries, order_items, orders};

pub mod dto;

pub use dto::{OrderCreate, OrderFilter, OrderItemCreate, OrderStatsFilter};

pub async fn create_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: OrderCreate,
    items: Vec<OrderItemCreate>,
) -> Result<(orders::Model, Vec<order_items::Model>), sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let order = orders::ActiveModel {
        id: NotSet,
        customer_id: Set(dto.customer_id),
        restaurant_id: Set(dto.restaurant_id),
        city_id: Set(dto.city_id),
        order_type: Set(dto.order_type),
        status: Set(dto.status),
        customer_name: Set(dto.customer_name),
        customer_phone: Set(dto.customer_phone),
        customer_address: Set(dto.customer_address),
        customer_lat: Set(dto.customer_lat),
        customer_lon: Set(dto.customer_lon),
        delivery_note: Set(dto.delivery_note),
        subtotal_cents: Set(dto.subtotal_cents),
        service_fee_cents: Set(dto.service_fee_cents),
        delivery_fee_cents: Set(dto.delivery_fee_cents),
        tip_cents: Set(dto.tip_cents),
        total_cents: Set(dto.total_cents),
        distance_km: Set(dto.distance_km),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?;

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let row = order_items::ActiveModel {
            id: NotSet,
            order_id: Set(order.id),
            menu_item_id: Set(item.menu_item_id),
            name: Set(item.name),
            quantity: Set(item.quantity),
            unit_price_cents: Set(item.unit_price_cents),
            line_total_cents: Set(item.line_total_cents),
        }
        .insert(conn)
        .await?;
        rows.push(row);
    }

    Ok((order, rows))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<orders::Model>, sea_orm::DbErr> {
    orders::Entity::find_by_id(id).one(conn).await
}

/// Newest first.
pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: OrderFilter,
) -> Result<Vec<orders::Model>, sea_orm::DbErr> {
    let mut query = orders::Entity::find();
    if let Some(customer_id) = filter.customer_id {
        query = query.filter(orders::Column::CustomerId.eq(customer_id));
    }
    if let Some(restaurant_id) = filter.restaurant_id {
        query = query.filter(orders::Column::RestaurantId.eq(restaurant_id));
    }
    if let Some(city_id) = filter.city_id {
        query = query.filter(orders::Column::CityId.eq(city_id));
    }
    if let Some(scope) = filter.scope.as_ref() {
        query = query.filter(scope_condition(scope, orders::Column::CityId, orders::Column::RestaurantId));
    }
    if let Some(status) = filter.status {
        query = query.filter(orders::Column::Status.eq(status));
    }
    if let Some(order_type) = filter.order_type {
        query = query.filter(orders::Column::OrderType.eq(order_type));
    }
    query
        .order_by_desc(orders::Column::CreatedAt)
        .order_by_desc(orders::Column::Id)
        .limit(filter.limit)
        .offset(filter.offset)
        .all(conn)
        .await
}

pub async fn items_for_orders<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_ids: &[i64],
) -> Result<Vec<order_items::Model>, sea_orm::DbErr> {
    if order_ids.is_empty() {
        return Ok(Vec::new());
    }
    order_items::Entity::find()
        .filter(order_items::Column::OrderId.is_in(order_ids.iter().copied()))
        .order_by_asc(order_items::Column::Id)
        .all(conn)
        .await
}

pub async fn update_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: orders::Model,
    status: &str,
) -> Result<orders::Model, sea_orm::DbErr> {
    let mut active: orders::ActiveModel = model.into();
    active.status = Set(status.to_string());
    active.updated_at = Set(OffsetDateTime::now_utc());
    active.update(conn).await
}

/// Ready delivery orders that no driver has taken yet.
pub async fn ready_unassigned_deliveries<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<orders::Model>, sea_orm::DbErr> {
    orders::Entity::find()
        .filter(orders::Column::Status.eq("ready"))
        .filter(orders::Column::OrderType.eq("delivery"))
        .filter(
            orders::Column::Id.not_in_subquery(
                sea_orm::sea_query::Query::select()
                    .column(deliveries::Column::OrderId)
                    .from(deliveries::Entity)
                    .to_owned(),
            ),
        )
        .order_by_asc(orders::Column::CreatedAt)
        .order_by_asc(orders::Column::Id)
        .all(conn)
        .await
}

/// `(status, count)` pairs within the filter.
pub async fn count_by_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &OrderStatsFilter,
) -> Result<Vec<(String, i64)>, sea_orm::DbErr> {
    orders::Entity::find()
        .select_only()
        .column(orders::Column::Status)
        .column_as(orders::Column::Id.count(), "count")
        .filter(stats_condition(filter))
        .group_by(orders::Column::Status)
        .into_tuple::<(String, i64)>()
        .all(conn)
        .await
}

/// Sum of `total_cents` over orders in `status` within the filter.
pub async fn sum_total_by_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    status: &str,
    filter: &OrderStatsFilter,
) -> Result<i64, sea_orm::DbErr> {
    // Postgres sums bigint into numeric; cast back so both backends decode i64
    let sum = Func::cast_as(
        Func::sum(Expr::col(orders::Column::TotalCents)),
        Alias::new("BIGINT"),
    );
    let revenue = orders::Entity::find()
        .select_only()
        .column_as(Expr::expr(sum), "revenue")
        .filter(orders::Column::Status.eq(status))
        .filter(stats_condition(filter))
        .into_tuple::<Option<i64>>()
        .one(conn)
        .await?;
    Ok(revenue.flatten().unwrap_or(0))
}

fn stats_condition(filter: &OrderStatsFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(restaurant_id) = filter.restaurant_id {
        cond = cond.add(orders::Column::RestaurantId.eq(restaurant_id));
    }
    if let Some(city_id) = filter.city_id {
        cond = cond.add(orders::Column::CityId.eq(city_id));
    }
    if let Some(scope) = filter.scope.as_ref() {
        cond = cond.add(scope_condition(scope, orders::Column::CityId, orders::Column::RestaurantId));
    }
    cond
}
